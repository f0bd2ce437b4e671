//! Temporal NBR difference (dNBR)
//!
//! `dNBR = NBR_before - NBR_after`. Positive values mark vegetation loss
//! between the two dates. A pixel is valid only where both dates are.

use ndarray::Zip;
use burnratio_core::raster::{Raster, RasterElement};
use burnratio_core::{Algorithm, Error, Result};

use super::{check_dimensions, BurnRatioParams};

/// dNBR as an algorithm object over a `(before, after)` pair of NBR rasters
#[derive(Debug, Clone, Default)]
pub struct BurnDifference;

impl Algorithm for BurnDifference {
    type Input = (Raster<f32>, Raster<f32>);
    type Output = Raster<f32>;
    type Params = BurnRatioParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "dNBR"
    }

    fn description(&self) -> &'static str {
        "Pre-fire minus post-fire NBR, masked to pixels valid on both dates"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (before, after) = input;
        masked_difference(&before, &after, params.nodata)
    }
}

/// Pixelwise `before - after`, masked by validity.
///
/// A cell equal to `nodata` (or NaN) in either input is `nodata` in the
/// output; all other cells hold the difference. The output takes its
/// transform and CRS from `before`.
///
/// # Errors
/// `Error::SizeMismatch` when the rasters differ in shape.
pub fn masked_difference(
    before: &Raster<f32>,
    after: &Raster<f32>,
    nodata: f32,
) -> Result<Raster<f32>> {
    check_dimensions(before, after)?;

    let sentinel = Some(nodata);
    let data = Zip::from(before.data())
        .and(after.data())
        .map_collect(|&b, &a| {
            if b.is_nodata(sentinel) || a.is_nodata(sentinel) {
                nodata
            } else {
                b - a
            }
        });

    let mut output = before.with_same_meta(data)?;
    output.set_nodata(sentinel);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagery::NODATA;
    use approx::assert_relative_eq;
    use burnratio_core::{GeoTransform, CRS};
    use ndarray::array;

    #[test]
    fn test_mask_requires_both_dates_valid() {
        let before = Raster::from_array(array![[0.5_f32, -9999.0, 0.2]]);
        let after = Raster::from_array(array![[0.1_f32, 0.3, -9999.0]]);

        let result = masked_difference(&before, &after, NODATA).unwrap();

        assert_relative_eq!(result.get(0, 0).unwrap(), 0.4, epsilon = 1e-6);
        assert_eq!(result.get(0, 1).unwrap(), NODATA);
        assert_eq!(result.get(0, 2).unwrap(), NODATA);
        assert_eq!(result.nodata(), Some(NODATA));
    }

    #[test]
    fn test_nodata_iff_nodata_in_either_source() {
        let before = Raster::from_array(array![
            [0.8_f32, -9999.0, 0.1],
            [-9999.0, -0.4, 0.0]
        ]);
        let after = Raster::from_array(array![
            [-0.2_f32, 0.6, -9999.0],
            [-9999.0, -0.4, 0.3]
        ]);

        let result = masked_difference(&before, &after, NODATA).unwrap();

        for ((row, col), &val) in result.data().indexed_iter() {
            let b = before.get(row, col).unwrap();
            let a = after.get(row, col).unwrap();
            let expect_nodata = b == NODATA || a == NODATA;
            assert_eq!(
                val == NODATA,
                expect_nodata,
                "validity mismatch at ({}, {}): {}",
                row,
                col,
                val
            );
            if !expect_nodata {
                assert_eq!(val, b - a);
            }
        }
    }

    #[test]
    fn test_burn_scar_is_positive() {
        // Vegetated before, charred after
        let before = Raster::filled(3, 3, 0.65_f32);
        let after = Raster::filled(3, 3, -0.25_f32);

        let result = masked_difference(&before, &after, NODATA).unwrap();
        assert_relative_eq!(result.get(1, 1).unwrap(), 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_output_uses_before_georeference() {
        let mut before = Raster::filled(2, 2, 0.5_f32);
        before.set_transform(GeoTransform::new(600000.0, 4100000.0, 30.0, -30.0));
        before.set_crs(Some(CRS::from_epsg(32611)));
        let mut after = Raster::filled(2, 2, 0.2_f32);
        after.set_crs(Some(CRS::from_epsg(32612)));

        let result = masked_difference(&before, &after, NODATA).unwrap();
        assert_eq!(result.georeference(), before.georeference());
    }

    #[test]
    fn test_shape_mismatch() {
        let before = Raster::filled(2, 3, 0.5_f32);
        let after = Raster::filled(3, 2, 0.5_f32);

        assert!(masked_difference(&before, &after, NODATA).is_err());
    }

    #[test]
    fn test_algorithm_object() {
        let before = Raster::from_array(array![[0.5_f32, -9999.0]]);
        let after = Raster::from_array(array![[0.25_f32, 0.1]]);

        let result = BurnDifference.execute_default((before, after)).unwrap();
        assert_eq!(result.get(0, 0).unwrap(), 0.25);
        assert_eq!(result.get(0, 1).unwrap(), NODATA);
    }
}
