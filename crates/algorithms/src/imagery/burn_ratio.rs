//! Normalized Burn Ratio
//!
//! `NBR = (NIR - SWIR) / (NIR + SWIR)`
//!
//! Healthy vegetation reflects strongly in NIR and weakly in SWIR, giving
//! values near 1. Fresh burn scars invert that relationship and drop
//! towards -1.

use ndarray::Zip;
use burnratio_core::raster::Raster;
use burnratio_core::{Algorithm, Error, Result};

use super::check_dimensions;

/// Sentinel written where the ratio is undefined
pub const NODATA: f32 = -9999.0;

/// Parameters for the NBR transform
#[derive(Debug, Clone)]
pub struct BurnRatioParams {
    /// Value written where both bands clamp to zero. Default: -9999
    pub nodata: f32,
}

impl Default for BurnRatioParams {
    fn default() -> Self {
        Self { nodata: NODATA }
    }
}

/// NBR as an algorithm object over a `(nir, swir)` pair
#[derive(Debug, Clone, Default)]
pub struct BurnRatio;

impl Algorithm for BurnRatio {
    type Input = (Raster<f32>, Raster<f32>);
    type Output = Raster<f32>;
    type Params = BurnRatioParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "NBR"
    }

    fn description(&self) -> &'static str {
        "Normalized Burn Ratio from NIR and SWIR reflectance"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (nir, swir) = input;
        burn_ratio_with(&nir, &swir, &params)
    }
}

/// Normalized Burn Ratio with the default -9999 sentinel.
///
/// # Arguments
/// * `nir` - Near-infrared band
/// * `swir` - Shortwave infrared band, same shape as `nir`
pub fn burn_ratio(nir: &Raster<f32>, swir: &Raster<f32>) -> Result<Raster<f32>> {
    burn_ratio_with(nir, swir, &BurnRatioParams::default())
}

/// Normalized Burn Ratio.
///
/// Negative reflectance is a sensor artifact and is clamped to zero in
/// each band before the ratio. A pixel whose ratio is NaN (both bands at
/// zero after clamping, or NaN input) gets `params.nodata`; every other
/// pixel lies in [-1, 1].
///
/// The output takes its transform and CRS from `nir` and has its nodata
/// value set to the sentinel.
///
/// # Errors
/// `Error::SizeMismatch` when the bands differ in shape.
pub fn burn_ratio_with(
    nir: &Raster<f32>,
    swir: &Raster<f32>,
    params: &BurnRatioParams,
) -> Result<Raster<f32>> {
    check_dimensions(nir, swir)?;

    let nodata = params.nodata;
    let data = Zip::from(nir.data())
        .and(swir.data())
        .map_collect(|&n, &s| pixel_ratio(n, s, nodata));

    let mut output = nir.with_same_meta(data)?;
    output.set_nodata(Some(nodata));
    Ok(output)
}

#[inline]
fn clamp_reflectance(value: f32) -> f32 {
    // NaN compares false and passes through
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

#[inline]
fn pixel_ratio(nir: f32, swir: f32, nodata: f32) -> f32 {
    let nir = clamp_reflectance(nir);
    let swir = clamp_reflectance(swir);
    let ratio = (nir - swir) / (nir + swir);
    if ratio.is_nan() {
        nodata
    } else {
        ratio
    }
}
