//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoReference, GeoTransform, RasterElement};
use ndarray::Array2;

/// A georeferenced 2D raster grid.
///
/// Values are stored row-major as `(row, col)`. The transform, CRS and
/// nodata value travel with the data so derived rasters can inherit them.
///
/// # Example
///
/// ```ignore
/// use burnratio_core::Raster;
///
/// let mut band: Raster<f32> = Raster::new(2, 3);
/// band.set(1, 2, 0.25)?;
/// assert_eq!(band.get(1, 2)?, 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
    crs: Option<CRS>,
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray, with default georeferencing
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Wrap `data` in this raster's transform and CRS.
    ///
    /// The nodata value is not inherited since the element type may differ.
    pub fn with_same_meta<U: RasterElement>(&self, data: Array2<U>) -> Result<Raster<U>> {
        if data.dim() != self.shape() {
            let (er, ec) = self.shape();
            let (ar, ac) = data.dim();
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }

        Ok(Raster {
            data,
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        let cell = self
            .data
            .get_mut((row, col))
            .ok_or(Error::IndexOutOfBounds { row, col, rows, cols })?;
        *cell = value;
        Ok(())
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    /// Transform and CRS as one value
    pub fn georeference(&self) -> GeoReference {
        GeoReference::new(self.transform, self.crs.clone())
    }

    /// Replace transform and CRS
    pub fn set_georeference(&mut self, georef: GeoReference) {
        self.transform = georef.transform;
        self.crs = georef.crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Check if a value is no-data for this raster
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    /// Min, max, mean and cell counts over the valid cells
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;
        let mut count: usize = 0;

        for &value in self.data.iter().filter(|&&v| !self.is_nodata(v)) {
            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }
            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}

impl<T> RasterStatistics<T> {
    /// Share of valid cells in percent
    pub fn valid_percent(&self) -> f64 {
        let total = self.valid_count + self.nodata_count;
        if total == 0 {
            return 0.0;
        }
        100.0 * self.valid_count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_raster_creation() {
        let raster: Raster<f32> = Raster::new(100, 200);
        assert_eq!(raster.rows(), 100);
        assert_eq!(raster.cols(), 200);
        assert_eq!(raster.shape(), (100, 200));
        assert!(raster.crs().is_none());
    }

    #[test]
    fn test_raster_access_out_of_bounds() {
        let mut raster: Raster<f32> = Raster::new(2, 2);
        raster.set(1, 1, 0.5).unwrap();
        assert_eq!(raster.get(1, 1).unwrap(), 0.5);
        assert!(raster.get(2, 0).is_err());
        assert!(raster.set(0, 2, 1.0).is_err());
    }

    #[test]
    fn test_from_vec_rejects_bad_length() {
        let result = Raster::<f32>::from_vec(vec![1.0, 2.0, 3.0], 2, 2);
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_with_same_meta_keeps_georeference() {
        let mut src: Raster<f32> = Raster::new(1, 2);
        src.set_transform(GeoTransform::new(500000.0, 4000000.0, 30.0, -30.0));
        src.set_crs(Some(CRS::from_epsg(32610)));
        src.set_nodata(Some(-9999.0));

        let derived = src.with_same_meta(array![[1_u8, 2]]).unwrap();
        assert_eq!(derived.georeference(), src.georeference());
        assert_eq!(derived.nodata(), None);

        assert!(src.with_same_meta(array![[1_u8], [2]]).is_err());
    }

    #[test]
    fn test_statistics_skip_sentinel() {
        let mut raster = Raster::from_array(array![[0.5_f32, -9999.0], [-0.5, 0.0]]);
        raster.set_nodata(Some(-9999.0));

        let stats = raster.statistics();
        assert_eq!(stats.min, Some(-0.5));
        assert_eq!(stats.max, Some(0.5));
        assert_eq!(stats.mean, Some(0.0));
        assert_eq!(stats.valid_count, 3);
        assert_eq!(stats.nodata_count, 1);
        assert_eq!(stats.valid_percent(), 75.0);
    }

    #[test]
    fn test_statistics_all_nodata() {
        let mut raster = Raster::filled(2, 2, -9999.0_f32);
        raster.set_nodata(Some(-9999.0));

        let stats = raster.statistics();
        assert_eq!(stats.min, None);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.nodata_count, 4);
    }
}
