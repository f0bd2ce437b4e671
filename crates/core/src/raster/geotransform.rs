//! Affine pixel-to-world mapping

/// Affine transformation coefficients for georeferencing rasters.
///
/// Maps the top-left corner of pixel (col, row) to world coordinates:
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// North-up scenes (HLS, Sentinel-2 L2A) have zero rotation terms and a
/// negative `pixel_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in X
    pub pixel_width: f64,
    /// Cell size in Y, negative for north-up
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from GDAL order `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to GDAL order
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// True when the grid is axis-aligned with rows running southward
    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10
            && self.col_rotation.abs() < 1e-10
            && self.pixel_height < 0.0
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gdal_order_roundtrip() {
        let gt = GeoTransform::from_gdal([399960.0, 30.0, 0.0, 4200000.0, 0.0, -30.0]);
        assert_eq!(gt.origin_x, 399960.0);
        assert_eq!(gt.pixel_height, -30.0);
        assert_eq!(GeoTransform::from_gdal(gt.to_gdal()), gt);
    }

    #[test]
    fn test_north_up() {
        assert!(GeoTransform::new(0.0, 10.0, 1.0, -1.0).is_north_up());
        assert!(!GeoTransform::new(0.0, 10.0, 1.0, 1.0).is_north_up());

        let mut rotated = GeoTransform::default();
        rotated.row_rotation = 0.5;
        assert!(!rotated.is_north_up());
    }
}
