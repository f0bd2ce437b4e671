//! Transform and CRS carried together

use crate::crs::CRS;
use crate::raster::GeoTransform;

/// Where a raster's pixels sit on Earth.
///
/// Read from a source band and copied verbatim onto every raster derived
/// from it. `crs` is `None` when the source file carries no CRS keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoReference {
    pub transform: GeoTransform,
    pub crs: Option<CRS>,
}

impl GeoReference {
    pub fn new(transform: GeoTransform, crs: Option<CRS>) -> Self {
        Self { transform, crs }
    }

    /// CRS to stamp on output files, falling back to WGS84 when unknown
    pub fn crs_or_default(&self) -> CRS {
        self.crs.clone().unwrap_or_default()
    }
}
