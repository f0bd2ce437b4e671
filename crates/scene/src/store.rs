//! Raster access used by the processors

use std::path::Path;

use burnratio_core::io::{read_georeference, read_geotiff, write_geotiff, GeoTiffOptions};
use burnratio_core::{GeoReference, Raster, Result};
use tracing::debug;

/// Whole-raster, synchronous access to band and output files.
pub trait RasterStore {
    /// Load band `band` (1-based) of the file at `path` as `f32`
    fn load_band(&self, path: &Path, band: usize) -> Result<Raster<f32>>;

    /// Transform and CRS of the file at `path`
    fn read_geo_reference(&self, path: &Path) -> Result<GeoReference>;

    /// Write `raster` as a single-band file, replacing anything at `path`.
    ///
    /// The stored file carries `georef` and `nodata`, whatever metadata
    /// `raster` itself holds.
    fn write_raster(
        &self,
        path: &Path,
        raster: &Raster<f32>,
        georef: &GeoReference,
        nodata: f32,
    ) -> Result<()>;
}

/// GeoTIFF files on the local filesystem
#[derive(Debug, Clone, Default)]
pub struct GeoTiffStore {
    options: GeoTiffOptions,
}

impl GeoTiffStore {
    pub fn new(options: GeoTiffOptions) -> Self {
        Self { options }
    }
}

impl RasterStore for GeoTiffStore {
    fn load_band(&self, path: &Path, band: usize) -> Result<Raster<f32>> {
        let raster: Raster<f32> = read_geotiff(path, Some(band))?;
        debug!(
            "Loaded {} band {}: {} x {}",
            path.display(),
            band,
            raster.cols(),
            raster.rows()
        );
        Ok(raster)
    }

    fn read_geo_reference(&self, path: &Path) -> Result<GeoReference> {
        read_georeference(path)
    }

    fn write_raster(
        &self,
        path: &Path,
        raster: &Raster<f32>,
        georef: &GeoReference,
        nodata: f32,
    ) -> Result<()> {
        let mut output = raster.clone();
        output.set_georeference(georef.clone());
        output.set_nodata(Some(nodata));
        write_geotiff(&output, path, Some(self.options.clone()))
    }
}
