//! # burnratio core
//!
//! Raster types and GeoTIFF I/O shared by the burnratio crates.
//!
//! This crate provides:
//! - `Raster<T>`: a 2D grid with its georeferencing and nodata value
//! - `GeoTransform`: affine pixel-to-world mapping
//! - `CRS`: coordinate reference system identifier
//! - `GeoReference`: transform and CRS travelling together
//! - GeoTIFF reading and writing (native `tiff` codec, or GDAL behind the `gdal` feature)

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::{GeoKeys, CRS};
pub use error::{Error, Result};
pub use raster::{GeoReference, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{GeoKeys, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{GeoReference, GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Common shape of the raster algorithms.
///
/// Algorithms are pure: they read their input, never mutate it, and
/// return a freshly allocated output.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
