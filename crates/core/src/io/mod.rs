//! GeoTIFF reading and writing
//!
//! The native `tiff` codec is the default backend. Enabling the `gdal`
//! feature routes file reads and writes through GDAL instead; the buffer
//! functions always use the native codec.

#[cfg(feature = "gdal")]
mod gdal_io;
mod native;

#[cfg(feature = "gdal")]
pub use gdal_io::{read_georeference, read_geotiff, write_geotiff};

#[cfg(not(feature = "gdal"))]
pub use native::{read_georeference, read_geotiff, write_geotiff};

pub use native::{read_geotiff_from_buffer, write_geotiff_to_buffer};

/// Compression applied to written rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    None,
    Lzw,
    #[default]
    Deflate,
}

impl TiffCompression {
    /// GDAL creation-option spelling
    pub fn as_gdal_str(&self) -> &'static str {
        match self {
            TiffCompression::None => "NONE",
            TiffCompression::Lzw => "LZW",
            TiffCompression::Deflate => "DEFLATE",
        }
    }
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    pub compression: TiffCompression,
}
