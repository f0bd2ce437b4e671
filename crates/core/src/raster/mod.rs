//! Raster data structures

mod element;
mod georeference;
mod geotransform;
mod grid;

pub use element::RasterElement;
pub use georeference::GeoReference;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
