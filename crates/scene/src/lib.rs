//! # burnratio scene
//!
//! Turns scene identifiers into NBR and dNBR rasters.
//!
//! A scene identifier is a base path such as
//! `sample/HLS.S30.T11SKD.2022286T184329.v2.0`; the [`SensorProfile`]
//! appends the NIR and SWIR band suffixes. Raster access goes through the
//! [`RasterStore`] trait, with [`GeoTiffStore`] as the file-backed
//! implementation.
//!
//! ```ignore
//! use burnratio_scene::{GeoTiffStore, SceneProcessor, SensorProfile};
//!
//! let processor = SceneProcessor::new(GeoTiffStore::default(), SensorProfile::HlsS30);
//! let result = processor.process(scene.as_ref(), Some("output/nbr.tif".as_ref()))?;
//! ```

mod error;
mod processor;
mod profile;
mod store;

pub use error::{Result, SceneError};
pub use processor::{DifferenceResult, SceneProcessor, SceneResult, SeverityResult, WriteOutcome};
pub use profile::{BandPaths, SensorProfile};
pub use store::{GeoTiffStore, RasterStore};
