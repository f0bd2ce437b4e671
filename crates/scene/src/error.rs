//! Error types for scene processing

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a scene run.
///
/// Write failures are not errors; they are reported through
/// [`WriteOutcome`](crate::WriteOutcome).
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Cannot load band {band} from {}", path.display())]
    BandLoad {
        path: PathBuf,
        band: usize,
        #[source]
        source: burnratio_core::Error,
    },

    #[error("Cannot read georeference from {}", path.display())]
    GeoReference {
        path: PathBuf,
        #[source]
        source: burnratio_core::Error,
    },

    #[error("Raster computation failed")]
    Compute(#[from] burnratio_core::Error),
}

/// Result type alias for scene processing
pub type Result<T> = std::result::Result<T, SceneError>;
