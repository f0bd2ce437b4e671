//! Band naming conventions per sensor family

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which band files hold NIR and SWIR for a scene.
///
/// Scene identifiers are base paths; band files are found by appending a
/// fixed suffix. The two supported families disagree on band numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SensorProfile {
    /// Harmonized Landsat Sentinel-2, S30 product: narrow NIR (B8A) and SWIR 2 (B12)
    #[default]
    #[cfg_attr(feature = "clap", value(name = "hls-s30"))]
    HlsS30,
    /// Sentinel-2 L2A: broad NIR (B08) and SWIR 1 (B11)
    #[cfg_attr(feature = "clap", value(name = "sentinel2-l2a"))]
    Sentinel2L2a,
}

/// Resolved band file locations for one scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandPaths {
    pub nir: PathBuf,
    pub swir: PathBuf,
}

impl SensorProfile {
    pub fn nir_suffix(self) -> &'static str {
        match self {
            SensorProfile::HlsS30 => ".B8A.tif",
            SensorProfile::Sentinel2L2a => ".B08.tif",
        }
    }

    pub fn swir_suffix(self) -> &'static str {
        match self {
            SensorProfile::HlsS30 => ".B12.tif",
            SensorProfile::Sentinel2L2a => ".B11.tif",
        }
    }

    /// Short name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            SensorProfile::HlsS30 => "hls-s30",
            SensorProfile::Sentinel2L2a => "sentinel2-l2a",
        }
    }

    /// Band file paths for `scene`, e.g. `T11SKD.v2.0` -> `T11SKD.v2.0.B8A.tif`
    pub fn band_paths(self, scene: &Path) -> BandPaths {
        BandPaths {
            nir: with_suffix(scene, self.nir_suffix()),
            swir: with_suffix(scene, self.swir_suffix()),
        }
    }
}

// Plain string append: scene ids contain dots that are not extensions.
fn with_suffix(scene: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(scene.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

impl fmt::Display for SensorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
