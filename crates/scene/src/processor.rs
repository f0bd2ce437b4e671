//! Scene and scene-pair processing
//!
//! A scene run loads NIR and SWIR, computes NBR and optionally writes it.
//! A pair run does that for a pre-fire and a post-fire scene and writes
//! their masked difference. Load failures abort the run; write failures
//! are logged and returned as [`WriteOutcome::Failed`] next to the
//! in-memory result.

use std::path::{Path, PathBuf};

use burnratio_algorithms::imagery::{
    burn_ratio, classify_severity, masked_difference, severity_summary, NODATA, SEVERITY_NODATA,
};
use burnratio_core::{GeoReference, Raster};
use tracing::{debug, error, info};

use crate::error::{Result, SceneError};
use crate::profile::SensorProfile;
use crate::store::RasterStore;

/// Reflectance bands are read from the first band of each file
const BAND_INDEX: usize = 1;

/// What happened to a requested output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Failed { path: PathBuf, reason: String },
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::Failed { path, .. } => path,
        }
    }
}

/// NBR of one scene
#[derive(Debug, Clone)]
pub struct SceneResult {
    pub nbr: Raster<f32>,
    /// Copied from the NIR band file
    pub geo_reference: GeoReference,
    /// `None` when no output path was requested
    pub write: Option<WriteOutcome>,
}

/// Severity classes derived from a dNBR
#[derive(Debug, Clone)]
pub struct SeverityResult {
    pub classes: Raster<u8>,
    pub write: WriteOutcome,
}

/// dNBR of a scene pair
#[derive(Debug, Clone)]
pub struct DifferenceResult {
    pub dnbr: Raster<f32>,
    /// Copied from the pre-fire NIR band file
    pub geo_reference: GeoReference,
    pub write: WriteOutcome,
    pub severity: Option<SeverityResult>,
}

/// Runs scenes through the NBR pipeline against a raster store
#[derive(Debug, Clone)]
pub struct SceneProcessor<S> {
    store: S,
    profile: SensorProfile,
}

impl<S: RasterStore> SceneProcessor<S> {
    pub fn new(store: S, profile: SensorProfile) -> Self {
        Self { store, profile }
    }

    pub fn profile(&self) -> SensorProfile {
        self.profile
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute the NBR of `scene`, writing it to `output` when given.
    ///
    /// # Errors
    /// A band or georeference that cannot be read, or NIR and SWIR bands of
    /// different shape. A failed write is not an error.
    pub fn process(&self, scene: &Path, output: Option<&Path>) -> Result<SceneResult> {
        let bands = self.profile.band_paths(scene);
        info!("Processing scene {} ({})", scene.display(), self.profile);

        let nir = self.load(&bands.nir)?;
        let swir = self.load(&bands.swir)?;

        let mut nbr = burn_ratio(&nir, &swir)?;

        let geo_reference = self
            .store
            .read_geo_reference(&bands.nir)
            .map_err(|source| SceneError::GeoReference {
                path: bands.nir.clone(),
                source,
            })?;
        nbr.set_georeference(geo_reference.clone());

        let stats = nbr.statistics();
        debug!(
            "NBR valid cells: {} ({:.1}%), mean {:?}",
            stats.valid_count,
            stats.valid_percent(),
            stats.mean
        );

        let write = output.map(|path| self.write(path, &nbr, &geo_reference, NODATA));

        Ok(SceneResult {
            nbr,
            geo_reference,
            write,
        })
    }

    /// Compute `NBR(before) - NBR(after)` and write it to `output`.
    ///
    /// Neither scene's NBR is written. Cells that are nodata on either date
    /// are nodata in the result. When `severity_output` is given the dNBR is
    /// also classified and written there.
    pub fn process_difference(
        &self,
        before: &Path,
        after: &Path,
        output: &Path,
        severity_output: Option<&Path>,
    ) -> Result<DifferenceResult> {
        let pre = self.process(before, None)?;
        let post = self.process(after, None)?;

        if pre.geo_reference != post.geo_reference {
            debug!(
                "Scene georeferences differ, using pre-fire: {:?} vs {:?}",
                pre.geo_reference, post.geo_reference
            );
        }

        let mut dnbr = masked_difference(&pre.nbr, &post.nbr, NODATA)?;
        dnbr.set_georeference(pre.geo_reference.clone());

        let write = self.write(output, &dnbr, &pre.geo_reference, NODATA);

        let severity = match severity_output {
            Some(path) => {
                let classes = classify_severity(&dnbr, NODATA)?;
                for (class, count) in severity_summary(&classes) {
                    info!("  {}: {} cells", class, count);
                }
                let as_float = classes.with_same_meta(classes.data().mapv(f32::from))?;
                let write =
                    self.write(path, &as_float, &pre.geo_reference, f32::from(SEVERITY_NODATA));
                Some(SeverityResult { classes, write })
            }
            None => None,
        };

        Ok(DifferenceResult {
            dnbr,
            geo_reference: pre.geo_reference,
            write,
            severity,
        })
    }

    fn load(&self, path: &Path) -> Result<Raster<f32>> {
        self.store
            .load_band(path, BAND_INDEX)
            .map_err(|source| SceneError::BandLoad {
                path: path.to_path_buf(),
                band: BAND_INDEX,
                source,
            })
    }

    fn write(
        &self,
        path: &Path,
        raster: &Raster<f32>,
        georef: &GeoReference,
        nodata: f32,
    ) -> WriteOutcome {
        match self.store.write_raster(path, raster, georef, nodata) {
            Ok(()) => {
                info!("Wrote {}", path.display());
                WriteOutcome::Written(path.to_path_buf())
            }
            Err(e) => {
                error!("Unable to write data to GeoTiff!");
                error!("{}", e);
                WriteOutcome::Failed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
