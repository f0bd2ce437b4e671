//! Burn analysis on spectral bands
//!
//! - NBR: `(NIR - SWIR) / (NIR + SWIR)` with negative reflectance clamped
//! - dNBR: `NBR_before - NBR_after`, valid only where both dates are valid
//! - Severity: USGS FIREMON classes over dNBR

mod burn_ratio;
mod difference;
mod severity;

pub use burn_ratio::{burn_ratio, burn_ratio_with, BurnRatio, BurnRatioParams, NODATA};
pub use difference::{masked_difference, BurnDifference};
pub use severity::{classify_severity, severity_summary, BurnSeverity, SEVERITY_NODATA};

use burnratio_core::raster::Raster;
use burnratio_core::{Error, Result};

/// Fail fast when two co-registered bands disagree on shape
fn check_dimensions(a: &Raster<f32>, b: &Raster<f32>) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(Error::SizeMismatch {
            er: a.rows(),
            ec: a.cols(),
            ar: b.rows(),
            ac: b.cols(),
        });
    }
    Ok(())
}
