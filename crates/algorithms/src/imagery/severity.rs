//! Burn severity classification of dNBR
//!
//! Class breaks follow the USGS FIREMON table (Key & Benson, 2006) on
//! unscaled dNBR.

use std::fmt;

use burnratio_core::raster::{Raster, RasterElement};
use burnratio_core::Result;

/// Class code written where the dNBR is nodata
pub const SEVERITY_NODATA: u8 = 0;

/// USGS burn severity classes, ordered from regrowth to high severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BurnSeverity {
    EnhancedRegrowthHigh = 1,
    EnhancedRegrowthLow = 2,
    Unburned = 3,
    Low = 4,
    ModerateLow = 5,
    ModerateHigh = 6,
    High = 7,
}

impl BurnSeverity {
    pub const ALL: [BurnSeverity; 7] = [
        BurnSeverity::EnhancedRegrowthHigh,
        BurnSeverity::EnhancedRegrowthLow,
        BurnSeverity::Unburned,
        BurnSeverity::Low,
        BurnSeverity::ModerateLow,
        BurnSeverity::ModerateHigh,
        BurnSeverity::High,
    ];

    /// Classify a single valid dNBR value. Lower bounds are inclusive.
    pub fn from_dnbr(dnbr: f32) -> Self {
        match dnbr {
            d if d < -0.25 => BurnSeverity::EnhancedRegrowthHigh,
            d if d < -0.1 => BurnSeverity::EnhancedRegrowthLow,
            d if d < 0.1 => BurnSeverity::Unburned,
            d if d < 0.27 => BurnSeverity::Low,
            d if d < 0.44 => BurnSeverity::ModerateLow,
            d if d < 0.66 => BurnSeverity::ModerateHigh,
            _ => BurnSeverity::High,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.code() == code)
    }

    /// Class code stored in the output raster
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            BurnSeverity::EnhancedRegrowthHigh => "Enhanced regrowth, high",
            BurnSeverity::EnhancedRegrowthLow => "Enhanced regrowth, low",
            BurnSeverity::Unburned => "Unburned",
            BurnSeverity::Low => "Low severity",
            BurnSeverity::ModerateLow => "Moderate-low severity",
            BurnSeverity::ModerateHigh => "Moderate-high severity",
            BurnSeverity::High => "High severity",
        }
    }
}

impl fmt::Display for BurnSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a dNBR raster to severity class codes.
///
/// Cells equal to `nodata` (or NaN) become [`SEVERITY_NODATA`], which is
/// also the output's nodata value. Georeferencing is copied from `dnbr`.
pub fn classify_severity(dnbr: &Raster<f32>, nodata: f32) -> Result<Raster<u8>> {
    let sentinel = Some(nodata);
    let classes = dnbr.data().mapv(|d| {
        if d.is_nodata(sentinel) {
            SEVERITY_NODATA
        } else {
            BurnSeverity::from_dnbr(d).code()
        }
    });

    let mut output = dnbr.with_same_meta(classes)?;
    output.set_nodata(Some(SEVERITY_NODATA));
    Ok(output)
}

/// Pixel count per class, in class order, skipping empty classes
pub fn severity_summary(classes: &Raster<u8>) -> Vec<(BurnSeverity, usize)> {
    let mut counts = [0usize; BurnSeverity::ALL.len()];
    for class in classes.data().iter().filter_map(|&c| BurnSeverity::from_code(c)) {
        counts[class.code() as usize - 1] += 1;
    }

    BurnSeverity::ALL
        .into_iter()
        .zip(counts)
        .filter(|&(_, n)| n > 0)
        .collect()
}
