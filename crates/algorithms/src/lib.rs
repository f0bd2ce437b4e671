//! # burnratio algorithms
//!
//! Numeric core of the burn ratio pipeline. Everything here is pure: no
//! I/O, inputs are borrowed and never mutated.
//!
//! - **imagery**: NBR transform, masked temporal difference (dNBR),
//!   burn severity classification

pub mod imagery;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        burn_ratio, burn_ratio_with, classify_severity, masked_difference, severity_summary,
        BurnDifference, BurnRatio, BurnRatioParams, BurnSeverity, NODATA,
    };
    pub use burnratio_core::prelude::*;
}
