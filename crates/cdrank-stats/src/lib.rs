// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Significance tests over average ranks of change point detection methods.
//!
//! The omnibus Friedman / Iman-Davenport test asks whether any methods
//! differ at all; the post-hoc procedures (Nemenyi, reference-Holm,
//! Wilcoxon-Holm) decide which pairs differ, with multiple-comparison
//! correction. All tests consume the rank structures from `cdrank-core`
//! and are pure functions from inputs to fresh result values.

mod friedman;
mod holm;
mod nemenyi;
mod reference;
mod wilcoxon;

pub use friedman::{friedman_test, FriedmanTest};
pub use holm::{holm_step_down, HolmDecision, HolmOutcome};
pub use nemenyi::{critical_difference, nemenyi_test, NemenyiResult};
pub use reference::{reference_test, ReferenceComparison, ReferenceHolmResult};
pub use wilcoxon::{
    wilcoxon_holm, ExactEnumeration, ExactSignedRankTest, ExternalSignedRankTest,
    WilcoxonHolmResult,
};

pub(crate) fn validate_alpha(alpha: f64) -> Result<(), cdrank_core::RankError> {
    if !(alpha.is_finite() && 0.0 < alpha && alpha < 1.0) {
        return Err(cdrank_core::RankError::invalid_input(format!(
            "significance level must be in (0, 1), got {alpha}"
        )));
    }
    Ok(())
}
