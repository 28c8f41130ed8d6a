// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::holm::holm_step_down;
use cdrank_core::{MethodId, RankError, RankSummary};
use statrs::distribution::{ContinuousCDF, Normal};

/// One method's comparison against the reference method.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceComparison {
    pub method: MethodId,
    pub method_name: String,
    pub average_rank: f64,
    pub z_score: f64,
    /// One-sided normal p-value for "this method ranks worse than the
    /// reference".
    pub p_value: f64,
    /// Holm step-down threshold this p-value was compared against.
    pub threshold: f64,
    pub significant: bool,
}

/// Result of the reference-method Holm procedure.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceHolmResult {
    pub reference: MethodId,
    pub reference_name: String,
    pub reference_rank: f64,
    pub alpha: f64,
    /// Every non-reference method in method order.
    pub comparisons: Vec<ReferenceComparison>,
    critical_difference: Option<f64>,
}

impl ReferenceHolmResult {
    /// The critical difference derived from the first non-rejected Holm
    /// threshold: methods within this rank gap of the reference are not
    /// distinguishable from it.
    ///
    /// Fails with [`RankError::UndefinedResult`] when every hypothesis was
    /// rejected, in which case no consistent CD exists.
    pub fn critical_difference(&self) -> Result<f64, RankError> {
        self.critical_difference.ok_or_else(|| {
            RankError::undefined_result(format!(
                "every method differs significantly from reference {}; no consistent critical difference",
                self.reference_name
            ))
        })
    }

    /// The critical difference, or `None` when all hypotheses were rejected.
    pub fn critical_difference_opt(&self) -> Option<f64> {
        self.critical_difference
    }
}

/// Compares every method against the best-ranked one with Holm correction.
///
/// The reference is the method with the smallest average rank. For each
/// other method the rank gap is standardized by `sqrt(6N/(k(k+1)))` and a
/// one-sided normal p-value is fed into Holm's step-down procedure. The
/// first threshold that fails to reject defines the critical difference
/// used for visualization.
pub fn reference_test(summary: &RankSummary, alpha: f64) -> Result<ReferenceHolmResult, RankError> {
    crate::validate_alpha(alpha)?;
    let k = summary.method_count();
    let n = summary.effective_datasets;
    if n < 2 {
        return Err(RankError::insufficient_data(format!(
            "reference test needs at least 2 ranked datasets, got {n}"
        )));
    }

    let kf = k as f64;
    let constant = (6.0 * n as f64 / (kf * (kf + 1.0))).sqrt();
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| RankError::invalid_input(format!("normal distribution setup failed: {e}")))?;

    let reference = summary.best_method();
    let reference_rank = summary.average_rank(reference);

    let others: Vec<MethodId> = (0..k).map(MethodId).filter(|m| *m != reference).collect();
    let mut z_scores = Vec::with_capacity(others.len());
    let mut p_values = Vec::with_capacity(others.len());
    for &method in &others {
        let z = (reference_rank - summary.average_rank(method)) * constant;
        z_scores.push(z);
        p_values.push(normal.cdf(z));
    }

    let holm = holm_step_down(&p_values, alpha)?;
    let critical_difference = holm
        .first_failed_threshold
        .map(|threshold| -normal.inverse_cdf(threshold) / constant);

    let comparisons = others
        .iter()
        .zip(&z_scores)
        .zip(&holm.decisions)
        .map(|((&method, &z_score), decision)| ReferenceComparison {
            method,
            method_name: summary.labels().method_name(method).to_string(),
            average_rank: summary.average_rank(method),
            z_score,
            p_value: decision.p_value,
            threshold: decision.threshold,
            significant: decision.reject,
        })
        .collect();

    Ok(ReferenceHolmResult {
        reference,
        reference_name: summary.labels().method_name(reference).to_string(),
        reference_rank,
        alpha,
        comparisons,
        critical_difference,
    })
}
