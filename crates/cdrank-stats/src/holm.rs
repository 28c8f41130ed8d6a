// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use cdrank_core::RankError;

/// Holm decision for one hypothesis, in the caller's original order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HolmDecision {
    pub p_value: f64,
    /// The step-down threshold `alpha / (m - i)` for this hypothesis's
    /// position `i` in the ascending p-value order.
    pub threshold: f64,
    pub reject: bool,
    /// Holm-adjusted p-value; `reject` is equivalent to
    /// `adjusted_p < alpha`.
    pub adjusted_p: f64,
}

/// Outcome of Holm's step-down procedure over one hypothesis family.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct HolmOutcome {
    /// Decisions indexed like the input p-values.
    pub decisions: Vec<HolmDecision>,
    /// Threshold of the first hypothesis, in ascending p-value order, that
    /// failed to reject. `None` when every hypothesis was rejected.
    pub first_failed_threshold: Option<f64>,
}

impl HolmOutcome {
    pub fn rejected_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.reject).count()
    }
}

/// Holm's sequential step-down correction.
///
/// The i-th smallest p-value (0-indexed) is compared against
/// `alpha / (m - i)`, where `m` is the family size: the divisor is the
/// number of remaining hypotheses, not the post-sort position. Rejection
/// stops at the first failure, so the rejected set is always a prefix of
/// the ascending order.
pub fn holm_step_down(p_values: &[f64], alpha: f64) -> Result<HolmOutcome, RankError> {
    crate::validate_alpha(alpha)?;
    let m = p_values.len();
    if m == 0 {
        return Err(RankError::insufficient_data(
            "Holm's procedure needs at least one comparison",
        ));
    }
    for (i, p) in p_values.iter().enumerate() {
        if !(p.is_finite() && (0.0..=1.0).contains(p)) {
            return Err(RankError::invalid_input(format!(
                "p-value at index {i} is not in [0, 1]: {p}"
            )));
        }
    }

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut decisions = vec![
        HolmDecision {
            p_value: 0.0,
            threshold: 0.0,
            reject: false,
            adjusted_p: 0.0,
        };
        m
    ];
    let mut first_failed_threshold = None;
    let mut rejecting = true;
    let mut running_adjusted: f64 = 0.0;

    for (i, &idx) in order.iter().enumerate() {
        let p = p_values[idx];
        let threshold = alpha / (m - i) as f64;
        running_adjusted = running_adjusted.max(((m - i) as f64 * p).min(1.0));

        if rejecting && p >= threshold {
            rejecting = false;
            first_failed_threshold = Some(threshold);
        }

        decisions[idx] = HolmDecision {
            p_value: p,
            threshold,
            reject: rejecting,
            adjusted_p: running_adjusted,
        };
    }

    Ok(HolmOutcome {
        decisions,
        first_failed_threshold,
    })
}
