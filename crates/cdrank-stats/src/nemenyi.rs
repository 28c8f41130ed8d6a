// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use cdrank_core::{PairwiseVerdict, RankError, RankSummary, VerdictMatrix};

/// Critical values of the studentized range statistic at infinite degrees
/// of freedom, indexed by `k - 2` for `k` in `2..=20`. Dividing by sqrt(2)
/// gives the `q_alpha` of the Nemenyi test.
const Q_TABLE_010: [f64; 19] = [
    2.326, 2.902, 3.240, 3.478, 3.661, 3.808, 3.931, 4.037, 4.129, 4.211, 4.285, 4.351, 4.412,
    4.468, 4.519, 4.568, 4.612, 4.654, 4.694,
];
const Q_TABLE_005: [f64; 19] = [
    2.772, 3.314, 3.633, 3.858, 4.030, 4.170, 4.286, 4.387, 4.474, 4.552, 4.622, 4.685, 4.743,
    4.796, 4.845, 4.891, 4.934, 4.974, 5.012,
];
const Q_TABLE_001: [f64; 19] = [
    3.643, 4.120, 4.403, 4.603, 4.757, 4.882, 4.987, 5.078, 5.157, 5.227, 5.290, 5.348, 5.400,
    5.448, 5.493, 5.535, 5.574, 5.611, 5.645,
];

const MAX_TABLED_METHODS: usize = 20;

fn studentized_range(k: usize, alpha: f64) -> Result<f64, RankError> {
    let table = if (alpha - 0.10).abs() < 1e-9 {
        &Q_TABLE_010
    } else if (alpha - 0.05).abs() < 1e-9 {
        &Q_TABLE_005
    } else if (alpha - 0.01).abs() < 1e-9 {
        &Q_TABLE_001
    } else {
        return Err(RankError::invalid_input(format!(
            "no studentized range critical values for alpha = {alpha}; supported: 0.01, 0.05, 0.10"
        )));
    };
    if !(2..=MAX_TABLED_METHODS).contains(&k) {
        return Err(RankError::invalid_input(format!(
            "studentized range table covers 2..={MAX_TABLED_METHODS} methods, got {k}"
        )));
    }
    Ok(table[k - 2])
}

/// Nemenyi critical difference `q_alpha * sqrt(k(k+1)/(6N))`.
pub fn critical_difference(k: usize, n: usize, alpha: f64) -> Result<f64, RankError> {
    crate::validate_alpha(alpha)?;
    if n < 2 {
        return Err(RankError::insufficient_data(format!(
            "Nemenyi test needs at least 2 ranked datasets, got {n}"
        )));
    }
    let q_alpha = studentized_range(k, alpha)? / std::f64::consts::SQRT_2;
    let kf = k as f64;
    Ok(q_alpha * (kf * (kf + 1.0) / (6.0 * n as f64)).sqrt())
}

/// Nemenyi post-hoc result: one scalar critical difference and the full
/// symmetric verdict matrix.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct NemenyiResult {
    pub alpha: f64,
    pub critical_difference: f64,
    pub verdicts: VerdictMatrix,
}

/// Pairwise Nemenyi test over average ranks.
///
/// Two methods differ significantly iff their average-rank gap reaches the
/// critical difference. The studentized range construction is already a
/// simultaneous-confidence procedure, so no further correction is applied.
pub fn nemenyi_test(summary: &RankSummary, alpha: f64) -> Result<NemenyiResult, RankError> {
    let k = summary.method_count();
    let cd = critical_difference(k, summary.effective_datasets, alpha)?;

    let mut cells = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let gap = (summary.average_ranks[i] - summary.average_ranks[j]).abs();
            cells.push(PairwiseVerdict {
                statistic: gap,
                threshold: cd,
                significant: gap >= cd,
                corrected_p_value: None,
            });
        }
    }
    let verdicts = VerdictMatrix::new(summary.labels().method_names().to_vec(), cells)?;

    Ok(NemenyiResult {
        alpha,
        critical_difference: cd,
        verdicts,
    })
}
