// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{CompleteScores, Labels, MethodId, RankError};

/// Comparison direction for scores.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreDirection {
    /// Larger scores are better (e.g. F1, covering).
    HigherIsBetter,
    /// Smaller scores are better (e.g. annotation error).
    LowerIsBetter,
}

/// Ranks for one dataset, in method order.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetRanks {
    pub dataset: String,
    pub ranks: Vec<f64>,
}

/// Per-dataset ranks and average ranks for a complete score matrix.
///
/// `effective_datasets` counts only datasets that were actually ranked;
/// datasets skipped for non-finite scores are listed in `skipped_datasets`
/// and contribute nothing to the averages.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RankSummary {
    labels: Labels,
    /// Mean rank per method over all ranked datasets, indexed by `MethodId`.
    pub average_ranks: Vec<f64>,
    /// Ranks per ranked dataset, each summing to `k(k+1)/2`.
    pub dataset_ranks: Vec<DatasetRanks>,
    /// Datasets excluded because they contained a non-finite score.
    pub skipped_datasets: Vec<String>,
    /// Number of datasets actually ranked; the `N` for downstream tests.
    pub effective_datasets: usize,
}

impl RankSummary {
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn method_count(&self) -> usize {
        self.labels.method_count()
    }

    pub fn average_rank(&self, method: MethodId) -> f64 {
        self.average_ranks[method.0]
    }

    /// The method with the smallest (best) average rank, ties broken by the
    /// lowest method index.
    pub fn best_method(&self) -> MethodId {
        let mut best = MethodId(0);
        for m in 1..self.average_ranks.len() {
            if self.average_ranks[m] < self.average_ranks[best.0] {
                best = MethodId(m);
            }
        }
        best
    }
}

/// Ascending ranks with average tie-breaking, matching R's
/// `rank(ties.method = "average")`.
///
/// Equal values receive the mean of the ordinal positions they occupy, so
/// two values tied for positions 2 and 3 both rank 2.5.
pub fn rank_vector(values: &[f64]) -> Result<Vec<f64>, RankError> {
    if values.is_empty() {
        return Err(RankError::invalid_input("cannot rank an empty vector"));
    }
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(RankError::invalid_input(format!(
            "non-finite value at position {pos}: {}",
            values[pos]
        )));
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    // total_cmp is safe here: non-finite values were rejected above.
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end (0-based) hold ranks start+1..=end.
        let avg_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = avg_rank;
        }
        start = end;
    }
    Ok(ranks)
}

/// Ranks every dataset of a complete score matrix and averages per method.
///
/// Rank 1 is best under `direction`; higher-is-better scores are negated so
/// a single ascending routine is reused. A dataset with any non-finite score
/// is excluded from ranking entirely and reported in the summary, because
/// including it would corrupt every method's average rank.
pub fn rank_scores(
    scores: &CompleteScores,
    direction: ScoreDirection,
) -> Result<RankSummary, RankError> {
    let labels = scores.labels().clone();
    let k = labels.method_count();

    let mut dataset_ranks = Vec::new();
    let mut skipped_datasets = Vec::new();
    let mut rank_sums = vec![0.0; k];

    for d in 0..labels.dataset_count() {
        let row = scores.dataset_row(d);
        if row.iter().any(|v| !v.is_finite()) {
            skipped_datasets.push(labels.dataset_name(d).to_string());
            continue;
        }
        let keyed: Vec<f64> = match direction {
            ScoreDirection::HigherIsBetter => row.iter().map(|v| -v).collect(),
            ScoreDirection::LowerIsBetter => row.to_vec(),
        };
        let ranks = rank_vector(&keyed)?;
        for (sum, rank) in rank_sums.iter_mut().zip(&ranks) {
            *sum += rank;
        }
        dataset_ranks.push(DatasetRanks {
            dataset: labels.dataset_name(d).to_string(),
            ranks,
        });
    }

    let effective_datasets = dataset_ranks.len();
    if effective_datasets == 0 {
        return Err(RankError::insufficient_data(format!(
            "no dataset could be ranked: all {} datasets contain non-finite scores",
            labels.dataset_count()
        )));
    }

    let average_ranks = rank_sums
        .into_iter()
        .map(|sum| sum / effective_datasets as f64)
        .collect();

    Ok(RankSummary {
        labels,
        average_ranks,
        dataset_ranks,
        skipped_datasets,
        effective_datasets,
    })
}
