// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::RankError;

/// Dense index of a method within a [`Labels`] arena.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(pub usize);

/// Interned method and dataset names.
///
/// Methods and datasets are addressed by dense indices everywhere else, so
/// "every method is present in every dataset" is a property of the matrix
/// shape rather than a runtime assertion over string keys.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Labels {
    methods: Vec<String>,
    datasets: Vec<String>,
}

impl Labels {
    pub fn new(methods: Vec<String>, datasets: Vec<String>) -> Result<Self, RankError> {
        if methods.len() < 2 {
            return Err(RankError::invalid_input(format!(
                "need at least 2 methods to compare, got {}",
                methods.len()
            )));
        }
        if datasets.is_empty() {
            return Err(RankError::invalid_input("need at least 1 dataset"));
        }
        for (name, kind) in methods
            .iter()
            .map(|m| (m, "method"))
            .chain(datasets.iter().map(|d| (d, "dataset")))
        {
            if name.is_empty() {
                return Err(RankError::invalid_input(format!("empty {kind} name")));
            }
        }
        if let Some(dup) = first_duplicate(&methods) {
            return Err(RankError::invalid_input(format!(
                "duplicate method name: {dup}"
            )));
        }
        if let Some(dup) = first_duplicate(&datasets) {
            return Err(RankError::invalid_input(format!(
                "duplicate dataset name: {dup}"
            )));
        }
        Ok(Self { methods, datasets })
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    pub fn method_name(&self, method: MethodId) -> &str {
        &self.methods[method.0]
    }

    pub fn dataset_name(&self, dataset: usize) -> &str {
        &self.datasets[dataset]
    }

    pub fn method_names(&self) -> &[String] {
        &self.methods
    }

    pub fn dataset_names(&self) -> &[String] {
        &self.datasets
    }

    pub fn method_id(&self, name: &str) -> Option<MethodId> {
        self.methods.iter().position(|m| m == name).map(MethodId)
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].iter().any(|seen| seen == name) {
            return Some(name);
        }
    }
    None
}

/// How to turn a [`ScoreTable`] with missing entries into [`CompleteScores`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Fail if any score is missing.
    Error,
    /// Complete-case analysis: drop every dataset with at least one missing
    /// score.
    DropIncomplete,
    /// Give failed method runs a score of zero.
    ImputeZero,
}

/// Benchmark scores per (dataset, method), with failed runs recorded as
/// missing.
///
/// Row-major over datasets: cell `(d, m)` is `cells[d * k + m]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreTable {
    labels: Labels,
    cells: Vec<Option<f64>>,
}

impl ScoreTable {
    pub fn new(
        methods: Vec<String>,
        datasets: Vec<String>,
        cells: Vec<Option<f64>>,
    ) -> Result<Self, RankError> {
        let labels = Labels::new(methods, datasets)?;
        let expected = labels.dataset_count() * labels.method_count();
        if cells.len() != expected {
            return Err(RankError::invalid_input(format!(
                "cell count mismatch: got {}, expected {} ({} datasets x {} methods)",
                cells.len(),
                expected,
                labels.dataset_count(),
                labels.method_count()
            )));
        }
        Ok(Self { labels, cells })
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn score(&self, dataset: usize, method: MethodId) -> Option<f64> {
        self.cells[dataset * self.labels.method_count() + method.0]
    }

    /// Removes methods that have no result on any dataset, returning the new
    /// table and the names of the removed methods.
    ///
    /// Fails if fewer than 2 methods would remain.
    pub fn drop_methods_without_results(&self) -> Result<(ScoreTable, Vec<String>), RankError> {
        let k = self.labels.method_count();
        let keep: Vec<usize> = (0..k)
            .filter(|&m| {
                (0..self.labels.dataset_count()).any(|d| self.score(d, MethodId(m)).is_some())
            })
            .collect();
        let dropped: Vec<String> = (0..k)
            .filter(|m| !keep.contains(m))
            .map(|m| self.labels.methods[m].clone())
            .collect();
        if keep.len() == k {
            return Ok((self.clone(), dropped));
        }
        if keep.len() < 2 {
            return Err(RankError::insufficient_data(format!(
                "only {} method(s) have any result; need at least 2",
                keep.len()
            )));
        }

        let methods = keep
            .iter()
            .map(|&m| self.labels.methods[m].clone())
            .collect();
        let mut cells = Vec::with_capacity(self.labels.dataset_count() * keep.len());
        for d in 0..self.labels.dataset_count() {
            for &m in &keep {
                cells.push(self.score(d, MethodId(m)));
            }
        }
        let table = ScoreTable::new(methods, self.labels.datasets.clone(), cells)?;
        Ok((table, dropped))
    }

    /// Applies a missing-value policy, producing a fully populated matrix.
    pub fn complete(&self, policy: MissingPolicy) -> Result<CompleteScores, RankError> {
        let k = self.labels.method_count();
        match policy {
            MissingPolicy::Error => {
                for d in 0..self.labels.dataset_count() {
                    for m in 0..k {
                        if self.score(d, MethodId(m)).is_none() {
                            return Err(RankError::invalid_input(format!(
                                "missing score for method {} on dataset {}",
                                self.labels.method_name(MethodId(m)),
                                self.labels.dataset_name(d)
                            )));
                        }
                    }
                }
                let values = self.cells.iter().map(|c| c.unwrap_or(0.0)).collect();
                CompleteScores::assemble(self.labels.clone(), values, vec![])
            }
            MissingPolicy::DropIncomplete => {
                let complete_rows: Vec<usize> = (0..self.labels.dataset_count())
                    .filter(|&d| (0..k).all(|m| self.score(d, MethodId(m)).is_some()))
                    .collect();
                let dropped: Vec<String> = (0..self.labels.dataset_count())
                    .filter(|d| !complete_rows.contains(d))
                    .map(|d| self.labels.datasets[d].clone())
                    .collect();
                if complete_rows.is_empty() {
                    return Err(RankError::insufficient_data(
                        "every dataset has at least one missing score under complete-case analysis",
                    ));
                }
                let datasets = complete_rows
                    .iter()
                    .map(|&d| self.labels.datasets[d].clone())
                    .collect();
                let mut values = Vec::with_capacity(complete_rows.len() * k);
                for &d in &complete_rows {
                    for m in 0..k {
                        // Present by construction for complete rows.
                        values.push(self.score(d, MethodId(m)).unwrap_or(0.0));
                    }
                }
                let labels = Labels::new(self.labels.methods.clone(), datasets)?;
                CompleteScores::assemble(labels, values, dropped)
            }
            MissingPolicy::ImputeZero => {
                let values = self.cells.iter().map(|c| c.unwrap_or(0.0)).collect();
                CompleteScores::assemble(self.labels.clone(), values, vec![])
            }
        }
    }
}

/// A fully populated (datasets × methods) score matrix.
///
/// Values may still be non-finite; the rank computation skips such datasets
/// and reports them, see [`crate::rank_scores`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteScores {
    labels: Labels,
    values: Vec<f64>,
    dropped_datasets: Vec<String>,
}

impl CompleteScores {
    fn assemble(
        labels: Labels,
        values: Vec<f64>,
        dropped_datasets: Vec<String>,
    ) -> Result<Self, RankError> {
        debug_assert_eq!(values.len(), labels.dataset_count() * labels.method_count());
        Ok(Self {
            labels,
            values,
            dropped_datasets,
        })
    }

    /// Builds a complete matrix directly from raw values, row-major over
    /// datasets.
    pub fn from_values(
        methods: Vec<String>,
        datasets: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self, RankError> {
        let labels = Labels::new(methods, datasets)?;
        let expected = labels.dataset_count() * labels.method_count();
        if values.len() != expected {
            return Err(RankError::invalid_input(format!(
                "value count mismatch: got {}, expected {} ({} datasets x {} methods)",
                values.len(),
                expected,
                labels.dataset_count(),
                labels.method_count()
            )));
        }
        Self::assemble(labels, values, vec![])
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn value(&self, dataset: usize, method: MethodId) -> f64 {
        self.values[dataset * self.labels.method_count() + method.0]
    }

    /// All scores for one dataset, in method order.
    pub fn dataset_row(&self, dataset: usize) -> &[f64] {
        let k = self.labels.method_count();
        &self.values[dataset * k..(dataset + 1) * k]
    }

    /// All scores for one method, in dataset order.
    pub fn method_column(&self, method: MethodId) -> Vec<f64> {
        (0..self.labels.dataset_count())
            .map(|d| self.value(d, method))
            .collect()
    }

    /// Datasets removed by [`MissingPolicy::DropIncomplete`].
    pub fn dropped_datasets(&self) -> &[String] {
        &self.dropped_datasets
    }
}
