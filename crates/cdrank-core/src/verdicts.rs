// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{MethodId, RankError};

/// Decision for one unordered method pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseVerdict {
    /// The statistic the decision was based on: the absolute average-rank
    /// gap for Nemenyi, the raw signed-rank p-value for Wilcoxon-Holm.
    pub statistic: f64,
    /// The corrected threshold the statistic was compared against.
    pub threshold: f64,
    /// Whether the two methods are significantly different.
    pub significant: bool,
    /// Holm-adjusted p-value, where the procedure produces one.
    pub corrected_p_value: Option<f64>,
}

/// Symmetric matrix of pairwise verdicts over `k` methods.
///
/// Stores the `k(k-1)/2` upper-triangle entries; `(i, j)` and `(j, i)`
/// resolve to the same verdict and the diagonal has none.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct VerdictMatrix {
    methods: Vec<String>,
    cells: Vec<PairwiseVerdict>,
}

impl VerdictMatrix {
    /// Builds a matrix from upper-triangle cells in `(0,1), (0,2), ...,
    /// (k-2, k-1)` order.
    pub fn new(methods: Vec<String>, cells: Vec<PairwiseVerdict>) -> Result<Self, RankError> {
        let k = methods.len();
        if k < 2 {
            return Err(RankError::invalid_input(format!(
                "verdict matrix needs at least 2 methods, got {k}"
            )));
        }
        let expected = k * (k - 1) / 2;
        if cells.len() != expected {
            return Err(RankError::invalid_input(format!(
                "verdict count mismatch: got {}, expected {expected} for {k} methods",
                cells.len()
            )));
        }
        Ok(Self { methods, cells })
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn method_names(&self) -> &[String] {
        &self.methods
    }

    /// The verdict for an unordered pair; `None` on the diagonal.
    pub fn get(&self, a: MethodId, b: MethodId) -> Option<&PairwiseVerdict> {
        if a == b {
            return None;
        }
        Some(&self.cells[self.pair_index(a, b)])
    }

    /// Whether `a` and `b` are significantly different. The diagonal is not
    /// a difference.
    pub fn significant(&self, a: MethodId, b: MethodId) -> bool {
        self.get(a, b).is_some_and(|v| v.significant)
    }

    /// Upper-triangle pairs with their verdicts, `i < j`.
    pub fn pairs(&self) -> impl Iterator<Item = (MethodId, MethodId, &PairwiseVerdict)> {
        let k = self.methods.len();
        (0..k)
            .flat_map(move |i| ((i + 1)..k).map(move |j| (MethodId(i), MethodId(j))))
            .zip(&self.cells)
            .map(|((i, j), v)| (i, j, v))
    }

    fn pair_index(&self, a: MethodId, b: MethodId) -> usize {
        let (i, j) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let k = self.methods.len();
        // Row i starts after the triangle above it: i*k - i*(i+1)/2.
        i * k - i * (i + 1) / 2 + (j - i - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{PairwiseVerdict, VerdictMatrix};
    use crate::{MethodId, RankError};

    fn verdict(significant: bool) -> PairwiseVerdict {
        PairwiseVerdict {
            statistic: 1.0,
            threshold: 0.5,
            significant,
            corrected_p_value: None,
        }
    }

    fn matrix() -> VerdictMatrix {
        // 3 methods: (0,1) not different, (0,2) different, (1,2) different.
        VerdictMatrix::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![verdict(false), verdict(true), verdict(true)],
        )
        .expect("matrix should be valid")
    }

    #[test]
    fn new_rejects_wrong_cell_count() {
        let err = VerdictMatrix::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![verdict(false)],
        )
        .expect_err("3 methods need 3 cells");
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn lookup_is_symmetric_and_diagonal_is_empty() {
        let m = matrix();
        assert!(m.get(MethodId(1), MethodId(1)).is_none());
        assert!(!m.significant(MethodId(0), MethodId(1)));
        assert!(m.significant(MethodId(1), MethodId(0)));
        assert!(m.significant(MethodId(2), MethodId(0)));
    }

    #[test]
    fn pairs_iterate_the_upper_triangle_in_order() {
        let m = matrix();
        let pairs: Vec<(usize, usize, bool)> = m
            .pairs()
            .map(|(i, j, v)| (i.0, j.0, v.significant))
            .collect();
        assert_eq!(
            pairs,
            vec![(0, 1, false), (0, 2, true), (1, 2, true)]
        );
    }

    #[test]
    fn pair_index_covers_a_larger_triangle() {
        let methods: Vec<String> = (0..5).map(|i| format!("m{i}")).collect();
        let cells: Vec<PairwiseVerdict> = (0..10).map(|i| verdict(i % 2 == 0)).collect();
        let m = VerdictMatrix::new(methods, cells.clone()).expect("matrix should be valid");
        let mut seen = Vec::new();
        for (i, j, v) in m.pairs() {
            assert_eq!(m.get(i, j), Some(v));
            assert_eq!(m.get(j, i), Some(v));
            seen.push(v.clone());
        }
        assert_eq!(seen, cells);
    }
}
