// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Groups methods that are not significantly different into maximal
//! cliques, the building block of critical difference diagrams.
//!
//! Nodes are methods; an edge connects every pair a post-hoc test could
//! not separate. Maximal cliques of that graph are the candidate groups;
//! cliques whose rank span sits inside another clique's span add no
//! information and are dropped, as are cliques with zero rank spread.

mod bron_kerbosch;

use cdrank_core::{MethodId, RankError, RankSummary, VerdictMatrix};

pub use bron_kerbosch::maximal_cliques;

/// A group of methods that are pairwise not significantly different.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Clique {
    /// Members ordered by average rank, best first.
    pub methods: Vec<MethodId>,
    /// Smallest average rank among the members.
    pub min_rank: f64,
    /// Largest average rank among the members.
    pub max_rank: f64,
}

impl Clique {
    pub fn contains(&self, method: MethodId) -> bool {
        self.methods.contains(&method)
    }
}

/// Extracts the reportable cliques from a pairwise verdict matrix.
///
/// Builds the insignificance graph, enumerates maximal cliques, then
/// discards cliques whose rank span is strictly contained in another
/// clique's span and cliques with zero span (singletons included). The
/// survivors are sorted by minimum average rank.
pub fn group_cliques(
    verdicts: &VerdictMatrix,
    summary: &RankSummary,
) -> Result<Vec<Clique>, RankError> {
    if verdicts.method_names() != summary.labels().method_names() {
        return Err(RankError::invalid_input(
            "verdict matrix and rank summary describe different method sets",
        ));
    }

    let k = summary.method_count();
    let mut adjacency = vec![vec![false; k]; k];
    for (i, j, verdict) in verdicts.pairs() {
        if !verdict.significant {
            adjacency[i.0][j.0] = true;
            adjacency[j.0][i.0] = true;
        }
    }

    let raw = maximal_cliques(&adjacency);
    let mut cliques: Vec<Clique> = raw
        .into_iter()
        .map(|members| {
            let mut methods: Vec<MethodId> = members.into_iter().map(MethodId).collect();
            methods.sort_by(|a, b| {
                summary
                    .average_rank(*a)
                    .total_cmp(&summary.average_rank(*b))
                    .then(a.0.cmp(&b.0))
            });
            let min_rank = summary.average_rank(methods[0]);
            let max_rank = summary.average_rank(methods[methods.len() - 1]);
            Clique {
                methods,
                min_rank,
                max_rank,
            }
        })
        .collect();

    let dropped: Vec<bool> = cliques
        .iter()
        .enumerate()
        .map(|(j, candidate)| {
            if candidate.min_rank == candidate.max_rank {
                return true;
            }
            cliques.iter().enumerate().any(|(i, other)| {
                i != j && strictly_contains(other, candidate)
            })
        })
        .collect();
    let mut index = 0;
    cliques.retain(|_| {
        let drop = dropped[index];
        index += 1;
        !drop
    });

    cliques.sort_by(|a, b| {
        a.min_rank
            .total_cmp(&b.min_rank)
            .then(a.max_rank.total_cmp(&b.max_rank))
            .then(a.methods.cmp(&b.methods))
    });
    Ok(cliques)
}

/// Whether `outer` makes `inner` redundant: the rank span strictly
/// contains the other span, or the member set is a proper superset. Two
/// distinct cliques with identical spans both survive.
fn strictly_contains(outer: &Clique, inner: &Clique) -> bool {
    let span_contains = outer.min_rank <= inner.min_rank && outer.max_rank >= inner.max_rank;
    let span_strict =
        span_contains && (outer.min_rank < inner.min_rank || outer.max_rank > inner.max_rank);
    let set_superset = outer.methods.len() > inner.methods.len()
        && inner.methods.iter().all(|m| outer.contains(*m));
    span_strict || (span_contains && set_superset)
}

#[cfg(test)]
mod tests {
    use super::group_cliques;
    use cdrank_core::{
        rank_scores, CompleteScores, MethodId, PairwiseVerdict, RankError, ScoreDirection,
        VerdictMatrix,
    };

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn summary_from(values: Vec<f64>, methods: &[&str], datasets: &[&str]) -> cdrank_core::RankSummary {
        let scores = CompleteScores::from_values(names(methods), names(datasets), values)
            .expect("matrix should be valid");
        rank_scores(&scores, ScoreDirection::HigherIsBetter).expect("ranking succeeds")
    }

    fn verdicts(method_names: &[&str], significant: &[bool]) -> VerdictMatrix {
        let cells = significant
            .iter()
            .map(|&s| PairwiseVerdict {
                statistic: 0.0,
                threshold: 0.0,
                significant: s,
                corrected_p_value: None,
            })
            .collect();
        VerdictMatrix::new(names(method_names), cells).expect("matrix should be valid")
    }

    /// Ranks 1, 2, 3 for a, b, c on two identical datasets.
    fn chain_summary() -> cdrank_core::RankSummary {
        summary_from(
            vec![0.9, 0.5, 0.1, 0.9, 0.5, 0.1],
            &["a", "b", "c"],
            &["d1", "d2"],
        )
    }

    #[test]
    fn chain_graph_yields_two_overlapping_cliques() {
        // a-b and b-c indistinguishable, a-c different.
        let v = verdicts(&["a", "b", "c"], &[false, true, false]);
        let cliques = group_cliques(&v, &chain_summary()).expect("grouping succeeds");

        assert_eq!(cliques.len(), 2);
        assert_eq!(cliques[0].methods, vec![MethodId(0), MethodId(1)]);
        assert_eq!((cliques[0].min_rank, cliques[0].max_rank), (1.0, 2.0));
        assert_eq!(cliques[1].methods, vec![MethodId(1), MethodId(2)]);
        assert_eq!((cliques[1].min_rank, cliques[1].max_rank), (2.0, 3.0));
    }

    #[test]
    fn fully_connected_graph_yields_one_clique() {
        let v = verdicts(&["a", "b", "c"], &[false, false, false]);
        let cliques = group_cliques(&v, &chain_summary()).expect("grouping succeeds");
        assert_eq!(cliques.len(), 1);
        assert_eq!(
            cliques[0].methods,
            vec![MethodId(0), MethodId(1), MethodId(2)]
        );
    }

    #[test]
    fn all_significant_pairs_leave_no_reportable_clique() {
        // Only singletons remain and their span is zero.
        let v = verdicts(&["a", "b", "c"], &[true, true, true]);
        let cliques = group_cliques(&v, &chain_summary()).expect("grouping succeeds");
        assert!(cliques.is_empty());
    }

    #[test]
    fn span_contained_cliques_are_dropped() {
        // Ranks: a=1, b=2, c=3, d=4 over two identical datasets.
        let summary = summary_from(
            vec![0.9, 0.7, 0.3, 0.1, 0.9, 0.7, 0.3, 0.1],
            &["a", "b", "c", "d"],
            &["d1", "d2"],
        );
        // Pairs in order (a,b) (a,c) (a,d) (b,c) (b,d) (c,d):
        // a,b,c mutually indistinguishable; b-d indistinguishable; the
        // rest differ. Maximal cliques: {a,b,c} span [1,3] and {b,d}
        // span [2,4]: neither contains the other, both reported.
        let v = verdicts(
            &["a", "b", "c", "d"],
            &[false, false, true, false, false, true],
        );
        let cliques = group_cliques(&v, &summary).expect("grouping succeeds");
        assert_eq!(cliques.len(), 2);
        assert_eq!(
            cliques[0].methods,
            vec![MethodId(0), MethodId(1), MethodId(2)]
        );
        assert_eq!(cliques[1].methods, vec![MethodId(1), MethodId(3)]);
    }

    #[test]
    fn inner_span_clique_is_dropped_even_without_set_overlap() {
        // Ranks over one dataset: a=1, b=2.5, c=2.5, d=4.
        let summary = summary_from(vec![0.9, 0.5, 0.5, 0.1], &["a", "b", "c", "d"], &["d1"]);
        // a-d indistinguishable (span [1,4]) and b-c indistinguishable
        // (span [2.5, 2.5], zero spread): only {a,d} survives; {b,c} is
        // both zero-span and inside [1,4].
        let v = verdicts(
            &["a", "b", "c", "d"],
            &[true, true, false, false, true, true],
        );
        let cliques = group_cliques(&v, &summary).expect("grouping succeeds");
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0].methods, vec![MethodId(0), MethodId(3)]);
    }

    #[test]
    fn every_reported_pair_is_not_significantly_different() {
        let v = verdicts(&["a", "b", "c"], &[false, true, false]);
        let summary = chain_summary();
        let cliques = group_cliques(&v, &summary).expect("grouping succeeds");
        for clique in &cliques {
            for (x, &i) in clique.methods.iter().enumerate() {
                for &j in &clique.methods[x + 1..] {
                    assert!(!v.significant(i, j));
                }
            }
        }
    }

    #[test]
    fn mismatched_method_sets_are_rejected() {
        let v = verdicts(&["a", "b", "x"], &[false, false, false]);
        let err = group_cliques(&v, &chain_summary()).expect_err("method names differ");
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn cliques_are_sorted_by_minimum_rank() {
        let v = verdicts(&["a", "b", "c"], &[false, true, false]);
        let cliques = group_cliques(&v, &chain_summary()).expect("grouping succeeds");
        for pair in cliques.windows(2) {
            assert!(pair[0].min_rank <= pair[1].min_rank);
        }
    }
}
