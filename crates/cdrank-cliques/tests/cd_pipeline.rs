// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! End-to-end pipeline: score table -> ranks -> omnibus and post-hoc
//! tests -> clique grouping, the in-memory half of a critical difference
//! diagram.

use cdrank_cliques::group_cliques;
use cdrank_core::{
    rank_scores, MethodId, MissingPolicy, ScoreDirection, ScoreTable,
};
use cdrank_stats::{friedman_test, nemenyi_test, wilcoxon_holm, ExactEnumeration};

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Ten datasets, four methods. "zero" trails consistently, "pelt" and
/// "binseg" lead, "bocpd" floats in between; one failed run and one NaN
/// score exercise the missing-data and skip paths.
fn benchmark_table() -> ScoreTable {
    let datasets = [
        "apple",
        "bank",
        "brent_spot",
        "construction",
        "debt_ireland",
        "homeruns",
        "nile",
        "ozone",
        "robocalls",
        "well_log",
    ];
    let rows: [[Option<f64>; 4]; 10] = [
        // pelt, binseg, bocpd, zero
        [Some(0.91), Some(0.88), Some(0.74), Some(0.31)],
        [Some(0.84), Some(0.86), Some(0.70), Some(0.25)],
        [Some(0.88), Some(0.85), Some(0.79), Some(0.35)],
        [Some(0.93), Some(0.89), Some(0.66), Some(0.28)],
        [Some(0.82), Some(0.84), Some(0.71), Some(0.22)],
        [Some(0.90), Some(0.87), Some(0.77), Some(0.30)],
        [Some(0.86), Some(0.83), Some(0.69), Some(0.27)],
        [Some(0.89), Some(0.91), Some(0.73), Some(0.24)],
        [Some(0.87), None, Some(0.68), Some(0.26)],
        [Some(0.92), Some(0.90), Some(f64::NAN), Some(0.33)],
    ];
    let cells = rows.iter().flatten().copied().collect();
    let methods = names(&["pelt", "binseg", "bocpd", "zero"]);
    ScoreTable::new(methods, names(&datasets), cells).expect("table should be valid")
}

#[test]
fn complete_case_pipeline_with_nemenyi_groups_the_leaders() {
    let table = benchmark_table();
    let complete = table
        .complete(MissingPolicy::DropIncomplete)
        .expect("complete-case analysis");
    // binseg never produced a score on "robocalls" -> dataset dropped.
    assert_eq!(complete.dropped_datasets(), ["robocalls".to_string()]);

    let summary = rank_scores(&complete, ScoreDirection::HigherIsBetter).expect("ranking");
    // The NaN dataset is skipped during ranking, not during completion.
    assert_eq!(summary.skipped_datasets, ["well_log".to_string()]);
    assert_eq!(summary.effective_datasets, 8);

    let omnibus = friedman_test(&summary).expect("omnibus test");
    assert!(omnibus.f_pvalue < 0.05, "methods clearly differ");

    let nemenyi = nemenyi_test(&summary, 0.05).expect("nemenyi test");
    // zero is far behind both leaders.
    let zero = MethodId(3);
    assert!(nemenyi.verdicts.significant(MethodId(0), zero));
    assert!(nemenyi.verdicts.significant(MethodId(1), zero));
    // pelt and binseg are within one rank of each other.
    assert!(!nemenyi.verdicts.significant(MethodId(0), MethodId(1)));

    let cliques = group_cliques(&nemenyi.verdicts, &summary).expect("grouping");
    assert!(!cliques.is_empty());
    // Sorted by min rank; the first clique holds the leaders and never
    // includes zero.
    let leaders = &cliques[0];
    assert!(leaders.contains(MethodId(0)));
    assert!(leaders.contains(MethodId(1)));
    assert!(!leaders.contains(zero));
    for pair in cliques.windows(2) {
        assert!(pair[0].min_rank <= pair[1].min_rank);
    }
}

#[test]
fn zero_imputation_keeps_every_complete_dataset() {
    let table = benchmark_table();
    let complete = table
        .complete(MissingPolicy::ImputeZero)
        .expect("zero imputation");
    assert!(complete.dropped_datasets().is_empty());

    let summary = rank_scores(&complete, ScoreDirection::HigherIsBetter).expect("ranking");
    // Only the NaN dataset is skipped; the imputed one is ranked with
    // binseg in last place there.
    assert_eq!(summary.effective_datasets, 9);
    let robocalls = summary
        .dataset_ranks
        .iter()
        .find(|r| r.dataset == "robocalls")
        .expect("imputed dataset is ranked");
    assert_eq!(robocalls.ranks[1], 4.0);
}

#[test]
fn wilcoxon_pipeline_agrees_on_the_extreme_pair() {
    let table = benchmark_table();
    let complete = table
        .complete(MissingPolicy::DropIncomplete)
        .expect("complete-case analysis");
    let summary = rank_scores(&complete, ScoreDirection::HigherIsBetter).expect("ranking");

    let result = wilcoxon_holm(&complete, 0.05, &ExactEnumeration).expect("wilcoxon-holm");
    // pelt vs zero: nine finite paired scores, all favoring pelt.
    assert!(result.verdicts.significant(MethodId(0), MethodId(3)));

    let cliques = group_cliques(&result.verdicts, &summary).expect("grouping");
    for clique in &cliques {
        assert!(
            !(clique.contains(MethodId(0)) && clique.contains(MethodId(3))),
            "pelt and zero must never share a clique"
        );
    }
}

#[test]
fn reference_test_singles_out_the_best_method() {
    let table = benchmark_table();
    let complete = table
        .complete(MissingPolicy::DropIncomplete)
        .expect("complete-case analysis");
    let summary = rank_scores(&complete, ScoreDirection::HigherIsBetter).expect("ranking");

    let result = cdrank_stats::reference_test(&summary, 0.05).expect("reference test");
    assert_eq!(result.reference_name, "pelt");
    let zero = result
        .comparisons
        .iter()
        .find(|c| c.method_name == "zero")
        .expect("zero is compared");
    assert!(zero.significant);
}
