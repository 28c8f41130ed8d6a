// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::io::Write;
use std::process::{Command, Stdio};

use crate::holm::holm_step_down;
use cdrank_core::{
    rank_vector, CompleteScores, MethodId, PairwiseVerdict, RankError, VerdictMatrix,
};

/// Exact two-sided Wilcoxon signed-rank test for paired samples.
///
/// Dataset counts in this setting are tens, not hundreds, so the exact null
/// distribution is both feasible and required; implementations must not
/// substitute a normal approximation.
pub trait ExactSignedRankTest {
    fn p_value(&self, first: &[f64], second: &[f64]) -> Result<f64, RankError>;
}

/// In-process exact signed-rank test.
///
/// Zero differences are discarded (the `wilcox` convention), tied absolute
/// differences receive average ranks, and the null distribution of the
/// positive rank sum is enumerated exactly by dynamic programming over
/// doubled ranks, which are integral even under average tie-breaking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExactEnumeration;

// Subset counts are bounded by 2^m, which must fit in u128.
const MAX_EXACT_SAMPLES: usize = 127;

impl ExactSignedRankTest for ExactEnumeration {
    fn p_value(&self, first: &[f64], second: &[f64]) -> Result<f64, RankError> {
        if first.len() != second.len() {
            return Err(RankError::invalid_input(format!(
                "paired samples differ in length: {} vs {}",
                first.len(),
                second.len()
            )));
        }

        let diffs: Vec<f64> = first
            .iter()
            .zip(second)
            .map(|(a, b)| a - b)
            .filter(|d| *d != 0.0)
            .collect();
        let m = diffs.len();
        if m == 0 {
            return Err(RankError::insufficient_data(
                "all paired differences are zero; signed-rank statistic is undefined",
            ));
        }
        if m > MAX_EXACT_SAMPLES {
            return Err(RankError::invalid_input(format!(
                "exact enumeration supports at most {MAX_EXACT_SAMPLES} non-zero differences, got {m}"
            )));
        }

        let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
        let ranks = rank_vector(&magnitudes)?;

        // Average-tie ranks step in halves; doubling makes them exact
        // integers for the convolution below.
        let doubled: Vec<usize> = ranks.iter().map(|r| (2.0 * r).round() as usize).collect();
        let total: usize = doubled.iter().sum();
        let statistic: usize = doubled
            .iter()
            .zip(&diffs)
            .filter(|(_, d)| **d > 0.0)
            .map(|(r, _)| *r)
            .sum();

        // counts[s] = number of sign assignments whose positive rank sum,
        // doubled, equals s.
        let mut counts = vec![0u128; total + 1];
        counts[0] = 1;
        for &r in &doubled {
            for s in (r..=total).rev() {
                counts[s] += counts[s - r];
            }
        }

        let lower: u128 = counts[..=statistic].iter().sum();
        let upper: u128 = counts[statistic..].iter().sum();
        let denominator = 2f64.powi(m as i32);
        let tail = lower.min(upper) as f64 / denominator;
        Ok((2.0 * tail).min(1.0))
    }
}

/// Adapter that delegates the exact p-value to an external command.
///
/// The two samples are written to the child's stdin as two
/// whitespace-separated lines; the child must print a single two-sided
/// p-value on stdout. The call is a scoped synchronous subprocess
/// invocation with no retry: any spawn failure, non-zero exit, or
/// unparseable output is an [`RankError::ExternalComputation`], never a
/// silent fallback to an approximation.
#[derive(Clone, Debug)]
pub struct ExternalSignedRankTest {
    program: String,
    args: Vec<String>,
}

impl ExternalSignedRankTest {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ExactSignedRankTest for ExternalSignedRankTest {
    fn p_value(&self, first: &[f64], second: &[f64]) -> Result<f64, RankError> {
        let fail = |detail: String| {
            RankError::external_computation(format!("{}: {detail}", self.program))
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| fail(format!("spawn failed: {e}")))?;

        let payload = format!("{}\n{}\n", join_samples(first), join_samples(second));
        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin
                .write_all(payload.as_bytes())
                .map_err(|e| fail(format!("writing samples failed: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| fail(format!("wait failed: {e}")))?;
        if !output.status.success() {
            return Err(fail(format!("exited with {}", output.status)));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| fail("output is not valid UTF-8".to_string()))?;
        let p: f64 = stdout
            .trim()
            .parse()
            .map_err(|_| fail(format!("output is not a p-value: {:?}", stdout.trim())))?;
        if !(p.is_finite() && (0.0..=1.0).contains(&p)) {
            return Err(fail(format!("p-value out of range: {p}")));
        }
        Ok(p)
    }
}

fn join_samples(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wilcoxon-Holm post-hoc result over all method pairs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct WilcoxonHolmResult {
    pub alpha: f64,
    /// Verdict statistic is the raw signed-rank p-value; the Holm-adjusted
    /// p-value is carried in `corrected_p_value`.
    pub verdicts: VerdictMatrix,
}

/// Pairwise exact signed-rank tests over raw scores, Holm-corrected as one
/// family of `k(k-1)/2` hypotheses.
///
/// For each pair, datasets where either score is non-finite are excluded
/// from that pair's samples, mirroring the rank computation's skip rule.
pub fn wilcoxon_holm(
    scores: &CompleteScores,
    alpha: f64,
    test: &dyn ExactSignedRankTest,
) -> Result<WilcoxonHolmResult, RankError> {
    crate::validate_alpha(alpha)?;
    let labels = scores.labels();
    let k = labels.method_count();

    let mut p_values = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            let column_i = scores.method_column(MethodId(i));
            let column_j = scores.method_column(MethodId(j));
            let (first, second): (Vec<f64>, Vec<f64>) = column_i
                .iter()
                .zip(&column_j)
                .filter(|(a, b)| a.is_finite() && b.is_finite())
                .map(|(a, b)| (*a, *b))
                .unzip();
            if first.len() < 2 {
                return Err(RankError::insufficient_data(format!(
                    "methods {} and {} share only {} finite-scored dataset(s); need at least 2",
                    labels.method_name(MethodId(i)),
                    labels.method_name(MethodId(j)),
                    first.len()
                )));
            }
            let p = test.p_value(&first, &second).map_err(|err| match err {
                RankError::InsufficientData(msg) => RankError::insufficient_data(format!(
                    "methods {} and {}: {msg}",
                    labels.method_name(MethodId(i)),
                    labels.method_name(MethodId(j))
                )),
                other => other,
            })?;
            p_values.push(p);
        }
    }

    let holm = holm_step_down(&p_values, alpha)?;
    let cells = holm
        .decisions
        .iter()
        .map(|d| PairwiseVerdict {
            statistic: d.p_value,
            threshold: d.threshold,
            significant: d.reject,
            corrected_p_value: Some(d.adjusted_p),
        })
        .collect();
    let verdicts = VerdictMatrix::new(labels.method_names().to_vec(), cells)?;

    Ok(WilcoxonHolmResult { alpha, verdicts })
}
