// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use cdrank_core::{RankError, RankSummary};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};

/// Omnibus test result: Friedman chi-square plus the Iman-Davenport F
/// correction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FriedmanTest {
    pub chi2_stat: f64,
    /// Upper-tail p-value from chi-square with `k - 1` degrees of freedom.
    pub chi2_pvalue: f64,
    pub f_stat: f64,
    /// Upper-tail p-value from F with `(k - 1, (k - 1)(N - 1))` degrees of
    /// freedom.
    pub f_pvalue: f64,
    pub methods: usize,
    pub datasets: usize,
}

/// Tests whether any of the compared methods differ in rank distribution.
///
/// `N` is the summary's effective dataset count, so datasets skipped during
/// ranking do not inflate the statistic. When the ranks are perfectly
/// consistent the chi-square statistic reaches its ceiling `N(k - 1)` and
/// the Iman-Davenport denominator vanishes; the F statistic is then
/// reported as `+inf` with p-value 0, the closed-form limit.
pub fn friedman_test(summary: &RankSummary) -> Result<FriedmanTest, RankError> {
    let k = summary.method_count();
    let n = summary.effective_datasets;
    if k < 2 {
        return Err(RankError::invalid_input(format!(
            "Friedman test needs at least 2 methods, got {k}"
        )));
    }
    if n < 2 {
        return Err(RankError::insufficient_data(format!(
            "Friedman test needs at least 2 ranked datasets, got {n}"
        )));
    }

    let kf = k as f64;
    let nf = n as f64;
    let avg_sq_sum: f64 = summary.average_ranks.iter().map(|r| r * r).sum();

    // Sum of squared mean ranks is minimized when all means equal (k+1)/2,
    // so the statistic is non-negative up to floating error.
    let chi2_stat =
        (12.0 * nf / (kf * (kf + 1.0)) * (avg_sq_sum - kf * (kf + 1.0) * (kf + 1.0) / 4.0))
            .max(0.0);

    let chi2_dist = ChiSquared::new(kf - 1.0)
        .map_err(|e| RankError::invalid_input(format!("chi-square setup failed: {e}")))?;
    let chi2_pvalue = 1.0 - chi2_dist.cdf(chi2_stat);

    let denominator = nf * (kf - 1.0) - chi2_stat;
    let (f_stat, f_pvalue) = if denominator <= 0.0 {
        (f64::INFINITY, 0.0)
    } else {
        let f_stat = (nf - 1.0) * chi2_stat / denominator;
        let f_dist = FisherSnedecor::new(kf - 1.0, (kf - 1.0) * (nf - 1.0))
            .map_err(|e| RankError::invalid_input(format!("F distribution setup failed: {e}")))?;
        (f_stat, 1.0 - f_dist.cdf(f_stat))
    };

    Ok(FriedmanTest {
        chi2_stat,
        chi2_pvalue,
        f_stat,
        f_pvalue,
        methods: k,
        datasets: n,
    })
}
