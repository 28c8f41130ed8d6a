// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core types for rank-based comparison of change point detection methods.
//!
//! A benchmark run produces one score per (dataset, method) pair, with
//! failed runs recorded as missing. This crate turns such a table into
//! per-dataset ranks and average ranks, which the statistical tests in
//! `cdrank-stats` and the clique grouping in `cdrank-cliques` consume.

mod error;
mod ranks;
mod scores;
mod verdicts;

pub use error::RankError;
pub use ranks::{rank_scores, rank_vector, DatasetRanks, RankSummary, ScoreDirection};
pub use scores::{CompleteScores, Labels, MethodId, MissingPolicy, ScoreTable};
pub use verdicts::{PairwiseVerdict, VerdictMatrix};
