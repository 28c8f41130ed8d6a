// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Error type shared by all ranking and significance-testing components.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RankError {
    /// The input violates a structural requirement (too few methods or
    /// datasets, missing scores where completeness is required, non-finite
    /// values where they are forbidden, unsupported test parameters).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input is well-formed but too small to compute the requested
    /// statistic.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// An external statistical routine failed or produced unusable output.
    #[error("external computation failed: {0}")]
    ExternalComputation(String),

    /// The requested quantity has no defined value for this input, e.g. a
    /// critical difference when every Holm hypothesis was rejected.
    #[error("undefined result: {0}")]
    UndefinedResult(String),
}

impl RankError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn external_computation(message: impl Into<String>) -> Self {
        Self::ExternalComputation(message.into())
    }

    pub fn undefined_result(message: impl Into<String>) -> Self {
        Self::UndefinedResult(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::RankError;

    #[test]
    fn constructors_map_to_matching_variants() {
        assert!(matches!(
            RankError::invalid_input("k"),
            RankError::InvalidInput(_)
        ));
        assert!(matches!(
            RankError::insufficient_data("n"),
            RankError::InsufficientData(_)
        ));
        assert!(matches!(
            RankError::external_computation("exec"),
            RankError::ExternalComputation(_)
        ));
        assert!(matches!(
            RankError::undefined_result("cd"),
            RankError::UndefinedResult(_)
        ));
    }

    #[test]
    fn display_carries_context() {
        let err = RankError::invalid_input("need at least 2 methods, got 1");
        assert_eq!(
            err.to_string(),
            "invalid input: need at least 2 methods, got 1"
        );
    }
}
