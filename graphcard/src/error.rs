// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for cardinality estimation

use thiserror::Error;

/// Errors raised while loading statistics, compiling patterns or evaluating operators.
///
/// Numeric degeneracies (division by zero counts, fractions drifting outside
/// `[0, 1]`) are never reported here; operators clamp them locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    // Configuration errors
    #[error("Invalid label distribution: {0}")]
    InvalidLabelDistribution(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Unknown relationship type: {0}")]
    UnknownType(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Invalid statistics at line {line}: {message}")]
    InvalidStatistics { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(String),

    // Contract violations
    #[error("Variable not bound: {0}")]
    VariableNotBound(String),

    #[error("Variable already bound: {0}")]
    VariableAlreadyBound(String),

    #[error("Variables bound both as node and relationship: {0}")]
    OverlappingVariables(String),

    #[error("Cannot merge variable {0} with itself")]
    SameVariableMerge(String),

    #[error("Relationship variable {0} has no possible types")]
    EmptyTypeSet(String),

    #[error("Operator {operator} expects {expected} inputs, got {actual}")]
    ArityMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("Property selection on {0} has no predicates")]
    EmptyPredicates(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),
}

impl EstimatorError {
    pub fn statistics<S: Into<String>>(line: usize, message: S) -> Self {
        Self::InvalidStatistics {
            line,
            message: message.into(),
        }
    }

    pub fn pattern<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn predicate<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPredicate(msg.into())
    }

    pub fn label_distribution<S: Into<String>>(msg: S) -> Self {
        Self::InvalidLabelDistribution(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn arity(operator: &str, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            operator: operator.to_string(),
            expected,
            actual,
        }
    }

    /// True for errors caused by malformed input data or configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLabelDistribution(_)
                | Self::UnknownLabel(_)
                | Self::UnknownType(_)
                | Self::UnknownProperty(_)
                | Self::InvalidStatistics { .. }
                | Self::InvalidConfig(_)
                | Self::Io(_)
                | Self::Csv(_)
                | Self::Json(_)
        )
    }
}

impl From<std::io::Error> for EstimatorError {
    fn from(err: std::io::Error) -> Self {
        EstimatorError::Io(err.to_string())
    }
}

impl From<csv::Error> for EstimatorError {
    fn from(err: csv::Error) -> Self {
        EstimatorError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for EstimatorError {
    fn from(err: serde_json::Error) -> Self {
        EstimatorError::Json(err.to_string())
    }
}

impl From<regex::Error> for EstimatorError {
    fn from(err: regex::Error) -> Self {
        EstimatorError::InvalidPattern(err.to_string())
    }
}

/// Result type for estimator operations
pub type EstimatorResult<T> = Result<T, EstimatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EstimatorError::statistics(7, "expected 3 columns");
        assert_eq!(
            err.to_string(),
            "Invalid statistics at line 7: expected 3 columns"
        );

        let err = EstimatorError::arity("NodeJoin", 2, 1);
        assert_eq!(err.to_string(), "Operator NodeJoin expects 2 inputs, got 1");
    }

    #[test]
    fn test_error_classification() {
        assert!(EstimatorError::UnknownLabel("Person".into()).is_configuration_error());
        assert!(!EstimatorError::VariableNotBound("a".into()).is_configuration_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EstimatorError = io.into();
        assert!(matches!(err, EstimatorError::Io(_)));
    }
}
