// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning
//!
//! Turns a [`crate::query::Query`] into an evaluated
//! [`crate::algebra::Expression`] tree.

pub mod compiler;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

pub use compiler::PlanCompiler;

/// Operator used to close cycles in a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStrategy {
    /// Hierarchy-weighted merge of the two variables
    #[default]
    MergeOn,
    /// Partition-weighted merge of the two variables
    SelfJoin,
}

impl FromStr for JoinStrategy {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "merge_on" | "mergeon" => Ok(Self::MergeOn),
            "self_join" | "selfjoin" => Ok(Self::SelfJoin),
            other => Err(EstimatorError::config(format!(
                "unknown join strategy '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MergeOn => write!(f, "merge_on"),
            Self::SelfJoin => write!(f, "self_join"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_strategy_parsing() {
        assert_eq!("merge-on".parse::<JoinStrategy>().unwrap(), JoinStrategy::MergeOn);
        assert_eq!("SelfJoin".parse::<JoinStrategy>().unwrap(), JoinStrategy::SelfJoin);
        assert!("hash".parse::<JoinStrategy>().is_err());
        assert_eq!(JoinStrategy::default().to_string(), "merge_on");
    }
}
