// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Estimator configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, EstimatorResult};
use crate::labels::LabelDistributionVariant;
use crate::plan::JoinStrategy;

/// Settings of a [`crate::CardinalityEstimator`]
///
/// Every field has a default, so a JSON file only needs to list the settings
/// it changes:
///
/// ```json
/// { "join_strategy": "self_join", "static_selectivity": 0.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Operator closing cycles of a pattern
    pub join_strategy: JoinStrategy,
    /// Fixed selectivity per property predicate instead of statistics
    pub static_selectivity: Option<f64>,
    /// Approximate label-to-label relationship counts from single-sided counts
    pub simulate_neo4j: bool,
    /// Parts of the configured label distribution to use
    pub label_variant: LabelDistributionVariant,
}

impl EstimatorConfig {
    /// Reads and validates a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EstimatorResult<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EstimatorResult<()> {
        if let Some(s) = self.static_selectivity {
            if !(0.0..=1.0).contains(&s) {
                return Err(EstimatorError::config(format!(
                    "static selectivity must lie in [0, 1], got {}",
                    s
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.join_strategy, JoinStrategy::MergeOn);
        assert_eq!(config.static_selectivity, None);
        assert!(!config.simulate_neo4j);
        assert_eq!(config.label_variant, LabelDistributionVariant::All);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: EstimatorConfig =
            serde_json::from_str(r#"{"join_strategy": "self_join", "label_variant": "only_partition"}"#).unwrap();
        assert_eq!(config.join_strategy, JoinStrategy::SelfJoin);
        assert_eq!(config.label_variant, LabelDistributionVariant::OnlyPartition);
        assert_eq!(config.static_selectivity, None);
    }

    #[test]
    fn test_from_json_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"static_selectivity": 1.5}}"#).unwrap();
        let err = EstimatorConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidConfig(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"static_selectivity": 0.5, "simulate_neo4j": true}}"#).unwrap();
        let config = EstimatorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.static_selectivity, Some(0.5));
        assert!(config.simulate_neo4j);
    }

    #[test]
    fn test_missing_file() {
        let err = EstimatorConfig::from_json_file("/nonexistent/graphcard.json").unwrap_err();
        assert!(matches!(err, EstimatorError::Io(_)));
    }
}
