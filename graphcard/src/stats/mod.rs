// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph statistics
//!
//! Provides the read-only lookup service the estimator draws its numbers from:
//! - [`StatisticsView`]: counts and selectivities keyed by integer ids
//! - [`GraphStatistics`]: the in-memory store behind the default view
//! - [`reader`]: parser for the tab-separated statistics format

pub mod graph_statistics;
pub mod hash;
pub mod reader;
pub mod view;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use graph_statistics::{
    GraphStatistics, GraphStatisticsBuilder, PropertyStats, StatisticsSummary, TypeSummary,
};
pub use reader::{parse_statistics, read_statistics, StatisticsReader};
pub use view::GraphStatisticsView;

/// Node label identifier
pub type LabelId = i32;
/// Relationship type identifier
pub type TypeId = i32;
/// Property key identifier
pub type PropertyId = i32;

/// Wildcard label: no label restriction
pub const ANY_LABEL: LabelId = -1;
/// Wildcard relationship type
pub const ANY_TYPE: TypeId = -1;

/// Traversal direction of a relationship, seen from its base node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Outgoing => Direction::Incoming,
            Direction::Incoming => Direction::Outgoing,
            Direction::Both => Direction::Both,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outgoing => write!(f, "OUTGOING"),
            Direction::Incoming => write!(f, "INCOMING"),
            Direction::Both => write!(f, "BOTH"),
        }
    }
}

/// Statistics lookups used by the estimator
///
/// All counts are non-negative. `ANY_LABEL` / `ANY_TYPE` act as wildcards.
/// Selectivities are fractions of the elements carrying the label (or type).
pub trait StatisticsView: Send + Sync {
    /// Number of nodes with `label`
    fn nodes(&self, label: LabelId) -> f64;

    /// Number of relationships of `rel_type` leaving `base` nodes towards
    /// `target` nodes when traversed in `direction`
    fn relationships(&self, base: LabelId, rel_type: TypeId, target: LabelId, direction: Direction) -> f64;

    /// Fraction of `label` nodes having `property`, or having it equal to the
    /// value with hash `value_hash`
    fn node_selectivity(&self, label: LabelId, property: PropertyId, value_hash: Option<i32>) -> f64;

    /// Fraction of `label` nodes with a numeric `property` in `[min, max]`
    fn node_range_selectivity(&self, label: LabelId, property: PropertyId, min: f64, max: f64) -> f64;

    fn relationship_selectivity(&self, rel_type: TypeId, property: PropertyId, value_hash: Option<i32>) -> f64;

    fn relationship_range_selectivity(&self, rel_type: TypeId, property: PropertyId, min: f64, max: f64) -> f64;

    fn label_id(&self, name: &str) -> Option<LabelId>;

    fn type_id(&self, name: &str) -> Option<TypeId>;

    fn property_id(&self, name: &str) -> Option<PropertyId>;

    /// All known label ids in ascending order
    fn label_ids(&self) -> Vec<LabelId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_reverse() {
        assert_eq!(Direction::Outgoing.reverse(), Direction::Incoming);
        assert_eq!(Direction::Both.reverse(), Direction::Both);
    }

    #[test]
    fn test_direction_serde() {
        let json = serde_json::to_string(&Direction::Incoming).unwrap();
        assert_eq!(json, "\"incoming\"");
        let back: Direction = serde_json::from_str("\"both\"").unwrap();
        assert_eq!(back, Direction::Both);
    }
}
