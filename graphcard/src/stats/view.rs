// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! [`StatisticsView`] backed by [`GraphStatistics`]

use std::sync::Arc;

use super::graph_statistics::{GraphStatistics, PropertyStats};
use super::{Direction, LabelId, PropertyId, StatisticsView, TypeId, ANY_LABEL};

/// Default statistics view
///
/// With `simulate_neo4j` set, relationship counts between two labelled
/// endpoints are approximated by `min(R(*, T, target), R(base, T, *))`, the
/// way a store that only keeps one-sided label/type counts would answer.
#[derive(Debug, Clone)]
pub struct GraphStatisticsView {
    stats: Arc<GraphStatistics>,
    simulate_neo4j: bool,
}

impl GraphStatisticsView {
    pub fn new(stats: Arc<GraphStatistics>) -> Self {
        Self {
            stats,
            simulate_neo4j: false,
        }
    }

    pub fn with_neo4j_simulation(mut self, simulate: bool) -> Self {
        self.simulate_neo4j = simulate;
        self
    }

    pub fn statistics(&self) -> &GraphStatistics {
        &self.stats
    }

    fn relationship_count(&self, base: LabelId, rel_type: TypeId, target: LabelId) -> f64 {
        if self.simulate_neo4j {
            self.stats
                .relationship_count(ANY_LABEL, rel_type, target)
                .min(self.stats.relationship_count(base, rel_type, ANY_LABEL))
        } else {
            self.stats.relationship_count(base, rel_type, target)
        }
    }
}

/// Equality selectivity among `total` elements
fn value_selectivity(total: f64, prop: Option<&PropertyStats>, value_hash: Option<i32>) -> f64 {
    let Some(prop) = prop else {
        return 0.0;
    };
    if prop.count == 0.0 || total <= 0.0 {
        return 0.0;
    }
    if prop.unique == 0.0 {
        log::warn!(
            "Inconsistent property statistics: {} values but no distinct value",
            prop.count
        );
        return 0.0;
    }
    let has_prop = prop.count / total;
    let has_value = match value_hash {
        None => 1.0 / prop.unique,
        Some(hash) => match prop.frequency(hash) {
            Some(freq) => freq,
            None => {
                let heavy_hitters = prop.num_frequent() as f64;
                if heavy_hitters >= prop.unique {
                    0.0
                } else {
                    1.0 / (prop.unique - heavy_hitters)
                }
            }
        },
    };
    has_prop * has_value
}

fn range_selectivity(total: f64, prop: Option<&PropertyStats>, min: f64, max: f64) -> f64 {
    let Some(prop) = prop else {
        return 0.0;
    };
    if prop.numeric <= 0.0 {
        return 0.0;
    }
    if min == max {
        if total <= 0.0 || prop.count == 0.0 || prop.unique == 0.0 {
            return 0.0;
        }
        let has_prop = prop.count / total;
        let is_numeric = prop.numeric / prop.count;
        let has_value = 1.0 / (is_numeric * prop.unique);
        return has_prop * is_numeric * has_value;
    }
    prop.range_fraction(min, max).unwrap_or(0.0)
}

impl StatisticsView for GraphStatisticsView {
    fn nodes(&self, label: LabelId) -> f64 {
        self.stats.num_nodes(label)
    }

    fn relationships(&self, base: LabelId, rel_type: TypeId, target: LabelId, direction: Direction) -> f64 {
        match direction {
            Direction::Both => {
                self.relationship_count(base, rel_type, target)
                    + self.relationship_count(target, rel_type, base)
            }
            Direction::Incoming => self.relationship_count(target, rel_type, base),
            Direction::Outgoing => self.relationship_count(base, rel_type, target),
        }
    }

    fn node_selectivity(&self, label: LabelId, property: PropertyId, value_hash: Option<i32>) -> f64 {
        value_selectivity(
            self.stats.num_nodes(label),
            self.stats.label_property(label, property),
            value_hash,
        )
    }

    fn node_range_selectivity(&self, label: LabelId, property: PropertyId, min: f64, max: f64) -> f64 {
        range_selectivity(
            self.stats.num_nodes(label),
            self.stats.label_property(label, property),
            min,
            max,
        )
    }

    fn relationship_selectivity(&self, rel_type: TypeId, property: PropertyId, value_hash: Option<i32>) -> f64 {
        value_selectivity(
            self.stats.num_relationships(rel_type),
            self.stats.type_property(rel_type, property),
            value_hash,
        )
    }

    fn relationship_range_selectivity(&self, rel_type: TypeId, property: PropertyId, min: f64, max: f64) -> f64 {
        range_selectivity(
            self.stats.num_relationships(rel_type),
            self.stats.type_property(rel_type, property),
            min,
            max,
        )
    }

    fn label_id(&self, name: &str) -> Option<LabelId> {
        self.stats.label_id(name)
    }

    fn type_id(&self, name: &str) -> Option<TypeId> {
        self.stats.type_id(name)
    }

    fn property_id(&self, name: &str) -> Option<PropertyId> {
        self.stats.property_id(name)
    }

    fn label_ids(&self) -> Vec<LabelId> {
        self.stats.label_ids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::hash::string_hash;
    use crate::stats::{GraphStatisticsBuilder, TypeSummary, ANY_TYPE};

    fn view() -> GraphStatisticsView {
        let stats = GraphStatisticsBuilder::new(100.0)
            .label("Person", 0, 80.0)
            .label("City", 1, 20.0)
            .relationship_type("LIVES_IN", 0, TypeSummary::default())
            .property("name", 0)
            .property("age", 1)
            .add_relationships(0, 0, 1, 80.0)
            .relationships(1, 0, ANY_LABEL, 5.0)
            .label_property(
                0,
                0,
                PropertyStats::new(40.0, 11.0, 0.0).with_frequent_value(string_hash("Alice"), 0.5),
            )
            .label_property(
                0,
                1,
                PropertyStats::new(80.0, 40.0, 80.0).with_quantiles(vec![0.0, 20.0, 40.0, 60.0, 80.0]),
            )
            .label_property(1, 0, PropertyStats::new(5.0, 0.0, 0.0))
            .build();
        GraphStatisticsView::new(Arc::new(stats))
    }

    #[test]
    fn test_directions() {
        let v = view();
        assert_eq!(v.relationships(0, 0, 1, Direction::Outgoing), 80.0);
        assert_eq!(v.relationships(1, 0, 0, Direction::Incoming), 80.0);
        assert_eq!(v.relationships(0, 0, 1, Direction::Incoming), 0.0);
        assert_eq!(v.relationships(ANY_LABEL, ANY_TYPE, ANY_LABEL, Direction::Both), 160.0);
    }

    #[test]
    fn test_neo4j_simulation() {
        let v = view().with_neo4j_simulation(true);
        // min(R(*, 0, 1) = 80, R(1, 0, *) = 5)
        assert_eq!(v.relationships(1, 0, 1, Direction::Outgoing), 5.0);
        assert_eq!(v.relationships(0, 0, 1, Direction::Outgoing), 80.0);
    }

    #[test]
    fn test_frequent_value_selectivity() {
        let v = view();
        let sel = v.node_selectivity(0, 0, Some(string_hash("Alice")));
        assert!((sel - 0.25).abs() < 1e-12);
        // 10 non-frequent distinct values share the rest
        let sel = v.node_selectivity(0, 0, Some(string_hash("Bob")));
        assert!((sel - 0.05).abs() < 1e-12);
        let sel = v.node_selectivity(0, 0, None);
        assert!((sel - 0.5 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_or_inconsistent_property() {
        let v = view();
        assert_eq!(v.node_selectivity(1, 1, None), 0.0);
        assert_eq!(v.node_selectivity(1, 0, Some(1)), 0.0);
        assert_eq!(v.relationship_selectivity(0, 0, None), 0.0);
    }

    #[test]
    fn test_range_selectivity() {
        let v = view();
        let point = v.node_range_selectivity(0, 1, 30.0, 30.0);
        assert!((point - 1.0 / 40.0).abs() < 1e-12);
        let half = v.node_range_selectivity(0, 1, 0.0, 40.0);
        assert!((half - 0.5).abs() < 1e-12);
        assert_eq!(v.node_range_selectivity(0, 0, 0.0, 1.0), 0.0);
    }
}
