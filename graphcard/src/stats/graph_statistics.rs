// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory graph statistics
//!
//! Aggregate counts collected from a property graph: node counts per label,
//! relationship counts per `(label, type, label)` triple with `-1` wildcards,
//! and value summaries per `(label, property)` and `(type, property)`.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::{LabelId, PropertyId, TypeId, ANY_LABEL, ANY_TYPE};

/// Value summary of one property on one label or relationship type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyStats {
    /// Number of elements carrying the property
    pub count: f64,
    /// Number of distinct values
    pub unique: f64,
    /// Number of elements with a numeric value
    pub numeric: f64,
    /// Fraction of elements per frequent value hash
    pub most_frequent: HashMap<i32, f64>,
    /// Equi-depth histogram boundaries over the numeric values
    pub quantiles: Vec<f64>,
}

impl PropertyStats {
    pub fn new(count: f64, unique: f64, numeric: f64) -> Self {
        Self {
            count,
            unique,
            numeric,
            most_frequent: HashMap::new(),
            quantiles: Vec::new(),
        }
    }

    pub fn with_frequent_value(mut self, hash: i32, fraction: f64) -> Self {
        self.most_frequent.insert(hash, fraction);
        self
    }

    pub fn with_quantiles(mut self, quantiles: Vec<f64>) -> Self {
        self.quantiles = quantiles;
        self
    }

    /// Fraction of elements holding the value with the given hash, if it is frequent
    pub fn frequency(&self, hash: i32) -> Option<f64> {
        self.most_frequent.get(&hash).copied()
    }

    pub fn num_frequent(&self) -> usize {
        self.most_frequent.len()
    }

    /// Fraction of numeric values falling into `[min, max]`
    ///
    /// Returns `None` when the property holds no numeric values or the range is
    /// inverted. Partially overlapped buckets are interpolated linearly.
    pub fn range_fraction(&self, min: f64, max: f64) -> Option<f64> {
        if min > max || self.numeric == 0.0 {
            return None;
        }
        Some(histogram_range(&self.quantiles, min, max))
    }
}

fn histogram_range(q: &[f64], vmin: f64, vmax: f64) -> f64 {
    let n = q.len();
    if n < 2 {
        return 0.0;
    }
    let min = vmin.max(q[0]);
    let max = vmax.min(q[n - 1]);
    let buckets = (n - 1) as f64;

    let mut l = 0;
    let mut r = n - 1;
    while l + 1 < n && q[l + 1] < min {
        l += 1;
    }
    if l + 1 < n && q[l + 1] == min {
        l += 1;
    }
    while r >= 1 && q[r - 1] > max {
        r -= 1;
    }
    if r >= 1 && q[r - 1] == max {
        r -= 1;
    }
    if r <= l {
        return 0.0;
    }
    if l + 1 == r {
        let bucket_range = q[r] - q[l];
        if bucket_range <= 0.0 {
            return 1.0 / buckets;
        }
        return ((max - min) / bucket_range) / buckets;
    }

    let involved = (r - l) as f64;
    let first = if min < q[l] || q[l + 1] == q[l] {
        1.0
    } else {
        (q[l + 1] - min) / (q[l + 1] - q[l])
    };
    let last = if max > q[r] || q[r] == q[r - 1] {
        1.0
    } else {
        (max - q[r - 1]) / (q[r] - q[r - 1])
    };
    (first + involved - 2.0 + last) / buckets
}

/// Per relationship type totals from the `# Edge Types` section
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TypeSummary {
    pub outgoing: f64,
    pub incoming: f64,
    pub paths: f64,
    pub pairs: f64,
}

/// Size overview of a statistics store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub num_nodes: f64,
    pub num_labels: usize,
    pub num_types: usize,
    pub num_properties: usize,
    pub relationship_entries: usize,
    pub wildcard_relationship_entries: usize,
    pub numeric_property_entries: usize,
    pub string_property_entries: usize,
}

/// Graph statistics keyed by integer ids
#[derive(Debug, Clone, Default)]
pub struct GraphStatistics {
    node_count: f64,
    label_ids: HashMap<String, LabelId>,
    label_counts: HashMap<LabelId, f64>,
    type_ids: HashMap<String, TypeId>,
    type_summaries: HashMap<TypeId, TypeSummary>,
    property_ids: HashMap<String, PropertyId>,
    relationship_counts: HashMap<(LabelId, TypeId, LabelId), f64>,
    label_properties: HashMap<(LabelId, PropertyId), PropertyStats>,
    type_properties: HashMap<(TypeId, PropertyId), PropertyStats>,
}

impl GraphStatistics {
    pub fn builder(node_count: f64) -> GraphStatisticsBuilder {
        GraphStatisticsBuilder::new(node_count)
    }

    /// Nodes carrying `label`, or all nodes for [`ANY_LABEL`]
    pub fn num_nodes(&self, label: LabelId) -> f64 {
        if label == ANY_LABEL {
            self.node_count
        } else {
            self.label_counts.get(&label).copied().unwrap_or(0.0)
        }
    }

    /// Relationships of `rel_type` from `base`-labelled to `target`-labelled nodes
    pub fn relationship_count(&self, base: LabelId, rel_type: TypeId, target: LabelId) -> f64 {
        self.relationship_counts
            .get(&(base, rel_type, target))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn num_relationships(&self, rel_type: TypeId) -> f64 {
        self.relationship_count(ANY_LABEL, rel_type, ANY_LABEL)
    }

    pub fn label_property(&self, label: LabelId, property: PropertyId) -> Option<&PropertyStats> {
        self.label_properties.get(&(label, property))
    }

    pub fn type_property(&self, rel_type: TypeId, property: PropertyId) -> Option<&PropertyStats> {
        self.type_properties.get(&(rel_type, property))
    }

    pub fn type_summary(&self, rel_type: TypeId) -> Option<&TypeSummary> {
        self.type_summaries.get(&rel_type)
    }

    pub fn label_id(&self, name: &str) -> Option<LabelId> {
        self.label_ids.get(name).copied()
    }

    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.type_ids.get(name).copied()
    }

    pub fn property_id(&self, name: &str) -> Option<PropertyId> {
        self.property_ids.get(name).copied()
    }

    pub fn label_name(&self, id: LabelId) -> Option<&str> {
        self.label_ids
            .iter()
            .find(|(_, &v)| v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn type_name(&self, id: TypeId) -> Option<&str> {
        self.type_ids
            .iter()
            .find(|(_, &v)| v == id)
            .map(|(k, _)| k.as_str())
    }

    /// Label names ordered by id
    pub fn labels(&self) -> BTreeMap<LabelId, &str> {
        self.label_ids
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
            .collect()
    }

    /// Relationship type names ordered by id
    pub fn types(&self) -> BTreeMap<TypeId, &str> {
        self.type_ids
            .iter()
            .map(|(name, &id)| (id, name.as_str()))
            .collect()
    }

    /// All label ids in ascending order
    pub fn label_ids(&self) -> Vec<LabelId> {
        self.labels().into_keys().collect()
    }

    pub fn summary(&self) -> StatisticsSummary {
        let wildcard_relationship_entries = self
            .relationship_counts
            .keys()
            .filter(|(base, _, target)| *base == ANY_LABEL || *target == ANY_LABEL)
            .count();
        let all_props = || {
            self.label_properties
                .values()
                .chain(self.type_properties.values())
        };
        StatisticsSummary {
            num_nodes: self.node_count,
            num_labels: self.label_ids.len(),
            num_types: self.type_ids.len(),
            num_properties: self.property_ids.len(),
            relationship_entries: self.relationship_counts.len(),
            wildcard_relationship_entries,
            numeric_property_entries: all_props().filter(|p| p.numeric != 0.0).count(),
            string_property_entries: all_props().filter(|p| p.numeric == 0.0).count(),
        }
    }
}

/// Incremental construction of [`GraphStatistics`]
///
/// Registering a relationship type records its total under the
/// `(ANY_LABEL, type, ANY_LABEL)` key unless a more specific count for that
/// key is given explicitly afterwards.
#[derive(Debug, Clone)]
pub struct GraphStatisticsBuilder {
    stats: GraphStatistics,
}

impl GraphStatisticsBuilder {
    pub fn new(node_count: f64) -> Self {
        Self {
            stats: GraphStatistics {
                node_count,
                ..GraphStatistics::default()
            },
        }
    }

    pub fn label(mut self, name: &str, id: LabelId, count: f64) -> Self {
        self.stats.label_ids.insert(name.to_string(), id);
        self.stats.label_counts.insert(id, count);
        self
    }

    pub fn relationship_type(mut self, name: &str, id: TypeId, summary: TypeSummary) -> Self {
        self.stats.type_ids.insert(name.to_string(), id);
        self.stats.type_summaries.insert(id, summary);
        self
    }

    pub fn property(mut self, name: &str, id: PropertyId) -> Self {
        self.stats.property_ids.insert(name.to_string(), id);
        self
    }

    pub fn relationships(mut self, base: LabelId, rel_type: TypeId, target: LabelId, count: f64) -> Self {
        self.stats
            .relationship_counts
            .insert((base, rel_type, target), count);
        self
    }

    /// Registers `count` relationships of `rel_type` between two labels and
    /// adds them to every wildcard combination.
    pub fn add_relationships(mut self, base: LabelId, rel_type: TypeId, target: LabelId, count: f64) -> Self {
        let mut keys = vec![(base, rel_type, target)];
        for b in [base, ANY_LABEL] {
            for t in [rel_type, ANY_TYPE] {
                for w in [target, ANY_LABEL] {
                    if !keys.contains(&(b, t, w)) {
                        keys.push((b, t, w));
                    }
                }
            }
        }
        for key in keys {
            *self.stats.relationship_counts.entry(key).or_insert(0.0) += count;
        }
        self
    }

    pub fn label_property(mut self, label: LabelId, property: PropertyId, stats: PropertyStats) -> Self {
        self.stats.label_properties.insert((label, property), stats);
        self
    }

    pub fn type_property(mut self, rel_type: TypeId, property: PropertyId, stats: PropertyStats) -> Self {
        self.stats.type_properties.insert((rel_type, property), stats);
        self
    }

    pub fn build(self) -> GraphStatistics {
        self.stats
    }
}
