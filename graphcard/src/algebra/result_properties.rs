// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Statistical state of an intermediate result

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::db_properties::DbProperties;
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::{LabelId, TypeId};

/// Fraction of a variable's matches carrying each label
pub type LabelFractions = BTreeMap<LabelId, f64>;
/// Possible types of a relationship variable
pub type TypeSet = BTreeSet<TypeId>;

/// Immutable snapshot of per-variable statistics and the estimated size
#[derive(Debug, Clone, PartialEq)]
pub struct ResultProperties {
    node_labels: BTreeMap<String, LabelFractions>,
    relationship_types: BTreeMap<String, TypeSet>,
    size: f64,
    is_initial: bool,
}

impl ResultProperties {
    /// Fails when a name is bound both as node and as relationship variable
    pub fn new(
        node_labels: BTreeMap<String, LabelFractions>,
        relationship_types: BTreeMap<String, TypeSet>,
        size: f64,
        is_initial: bool,
    ) -> EstimatorResult<Self> {
        let shared: Vec<&str> = node_labels
            .keys()
            .filter(|v| relationship_types.contains_key(*v))
            .map(String::as_str)
            .collect();
        if !shared.is_empty() {
            return Err(EstimatorError::OverlappingVariables(shared.join(", ")));
        }
        Ok(Self {
            node_labels,
            relationship_types,
            size,
            is_initial,
        })
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn node_labels(&self) -> &BTreeMap<String, LabelFractions> {
        &self.node_labels
    }

    pub fn relationship_types(&self) -> &BTreeMap<String, TypeSet> {
        &self.relationship_types
    }

    pub fn node_variables(&self) -> impl Iterator<Item = &str> {
        self.node_labels.keys().map(String::as_str)
    }

    pub fn relationship_variables(&self) -> impl Iterator<Item = &str> {
        self.relationship_types.keys().map(String::as_str)
    }

    pub fn is_node_bound(&self, variable: &str) -> bool {
        self.node_labels.contains_key(variable)
    }

    pub fn is_relationship_bound(&self, variable: &str) -> bool {
        self.relationship_types.contains_key(variable)
    }

    /// Label fractions of a bound node variable
    pub fn labels(&self, variable: &str) -> EstimatorResult<&LabelFractions> {
        self.node_labels
            .get(variable)
            .ok_or_else(|| EstimatorError::VariableNotBound(variable.to_string()))
    }

    /// Fraction of `variable`'s matches with `label`, 0 if unknown
    pub fn fraction(&self, variable: &str, label: LabelId) -> f64 {
        self.node_labels
            .get(variable)
            .and_then(|f| f.get(&label))
            .copied()
            .unwrap_or(0.0)
    }

    /// Possible types of a bound relationship variable
    pub fn types(&self, variable: &str) -> Option<&TypeSet> {
        self.relationship_types.get(variable)
    }

    /// Labels ordered by evidence density `fraction / nodes` (descending),
    /// then by raw fraction, then by id
    pub fn sort_labels_by_fraction_and_recall<'a>(
        &self,
        variable: &str,
        labels: impl IntoIterator<Item = &'a LabelId>,
        db: &DbProperties,
    ) -> Vec<LabelId> {
        let fractions = self.node_labels.get(variable);
        let fraction = |l: LabelId| fractions.and_then(|f| f.get(&l)).copied().unwrap_or(0.0);
        sort_by_evidence(labels, db, fraction)
    }

    /// Like [`Self::sort_labels_by_fraction_and_recall`], keyed by the larger
    /// fraction of two variables
    pub fn sort_labels_by_joint_fraction<'a>(
        &self,
        first: &str,
        second: &str,
        labels: impl IntoIterator<Item = &'a LabelId>,
        db: &DbProperties,
    ) -> Vec<LabelId> {
        sort_by_evidence(labels, db, |l| {
            self.fraction(first, l).max(self.fraction(second, l))
        })
    }
}

pub(crate) fn sort_by_evidence<'a>(
    labels: impl IntoIterator<Item = &'a LabelId>,
    db: &DbProperties,
    fraction: impl Fn(LabelId) -> f64,
) -> Vec<LabelId> {
    let mut keyed: Vec<(LabelId, f64, f64)> = labels
        .into_iter()
        .map(|&l| {
            let f = fraction(l);
            (l, db.density(f, l), f)
        })
        .collect();
    keyed.sort_by(|a, b| {
        compare_desc(a.1, b.1)
            .then_with(|| compare_desc(a.2, b.2))
            .then_with(|| a.0.cmp(&b.0))
    });
    keyed.into_iter().map(|(l, _, _)| l).collect()
}

/// Descending order, NaN first
fn compare_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => b.total_cmp(&a),
    }
}

impl fmt::Display for ResultProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultProperties[size={}", self.size)?;
        for (var, fractions) in &self.node_labels {
            write!(f, ", {}={:?}", var, fractions)?;
        }
        for (var, types) in &self.relationship_types {
            write!(f, ", {}={:?}", var, types)?;
        }
        write!(f, "]")
    }
}
