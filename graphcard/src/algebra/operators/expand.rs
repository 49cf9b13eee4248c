// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Relationship traversal
//!
//! The number of relationships leaving a match is estimated from the average
//! degree of the labels its base node carries, weighted by the label hierarchy
//! walk. For the initial state the relationship counts are exact.

use std::collections::BTreeSet;

use super::label_selection;
use crate::algebra::db_properties::DbProperties;
use crate::algebra::hierarchy::walk_hierarchy;
use crate::algebra::result_properties::{LabelFractions, ResultProperties, TypeSet};
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::{Direction, LabelId, ANY_LABEL};

pub(crate) fn compute(
    db: &DbProperties,
    base: &str,
    direction: Direction,
    relationship: &str,
    types: &TypeSet,
    target: &str,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    let base_fractions = input.labels(base)?;
    if input.is_relationship_bound(relationship) {
        return Err(EstimatorError::VariableAlreadyBound(relationship.to_string()));
    }
    let traversal = Traversal {
        db,
        base,
        types,
        direction,
    };

    let (size, new_base, new_target) = if input.is_initial() {
        traversal.from_all_nodes(base_fractions)
    } else {
        traversal.from_result(input, base_fractions, target)?
    };
    log::trace!(
        "Expand {} -[{}]- {}: {} -> {}",
        base,
        relationship,
        target,
        input.size(),
        size
    );

    let mut nodes = input.node_labels().clone();
    nodes.insert(base.to_string(), new_base);
    nodes.insert(target.to_string(), new_target);
    let mut relationships = input.relationship_types().clone();
    relationships.insert(relationship.to_string(), types.clone());
    ResultProperties::new(nodes, relationships, size, false)
}

struct Traversal<'a> {
    db: &'a DbProperties,
    base: &'a str,
    types: &'a TypeSet,
    direction: Direction,
}

impl Traversal<'_> {
    /// Exact counts when the base variable still ranges over all nodes
    fn from_all_nodes(&self, base_fractions: &LabelFractions) -> (f64, LabelFractions, LabelFractions) {
        let db = self.db;
        let size = db.relationships(ANY_LABEL, self.types, ANY_LABEL, self.direction);
        if size <= 0.0 {
            let targets = db.labels().iter().map(|&l| (l, 0.0)).collect();
            return (size, base_fractions.clone(), targets);
        }
        let mut base = LabelFractions::new();
        let mut target = LabelFractions::new();
        for &l in db.labels() {
            base.insert(l, db.relationships(l, self.types, ANY_LABEL, self.direction) / size);
            target.insert(l, db.relationships(ANY_LABEL, self.types, l, self.direction) / size);
        }
        (size, base, target)
    }

    fn from_result(
        &self,
        input: &ResultProperties,
        base_fractions: &LabelFractions,
        target: &str,
    ) -> EstimatorResult<(f64, LabelFractions, LabelFractions)> {
        let db = self.db;
        let bound_target = input.node_labels().get(target);
        let degree = self.degree(input, bound_target.map(|_| target));
        let size = input.size() * degree;
        if degree <= 0.0 {
            let targets = db.labels().iter().map(|&l| (l, 0.0)).collect();
            return Ok((size, base_fractions.clone(), targets));
        }

        let new_target: LabelFractions = match bound_target {
            Some(old) => db
                .labels()
                .iter()
                .filter(|&&l| db.nodes(l) > 0.0)
                .map(|&l| {
                    let previous = old.get(&l).copied().unwrap_or(0.0);
                    let fraction = self.degree_to(input, l) * previous / db.nodes(l) / degree;
                    (l, fraction.min(1.0))
                })
                .collect(),
            None => db
                .labels()
                .iter()
                .map(|&l| (l, self.degree_to(input, l) / degree))
                .collect(),
        };

        let mut new_base = LabelFractions::new();
        for &l in db.labels() {
            let previous = base_fractions.get(&l).copied().unwrap_or(0.0);
            let selected = label_selection::compute(db, self.base, l, input)?;
            let fraction = if selected.size() > 0.0 {
                (self.degree_to(&selected, ANY_LABEL) * previous / degree).min(1.0)
            } else {
                0.0
            };
            new_base.insert(l, fraction);
        }
        Ok((size, new_base, new_target))
    }

    /// Expected relationships per match, towards a bound target if given
    fn degree(&self, input: &ResultProperties, bound_target: Option<&str>) -> f64 {
        match bound_target {
            Some(target) => self.degree_to_bound(input, target),
            None => self.degree_to(input, ANY_LABEL),
        }
    }

    /// Expected relationships per match leading to `target_label` nodes
    fn degree_to(&self, input: &ResultProperties, target_label: LabelId) -> f64 {
        let db = self.db;
        let mut degree = 0.0;
        let [rest] = walk_hierarchy::<1>(
            db,
            |group| input.sort_labels_by_fraction_and_recall(self.base, group, db),
            |_, l| input.fraction(self.base, l),
            |_, l, [mass]| {
                degree += mass * db.average_degree(l, self.types, target_label, self.direction)
            },
        );
        degree + rest * db.average_degree(ANY_LABEL, self.types, target_label, self.direction)
    }

    /// Expected relationships per match leading to the node already bound to
    /// `target`
    fn degree_to_bound(&self, input: &ResultProperties, target: &str) -> f64 {
        let db = self.db;
        let distribution = db.distribution();
        let mut degree = 0.0;
        let mut remaining: f64 = 1.0;

        for group in distribution.groups() {
            if remaining <= 0.0 {
                break;
            }
            let mut coverage = 0.0;
            let mut covered: BTreeSet<LabelId> = BTreeSet::new();
            for l in input.sort_labels_by_fraction_and_recall(target, group, db) {
                if coverage >= 1.0 {
                    break;
                }
                if !covered.contains(&l) {
                    let fraction = input.fraction(target, l);
                    degree += (1.0 - coverage) * self.degree_to(input, l) * db.density(fraction, l);
                    coverage += (1.0 - coverage) * fraction;
                }
                covered.extend(distribution.sublabels(l).iter().copied());
            }
            remaining -= remaining.min(coverage);
        }

        let total = db.total_nodes();
        if total > 0.0 {
            degree += remaining * self.degree_to(input, ANY_LABEL) / total;
        }
        degree
    }
}
