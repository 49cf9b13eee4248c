// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Identification of two node variables, weighted by overlap group sizes
//!
//! Walks the labels of the whole database in joint evidence order. Within an
//! overlap group, every label of the staying variable is paired with the
//! uncovered labels of the leaving variable, using the conditional probability
//! that a node of the first label also carries the second.

use std::collections::BTreeSet;

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{sort_by_evidence, LabelFractions, ResultProperties};
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::LabelId;

pub(crate) fn compute(
    db: &DbProperties,
    staying: &str,
    leaving: &str,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    if staying == leaving {
        return Err(EstimatorError::SameVariableMerge(staying.to_string()));
    }
    let staying_fractions = input.labels(staying)?;
    let leaving_fractions = input.labels(leaving)?;
    let f_staying = |l: LabelId| staying_fractions.get(&l).copied().unwrap_or(0.0);
    let f_leaving = |l: LabelId| leaving_fractions.get(&l).copied().unwrap_or(0.0);

    let distribution = db.distribution();
    let part_sizes = partition_sizes(db);
    let total = db.total_nodes();
    let mut covered: Vec<f64> = vec![0.0; distribution.groups().len()];
    let mut uncovered: Vec<BTreeSet<LabelId>> = distribution.groups().to_vec();
    let mut remaining: f64 = 1.0;
    let mut factor = 0.0;

    for l in input.sort_labels_by_joint_fraction(staying, leaving, db.labels(), db) {
        if remaining <= 0.0 {
            break;
        }
        let Some(p) = distribution.group_of(l) else {
            continue;
        };
        if covered[p] < 1.0 {
            if uncovered[p].contains(&l) {
                let fraction = f_staying(l);
                if fraction > 0.0 {
                    for &l2 in &uncovered[p] {
                        let nodes = db.nodes(l2);
                        if f_leaving(l2) <= 0.0 || nodes <= 0.0 {
                            continue;
                        }
                        let conditional = conditional_probability(db, l, l2, part_sizes[p], total);
                        factor += (1.0 - covered[p]) * conditional * fraction / nodes;
                    }
                }
                covered[p] += (1.0 - covered[p]) * fraction;
            }
            uncovered[p].remove(&l);
            for sub in distribution.sublabels(l) {
                uncovered[p].remove(sub);
            }
        }
        remaining -= remaining.min(covered[p]);
    }
    factor += remaining * total;
    log::trace!("SelfJoin {} <- {}: factor {}", staying, leaving, factor);

    let mut merged: LabelFractions = staying_fractions.clone();
    for (&l, &f) in leaving_fractions {
        merged
            .entry(l)
            .and_modify(|current| *current = current.min(f))
            .or_insert(f);
    }

    let mut nodes = input.node_labels().clone();
    nodes.remove(leaving);
    nodes.insert(staying.to_string(), merged);
    ResultProperties::new(
        nodes,
        input.relationship_types().clone(),
        input.size() * factor,
        false,
    )
}

/// Probability that a node with label `given` also carries `label`
fn conditional_probability(db: &DbProperties, given: LabelId, label: LabelId, part_size: f64, total: f64) -> f64 {
    let distribution = db.distribution();
    if distribution.is_sublabel(label, given) {
        let given_nodes = db.nodes(given);
        if given_nodes <= 0.0 {
            0.0
        } else {
            (db.nodes(label) / given_nodes).min(1.0)
        }
    } else if label == given || distribution.is_sublabel(given, label) {
        1.0
    } else if total <= 0.0 {
        0.0
    } else {
        let share = db.nodes(label) / total;
        if part_size <= 0.0 {
            share
        } else {
            (share / part_size).min(1.0)
        }
    }
}

/// Share of the nodes falling into each overlap group
///
/// Every group counts as the whole database when there are fewer than two.
fn partition_sizes(db: &DbProperties) -> Vec<f64> {
    let distribution = db.distribution();
    let groups = distribution.groups();
    if groups.len() < 2 {
        return vec![1.0; groups.len()];
    }

    let total = db.total_nodes();
    let fraction = |l: LabelId| if total > 0.0 { db.nodes(l) / total } else { 0.0 };
    let mut sizes = vec![0.0; groups.len()];
    let mut processed: BTreeSet<LabelId> = BTreeSet::new();
    let mut remaining: f64 = 1.0;
    for l in sort_by_evidence(db.labels(), db, fraction) {
        if processed.contains(&l) {
            continue;
        }
        processed.extend(distribution.sublabels(l).iter().copied());
        let Some(group) = distribution.group_of(l) else {
            continue;
        };
        let part = fraction(l) * remaining;
        sizes[group] += part;
        remaining -= part;
        if remaining <= 0.0 {
            break;
        }
    }

    let sum: f64 = sizes.iter().sum();
    if sum > 0.0 {
        for size in &mut sizes {
            *size /= sum;
        }
    }
    sizes
}
