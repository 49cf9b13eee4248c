// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Identification of two node variables, weighted by the label hierarchy

use std::collections::BTreeMap;

use crate::algebra::db_properties::DbProperties;
use crate::algebra::hierarchy::walk_hierarchy;
use crate::algebra::result_properties::{LabelFractions, ResultProperties};
use crate::error::{EstimatorError, EstimatorResult};

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

    // probability that two random matches share their node
    let mut factor = 0.0;
    let mut tallies: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    let [rest_staying, rest_leaving] = walk_hierarchy::<2>(
        db,
        |group| input.sort_labels_by_joint_fraction(staying, leaving, group, db),
        |i, l| {
            if i == 0 {
                input.fraction(staying, l)
            } else {
                input.fraction(leaving, l)
            }
        },
        |group, l, [mass_staying, mass_leaving]| {
            let nodes = db.nodes(l);
            if nodes <= 0.0 {
                return;
            }
            let contribution = mass_staying * mass_leaving / nodes;
            factor += contribution;
            let tally = tallies.entry(group).or_insert((0.0, 0.0));
            tally.0 += mass_staying.min(mass_leaving);
            tally.1 += contribution;
        },
    );
    for (group, (overlap, contribution)) in &tallies {
        log::trace!(
            "MergeOn {} <- {}: group {} overlap {} contribution {}",
            staying,
            leaving,
            group,
            overlap,
            contribution
        );
    }
    let total = db.total_nodes();
    if total > 0.0 {
        factor += rest_staying * rest_leaving / total;
    }

    // labels known only to the staying variable keep their fraction
    let mut merged: LabelFractions = staying_fractions.clone();
    for (&l, &f_leaving) in leaving_fractions {
        let f_staying = staying_fractions.get(&l).copied().unwrap_or(0.0);
        let overlap = f_staying.min(f_leaving);
        let fraction = if overlap == 0.0 || factor == 0.0 {
            0.0
        } else {
            (overlap / factor).clamp(0.0, 1.0)
        };
        merged.insert(l, fraction);
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
