// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Join of two independent results on their shared node variables

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{LabelFractions, ResultProperties};
use crate::error::EstimatorResult;

pub(crate) fn compute(
    db: &DbProperties,
    left: &ResultProperties,
    right: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    let mut nodes = left.node_labels().clone();
    let mut shared = 0usize;
    for (variable, right_fractions) in right.node_labels() {
        let Some(left_fractions) = left.node_labels().get(variable) else {
            nodes.insert(variable.clone(), right_fractions.clone());
            continue;
        };
        shared += 1;
        let combined: LabelFractions = db
            .labels()
            .iter()
            .map(|&l| {
                let a = left_fractions.get(&l).copied().unwrap_or(0.0);
                let b = right_fractions.get(&l).copied().unwrap_or(0.0);
                (l, a * b + (1.0 - a) * b + a * (1.0 - b))
            })
            .collect();
        nodes.insert(variable.clone(), combined);
    }

    let mut relationships = left.relationship_types().clone();
    relationships.extend(
        right
            .relationship_types()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let total = db.total_nodes();
    let match_probability = if shared == 0 {
        1.0
    } else if total > 0.0 {
        shared as f64 / total
    } else {
        0.0
    };
    ResultProperties::new(
        nodes,
        relationships,
        left.size() * right.size() * match_probability,
        false,
    )
}
