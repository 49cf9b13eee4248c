// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Leaf operator binding every node of the database

use std::collections::BTreeMap;

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{LabelFractions, ResultProperties};
use crate::error::EstimatorResult;

pub(crate) fn compute(db: &DbProperties, variable: &str) -> EstimatorResult<ResultProperties> {
    let total = db.total_nodes();
    let fractions: LabelFractions = db
        .labels()
        .iter()
        .map(|&label| {
            let fraction = if total > 0.0 { db.nodes(label) / total } else { 0.0 };
            (label, fraction)
        })
        .collect();
    ResultProperties::new(
        BTreeMap::from([(variable.to_string(), fractions)]),
        BTreeMap::new(),
        total,
        true,
    )
}
