// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Selection by property predicates on a node or relationship variable

use std::collections::{BTreeMap, BTreeSet};

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{LabelFractions, ResultProperties, TypeSet};
use crate::error::{EstimatorError, EstimatorResult};
use crate::query::PropertyPredicate;
use crate::stats::{LabelId, PropertyId};

/// Selectivity used for every predicate on a node without candidate labels
const DEFAULT_SELECTIVITY: f64 = 0.1;

pub(crate) fn compute(
    db: &DbProperties,
    variable: &str,
    predicates: &BTreeMap<PropertyId, PropertyPredicate>,
    static_selectivity: Option<f64>,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    if predicates.is_empty() {
        return Err(EstimatorError::EmptyPredicates(variable.to_string()));
    }
    if input.is_node_bound(variable) {
        select_nodes(db, variable, predicates, static_selectivity, input)
    } else if let Some(types) = input.types(variable) {
        select_relationships(db, variable, types, predicates, static_selectivity, input)
    } else {
        Err(EstimatorError::VariableNotBound(variable.to_string()))
    }
}

/// Selectivity of one predicate for one label or type
fn predicate_selectivity(
    predicate: &PropertyPredicate,
    point: impl Fn(Option<i32>) -> f64,
    range: impl Fn(f64, f64) -> f64,
) -> f64 {
    match predicate {
        PropertyPredicate::Range { low, high } if low != high => range(*low, *high),
        _ => point(predicate.value_hash()),
    }
}

/// Minimum over predicates of the mean selectivity over candidates, plus the
/// candidates with a positive selectivity for some predicate
fn aggregate<T: Copy + Ord>(
    candidates: &[T],
    predicates: &BTreeMap<PropertyId, PropertyPredicate>,
    selectivity: impl Fn(T, PropertyId, &PropertyPredicate) -> f64,
) -> (f64, BTreeSet<T>) {
    let mut overall = f64::INFINITY;
    let mut kept = BTreeSet::new();
    for (&property, predicate) in predicates {
        let mut sum = 0.0;
        for &candidate in candidates {
            let s = selectivity(candidate, property, predicate);
            if s > 0.0 {
                kept.insert(candidate);
            }
            sum += s;
        }
        overall = overall.min(sum / candidates.len() as f64);
    }
    (overall, kept)
}

fn select_nodes(
    db: &DbProperties,
    variable: &str,
    predicates: &BTreeMap<PropertyId, PropertyPredicate>,
    static_selectivity: Option<f64>,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    let fractions = input.labels(variable)?;
    let candidates: Vec<LabelId> = fractions
        .iter()
        .filter(|(_, &f)| f > 0.0)
        .map(|(&l, _)| l)
        .collect();
    let exponent = predicates.len() as i32;

    // Only labels with a positive selectivity for some predicate keep a fraction
    let (selectivity, kept) = if candidates.is_empty() {
        (DEFAULT_SELECTIVITY.powi(exponent), BTreeSet::new())
    } else if let Some(s) = static_selectivity {
        (s.powi(exponent), BTreeSet::new())
    } else {
        let view = db.view();
        aggregate(&candidates, predicates, |label, property, predicate| {
            predicate_selectivity(
                predicate,
                |hash| view.node_selectivity(label, property, hash),
                |min, max| view.node_range_selectivity(label, property, min, max),
            )
        })
    };
    log::trace!("Selectivity of {:?} on {}: {}", predicates, variable, selectivity);

    let mut nodes = input.node_labels().clone();
    if selectivity > 0.0 {
        let rescaled: LabelFractions = fractions
            .iter()
            .map(|(&l, &f)| {
                let fraction = if kept.contains(&l) { (f / selectivity).min(1.0) } else { 0.0 };
                (l, fraction)
            })
            .collect();
        nodes.insert(variable.to_string(), rescaled);
    }
    ResultProperties::new(
        nodes,
        input.relationship_types().clone(),
        input.size() * selectivity,
        false,
    )
}

fn select_relationships(
    db: &DbProperties,
    variable: &str,
    types: &TypeSet,
    predicates: &BTreeMap<PropertyId, PropertyPredicate>,
    static_selectivity: Option<f64>,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    if types.is_empty() {
        return Err(EstimatorError::EmptyTypeSet(variable.to_string()));
    }

    let (selectivity, kept) = match static_selectivity {
        Some(s) => (s.powi(predicates.len() as i32), types.clone()),
        None => {
            let view = db.view();
            let candidates: Vec<_> = types.iter().copied().collect();
            aggregate(&candidates, predicates, |rel_type, property, predicate| {
                predicate_selectivity(
                    predicate,
                    |hash| view.relationship_selectivity(rel_type, property, hash),
                    |min, max| view.relationship_range_selectivity(rel_type, property, min, max),
                )
            })
        }
    };
    log::trace!("Selectivity of {:?} on {}: {}", predicates, variable, selectivity);

    let mut relationships = input.relationship_types().clone();
    relationships.insert(variable.to_string(), kept);
    ResultProperties::new(
        input.node_labels().clone(),
        relationships,
        input.size() * selectivity,
        false,
    )
}
