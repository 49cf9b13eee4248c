// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Restriction of a relationship variable to a set of types

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{ResultProperties, TypeSet};
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::{Direction, ANY_LABEL};

// Label fractions of the endpoints are not adjusted.
pub(crate) fn compute(
    db: &DbProperties,
    variable: &str,
    allowed: &TypeSet,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    let old = input
        .types(variable)
        .ok_or_else(|| EstimatorError::VariableNotBound(variable.to_string()))?;
    let new: TypeSet = allowed.intersection(old).copied().collect();

    let old_total = db.relationships(ANY_LABEL, old, ANY_LABEL, Direction::Outgoing);
    let ratio = if old_total > 0.0 {
        db.relationships(ANY_LABEL, &new, ANY_LABEL, Direction::Outgoing) / old_total
    } else {
        0.0
    };

    let mut relationships = input.relationship_types().clone();
    relationships.insert(variable.to_string(), new);
    ResultProperties::new(
        input.node_labels().clone(),
        relationships,
        input.size() * ratio,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::{expand, get_nodes};
    use super::*;

    #[test]
    fn test_restrict_types() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        let expanded = expand::compute(
            &db,
            "a",
            Direction::Outgoing,
            "$e0",
            &TypeSet::from([KNOWS, LIVES_IN]),
            "b",
            &all,
        )
        .unwrap();
        assert_eq!(expanded.size(), 360.0);

        let knows = compute(&db, "$e0", &TypeSet::from([KNOWS, 7]), &expanded).unwrap();
        assert!((knows.size() - 300.0).abs() < 1e-9);
        assert_eq!(knows.types("$e0"), Some(&TypeSet::from([KNOWS])));
        assert_eq!(knows.labels("b").unwrap(), expanded.labels("b").unwrap());

        let none = compute(&db, "$e0", &TypeSet::from([7]), &expanded).unwrap();
        assert_eq!(none.size(), 0.0);
        assert!(none.types("$e0").is_some_and(|t| t.is_empty()));
    }

    #[test]
    fn test_unbound_relationship() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        assert!(compute(&db, "a", &TypeSet::from([KNOWS]), &all).is_err());
    }
}
