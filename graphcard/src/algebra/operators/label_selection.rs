// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Selection of the matches whose node carries a label

use crate::algebra::db_properties::DbProperties;
use crate::algebra::result_properties::{LabelFractions, ResultProperties};
use crate::error::EstimatorResult;
use crate::stats::LabelId;

pub(crate) fn compute(
    db: &DbProperties,
    variable: &str,
    label: LabelId,
    input: &ResultProperties,
) -> EstimatorResult<ResultProperties> {
    let old = input.labels(variable)?;
    let reduction = old.get(&label).copied().unwrap_or(0.0);
    if reduction <= 0.0 {
        return ResultProperties::new(
            input.node_labels().clone(),
            input.relationship_types().clone(),
            0.0,
            false,
        );
    }

    let distribution = db.distribution();
    let group = distribution.group_of(label);
    let fractions: LabelFractions = db
        .labels()
        .iter()
        .map(|&l| {
            let previous = old.get(&l).copied().unwrap_or(0.0);
            let fraction = if l == label || distribution.is_sublabel(label, l) {
                1.0
            } else if distribution.is_sublabel(l, label) {
                (previous / reduction).min(1.0)
            } else if distribution.group_of(l) == group {
                previous
            } else {
                0.0
            };
            (l, fraction)
        })
        .collect();

    let mut nodes = input.node_labels().clone();
    nodes.insert(variable.to_string(), fractions);
    ResultProperties::new(
        nodes,
        input.relationship_types().clone(),
        input.size() * reduction,
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::get_nodes;
    use super::*;
    use crate::error::EstimatorError;

    #[test]
    fn test_select_super_label() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        let persons = compute(&db, "a", PERSON, &all).unwrap();
        assert_eq!(persons.size(), 60.0);
        assert_eq!(persons.fraction("a", PERSON), 1.0);
        assert_eq!(persons.fraction("a", EMPLOYEE), 0.5);
        assert_eq!(persons.fraction("a", CITY), 0.0);
    }

    #[test]
    fn test_select_sub_label_marks_super_labels() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        let employees = compute(&db, "a", EMPLOYEE, &all).unwrap();
        assert_eq!(employees.size(), 30.0);
        assert_eq!(employees.fraction("a", PERSON), 1.0);
        assert_eq!(employees.fraction("a", EMPLOYEE), 1.0);

        // selecting the super-label afterwards changes nothing
        let both = compute(&db, "a", PERSON, &employees).unwrap();
        assert_eq!(both.size(), 30.0);
        assert_eq!(both.fraction("a", EMPLOYEE), 1.0);
    }

    #[test]
    fn test_disjoint_label_yields_empty_result() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        let cities = compute(&db, "a", CITY, &all).unwrap();
        let none = compute(&db, "a", PERSON, &cities).unwrap();
        assert_eq!(none.size(), 0.0);
        assert_eq!(none.labels("a").unwrap(), cities.labels("a").unwrap());
    }

    #[test]
    fn test_unbound_variable() {
        let db = db();
        let all = get_nodes::compute(&db, "a").unwrap();
        let err = compute(&db, "b", PERSON, &all).unwrap_err();
        assert_eq!(err, EstimatorError::VariableNotBound("b".into()));
    }
}
