// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Estimation operators
//!
//! Every operator maps the [`ResultProperties`] of its inputs to the
//! properties of its output. Operators are plain values: two operators with
//! the same parameters are equal and hash alike, so identical sub-plans can
//! be recognized.

mod expand;
mod get_nodes;
mod label_selection;
mod merge_on;
mod node_join;
mod property_selection;
mod self_join;
mod type_selection;

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::db_properties::DbProperties;
use super::result_properties::{ResultProperties, TypeSet};
use crate::error::{EstimatorError, EstimatorResult};
use crate::query::PropertyPredicate;
use crate::stats::{Direction, LabelId, PropertyId, ANY_TYPE};

/// Fixed selectivity applied per predicate, compared bitwise
#[derive(Debug, Clone, Copy)]
pub struct StaticSelectivity(pub f64);

impl PartialEq for StaticSelectivity {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StaticSelectivity {}

impl Hash for StaticSelectivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Estimation operator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// All nodes of the database bound to `variable`
    GetNodes { variable: String },

    /// Follows relationships of the given types from `base` to `target`
    Expand {
        base: String,
        direction: Direction,
        relationship: String,
        types: TypeSet,
        target: String,
    },

    /// Keeps the matches whose node carries `label`
    NodeLabelSelection { variable: String, label: LabelId },

    /// Keeps the matches whose node or relationship satisfies all predicates
    PropertySelection {
        variable: String,
        predicates: BTreeMap<PropertyId, PropertyPredicate>,
        static_selectivity: Option<StaticSelectivity>,
    },

    /// Restricts the types of a relationship variable
    RelationshipTypeSelection { variable: String, types: TypeSet },

    /// Combines two independent results on their shared node variables
    NodeJoin,

    /// Identifies `leaving` with `staying`, hierarchy-weighted
    MergeOn { staying: String, leaving: String },

    /// Identifies `leaving` with `staying`, partition-weighted
    SelfJoin { staying: String, leaving: String },
}

impl Operator {
    pub fn get_nodes(variable: &str) -> Self {
        Operator::GetNodes {
            variable: variable.to_string(),
        }
    }

    pub fn expand(base: &str, direction: Direction, relationship: &str, types: TypeSet, target: &str) -> Self {
        Operator::Expand {
            base: base.to_string(),
            direction,
            relationship: relationship.to_string(),
            types,
            target: target.to_string(),
        }
    }

    pub fn label_selection(variable: &str, label: LabelId) -> Self {
        Operator::NodeLabelSelection {
            variable: variable.to_string(),
            label,
        }
    }

    pub fn property_selection(
        variable: &str,
        predicates: BTreeMap<PropertyId, PropertyPredicate>,
        static_selectivity: Option<f64>,
    ) -> Self {
        Operator::PropertySelection {
            variable: variable.to_string(),
            predicates,
            static_selectivity: static_selectivity.map(StaticSelectivity),
        }
    }

    pub fn type_selection(variable: &str, types: TypeSet) -> Self {
        Operator::RelationshipTypeSelection {
            variable: variable.to_string(),
            types,
        }
    }

    pub fn merge_on(staying: &str, leaving: &str) -> Self {
        Operator::MergeOn {
            staying: staying.to_string(),
            leaving: leaving.to_string(),
        }
    }

    pub fn self_join(staying: &str, leaving: &str) -> Self {
        Operator::SelfJoin {
            staying: staying.to_string(),
            leaving: leaving.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::GetNodes { .. } => "GetNodes",
            Operator::Expand { .. } => "Expand",
            Operator::NodeLabelSelection { .. } => "NodeLabelSelection",
            Operator::PropertySelection { .. } => "PropertySelection",
            Operator::RelationshipTypeSelection { .. } => "RelationshipTypeSelection",
            Operator::NodeJoin => "NodeJoin",
            Operator::MergeOn { .. } => "MergeOn",
            Operator::SelfJoin { .. } => "SelfJoin",
        }
    }

    /// Number of inputs the operator consumes
    pub fn arity(&self) -> usize {
        match self {
            Operator::GetNodes { .. } => 0,
            Operator::NodeJoin => 2,
            _ => 1,
        }
    }

    /// Properties of the operator's output for the given inputs
    pub fn compute(&self, db: &DbProperties, inputs: &[&ResultProperties]) -> EstimatorResult<ResultProperties> {
        if inputs.len() != self.arity() {
            return Err(EstimatorError::arity(self.name(), self.arity(), inputs.len()));
        }
        match (self, inputs) {
            (Operator::GetNodes { variable }, []) => get_nodes::compute(db, variable),
            (
                Operator::Expand {
                    base,
                    direction,
                    relationship,
                    types,
                    target,
                },
                [input],
            ) => expand::compute(db, base, *direction, relationship, types, target, input),
            (Operator::NodeLabelSelection { variable, label }, [input]) => {
                label_selection::compute(db, variable, *label, input)
            }
            (
                Operator::PropertySelection {
                    variable,
                    predicates,
                    static_selectivity,
                },
                [input],
            ) => property_selection::compute(
                db,
                variable,
                predicates,
                static_selectivity.map(|s| s.0),
                input,
            ),
            (Operator::RelationshipTypeSelection { variable, types }, [input]) => {
                type_selection::compute(db, variable, types, input)
            }
            (Operator::NodeJoin, [left, right]) => node_join::compute(db, left, right),
            (Operator::MergeOn { staying, leaving }, [input]) => merge_on::compute(db, staying, leaving, input),
            (Operator::SelfJoin { staying, leaving }, [input]) => self_join::compute(db, staying, leaving, input),
            _ => Err(EstimatorError::arity(self.name(), self.arity(), inputs.len())),
        }
    }
}

fn format_types(types: &TypeSet) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::GetNodes { variable } => write!(f, "GetNodes_{{{}}}", variable),
            Operator::Expand {
                base,
                direction,
                relationship,
                types,
                target,
            } => {
                let left = if *direction == Direction::Incoming { "<-" } else { "-" };
                let right = if *direction == Direction::Outgoing { "->" } else { "-" };
                write!(f, "Expand_{{{}}}{}[{}", base, left, relationship)?;
                if !types.contains(&ANY_TYPE) {
                    write!(f, ":{}", format_types(types))?;
                }
                write!(f, "]{}{{{}}}", right, target)
            }
            Operator::NodeLabelSelection { variable, label } => {
                write!(f, "Label_{{{}}}:{}", variable, label)
            }
            Operator::PropertySelection {
                variable,
                predicates,
                static_selectivity,
            } => {
                let conditions: Vec<String> = predicates
                    .iter()
                    .map(|(prop, pred)| format!("{}{}", prop, pred))
                    .collect();
                write!(f, "Property_{{{}}}[{}]", variable, conditions.join(", "))?;
                if let Some(s) = static_selectivity {
                    write!(f, "~{}", s.0)?;
                }
                Ok(())
            }
            Operator::RelationshipTypeSelection { variable, types } => {
                write!(f, "Type_{{{}}}:{}", variable, format_types(types))
            }
            Operator::NodeJoin => write!(f, "NodeJoin"),
            Operator::MergeOn { staying, leaving } => {
                write!(f, "MergeOn_{{{}}}<-{{{}}}", staying, leaving)
            }
            Operator::SelfJoin { staying, leaving } => {
                write!(f, "SelfJoin_{{{}}}<-{{{}}}", staying, leaving)
            }
        }
    }
}
