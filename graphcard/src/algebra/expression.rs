// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Operator trees
//!
//! An [`Expression`] owns an operator, its input expressions and the result
//! properties computed when it was built. Trees are immutable; building one
//! evaluates it bottom-up.

use std::fmt;

use super::db_properties::DbProperties;
use super::operators::Operator;
use super::result_properties::ResultProperties;
use crate::error::{EstimatorError, EstimatorResult};

/// Evaluated operator tree
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    operator: Operator,
    children: Vec<Expression>,
    properties: ResultProperties,
}

impl Expression {
    /// Applies `operator` to the results of `children`
    pub fn new(operator: Operator, children: Vec<Expression>, db: &DbProperties) -> EstimatorResult<Self> {
        if children.len() != operator.arity() {
            return Err(EstimatorError::arity(
                operator.name(),
                operator.arity(),
                children.len(),
            ));
        }
        let inputs: Vec<&ResultProperties> = children.iter().map(|c| &c.properties).collect();
        let properties = operator.compute(db, &inputs)?;
        log::trace!("{} -> {}", operator, properties);
        Ok(Self {
            operator,
            children,
            properties,
        })
    }

    /// Leaf expression
    pub fn leaf(operator: Operator, db: &DbProperties) -> EstimatorResult<Self> {
        Self::new(operator, Vec::new(), db)
    }

    /// Unary expression on top of `self`
    pub fn apply(self, operator: Operator, db: &DbProperties) -> EstimatorResult<Self> {
        Self::new(operator, vec![self], db)
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn children(&self) -> &[Expression] {
        &self.children
    }

    pub fn properties(&self) -> &ResultProperties {
        &self.properties
    }

    /// Estimated cardinality of the tree
    pub fn size(&self) -> f64 {
        self.properties.size()
    }

    /// Number of operators in the tree
    pub fn num_operators(&self) -> usize {
        1 + self.children.iter().map(Expression::num_operators).sum::<usize>()
    }

    /// Pre-order traversal yielding `(depth, operator, properties)`
    pub fn walk(&self) -> Vec<(usize, &Operator, &ResultProperties)> {
        let mut out = Vec::with_capacity(self.num_operators());
        self.walk_into(0, &mut out);
        out
    }

    fn walk_into<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a Operator, &'a ResultProperties)>) {
        out.push((depth, &self.operator, &self.properties));
        for child in &self.children {
            child.walk_into(depth + 1, out);
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression[{}", self.operator)?;
        for child in &self.children {
            write!(f, ", {}", child)?;
        }
        write!(f, ", card={}]", self.size())
    }
}
