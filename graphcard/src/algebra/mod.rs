// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Estimation algebra
//!
//! Operators propagate [`ResultProperties`] (per-variable label fractions,
//! relationship types and an estimated size) through an [`Expression`] tree.
//! Database statistics reach the operators through [`DbProperties`].

pub mod db_properties;
pub mod expression;
pub(crate) mod hierarchy;
pub mod operators;
pub mod result_properties;

pub use db_properties::DbProperties;
pub use expression::Expression;
pub use operators::{Operator, StaticSelectivity};
pub use result_properties::{LabelFractions, ResultProperties, TypeSet};
