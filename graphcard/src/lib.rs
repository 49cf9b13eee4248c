// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphCard - Cardinality estimation for graph patterns
//!
//! GraphCard estimates how many subgraphs of a labelled property graph match a
//! pattern, using precomputed statistics instead of the graph itself.
//!
//! # Features
//!
//! - **Label Hierarchies**: Overlap groups and sub-label relations between node labels
//! - **Operator Algebra**: Estimates propagate through an explainable operator tree
//! - **Property Predicates**: Equality and range selectivities from frequent values and histograms
//! - **Cycle Handling**: Two selectable strategies for patterns with cycles
//! - **Statistics Files**: Reader for the tab-separated statistics format
//!
//! # Usage
//!
//! ```rust,ignore
//! use graphcard::{CardinalityEstimator, EstimatorConfig, Query};
//!
//! let estimator = CardinalityEstimator::from_files(
//!     "stats.txt",
//!     Some("labels/"),
//!     EstimatorConfig::default(),
//! )?;
//! let query = Query::parse("(a:Person)-[:KNOWS]->(b:Person)", Some("`a`.`name`=\"Alice\""))?;
//! println!("{}", estimator.estimate(&query)?);
//! ```

pub mod algebra;
pub mod config;
pub mod error;
pub mod estimator;
pub mod labels;
pub mod plan;
pub mod query;
pub mod stats;

pub use algebra::{DbProperties, Expression, Operator, ResultProperties};
pub use config::EstimatorConfig;
pub use error::{EstimatorError, EstimatorResult};
pub use estimator::CardinalityEstimator;
pub use labels::{load_label_distribution, LabelDistribution, LabelDistributionVariant};
pub use plan::{JoinStrategy, PlanCompiler};
pub use query::{Pattern, PropertyPredicate, Query};
pub use stats::{
    read_statistics, Direction, GraphStatistics, GraphStatisticsView, StatisticsView, ANY_LABEL,
    ANY_TYPE,
};

/// GraphCard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GraphCard crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
