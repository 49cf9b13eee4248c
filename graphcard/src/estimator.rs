// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Estimator entry point

use std::path::Path;
use std::sync::Arc;

use crate::algebra::{DbProperties, Expression};
use crate::config::EstimatorConfig;
use crate::error::EstimatorResult;
use crate::labels::{load_label_distribution, LabelDistribution};
use crate::plan::PlanCompiler;
use crate::query::{Pattern, Query};
use crate::stats::{read_statistics, GraphStatistics, GraphStatisticsView, StatisticsView};

/// Estimates the number of matches of graph patterns
///
/// Holds the statistics and label distribution behind `Arc`s; estimates are
/// independent of each other and may run from several threads.
#[derive(Debug, Clone)]
pub struct CardinalityEstimator {
    statistics: Arc<GraphStatistics>,
    db: DbProperties,
    config: EstimatorConfig,
}

impl CardinalityEstimator {
    /// Creates an estimator; without a distribution all labels share one group
    pub fn new(
        statistics: Arc<GraphStatistics>,
        distribution: Option<LabelDistribution>,
        config: EstimatorConfig,
    ) -> EstimatorResult<Self> {
        config.validate()?;
        let view = GraphStatisticsView::new(Arc::clone(&statistics)).with_neo4j_simulation(config.simulate_neo4j);
        let distribution =
            distribution.unwrap_or_else(|| LabelDistribution::single_group(view.label_ids()));
        log::debug!(
            "Estimator ready: {} labels in {} group(s), join strategy {}",
            distribution.labels().len(),
            distribution.groups().len(),
            config.join_strategy
        );
        Ok(Self {
            statistics,
            db: DbProperties::new(Arc::new(view), Arc::new(distribution)),
            config,
        })
    }

    /// Reads a statistics file and, if given, the label distribution
    /// directory selected by the configured variant
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        statistics_path: P,
        labels_dir: Option<Q>,
        config: EstimatorConfig,
    ) -> EstimatorResult<Self> {
        let statistics = Arc::new(read_statistics(statistics_path)?);
        let distribution = match labels_dir {
            Some(dir) => {
                let view = GraphStatisticsView::new(Arc::clone(&statistics));
                Some(load_label_distribution(dir, config.label_variant, &view)?)
            }
            None => None,
        };
        Self::new(statistics, distribution, config)
    }

    pub fn statistics(&self) -> &GraphStatistics {
        &self.statistics
    }

    pub fn db(&self) -> &DbProperties {
        &self.db
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Compiles and evaluates the operator tree of `query`
    pub fn plan(&self, query: &Query) -> EstimatorResult<Expression> {
        PlanCompiler::new(&self.db, self.config.join_strategy, self.config.static_selectivity).compile(query)
    }

    /// Estimated number of matches of `query`
    pub fn estimate(&self, query: &Query) -> EstimatorResult<f64> {
        let plan = self.plan(query)?;
        log::debug!("Estimated {} for {}", plan.size(), query);
        Ok(plan.size())
    }

    pub fn estimate_pattern(&self, pattern: &Pattern) -> EstimatorResult<f64> {
        self.estimate(&Query::new(pattern.clone()))
    }

    /// Estimates for every connected sub-query with `k` node variables
    pub fn estimate_sub_queries(&self, query: &Query, k: usize) -> EstimatorResult<Vec<(Query, f64)>> {
        query
            .sub_queries(k)
            .into_iter()
            .map(|sub| {
                let estimate = self.estimate(&sub)?;
                Ok((sub, estimate))
            })
            .collect()
    }
}
