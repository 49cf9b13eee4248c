// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Database context shared by all operators

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::labels::LabelDistribution;
use crate::stats::{Direction, LabelId, StatisticsView, TypeId, ANY_LABEL};

/// Statistics plus label distribution, passed explicitly to every operator
#[derive(Clone)]
pub struct DbProperties {
    view: Arc<dyn StatisticsView>,
    distribution: Arc<LabelDistribution>,
}

impl DbProperties {
    pub fn new(view: Arc<dyn StatisticsView>, distribution: Arc<LabelDistribution>) -> Self {
        Self { view, distribution }
    }

    pub fn view(&self) -> &dyn StatisticsView {
        self.view.as_ref()
    }

    pub fn distribution(&self) -> &LabelDistribution {
        &self.distribution
    }

    /// All labels of the distribution in ascending order
    pub fn labels(&self) -> &BTreeSet<LabelId> {
        self.distribution.labels()
    }

    pub fn nodes(&self, label: LabelId) -> f64 {
        self.view.nodes(label)
    }

    pub fn total_nodes(&self) -> f64 {
        self.view.nodes(ANY_LABEL)
    }

    /// Relationships of any of `types`, summed per type
    pub fn relationships(
        &self,
        base: LabelId,
        types: &BTreeSet<TypeId>,
        target: LabelId,
        direction: Direction,
    ) -> f64 {
        types
            .iter()
            .map(|&t| self.view.relationships(base, t, target, direction))
            .sum()
    }

    /// Relationships per `base` node, 0 when there are no such nodes
    pub fn average_degree(
        &self,
        base: LabelId,
        types: &BTreeSet<TypeId>,
        target: LabelId,
        direction: Direction,
    ) -> f64 {
        let nodes = self.nodes(base);
        if nodes <= 0.0 {
            return 0.0;
        }
        self.relationships(base, types, target, direction) / nodes
    }

    /// Fraction mass per node of `label`, 0 for empty labels
    pub(crate) fn density(&self, fraction: f64, label: LabelId) -> f64 {
        let nodes = self.nodes(label);
        if nodes > 0.0 {
            fraction / nodes
        } else {
            0.0
        }
    }
}

impl fmt::Debug for DbProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbProperties")
            .field("nodes", &self.total_nodes())
            .field("distribution", &self.distribution)
            .finish()
    }
}
