// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Label distribution
//!
//! Describes how node labels overlap. Labels are partitioned into groups of
//! labels that may occur together on one node; labels from different groups
//! never do. Within a group, known sub-label relations (every `B` node is
//! also an `A` node) sharpen the estimates.

pub mod loader;

use std::collections::{BTreeSet, HashMap};

use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::LabelId;

pub use loader::{load_label_distribution, LabelDistributionVariant};

static NO_LABELS: BTreeSet<LabelId> = BTreeSet::new();

/// Partition of the label space plus the sub-label relation
#[derive(Debug, Clone, PartialEq)]
pub struct LabelDistribution {
    /// Disjoint groups, ordered by their smallest label
    groups: Vec<BTreeSet<LabelId>>,
    group_of: HashMap<LabelId, usize>,
    /// Transitively closed: label -> all of its sub-labels
    sublabels: HashMap<LabelId, BTreeSet<LabelId>>,
    labels: BTreeSet<LabelId>,
}

impl LabelDistribution {
    /// Builds a distribution from overlap groups and direct sub-label edges
    ///
    /// Fails when two groups share a label.
    pub fn new(
        groups: impl IntoIterator<Item = BTreeSet<LabelId>>,
        sublabels: HashMap<LabelId, BTreeSet<LabelId>>,
    ) -> EstimatorResult<Self> {
        let mut groups: Vec<BTreeSet<LabelId>> =
            groups.into_iter().filter(|g| !g.is_empty()).collect();
        groups.sort_by_key(|g| g.iter().next().copied());

        let mut group_of = HashMap::new();
        for (idx, group) in groups.iter().enumerate() {
            for &label in group {
                if let Some(other) = group_of.insert(label, idx) {
                    return Err(EstimatorError::label_distribution(format!(
                        "label {} appears in groups {} and {}",
                        label, other, idx
                    )));
                }
            }
        }
        let labels = group_of.keys().copied().collect();

        let sublabels = transitive_closure(sublabels);
        for (label, subs) in &sublabels {
            for sub in subs {
                if group_of.get(label) != group_of.get(sub) {
                    log::warn!(
                        "Sub-label {} of {} lies in a different overlap group",
                        sub,
                        label
                    );
                }
            }
        }

        Ok(Self {
            groups,
            group_of,
            sublabels,
            labels,
        })
    }

    /// All labels in one group, no sub-label knowledge
    pub fn single_group(labels: impl IntoIterator<Item = LabelId>) -> Self {
        let group: BTreeSet<LabelId> = labels.into_iter().collect();
        let group_of = group.iter().map(|&l| (l, 0)).collect();
        Self {
            labels: group.clone(),
            groups: if group.is_empty() { Vec::new() } else { vec![group] },
            group_of,
            sublabels: HashMap::new(),
        }
    }

    /// Every label in its own group: labels never co-occur
    pub fn disjoint(labels: impl IntoIterator<Item = LabelId>) -> Self {
        let labels: BTreeSet<LabelId> = labels.into_iter().collect();
        Self {
            groups: labels.iter().map(|&l| BTreeSet::from([l])).collect(),
            group_of: labels.iter().enumerate().map(|(i, &l)| (l, i)).collect(),
            sublabels: HashMap::new(),
            labels,
        }
    }

    pub fn groups(&self) -> &[BTreeSet<LabelId>] {
        &self.groups
    }

    /// Index of the group containing `label`
    pub fn group_of(&self, label: LabelId) -> Option<usize> {
        self.group_of.get(&label).copied()
    }

    /// Sub-labels of `label`, direct and transitive
    pub fn sublabels(&self, label: LabelId) -> &BTreeSet<LabelId> {
        self.sublabels.get(&label).unwrap_or(&NO_LABELS)
    }

    pub fn is_sublabel(&self, sub: LabelId, of: LabelId) -> bool {
        self.sublabels(of).contains(&sub)
    }

    /// Union of all groups
    pub fn labels(&self) -> &BTreeSet<LabelId> {
        &self.labels
    }
}

fn transitive_closure(
    mut sublabels: HashMap<LabelId, BTreeSet<LabelId>>,
) -> HashMap<LabelId, BTreeSet<LabelId>> {
    loop {
        let mut changed = false;
        let keys: Vec<LabelId> = sublabels.keys().copied().collect();
        for label in keys {
            let direct: Vec<LabelId> = sublabels[&label].iter().copied().collect();
            let mut extended: BTreeSet<LabelId> = sublabels[&label].clone();
            for sub in direct {
                if let Some(nested) = sublabels.get(&sub) {
                    extended.extend(nested.iter().copied());
                }
            }
            extended.remove(&label);
            if extended != sublabels[&label] {
                sublabels.insert(label, extended);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    sublabels.retain(|_, subs| !subs.is_empty());
    sublabels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_sorted_and_indexed() {
        let dist = LabelDistribution::new(
            vec![BTreeSet::from([3, 4]), BTreeSet::from([0, 2]), BTreeSet::from([1])],
            HashMap::new(),
        )
        .unwrap();
        assert_eq!(dist.groups()[0], BTreeSet::from([0, 2]));
        assert_eq!(dist.group_of(4), Some(2));
        assert_eq!(dist.group_of(9), None);
        assert_eq!(dist.labels().len(), 5);
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let err = LabelDistribution::new(
            vec![BTreeSet::from([0, 1]), BTreeSet::from([1, 2])],
            HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidLabelDistribution(_)));
    }

    #[test]
    fn test_sublabels_closed_transitively() {
        let mut subs = HashMap::new();
        subs.insert(0, BTreeSet::from([1]));
        subs.insert(1, BTreeSet::from([2]));
        let dist = LabelDistribution::new(vec![BTreeSet::from([0, 1, 2])], subs).unwrap();
        assert_eq!(dist.sublabels(0), &BTreeSet::from([1, 2]));
        assert!(dist.is_sublabel(2, 0));
        assert!(!dist.is_sublabel(0, 2));
        assert!(dist.sublabels(2).is_empty());
    }

    #[test]
    fn test_single_group_and_disjoint() {
        let single = LabelDistribution::single_group(0..3);
        assert_eq!(single.groups().len(), 1);
        let disjoint = LabelDistribution::disjoint(0..3);
        assert_eq!(disjoint.groups().len(), 3);
        assert_eq!(disjoint.group_of(2), Some(2));
        assert!(LabelDistribution::single_group(Vec::new()).groups().is_empty());
    }
}
