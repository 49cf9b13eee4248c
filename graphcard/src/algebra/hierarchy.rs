// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Label hierarchy walk
//!
//! Splits the probability mass of one or more label-fraction vectors over the
//! labels of the distribution. Groups are visited in canonical order; within a
//! group the caller decides the label order. A label already covered as the
//! sub-label of a visited label receives nothing. Whatever mass is left at the
//! end belongs to nodes without any known label restriction.

use std::collections::BTreeSet;

use super::db_properties::DbProperties;
use crate::stats::LabelId;

/// Visits every label that receives mass and returns the unattributed rest
///
/// `fraction(i, label)` is the fraction of vector `i`. The walk stops as soon
/// as any vector has no mass left. `visit(group, label, attributed)` receives
/// the mass attributed to `label` for each vector.
pub(crate) fn walk_hierarchy<const N: usize>(
    db: &DbProperties,
    sort_group: impl Fn(&BTreeSet<LabelId>) -> Vec<LabelId>,
    fraction: impl Fn(usize, LabelId) -> f64,
    mut visit: impl FnMut(usize, LabelId, [f64; N]),
) -> [f64; N] {
    let distribution = db.distribution();
    let exhausted = |remaining: &[f64; N]| remaining.iter().any(|&r| r <= 0.0);

    let mut remaining = [1.0_f64; N];
    for (group_idx, group) in distribution.groups().iter().enumerate() {
        if exhausted(&remaining) {
            break;
        }
        let already_excluded = remaining.map(|r| 1.0 - r);
        let mut super_labels: BTreeSet<LabelId> = BTreeSet::new();
        let mut covered: BTreeSet<LabelId> = BTreeSet::new();

        for label in sort_group(group) {
            if exhausted(&remaining) {
                break;
            }
            let subs = distribution.sublabels(label);
            if !covered.contains(&label) {
                super_labels.retain(|s| !subs.contains(s));
                super_labels.insert(label);

                let mut attributed = [0.0; N];
                for (i, rem) in remaining.iter_mut().enumerate() {
                    let not_covered: f64 = super_labels
                        .iter()
                        .map(|&s| 1.0 - fraction(i, s))
                        .product();
                    let next = rem.min((not_covered - already_excluded[i]).max(0.0));
                    attributed[i] = *rem - next;
                    *rem = next;
                }
                visit(group_idx, label, attributed);
            }
            covered.extend(subs.iter().copied());
        }
    }
    remaining
}
