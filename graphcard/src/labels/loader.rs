// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Loads a [`LabelDistribution`] from CSV files
//!
//! Two files are read from a directory:
//! - `sublabelMap.csv` with header `label,subLabel`
//! - `labelPartition.csv` with header `groupId,label`
//!
//! Label names are resolved through the statistics.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LabelDistribution;
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::{LabelId, StatisticsView};

pub const SUBLABEL_FILE: &str = "sublabelMap.csv";
pub const PARTITION_FILE: &str = "labelPartition.csv";

/// Which parts of the configured distribution to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDistributionVariant {
    /// Partition and sub-labels
    #[default]
    All,
    /// Sub-labels only, every label in one group
    OnlySublabels,
    /// Partition only, no sub-labels
    OnlyPartition,
    /// One group, no sub-labels
    None,
}

impl LabelDistributionVariant {
    fn uses_sublabels(self) -> bool {
        matches!(self, Self::All | Self::OnlySublabels)
    }

    fn uses_partition(self) -> bool {
        matches!(self, Self::All | Self::OnlyPartition)
    }
}

impl FromStr for LabelDistributionVariant {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "only_sublabels" => Ok(Self::OnlySublabels),
            "only_partition" => Ok(Self::OnlyPartition),
            "none" => Ok(Self::None),
            other => Err(EstimatorError::config(format!(
                "unknown label distribution variant '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for LabelDistributionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::OnlySublabels => "only_sublabels",
            Self::OnlyPartition => "only_partition",
            Self::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// Reads the distribution files in `dir` according to `variant`
///
/// Parts excluded by the variant are not read; their defaults are "no
/// sub-labels" and "a single group holding every label".
pub fn load_label_distribution<P: AsRef<Path>>(
    dir: P,
    variant: LabelDistributionVariant,
    stats: &dyn StatisticsView,
) -> EstimatorResult<LabelDistribution> {
    let dir = dir.as_ref();
    let sublabels = if variant.uses_sublabels() {
        read_sublabels(&dir.join(SUBLABEL_FILE), stats)?
    } else {
        HashMap::new()
    };
    let groups = if variant.uses_partition() {
        read_partition(&dir.join(PARTITION_FILE), stats)?
    } else {
        vec![stats.label_ids().into_iter().collect()]
    };
    log::debug!(
        "Loaded label distribution ({}): {} groups, {} labels with sub-labels",
        variant,
        groups.len(),
        sublabels.len()
    );
    LabelDistribution::new(groups, sublabels)
}

fn open_csv(path: &Path, header: [&str; 2]) -> EstimatorResult<csv::Reader<std::fs::File>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let found = reader.headers()?;
    if found.len() != 2 || found.get(0) != Some(header[0]) || found.get(1) != Some(header[1]) {
        return Err(EstimatorError::config(format!(
            "{}: wrong header, should be '{},{}'",
            path.display(),
            header[0],
            header[1]
        )));
    }
    Ok(reader)
}

fn read_sublabels(
    path: &Path,
    stats: &dyn StatisticsView,
) -> EstimatorResult<HashMap<LabelId, BTreeSet<LabelId>>> {
    let mut reader = open_csv(path, ["label", "subLabel"])?;
    let mut sublabels: HashMap<LabelId, BTreeSet<LabelId>> = HashMap::new();
    let mut unknown = BTreeSet::new();

    for record in reader.records() {
        let record = record?;
        let (Some(label), Some(sub)) = (record.get(0), record.get(1)) else {
            return Err(EstimatorError::config(format!(
                "{}: expected two columns",
                path.display()
            )));
        };
        match (stats.label_id(label), stats.label_id(sub)) {
            (Some(label_id), Some(sub_id)) => {
                sublabels.entry(label_id).or_default().insert(sub_id);
            }
            (label_id, sub_id) => {
                if label_id.is_none() {
                    unknown.insert(label.to_string());
                }
                if sub_id.is_none() {
                    unknown.insert(sub.to_string());
                }
            }
        }
    }

    if !unknown.is_empty() {
        return Err(EstimatorError::UnknownLabel(
            unknown.into_iter().collect::<Vec<_>>().join(", "),
        ));
    }
    Ok(sublabels)
}

fn read_partition(path: &Path, stats: &dyn StatisticsView) -> EstimatorResult<Vec<BTreeSet<LabelId>>> {
    let mut reader = open_csv(path, ["groupId", "label"])?;
    let mut groups: BTreeMap<i64, BTreeSet<LabelId>> = BTreeMap::new();

    for record in reader.records() {
        let record = record?;
        let (Some(group), Some(label)) = (record.get(0), record.get(1)) else {
            return Err(EstimatorError::config(format!(
                "{}: expected two columns",
                path.display()
            )));
        };
        let group: i64 = group
            .parse()
            .map_err(|_| EstimatorError::config(format!("invalid group id '{}'", group)))?;
        let label_id = stats
            .label_id(label)
            .ok_or_else(|| EstimatorError::UnknownLabel(label.to_string()))?;
        groups.entry(group).or_default().insert(label_id);
    }
    Ok(groups.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing() {
        assert_eq!(
            "only-sublabels".parse::<LabelDistributionVariant>().unwrap(),
            LabelDistributionVariant::OnlySublabels
        );
        assert_eq!(
            "ALL".parse::<LabelDistributionVariant>().unwrap(),
            LabelDistributionVariant::All
        );
        assert!("partial".parse::<LabelDistributionVariant>().is_err());
        assert_eq!(LabelDistributionVariant::OnlyPartition.to_string(), "only_partition");
    }

    #[test]
    fn test_variant_parts() {
        assert!(LabelDistributionVariant::All.uses_sublabels());
        assert!(LabelDistributionVariant::All.uses_partition());
        assert!(!LabelDistributionVariant::OnlySublabels.uses_partition());
        assert!(!LabelDistributionVariant::None.uses_sublabels());
    }
}
