// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pattern queries
//!
//! A [`Query`] is a graph [`Pattern`] plus property predicates on its node
//! variables and relationships. Relationship predicates are keyed by
//! [`Relationship::name`].

pub mod parser;
pub mod pattern;
pub mod predicate;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, EstimatorResult};

pub use parser::{parse_pattern, parse_properties, PropertyValue};
pub use pattern::{NodeVariable, Pattern, Relationship};
pub use predicate::PropertyPredicate;

/// Property name -> predicate
pub type Predicates = BTreeMap<String, PropertyPredicate>;

/// Pattern with property predicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pattern: Pattern,
    #[serde(default)]
    node_predicates: BTreeMap<String, Predicates>,
    #[serde(default)]
    relationship_predicates: BTreeMap<String, Predicates>,
}

impl Query {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            node_predicates: BTreeMap::new(),
            relationship_predicates: BTreeMap::new(),
        }
    }

    /// Parses a pattern and an optional property string
    ///
    /// Conditions on names that are node variables of the pattern become node
    /// predicates, all others relationship predicates.
    pub fn parse(pattern: &str, properties: Option<&str>) -> EstimatorResult<Self> {
        let mut query = Self::new(parse_pattern(pattern)?);
        let Some(properties) = properties else {
            return Ok(query);
        };
        for (var, props) in parse_properties(properties)? {
            for (prop, value) in props {
                let predicate = match value {
                    PropertyValue::Text(text) => PropertyPredicate::value(text),
                    PropertyValue::Number(n) => PropertyPredicate::equals_number(n)?,
                };
                if query.pattern.contains_node(&var) {
                    query.add_node_predicate(&var, &prop, predicate)?;
                } else {
                    query.add_relationship_predicate(&var, &prop, predicate)?;
                }
            }
        }
        Ok(query)
    }

    /// Adds a condition on a node variable, merging with an existing one
    pub fn add_node_predicate(&mut self, variable: &str, property: &str, predicate: PropertyPredicate) -> EstimatorResult<()> {
        if !self.pattern.contains_node(variable) {
            return Err(EstimatorError::VariableNotBound(variable.to_string()));
        }
        insert_merged(&mut self.node_predicates, variable, property, predicate)
    }

    /// Adds a condition on the relationship with the given name
    pub fn add_relationship_predicate(&mut self, name: &str, property: &str, predicate: PropertyPredicate) -> EstimatorResult<()> {
        if !self.pattern.relationships().iter().any(|r| r.name() == name) {
            return Err(EstimatorError::VariableNotBound(name.to_string()));
        }
        insert_merged(&mut self.relationship_predicates, name, property, predicate)
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn node_predicates(&self, variable: &str) -> Option<&Predicates> {
        self.node_predicates.get(variable).filter(|p| !p.is_empty())
    }

    pub fn relationship_predicates(&self, name: &str) -> Option<&Predicates> {
        self.relationship_predicates.get(name).filter(|p| !p.is_empty())
    }

    /// Number of conditions: relationships, node labels and predicates
    pub fn size(&self) -> usize {
        self.pattern.num_relationships()
            + self.pattern.num_node_labels()
            + self.node_predicates.values().map(BTreeMap::len).sum::<usize>()
            + self.relationship_predicates.values().map(BTreeMap::len).sum::<usize>()
    }

    /// All connected sub-queries with exactly `k` node variables
    ///
    /// Each sub-query keeps the relationships among its node variables and the
    /// predicates on retained variables and relationships. Results are ordered
    /// by the sorted names of their node variables.
    pub fn sub_queries(&self, k: usize) -> Vec<Query> {
        let mut names: Vec<&str> = self.pattern.nodes().iter().map(|n| n.name.as_str()).collect();
        names.sort_unstable();
        if k == 0 || k > names.len() {
            return Vec::new();
        }
        if k == names.len() {
            return vec![self.clone()];
        }

        let position = |name: &str| names.binary_search(&name).ok();
        let edges: Vec<(usize, usize)> = self
            .pattern
            .relationships()
            .iter()
            .filter_map(|r| Some((position(&r.source)?, position(&r.target)?)))
            .collect();

        let mut found: BTreeSet<BTreeSet<usize>> = BTreeSet::new();
        for start in 0..names.len() {
            let mut current = BTreeSet::from([start]);
            grow_connected(&edges, k, &mut current, &mut found);
        }

        found
            .into_iter()
            .map(|members| {
                let keep: BTreeSet<&str> = members.iter().map(|&i| names[i]).collect();
                self.restricted_to(&keep)
            })
            .collect()
    }

    fn restricted_to(&self, keep: &BTreeSet<&str>) -> Query {
        let nodes: Vec<NodeVariable> = self
            .pattern
            .nodes()
            .iter()
            .filter(|n| keep.contains(n.name.as_str()))
            .cloned()
            .collect();
        let relationships: Vec<Relationship> = self
            .pattern
            .relationships()
            .iter()
            .filter(|r| keep.contains(r.source.as_str()) && keep.contains(r.target.as_str()))
            .cloned()
            .collect();
        let rel_names: BTreeSet<String> = relationships.iter().map(Relationship::name).collect();

        Query {
            pattern: Pattern::from_parts(nodes, relationships),
            node_predicates: self
                .node_predicates
                .iter()
                .filter(|(v, _)| keep.contains(v.as_str()))
                .map(|(v, p)| (v.clone(), p.clone()))
                .collect(),
            relationship_predicates: self
                .relationship_predicates
                .iter()
                .filter(|(n, _)| rel_names.contains(*n))
                .map(|(n, p)| (n.clone(), p.clone()))
                .collect(),
        }
    }
}

fn insert_merged(
    target: &mut BTreeMap<String, Predicates>,
    owner: &str,
    property: &str,
    predicate: PropertyPredicate,
) -> EstimatorResult<()> {
    let predicates = target.entry(owner.to_string()).or_default();
    let merged = match predicates.get(property) {
        Some(existing) => existing.merge(&predicate)?,
        None => predicate,
    };
    predicates.insert(property.to_string(), merged);
    Ok(())
}

fn grow_connected(
    edges: &[(usize, usize)],
    k: usize,
    current: &mut BTreeSet<usize>,
    found: &mut BTreeSet<BTreeSet<usize>>,
) {
    if current.len() == k {
        found.insert(current.clone());
        return;
    }
    let neighbors: BTreeSet<usize> = edges
        .iter()
        .filter_map(|&(a, b)| match (current.contains(&a), current.contains(&b)) {
            (true, false) => Some(b),
            (false, true) => Some(a),
            _ => None,
        })
        .collect();
    for next in neighbors {
        current.insert(next);
        grow_connected(edges, k, current, found);
        current.remove(&next);
    }
}

impl From<Pattern> for Query {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MATCH {}", self.pattern)?;
        let conditions: Vec<String> = self
            .node_predicates
            .iter()
            .chain(self.relationship_predicates.iter())
            .flat_map(|(owner, preds)| {
                preds
                    .iter()
                    .map(move |(prop, pred)| format!("{}.{}{}", owner, prop, pred))
            })
            .collect();
        if !conditions.is_empty() {
            write!(f, " WHERE {}", conditions.join(" AND "))?;
        }
        Ok(())
    }
}
