// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph pattern model
//!
//! A pattern is a set of node variables, each with the labels its matches must
//! carry, and a list of relationships between them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EstimatorResult;
use crate::stats::Direction;

/// Node variable with its required labels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeVariable {
    pub name: String,
    #[serde(default)]
    pub labels: BTreeSet<String>,
}

/// Relationship between two node variables
///
/// Undirected relationships keep their endpoints in pattern order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "type")]
    pub rel_type: Option<String>,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

fn default_directed() -> bool {
    true
}

impl Relationship {
    pub fn new(source: &str, target: &str, rel_type: Option<&str>, directed: bool) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            rel_type: rel_type.map(str::to_string),
            directed,
        }
    }

    /// Unique name derived from the endpoints
    ///
    /// Underscores in variable names are doubled so that the single `_`
    /// separator stays unambiguous.
    pub fn name(&self) -> String {
        format!(
            "{}_{}",
            self.source.replace('_', "__"),
            self.target.replace('_', "__")
        )
    }

    /// Same relationship pointing to a different target
    pub fn redirect(&self, target: &str) -> Self {
        Self {
            target: target.to_string(),
            ..self.clone()
        }
    }

    pub fn touches(&self, variable: &str) -> bool {
        self.source == variable || self.target == variable
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})-", self.source)?;
        if let Some(t) = &self.rel_type {
            write!(f, "[:{}]", t)?;
        }
        write!(f, "{}({})", if self.directed { "->" } else { "-" }, self.target)
    }
}

/// Graph pattern: node variables in insertion order plus relationships
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default)]
    nodes: Vec<NodeVariable>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<NodeVariable>, relationships: Vec<Relationship>) -> Self {
        Self {
            nodes,
            relationships,
        }
    }

    /// Parses `(a:Label)-[:TYPE]->(b), (c)` style text
    pub fn from_cypher(input: &str) -> EstimatorResult<Self> {
        super::parser::parse_pattern(input)
    }

    /// Adds a node variable or extends the labels of an existing one
    pub fn node(&mut self, name: &str, labels: &[&str]) -> &mut Self {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => {
                self.nodes.push(NodeVariable {
                    name: name.to_string(),
                    labels: BTreeSet::new(),
                });
                self.nodes.len() - 1
            }
        };
        self.nodes[idx]
            .labels
            .extend(labels.iter().map(|l| l.to_string()));
        self
    }

    /// Adds a relationship seen from `from`, registering both endpoints
    ///
    /// Returns the relationship name predicates are keyed by.
    pub fn relationship(&mut self, from: &str, rel_type: Option<&str>, direction: Direction, to: &str) -> String {
        self.node(from, &[]);
        self.node(to, &[]);
        let rel = match direction {
            Direction::Both => Relationship::new(from, to, rel_type, false),
            Direction::Incoming => Relationship::new(to, from, rel_type, true),
            Direction::Outgoing => Relationship::new(from, to, rel_type, true),
        };
        let name = rel.name();
        self.relationships.push(rel);
        name
    }

    pub fn nodes(&self) -> &[NodeVariable] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn labels(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.nodes.iter().find(|n| n.name == name).map(|n| &n.labels)
    }

    pub fn num_node_vars(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_relationships(&self) -> usize {
        self.relationships.len()
    }

    pub fn num_node_labels(&self) -> usize {
        self.nodes.iter().map(|n| n.labels.len()).sum()
    }

    pub fn num_typed_relationships(&self) -> usize {
        self.relationships
            .iter()
            .filter(|r| r.rel_type.is_some())
            .count()
    }

    pub fn num_directed(&self) -> usize {
        self.relationships.iter().filter(|r| r.directed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for node in &self.nodes {
            let in_relationship = self.relationships.iter().any(|r| r.touches(&node.name));
            if !node.labels.is_empty() || !in_relationship {
                let labels: String = node.labels.iter().map(|l| format!(":{}", l)).collect();
                parts.push(format!("({}{})", node.name, labels));
            }
        }
        parts.extend(self.relationships.iter().map(|r| r.to_string()));
        write!(f, "{}", parts.join(", "))
    }
}
