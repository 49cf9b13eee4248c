// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pattern to operator tree compilation
//!
//! Each weakly connected component of the pattern becomes a chain of
//! operators: a `GetNodes` leaf on the node with the most relationships, then
//! a breadth-first sequence of `Expand`s over the component's relationships.
//! Relationships closing a cycle are expanded to a fresh variable that is
//! merged back into the bound endpoint. Components are joined left to right.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::unionfind::UnionFind;

use super::JoinStrategy;
use crate::algebra::{DbProperties, Expression, Operator, TypeSet};
use crate::error::{EstimatorError, EstimatorResult};
use crate::query::{Predicates, PropertyPredicate, Query, Relationship};
use crate::stats::{Direction, PropertyId, ANY_TYPE};

/// Compiles queries against one database
pub struct PlanCompiler<'a> {
    db: &'a DbProperties,
    strategy: JoinStrategy,
    static_selectivity: Option<f64>,
}

/// Fresh variable names for one compilation
#[derive(Default)]
struct VariableNames {
    next: usize,
}

impl VariableNames {
    fn relationship(&mut self) -> String {
        self.fresh("$e")
    }

    fn temporary(&mut self) -> String {
        self.fresh("$v")
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.next);
        self.next += 1;
        name
    }
}

impl<'a> PlanCompiler<'a> {
    pub fn new(db: &'a DbProperties, strategy: JoinStrategy, static_selectivity: Option<f64>) -> Self {
        Self {
            db,
            strategy,
            static_selectivity,
        }
    }

    /// Builds and evaluates the operator tree for `query`
    pub fn compile(&self, query: &Query) -> EstimatorResult<Expression> {
        let pattern = query.pattern();
        if pattern.is_empty() {
            return Err(EstimatorError::pattern("empty pattern"));
        }

        let mut union_find = UnionFind::<usize>::new(pattern.num_node_vars());
        for rel in pattern.relationships() {
            let (source, target) = self.endpoints(query, rel)?;
            union_find.union(source, target);
        }

        // components in order of their first node variable
        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut component_of: BTreeMap<usize, usize> = BTreeMap::new();
        for position in 0..pattern.num_node_vars() {
            let root = union_find.find(position);
            let idx = *component_of.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[idx].push(position);
        }
        log::debug!(
            "Compiling {} with {} component(s)",
            pattern,
            components.len()
        );

        let mut names = VariableNames::default();
        let mut plan: Option<Expression> = None;
        for component in &components {
            let expr = self.compile_component(query, component, &mut names)?;
            plan = Some(match plan {
                None => expr,
                Some(left) => Expression::new(Operator::NodeJoin, vec![left, expr], self.db)?,
            });
        }
        plan.ok_or_else(|| EstimatorError::pattern("empty pattern"))
    }

    fn endpoints(&self, query: &Query, rel: &Relationship) -> EstimatorResult<(usize, usize)> {
        let pattern = query.pattern();
        let position = |name: &str| {
            pattern.position(name).ok_or_else(|| {
                EstimatorError::pattern(format!("relationship {} uses unknown node variable '{}'", rel, name))
            })
        };
        Ok((position(&rel.source)?, position(&rel.target)?))
    }

    fn compile_component(
        &self,
        query: &Query,
        component: &[usize],
        names: &mut VariableNames,
    ) -> EstimatorResult<Expression> {
        let pattern = query.pattern();
        let nodes = pattern.nodes();
        let members: BTreeSet<&str> = component.iter().map(|&i| nodes[i].name.as_str()).collect();
        let relationships: Vec<&Relationship> = pattern
            .relationships()
            .iter()
            .filter(|r| members.contains(r.source.as_str()))
            .collect();

        let mut start = component[0];
        let mut most_incident = 0;
        for &position in component {
            let incident = relationships
                .iter()
                .filter(|r| r.touches(&nodes[position].name))
                .count();
            if incident > most_incident {
                start = position;
                most_incident = incident;
            }
        }
        let start = nodes[start].name.as_str();
        log::debug!("Starting component at '{}'", start);

        let mut expr = Expression::leaf(Operator::get_nodes(start), self.db)?;
        expr = self.select_node(expr, query, start)?;

        let mut seen: BTreeSet<&str> = BTreeSet::from([start]);
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut pending: BTreeSet<usize> = BTreeSet::new();
        for (idx, rel) in relationships.iter().enumerate() {
            if rel.touches(start) {
                queue.push_back(idx);
            } else {
                pending.insert(idx);
            }
        }

        let mut deferred: Vec<usize> = Vec::new();
        while let Some(idx) = queue.pop_front() {
            let rel = relationships[idx];
            let source_seen = seen.contains(rel.source.as_str());
            let target_seen = seen.contains(rel.target.as_str());
            if source_seen && target_seen {
                deferred.push(idx);
                continue;
            }

            let (from, to, direction) = match (source_seen, rel.directed) {
                (true, true) => (&rel.source, &rel.target, Direction::Outgoing),
                (true, false) => (&rel.source, &rel.target, Direction::Both),
                (false, true) => (&rel.target, &rel.source, Direction::Incoming),
                (false, false) => (&rel.target, &rel.source, Direction::Both),
            };
            let rel_var = names.relationship();
            log::debug!("Expanding {} as {} from '{}'", rel, rel_var, from);
            expr = expr.apply(
                Operator::expand(from, direction, &rel_var, self.types(rel)?, to),
                self.db,
            )?;
            expr = self.select_relationship(expr, query, rel, &rel_var)?;
            expr = self.select_node(expr, query, to)?;
            seen.insert(to.as_str());

            let reached: Vec<usize> = pending
                .iter()
                .copied()
                .filter(|&j| relationships[j].touches(to))
                .collect();
            for j in reached {
                pending.remove(&j);
                queue.push_back(j);
            }
        }

        for idx in deferred {
            let rel = relationships[idx];
            let temporary = names.temporary();
            let rel_var = names.relationship();
            let direction = if rel.directed {
                Direction::Outgoing
            } else {
                Direction::Both
            };
            log::debug!(
                "Closing cycle with {} via '{}' ({})",
                rel,
                temporary,
                self.strategy
            );
            expr = expr.apply(
                Operator::expand(&rel.source, direction, &rel_var, self.types(rel)?, &temporary),
                self.db,
            )?;
            expr = self.select_relationship(expr, query, rel, &rel_var)?;
            let join = match self.strategy {
                JoinStrategy::MergeOn => Operator::merge_on(&rel.target, &temporary),
                JoinStrategy::SelfJoin => Operator::self_join(&rel.target, &temporary),
            };
            expr = expr.apply(join, self.db)?;
        }
        Ok(expr)
    }

    fn types(&self, rel: &Relationship) -> EstimatorResult<TypeSet> {
        match &rel.rel_type {
            Some(name) => self
                .db
                .view()
                .type_id(name)
                .map(|id| TypeSet::from([id]))
                .ok_or_else(|| EstimatorError::UnknownType(name.clone())),
            None => Ok(TypeSet::from([ANY_TYPE])),
        }
    }

    fn property_ids(&self, predicates: &Predicates) -> EstimatorResult<BTreeMap<PropertyId, PropertyPredicate>> {
        predicates
            .iter()
            .map(|(name, predicate)| {
                self.db
                    .view()
                    .property_id(name)
                    .map(|id| (id, predicate.clone()))
                    .ok_or_else(|| EstimatorError::UnknownProperty(name.clone()))
            })
            .collect()
    }

    /// Label selections in name order, then the node's predicates
    fn select_node(&self, mut expr: Expression, query: &Query, variable: &str) -> EstimatorResult<Expression> {
        if let Some(labels) = query.pattern().labels(variable) {
            for name in labels {
                let label = self
                    .db
                    .view()
                    .label_id(name)
                    .ok_or_else(|| EstimatorError::UnknownLabel(name.clone()))?;
                expr = expr.apply(Operator::label_selection(variable, label), self.db)?;
            }
        }
        if let Some(predicates) = query.node_predicates(variable) {
            let predicates = self.property_ids(predicates)?;
            expr = expr.apply(
                Operator::property_selection(variable, predicates, self.static_selectivity),
                self.db,
            )?;
        }
        Ok(expr)
    }

    fn select_relationship(
        &self,
        expr: Expression,
        query: &Query,
        rel: &Relationship,
        rel_var: &str,
    ) -> EstimatorResult<Expression> {
        match query.relationship_predicates(&rel.name()) {
            Some(predicates) => {
                let predicates = self.property_ids(predicates)?;
                expr.apply(
                    Operator::property_selection(rel_var, predicates, self.static_selectivity),
                    self.db,
                )
            }
            None => Ok(expr),
        }
    }
}
