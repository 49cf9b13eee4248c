// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Textual pattern and property parsing
//!
//! Patterns use a Cypher-like syntax: comma-separated parts made of node
//! variables `(a:Label1:Label2)` and relationship chains
//! `(a)-[:TYPE]->(b)<-(c)`. Property strings list equality conditions as
//! `` `var`.`prop`="text", `var`.`prop`=4.5 ``.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::pattern::Pattern;
use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::Direction;

static PART_SEPARATOR: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"\s*,\s*"));

static NODE_VAR: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"\(([a-zA-Z0-9_]*)((?::[a-zA-Z0-9_]+)*)\)"));

static RELATIONSHIP: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| {
    Regex::new(concat!(
        r"\(([a-zA-Z0-9_]*)(?::[^\)]+)*\)",
        r"(<?-)(?:\[((?::[a-zA-Z0-9_]+)?)\])?(->?)",
        r"\(([a-zA-Z0-9_]*)(?::[^\)]+)*\)"
    ))
});

fn compiled(regex: &'static Lazy<Result<Regex, regex::Error>>) -> EstimatorResult<&'static Regex> {
    Lazy::force(regex).as_ref().map_err(|e| e.clone().into())
}

/// Parses a Cypher-like pattern
pub fn parse_pattern(input: &str) -> EstimatorResult<Pattern> {
    let separator = compiled(&PART_SEPARATOR)?;
    let node_var = compiled(&NODE_VAR)?;
    let relationship = compiled(&RELATIONSHIP)?;

    let mut pattern = Pattern::new();
    for part in separator.split(input.trim()) {
        for caps in node_var.captures_iter(part) {
            let var = &caps[1];
            if var.is_empty() {
                return Err(EstimatorError::pattern(format!(
                    "node without variable name in '{}'",
                    part
                )));
            }
            let labels: Vec<&str> = caps[2].split(':').filter(|l| !l.is_empty()).collect();
            pattern.node(var, &labels);
        }

        // chained relationships share their endpoints, so matching restarts
        // right after the start of the previous match
        let mut start = 0;
        while start < part.len() {
            let Some(caps) = relationship.captures(&part[start..]) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let left = &caps[1];
            let right = &caps[5];
            if left.is_empty() || right.is_empty() {
                return Err(EstimatorError::pattern(format!(
                    "relationship endpoint without variable name in '{}'",
                    part
                )));
            }
            let direction = if caps[2].starts_with('<') {
                Direction::Incoming
            } else if caps[4].ends_with('>') {
                Direction::Outgoing
            } else {
                Direction::Both
            };
            let rel_type = caps
                .get(3)
                .map(|m| m.as_str().trim_start_matches(':'))
                .filter(|t| !t.is_empty());
            pattern.relationship(left, rel_type, direction, right);
            start += whole.start() + 1;
        }
    }
    if pattern.is_empty() {
        return Err(EstimatorError::pattern(format!(
            "no node variables in '{}'",
            input
        )));
    }
    Ok(pattern)
}

/// Raw value of a property condition
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
}

/// Parses `` `var`.`prop`=value `` conditions separated by `, `
///
/// Returns variable -> property -> value. Strings are double-quoted with
/// `\"` and `\\` escapes; anything else must be a number.
pub fn parse_properties(input: &str) -> EstimatorResult<BTreeMap<String, BTreeMap<String, PropertyValue>>> {
    let mut props: BTreeMap<String, BTreeMap<String, PropertyValue>> = BTreeMap::new();
    let mut rest = input.trim();
    while !rest.is_empty() {
        let (var, after) = quoted_name(rest)?;
        let after = after
            .strip_prefix('.')
            .ok_or_else(|| EstimatorError::predicate(format!("expected '.' after `{}`", var)))?;
        let (prop, after) = quoted_name(after)?;
        let after = after
            .strip_prefix('=')
            .ok_or_else(|| EstimatorError::predicate(format!("expected '=' after `{}`", prop)))?;

        let (value, after) = if let Some(quoted) = after.strip_prefix('"') {
            let (text, after) = quoted_string(quoted)?;
            (PropertyValue::Text(text), after)
        } else {
            let end = after.find(',').unwrap_or(after.len());
            let literal = after[..end].trim();
            let number = literal.parse::<f64>().map_err(|_| {
                EstimatorError::predicate(format!("invalid number '{}' for `{}`.`{}`", literal, var, prop))
            })?;
            (PropertyValue::Number(number), &after[end..])
        };
        props.entry(var).or_default().insert(prop, value);

        rest = after.trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
        } else if !rest.is_empty() {
            return Err(EstimatorError::predicate(format!(
                "expected ',' before '{}'",
                rest
            )));
        }
    }
    Ok(props)
}

fn quoted_name(input: &str) -> EstimatorResult<(String, &str)> {
    let body = input
        .strip_prefix('`')
        .ok_or_else(|| EstimatorError::predicate(format!("expected '`' at '{}'", input)))?;
    let end = body
        .find('`')
        .ok_or_else(|| EstimatorError::predicate(format!("unterminated name at '{}'", input)))?;
    Ok((body[..end].to_string(), &body[end + 1..]))
}

fn quoted_string(input: &str) -> EstimatorResult<(String, &str)> {
    let mut text = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            '"' => return Ok((text, &input[i + 1..])),
            _ => text.push(c),
        }
    }
    Err(EstimatorError::predicate(format!(
        "unterminated string at '{}'",
        input
    )))
}
