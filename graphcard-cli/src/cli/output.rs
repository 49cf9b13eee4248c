// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Estimate formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use graphcard::stats::StatisticsSummary;
use graphcard::{Expression, Query};

use super::commands::OutputFormat;

/// One estimated query, with its plan when explain output is requested
pub struct EstimateRow<'a> {
    pub query: &'a Query,
    pub estimate: f64,
    pub plan: Option<&'a Expression>,
}

/// Estimate formatter for the supported output formats
pub struct EstimateFormatter;

impl EstimateFormatter {
    pub fn format(rows: &[EstimateRow<'_>], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(rows),
            OutputFormat::Json => Self::format_json(rows),
        }
    }

    fn format_table(rows: &[EstimateRow<'_>]) -> String {
        if rows.is_empty() {
            return format!("{}\n", "No queries to estimate".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Estimates".bold().green()));
        output.push_str(&format!("Queries: {}\n\n", rows.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Query").fg(Color::Green),
            Cell::new("Size").fg(Color::Green),
            Cell::new("Estimate").fg(Color::Green),
        ]);
        for row in rows {
            table.add_row(vec![
                row.query.to_string(),
                row.query.size().to_string(),
                format_estimate(row.estimate),
            ]);
        }
        output.push_str(&table.to_string());
        output.push('\n');

        for row in rows {
            if let Some(plan) = row.plan {
                output.push_str(&format!("\n{} {}\n", "Plan for".bold(), row.query));
                output.push_str(&Self::plan_table(plan).to_string());
                output.push('\n');
            }
        }
        output
    }

    /// Operators in pre-order, indented by depth
    fn plan_table(plan: &Expression) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("Operator").fg(Color::Green),
            Cell::new("Cardinality").fg(Color::Green),
        ]);
        for (depth, operator, properties) in plan.walk() {
            table.add_row(vec![
                format!("{}{}", "  ".repeat(depth), operator),
                format_estimate(properties.size()),
            ]);
        }
        table
    }

    fn format_json(rows: &[EstimateRow<'_>]) -> String {
        let results: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let mut value = serde_json::json!({
                    "query": row.query,
                    "pattern": row.query.to_string(),
                    "size": row.query.size(),
                    "estimate": row.estimate,
                });
                if let (Some(plan), serde_json::Value::Object(map)) = (row.plan, &mut value) {
                    map.insert("plan".to_string(), Self::plan_json(plan));
                }
                value
            })
            .collect();
        let json_result = serde_json::json!({
            "status": "success",
            "results": results,
        });
        serde_json::to_string_pretty(&json_result).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize estimates to JSON\"}".to_string()
        })
    }

    fn plan_json(plan: &Expression) -> serde_json::Value {
        serde_json::json!({
            "operator": plan.operator().to_string(),
            "cardinality": plan.size(),
            "children": plan.children().iter().map(Self::plan_json).collect::<Vec<_>>(),
        })
    }

    /// Statistics overview
    pub fn format_summary(summary: &StatisticsSummary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(summary).unwrap_or_else(|_| {
                "{\"status\": \"error\", \"error\": \"Could not serialize summary to JSON\"}".to_string()
            }),
            OutputFormat::Table => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec![
                    Cell::new("Statistic").fg(Color::Green),
                    Cell::new("Value").fg(Color::Green),
                ]);
                let rows = [
                    ("Nodes", format_estimate(summary.num_nodes)),
                    ("Labels", summary.num_labels.to_string()),
                    ("Relationship types", summary.num_types.to_string()),
                    ("Properties", summary.num_properties.to_string()),
                    ("Label/type entries", summary.relationship_entries.to_string()),
                    (
                        "  with wildcards",
                        summary.wildcard_relationship_entries.to_string(),
                    ),
                    ("Numeric property entries", summary.numeric_property_entries.to_string()),
                    ("String property entries", summary.string_property_entries.to_string()),
                ];
                for (name, value) in rows {
                    table.add_row(vec![name.to_string(), value]);
                }
                format!("{}\n{}\n", "Statistics".bold().green(), table)
            }
        }
    }
}

fn format_estimate(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.4}", value)
    }
}
