// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for GraphCard

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use graphcard::{read_statistics, CardinalityEstimator, EstimatorConfig, Query};

use super::commands::{EstimatorArgs, OutputFormat};
use super::output::{EstimateFormatter, EstimateRow};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration file values overridden by command-line flags
fn build_config(args: &EstimatorArgs) -> Result<EstimatorConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => EstimatorConfig::from_json_file(path)?,
        None => EstimatorConfig::default(),
    };
    if let Some(variant) = &args.label_variant {
        config.label_variant = variant.parse()?;
    }
    if let Some(strategy) = &args.join {
        config.join_strategy = strategy.parse()?;
    }
    if args.static_selectivity.is_some() {
        config.static_selectivity = args.static_selectivity;
    }
    if args.simulate_neo4j {
        config.simulate_neo4j = true;
    }
    config.validate()?;
    Ok(config)
}

fn open_estimator(args: &EstimatorArgs) -> Result<CardinalityEstimator, Box<dyn std::error::Error>> {
    let config = build_config(args)?;
    log::debug!("Estimator configuration: {:?}", config);
    let estimator = CardinalityEstimator::from_files(&args.stats, args.labels.as_deref(), config)
        .map_err(|e| format!("Failed to load statistics from {}: {}", args.stats.display(), e))?;
    Ok(estimator)
}

/// Reads a JSON file holding either one query or a list of queries
fn read_query_file(path: &Path) -> Result<Vec<Query>, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let queries = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(queries)
}

/// Handle the estimate command
pub fn handle_estimate(
    pattern: Option<String>,
    props: Option<String>,
    query_file: Option<PathBuf>,
    explain: bool,
    format: OutputFormat,
    args: EstimatorArgs,
) -> CliResult {
    let queries = match (query_file, pattern) {
        (Some(path), _) => read_query_file(&path)?,
        (None, Some(pattern)) => vec![Query::parse(&pattern, props.as_deref())?],
        (None, None) => return Err("Either a pattern or --query-file is required".into()),
    };
    let estimator = open_estimator(&args)?;

    let mut plans = Vec::with_capacity(queries.len());
    for query in &queries {
        plans.push(estimator.plan(query)?);
    }
    let rows: Vec<EstimateRow<'_>> = queries
        .iter()
        .zip(&plans)
        .map(|(query, plan)| EstimateRow {
            query,
            estimate: plan.size(),
            plan: explain.then_some(plan),
        })
        .collect();
    println!("{}", EstimateFormatter::format(&rows, format));
    Ok(())
}

/// Handle the subqueries command
pub fn handle_subqueries(
    pattern: String,
    props: Option<String>,
    size: usize,
    format: OutputFormat,
    args: EstimatorArgs,
) -> CliResult {
    let query = Query::parse(&pattern, props.as_deref())?;
    let estimator = open_estimator(&args)?;
    let estimates = estimator.estimate_sub_queries(&query, size)?;
    if estimates.is_empty() && format == OutputFormat::Table {
        println!(
            "{}",
            format!("No connected sub-pattern with {} node variables", size).yellow()
        );
        return Ok(());
    }

    let rows: Vec<EstimateRow<'_>> = estimates
        .iter()
        .map(|(query, estimate)| EstimateRow {
            query,
            estimate: *estimate,
            plan: None,
        })
        .collect();
    println!("{}", EstimateFormatter::format(&rows, format));
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(stats: PathBuf, format: OutputFormat) -> CliResult {
    let statistics = read_statistics(&stats)
        .map_err(|e| format!("Failed to read statistics from {}: {}", stats.display(), e))?;
    println!(
        "{}",
        EstimateFormatter::format_summary(&statistics.summary(), format)
    );
    Ok(())
}
