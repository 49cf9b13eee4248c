// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "graphcard",
    version,
    about = "Cardinality estimation for graph patterns",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (overridden by --verbose, default warn)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the number of matches of a pattern
    Estimate {
        /// Cypher-like pattern, e.g. "(a:Person)-[:KNOWS]->(b)"
        #[arg(required_unless_present = "query_file")]
        pattern: Option<String>,

        /// Property conditions, e.g. `a`.`name`="Alice"
        #[arg(long, value_name = "CONDITIONS")]
        props: Option<String>,

        /// JSON file holding one query or a list of queries
        #[arg(long, value_name = "FILE", conflicts_with = "pattern")]
        query_file: Option<PathBuf>,

        /// Print the operator tree with per-operator estimates
        #[arg(long)]
        explain: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        estimator: EstimatorArgs,
    },

    /// Estimate every connected sub-pattern with a given number of node variables
    Subqueries {
        pattern: String,

        /// Property conditions, e.g. `a`.`name`="Alice"
        #[arg(long, value_name = "CONDITIONS")]
        props: Option<String>,

        /// Node variables per sub-pattern
        #[arg(long, short = 'k', default_value_t = 2)]
        size: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        estimator: EstimatorArgs,
    },

    /// Summarize a statistics file
    Stats {
        /// Statistics file
        #[arg(long, value_name = "FILE")]
        stats: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show version information
    Version,
}

/// Inputs and settings of the estimator
#[derive(Args, Debug, Clone)]
pub struct EstimatorArgs {
    /// Statistics file
    #[arg(long, value_name = "FILE")]
    pub stats: PathBuf,

    /// Directory with sublabelMap.csv and labelPartition.csv
    #[arg(long, value_name = "DIR")]
    pub labels: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Parts of the label distribution to use: all, only-sublabels, only-partition, none
    #[arg(long, value_name = "VARIANT")]
    pub label_variant: Option<String>,

    /// Cycle join strategy: merge-on or self-join
    #[arg(long, value_name = "STRATEGY")]
    pub join: Option<String>,

    /// Fixed selectivity per property predicate
    #[arg(long, value_name = "S")]
    pub static_selectivity: Option<f64>,

    /// Approximate label-to-label counts from single-sided counts
    #[arg(long)]
    pub simulate_neo4j: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
