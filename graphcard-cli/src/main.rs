// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! GraphCard CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "GraphCard".bold().green(), graphcard::VERSION);
            println!("Cardinality estimation for graph patterns");
            Ok(())
        }

        Commands::Estimate {
            pattern,
            props,
            query_file,
            explain,
            format,
            estimator,
        } => cli::handle_estimate(pattern, props, query_file, explain, format, estimator),

        Commands::Subqueries {
            pattern,
            props,
            size,
            format,
            estimator,
        } => cli::handle_subqueries(pattern, props, size, format, estimator),

        Commands::Stats { stats, format } => cli::handle_stats(stats, format),
    }
}
