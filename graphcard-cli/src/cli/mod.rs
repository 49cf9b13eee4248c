// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for GraphCard
//!
//! Provides single-pattern estimation with optional explain output,
//! sub-pattern estimation and statistics file summaries.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_estimate, handle_stats, handle_subqueries};
