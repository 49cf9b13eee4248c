//! Test utilities for GraphCard integration tests
//!
//! - `estimator_fixture`: in-memory statistics and label distributions
//! - `file_fixture`: the same data written to a temporary directory

#![allow(dead_code)]

pub mod estimator_fixture;
pub mod file_fixture;
