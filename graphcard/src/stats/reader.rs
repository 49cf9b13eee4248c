// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Reader for the tab-separated statistics format
//!
//! The file consists of sections in fixed order. Each section starts with a
//! `# <Title>` header, followed by a line holding the number of records and
//! then one tab-separated record per line.

use std::io::BufRead;
use std::path::Path;

use super::graph_statistics::{GraphStatistics, GraphStatisticsBuilder, PropertyStats, TypeSummary};
use super::{LabelId, PropertyId, ANY_LABEL};
use crate::error::{EstimatorError, EstimatorResult};

const NODES: &str = "# Nodes";
const NODE_LABELS: &str = "# Node Labels";
const EDGE_TYPES: &str = "# Edge Types";
const NODE_PROPERTIES: &str = "# Node Properties";
const LABEL_TYPE: &str = "# Label/Type Combinations";
const TYPE_TYPE: &str = "# Type/Type Combinations";
const LABEL_PROPERTY: &str = "# Label/Property Combinations";
const TYPE_PROPERTY: &str = "# Type/Property Combinations";

/// Parses statistics files into [`GraphStatistics`]
pub struct StatisticsReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl StatisticsReader<std::io::BufReader<std::fs::File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> EstimatorResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Ok(Self::new(std::io::BufReader::new(file)))
    }
}

impl<R: BufRead> StatisticsReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    pub fn read(mut self) -> EstimatorResult<GraphStatistics> {
        self.expect_header(NODES)?;
        let node_count = self.read_count()? as f64;
        let mut builder = GraphStatisticsBuilder::new(node_count);

        self.expect_header(NODE_LABELS)?;
        for _ in 0..self.read_count()? {
            let fields = self.read_record(3)?;
            let id = self.parse_int(&fields[1])?;
            let count = self.parse_float(&fields[2])?;
            builder = builder.label(&fields[0], id, count);
        }

        self.expect_header(EDGE_TYPES)?;
        for _ in 0..self.read_count()? {
            let fields = self.read_record(6)?;
            let id = self.parse_int(&fields[1])?;
            let summary = TypeSummary {
                outgoing: self.parse_float(&fields[2])?,
                incoming: self.parse_float(&fields[3])?,
                paths: self.parse_float(&fields[4])?,
                pairs: self.parse_float(&fields[5])?,
            };
            builder = builder.relationship_type(&fields[0], id, summary);
        }

        self.expect_header(NODE_PROPERTIES)?;
        for _ in 0..self.read_count()? {
            let fields = self.read_record(2)?;
            let id = self.parse_int(&fields[1])?;
            builder = builder.property(&fields[0], id);
        }

        self.expect_header(LABEL_TYPE)?;
        for _ in 0..self.read_count()? {
            let fields = self.read_record(4)?;
            let base = self.parse_int(&fields[0])?;
            let rel_type = self.parse_int(&fields[1])?;
            let target = self.parse_int(&fields[2])?;
            let count = self.parse_float(&fields[3])?;
            builder = builder.relationships(base, rel_type, target, count);
        }

        // two-step path summaries are not used for estimation
        self.expect_header(TYPE_TYPE)?;
        for _ in 0..self.read_count()? {
            self.read_record(10)?;
        }

        self.expect_header(LABEL_PROPERTY)?;
        for _ in 0..self.read_count()? {
            let (label, property, stats) = self.read_property_stats()?;
            builder = builder.label_property(label, property, stats);
        }

        self.expect_header(TYPE_PROPERTY)?;
        for _ in 0..self.read_count()? {
            let (rel_type, property, stats) = self.read_property_stats()?;
            builder = builder.type_property(rel_type, property, stats);
        }

        let stats = builder.build();
        log::debug!(
            "Read statistics: {} nodes, {} labels, {} types ({} lines)",
            stats.num_nodes(ANY_LABEL),
            stats.labels().len(),
            stats.types().len(),
            self.line_no
        );
        Ok(stats)
    }

    /// `id property count unique numeric num_mf hash=freq... quantile...`
    fn read_property_stats(&mut self) -> EstimatorResult<(LabelId, PropertyId, PropertyStats)> {
        let fields = self.read_record(6)?;
        let owner = self.parse_int(&fields[0])?;
        let property = self.parse_int(&fields[1])?;
        let mut stats = PropertyStats::new(
            self.parse_float(&fields[2])?,
            self.parse_float(&fields[3])?,
            self.parse_float(&fields[4])?,
        );

        let num_frequent = self.parse_int(&fields[5])?;
        let num_frequent = usize::try_from(num_frequent).map_err(|_| {
            EstimatorError::statistics(self.line_no, "negative number of frequent values")
        })?;
        if fields.len() < 6 + num_frequent {
            return Err(EstimatorError::statistics(
                self.line_no,
                format!("expected {} frequent values", num_frequent),
            ));
        }

        for entry in &fields[6..6 + num_frequent] {
            let (hash, freq) = entry.split_once('=').ok_or_else(|| {
                EstimatorError::statistics(self.line_no, format!("invalid frequent value '{}'", entry))
            })?;
            let hash = parse_hash(hash).ok_or_else(|| {
                EstimatorError::statistics(self.line_no, format!("invalid value hash '{}'", hash))
            })?;
            stats = stats.with_frequent_value(hash, self.parse_float(freq)?);
        }

        let quantiles = fields[6 + num_frequent..]
            .iter()
            .map(|q| self.parse_float(q))
            .collect::<EstimatorResult<Vec<_>>>()?;
        Ok((owner, property, stats.with_quantiles(quantiles)))
    }

    fn next_line(&mut self) -> EstimatorResult<String> {
        self.line_no += 1;
        match self.lines.next() {
            Some(line) => Ok(line?),
            None => Err(EstimatorError::statistics(
                self.line_no,
                "unexpected end of file",
            )),
        }
    }

    fn expect_header(&mut self, header: &str) -> EstimatorResult<()> {
        let line = self.next_line()?;
        if line.starts_with(header) {
            Ok(())
        } else {
            Err(EstimatorError::statistics(
                self.line_no,
                format!("expected section '{}', found '{}'", header, line),
            ))
        }
    }

    fn read_count(&mut self) -> EstimatorResult<usize> {
        let line = self.next_line()?;
        line.trim().parse::<usize>().map_err(|_| {
            EstimatorError::statistics(self.line_no, format!("invalid record count '{}'", line))
        })
    }

    fn read_record(&mut self, min_fields: usize) -> EstimatorResult<Vec<String>> {
        let line = self.next_line()?;
        let fields: Vec<String> = line
            .split('\t')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if fields.len() < min_fields {
            return Err(EstimatorError::statistics(
                self.line_no,
                format!("expected at least {} fields, found {}", min_fields, fields.len()),
            ));
        }
        Ok(fields)
    }

    fn parse_int(&self, field: &str) -> EstimatorResult<i32> {
        field.trim().parse::<i32>().map_err(|_| {
            EstimatorError::statistics(self.line_no, format!("invalid integer '{}'", field))
        })
    }

    fn parse_float(&self, field: &str) -> EstimatorResult<f64> {
        field.trim().parse::<f64>().map_err(|_| {
            EstimatorError::statistics(self.line_no, format!("invalid number '{}'", field))
        })
    }
}

/// Hashes are written as up to 64-bit hex and truncated to 32 bits
fn parse_hash(text: &str) -> Option<i32> {
    let text = text.trim();
    match text.strip_prefix('-') {
        Some(digits) => i64::from_str_radix(digits, 16).ok().map(|v| v.wrapping_neg() as i32),
        None => u64::from_str_radix(text, 16).ok().map(|v| v as i32),
    }
}

/// Reads a statistics file from disk
pub fn read_statistics<P: AsRef<Path>>(path: P) -> EstimatorResult<GraphStatistics> {
    StatisticsReader::open(path)?.read()
}

/// Parses statistics from an in-memory string
pub fn parse_statistics(text: &str) -> EstimatorResult<GraphStatistics> {
    StatisticsReader::new(text.as_bytes()).read()
}
