//! Report rows and persistence.
//!
//! Rows are written as CSV by default, tab-separated for a `.tsv` path and
//! as a JSON array for a `.json` path.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::{consistency::ColumnVerdict, io_utils, table};

/// A flat report record that can be printed and persisted.
pub trait ReportRow: Serialize {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyRow {
    pub table: String,
    pub total_row_count: usize,
    pub column: String,
    pub consistent: &'static str,
    pub types_found: String,
    pub dominant_type: String,
    pub details: String,
    pub classified_values: usize,
    pub missing_values: usize,
}

impl ConsistencyRow {
    pub fn new(table: &str, row_count: usize, column: &str, verdict: &ColumnVerdict) -> Self {
        let types_found = if verdict.types_found.is_empty() {
            "empty".to_string()
        } else {
            verdict.types_label()
        };
        Self {
            table: table.to_string(),
            total_row_count: row_count,
            column: column.to_string(),
            consistent: yes_no(verdict.is_consistent),
            types_found,
            dominant_type: verdict
                .dominant_type
                .map(|value_type| value_type.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            details: verdict
                .detail
                .clone()
                .unwrap_or_else(|| "Consistent".to_string()),
            classified_values: verdict.total_classified,
            missing_values: verdict.missing_count,
        }
    }
}

impl ReportRow for ConsistencyRow {
    const HEADERS: &'static [&'static str] = &[
        "table",
        "total_row_count",
        "column",
        "consistent",
        "types_found",
        "dominant_type",
        "details",
        "classified_values",
        "missing_values",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.table.clone(),
            self.total_row_count.to_string(),
            self.column.clone(),
            self.consistent.to_string(),
            self.types_found.clone(),
            self.dominant_type.clone(),
            self.details.clone(),
            self.classified_values.to_string(),
            self.missing_values.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingRow {
    pub dataset: String,
    pub total_row_count: usize,
    pub has_missing: &'static str,
    pub missing_columns: String,
    pub missing_counts: String,
}

impl ReportRow for MissingRow {
    const HEADERS: &'static [&'static str] = &[
        "dataset",
        "total_row_count",
        "has_missing",
        "missing_columns",
        "missing_counts",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.dataset.clone(),
            self.total_row_count.to_string(),
            self.has_missing.to_string(),
            self.missing_columns.clone(),
            self.missing_counts.clone(),
        ]
    }
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

pub fn print_rows<R: ReportRow>(rows: &[R]) {
    let cells = rows.iter().map(R::cells).collect::<Vec<_>>();
    table::print_table(R::HEADERS, &cells);
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn write_report<R: ReportRow>(path: &Path, rows: &[R]) -> Result<()> {
    if is_json(path) {
        let file = File::create(path).with_context(|| format!("Creating report {path:?}"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, rows)
            .with_context(|| format!("Writing JSON report {path:?}"))?;
        writer
            .flush()
            .with_context(|| format!("Flushing report {path:?}"))?;
        return Ok(());
    }
    let mut writer = io_utils::open_csv_writer(path, io_utils::resolve_output_delimiter(path))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Writing report row to {path:?}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Flushing report {path:?}"))?;
    Ok(())
}
