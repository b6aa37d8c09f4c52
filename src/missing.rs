//! Presence audit for missing-value tokens.
//!
//! Unlike the consistency scan this never classifies values: a cell is
//! missing only when it equals one of the configured tokens, and blank cells
//! are ordinary values.

use anyhow::Result;
use itertools::Itertools;
use log::{info, warn};

use crate::{
    cli::MissingArgs,
    ingest::{self, NaTokens, Table},
    report::{self, MissingRow, yes_no},
    scan,
};

pub fn missing_row(table: &Table) -> MissingRow {
    let with_missing = table
        .columns
        .iter()
        .map(|column| (column.name.as_str(), column.missing_count()))
        .filter(|(_, count)| *count > 0)
        .collect::<Vec<_>>();
    MissingRow {
        dataset: table.name.clone(),
        total_row_count: table.row_count,
        has_missing: yes_no(!with_missing.is_empty()),
        missing_columns: with_missing.iter().map(|(name, _)| name).join(", "),
        missing_counts: with_missing
            .iter()
            .map(|(name, count)| format!("{name}={count}"))
            .join(", "),
    }
}

pub fn execute(args: &MissingArgs) -> Result<()> {
    let inputs = crate::resolve_inputs(&args.input, NaTokens::audit_defaults())?;
    let options = inputs.read_options(args.input.delimiter);
    let outcomes = scan::run_parallel(&inputs.files, inputs.jobs, |path| {
        ingest::load_table(path, &options).map(|table| missing_row(&table))
    });

    if inputs.files.is_empty() {
        println!("No CSV files found in {:?}.", args.input.data_dir);
    }

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut skipped = 0usize;
    for outcome in outcomes {
        match outcome {
            Ok(row) => {
                info!("Analysed {} ({} rows)", row.dataset, row.total_row_count);
                rows.push(row);
            }
            Err(err) => {
                warn!("Skipping file: {err}");
                skipped += 1;
            }
        }
    }

    let with_missing = rows.iter().filter(|row| row.has_missing == "yes").count();
    println!("{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Files analysed: {}", rows.len());
    if skipped > 0 {
        println!("Files skipped: {skipped}");
    }
    println!("Files with missing values: {with_missing}");
    println!("Files without missing values: {}", rows.len() - with_missing);
    if rows.is_empty() {
        return Ok(());
    }

    println!("\n=== Missing values per dataset ===");
    report::print_rows(&rows);
    report::write_report(&args.output, &rows)?;
    println!("\nReport written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ReadOptions, read_table};
    use encoding_rs::UTF_8;
    use std::path::Path;

    fn table(text: &str) -> Table {
        let tokens = NaTokens::audit_defaults();
        let options = ReadOptions {
            delimiter: Some(b','),
            encoding: UTF_8,
            na_tokens: &tokens,
        };
        read_table("t.csv".to_string(), Path::new("t.csv"), text.as_bytes(), b',', &options)
            .expect("table")
    }

    #[test]
    fn lists_columns_with_missing_tokens_in_header_order() {
        let row = missing_row(&table("a,b,c\nnull,1,N/A\n2,,#N/A\nNaN,3,x\n"));
        assert_eq!(row.has_missing, "yes");
        assert_eq!(row.total_row_count, 3);
        assert_eq!(row.missing_columns, "a, c");
        assert_eq!(row.missing_counts, "a=2, c=2");
    }

    #[test]
    fn blank_cells_are_not_missing() {
        let row = missing_row(&table("a,b\n,1\n2,\n"));
        assert_eq!(row.has_missing, "no");
        assert_eq!(row.missing_columns, "");
        assert_eq!(row.missing_counts, "");
    }
}
