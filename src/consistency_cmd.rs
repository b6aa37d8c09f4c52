use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::{
    cli::ConsistencyArgs,
    consistency::{ColumnVerdict, analyze},
    ingest::{self, NaTokens, ReadOptions, TableResult},
    report::{self, ConsistencyRow},
    scan,
};

/// Verdicts for every column of one table, in header order.
#[derive(Debug, Clone)]
pub struct TableVerdicts {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<(String, ColumnVerdict)>,
}

pub fn audit_table(path: &Path, options: &ReadOptions<'_>) -> TableResult<TableVerdicts> {
    info!("Analysing {} ...", ingest::table_name(path));
    let table = ingest::load_table(path, options)?;
    let columns = table
        .columns
        .iter()
        .map(|column| (column.name.clone(), analyze(column.values())))
        .collect();
    Ok(TableVerdicts {
        name: table.name,
        row_count: table.row_count,
        columns,
    })
}

#[derive(Debug, Default)]
pub struct ConsistencySummary {
    pub files_found: usize,
    pub files_skipped: usize,
    pub inconsistencies: usize,
    pub rows: Vec<ConsistencyRow>,
}

/// Flattens per-table results into report rows sorted by table then column.
/// Consistent columns are kept only when `verbose` is set.
pub fn summarize(outcomes: Vec<TableResult<TableVerdicts>>, verbose: bool) -> ConsistencySummary {
    let mut summary = ConsistencySummary {
        files_found: outcomes.len(),
        ..ConsistencySummary::default()
    };
    for outcome in outcomes {
        let verdicts = match outcome {
            Ok(verdicts) => verdicts,
            Err(err) => {
                warn!("Skipping file: {err}");
                summary.files_skipped += 1;
                continue;
            }
        };
        let mut file_inconsistencies = 0;
        for (column, verdict) in &verdicts.columns {
            if let Some(detail) = &verdict.detail {
                warn!("{}: column '{column}': {detail}", verdicts.name);
                file_inconsistencies += 1;
            } else if !verbose {
                continue;
            }
            summary.rows.push(ConsistencyRow::new(
                &verdicts.name,
                verdicts.row_count,
                column,
                verdict,
            ));
        }
        if file_inconsistencies == 0 {
            info!(
                "{}: all columns consistent ({} columns analysed)",
                verdicts.name,
                verdicts.columns.len()
            );
        }
        summary.inconsistencies += file_inconsistencies;
    }
    summary
        .rows
        .sort_by(|a, b| a.table.cmp(&b.table).then_with(|| a.column.cmp(&b.column)));
    summary
}

fn print_summary(summary: &ConsistencySummary) {
    println!("{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Files analysed: {}", summary.files_found);
    if summary.files_skipped > 0 {
        println!("Files skipped: {}", summary.files_skipped);
    }
    println!("Inconsistencies found: {}", summary.inconsistencies);
}

pub fn execute(args: &ConsistencyArgs) -> Result<()> {
    let inputs = crate::resolve_inputs(&args.input, NaTokens::consistency_defaults())?;
    if inputs.files.is_empty() {
        println!("No CSV files found in {:?}.", args.input.data_dir);
    }

    let options = inputs.read_options(args.input.delimiter);
    let outcomes = scan::run_parallel(&inputs.files, inputs.jobs, |path| {
        audit_table(path, &options)
    });
    let summary = summarize(outcomes, args.verbose);
    print_summary(&summary);

    if summary.rows.is_empty() {
        println!("No inconsistencies detected.");
        return Ok(());
    }

    if args.verbose {
        println!("\n=== Full report (all columns) ===");
    } else {
        println!("\n=== Columns with inconsistent types ===");
    }
    report::print_rows(&summary.rows);
    report::write_report(&args.output, &summary.rows)?;
    println!("\nReport written to {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::TableError;
    use std::path::PathBuf;

    fn verdicts(name: &str, columns: &[(&str, Vec<Option<&str>>)]) -> TableVerdicts {
        TableVerdicts {
            name: name.to_string(),
            row_count: columns.first().map(|(_, v)| v.len()).unwrap_or(0),
            columns: columns
                .iter()
                .map(|(column, values)| (column.to_string(), analyze(values.iter().copied())))
                .collect(),
        }
    }

    #[test]
    fn summary_keeps_only_inconsistent_columns() {
        let table = verdicts(
            "b.csv",
            &[
                ("id", vec![Some("1"), Some("2")]),
                ("mixed", vec![Some("1"), Some("x")]),
            ],
        );
        let summary = summarize(vec![Ok(table)], false);
        assert_eq!(summary.inconsistencies, 1);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].column, "mixed");
    }

    #[test]
    fn verbose_summary_is_sorted_and_counts_skips() {
        let b = verdicts(
            "b.csv",
            &[
                ("zeta", vec![Some("1")]),
                ("alpha", vec![Some("x"), Some("2024-01-01")]),
            ],
        );
        let a = verdicts("a.csv", &[("only", vec![None, Some("")])]);
        let skipped = Err(TableError::Delimiter {
            path: PathBuf::from("c.csv"),
        });
        let summary = summarize(vec![Ok(b), skipped, Ok(a)], true);

        assert_eq!(summary.files_found, 3);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.inconsistencies, 1);
        let keys: Vec<_> = summary
            .rows
            .iter()
            .map(|row| (row.table.as_str(), row.column.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("a.csv", "only"), ("b.csv", "alpha"), ("b.csv", "zeta")]
        );
        assert_eq!(summary.rows[0].types_found, "empty");
    }

    #[test]
    fn empty_batch_summarizes_to_zero() {
        let summary = summarize(Vec::new(), false);
        assert_eq!(summary.files_found, 0);
        assert_eq!(summary.files_skipped, 0);
        assert_eq!(summary.inconsistencies, 0);
        assert!(summary.rows.is_empty());
    }
}
