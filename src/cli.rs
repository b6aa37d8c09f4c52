use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Audit column type consistency and missing values across CSV files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report columns whose values mix numbers, dates and text
    Consistency(ConsistencyArgs),
    /// Report which columns contain missing-value tokens
    Missing(MissingArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Directory containing the CSV files to audit
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: PathBuf,
    /// CSV delimiter character (detected per file when omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Number of files to read in parallel (defaults to available cores)
    #[arg(short = 'j', long = "jobs")]
    pub jobs: Option<usize>,
    /// Raw cell value treated as missing; repeat to build the full list
    #[arg(long = "na-token", action = clap::ArgAction::Append)]
    pub na_tokens: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ConsistencyArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Report destination (.csv, .tsv or .json)
    #[arg(short = 'o', long = "output", default_value = "consistency_report.csv")]
    pub output: PathBuf,
    /// Include consistent columns in the report
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct MissingArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Report destination (.csv, .tsv or .json)
    #[arg(short = 'o', long = "output", default_value = "missing_report.csv")]
    pub output: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" | "\\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
