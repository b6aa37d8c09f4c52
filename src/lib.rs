pub mod classify;
pub mod cli;
pub mod consistency;
pub mod consistency_cmd;
pub mod discovery;
pub mod ingest;
pub mod io_utils;
pub mod missing;
pub mod report;
pub mod scan;
pub mod table;

use std::{env, path::PathBuf, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use encoding_rs::Encoding;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, InputArgs},
    ingest::{NaTokens, ReadOptions},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_audit", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Consistency(args) => consistency_cmd::execute(&args),
        Commands::Missing(args) => missing::execute(&args),
    }
}

/// Everything a command needs before it starts reading tables.
pub(crate) struct ResolvedInputs {
    pub files: Vec<PathBuf>,
    pub encoding: &'static Encoding,
    pub na_tokens: NaTokens,
    pub jobs: usize,
}

impl ResolvedInputs {
    pub fn read_options(&self, delimiter: Option<u8>) -> ReadOptions<'_> {
        ReadOptions {
            delimiter,
            encoding: self.encoding,
            na_tokens: &self.na_tokens,
        }
    }
}

pub(crate) fn resolve_inputs(args: &InputArgs, defaults: NaTokens) -> Result<ResolvedInputs> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let na_tokens = NaTokens::with_overrides(defaults, &args.na_tokens);
    let files = discovery::list_csv_files(&args.data_dir)?;
    let jobs = scan::resolve_jobs(args.jobs);
    info!(
        "Found {} CSV file(s) in {:?}",
        files.len(),
        args.data_dir
    );
    debug!(
        "Encoding {}, {} missing token(s), delimiter {}",
        encoding.name(),
        na_tokens.len(),
        args.delimiter
            .map(io_utils::printable_delimiter)
            .unwrap_or_else(|| "auto".to_string())
    );
    Ok(ResolvedInputs {
        files,
        encoding,
        na_tokens,
        jobs,
    })
}
