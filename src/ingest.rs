//! Loading a CSV file into columns of raw cells.
//!
//! Missing cells are resolved here, against an explicit [`NaTokens`] set,
//! and handed to the analyzers as `None`. Rows shorter than the header are
//! padded with missing cells; rows longer than the header are an error.

use std::{
    collections::BTreeSet,
    io::{self, Read},
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use log::debug;
use thiserror::Error;

use crate::io_utils;

/// Default missing tokens for the type-consistency scan.
pub const DEFAULT_NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Allow-list used by the missing-value audit.
pub const AUDIT_NA_TOKENS: &[&str] = &[
    "nan", "NaN", "NAN", "null", "NULL", "None", "N/A", "n/a", "#N/A",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaTokens {
    tokens: BTreeSet<String>,
    empty_is_missing: bool,
}

impl NaTokens {
    pub fn new<I, S>(tokens: I, empty_is_missing: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            empty_is_missing,
        }
    }

    /// Missing-token set for the type-consistency scan: blank fields count as missing.
    pub fn consistency_defaults() -> Self {
        Self::new(DEFAULT_NA_TOKENS.iter().copied(), true)
    }

    /// Missing-token set for the presence audit: blank fields are ordinary values.
    pub fn audit_defaults() -> Self {
        Self::new(AUDIT_NA_TOKENS.iter().copied(), false)
    }

    /// Uses `overrides` when any are given, otherwise `defaults`.
    pub fn with_overrides(defaults: Self, overrides: &[String]) -> Self {
        if overrides.is_empty() {
            defaults
        } else {
            Self::new(overrides.iter().cloned(), defaults.empty_is_missing)
        }
    }

    pub fn is_missing(&self, raw: &str) -> bool {
        (self.empty_is_missing && raw.is_empty()) || self.tokens.contains(raw)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed CSV in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Row {row} of {path:?} is not valid {encoding}")]
    Decode {
        path: PathBuf,
        row: usize,
        encoding: &'static str,
    },
    #[error("Row {row} of {path:?} has {found} fields, expected at most {expected}")]
    LongRow {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Could not determine delimiter for {path:?}")]
    Delimiter { path: PathBuf },
    #[error("{path:?} has no header row")]
    Empty { path: PathBuf },
}

pub type TableResult<T> = std::result::Result<T, TableError>;

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions<'a> {
    /// Fixed delimiter; sniffed from the file when `None`.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub na_tokens: &'a NaTokens,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Option<String>>,
}

impl Column {
    pub fn values(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.cells.iter().map(|cell| cell.as_deref())
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

/// A fully loaded CSV file, stored column-major.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<Column>,
}

pub fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_table(path: &Path, options: &ReadOptions<'_>) -> TableResult<Table> {
    let delimiter = match options.delimiter {
        Some(delimiter) => delimiter,
        None => io_utils::sniff_delimiter_from_path(path)
            .map_err(|source| TableError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| TableError::Delimiter {
                path: path.to_path_buf(),
            })?,
    };
    debug!(
        "Reading {:?} with delimiter '{}' and encoding {}",
        path,
        io_utils::printable_delimiter(delimiter),
        options.encoding.name()
    );
    let file = std::fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(
        table_name(path),
        path,
        io::BufReader::new(file),
        delimiter,
        options,
    )
}

pub fn read_table<R: Read>(
    name: String,
    path: &Path,
    input: R,
    delimiter: u8,
    options: &ReadOptions<'_>,
) -> TableResult<Table> {
    let csv_error = |source: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let decode_error = |row: usize| TableError::Decode {
        path: path.to_path_buf(),
        row,
        encoding: options.encoding.name(),
    };

    let mut reader = io_utils::open_csv_reader(input, delimiter, true);
    let header_record = reader.byte_headers().map_err(csv_error)?.clone();
    if header_record.is_empty() {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    }
    let headers = io_utils::decode_record(&header_record, options.encoding)
        .map_err(|_| decode_error(1))?;
    let mut columns: Vec<Column> = headers
        .into_iter()
        .map(|name| Column {
            name: name.trim_start_matches('\u{feff}').to_string(),
            cells: Vec::new(),
        })
        .collect();

    let mut record = csv::ByteRecord::new();
    let mut row_count = 0usize;
    while reader.read_byte_record(&mut record).map_err(csv_error)? {
        row_count += 1;
        if record.len() > columns.len() {
            return Err(TableError::LongRow {
                path: path.to_path_buf(),
                row: row_count + 1,
                expected: columns.len(),
                found: record.len(),
            });
        }
        let decoded = io_utils::decode_record(&record, options.encoding)
            .map_err(|_| decode_error(row_count + 1))?;
        let mut fields = decoded.into_iter();
        for column in columns.iter_mut() {
            let cell = fields
                .next()
                .filter(|raw| !options.na_tokens.is_missing(raw));
            column.cells.push(cell);
        }
    }

    Ok(Table {
        name,
        row_count,
        columns,
    })
}
