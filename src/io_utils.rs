//! I/O utilities for CSV reading, writing, encoding, and delimiter resolution.
//!
//! - **Delimiter sniffing**: a quote-aware scan of the first lines of a file
//!   picks the candidate separator that splits the header and most rows the
//!   same way.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader/writer construction**: `open_csv_reader` and `open_csv_writer`
//!   configure the `csv` crate consistently for every command.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Separators considered by [`sniff_delimiter`], in preference order.
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|:";
const SNIFF_SAMPLE_LINES: usize = 20;

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_output_delimiter(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    }
}

/// Picks the separator that splits the first sampled line (the header) into
/// the most fields. A candidate qualifies when no later line holds more
/// separators than the header and more than half of them hold exactly as
/// many, so a few short rows do not defeat detection. Ties keep candidate
/// order.
pub fn sniff_delimiter<R: BufRead>(reader: R) -> io::Result<Option<u8>> {
    let mut lines = Vec::with_capacity(SNIFF_SAMPLE_LINES);
    for line in reader.split(b'\n') {
        let line = line?;
        if line.iter().all(|b| b.is_ascii_whitespace()) {
            continue;
        }
        lines.push(line);
        if lines.len() >= SNIFF_SAMPLE_LINES {
            break;
        }
    }
    let Some((header, body)) = lines.split_first() else {
        return Ok(None);
    };

    let mut best: Option<(u8, usize)> = None;
    for &candidate in CANDIDATE_DELIMITERS {
        let expected = count_unquoted(header, candidate);
        if expected == 0 {
            continue;
        }
        let counts = body
            .iter()
            .map(|line| count_unquoted(line, candidate))
            .collect::<Vec<_>>();
        if counts.iter().any(|count| *count > expected) {
            continue;
        }
        let matching = 1 + counts.iter().filter(|count| **count == expected).count();
        if matching * 2 <= lines.len() {
            continue;
        }
        if best.is_none_or(|(_, count)| expected > count) {
            best = Some((candidate, expected));
        }
    }
    Ok(best.map(|(delimiter, _)| delimiter))
}

pub fn sniff_delimiter_from_path(path: &Path) -> io::Result<Option<u8>> {
    sniff_delimiter(BufReader::new(File::open(path)?))
}

// Quote state does not carry across lines.
fn count_unquoted(line: &[u8], delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &byte in line {
        match byte {
            b'"' => in_quotes = !in_quotes,
            b if b == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_writer(path: &Path, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer: Box<dyn Write> = Box::new(BufWriter::new(
        File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
    ));
    let mut builder = csv::WriterBuilder::new();
    builder.delimiter(delimiter).double_quote(true);
    Ok(builder.from_writer(writer))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
