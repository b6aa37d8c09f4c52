//! Value-type classification for raw CSV cells.
//!
//! [`classify`] maps a single raw cell onto a [`ValueType`] by walking a fixed
//! cascade of tests. The first test that succeeds decides the label:
//!
//! 1. the missing marker (`None`) is [`ValueType::Missing`]
//! 2. a blank cell after trimming is [`ValueType::Empty`]
//! 3. anything the float parser accepts is [`ValueType::Number`]
//! 4. an exact match against [`DATE_FORMATS`], in list order, is [`ValueType::Date`]
//! 5. a loose `YYYY-M-D` / `D-M-YYYY` prefix is [`ValueType::Date`]
//! 6. everything else is [`ValueType::Text`]
//!
//! Numbers are tested before dates, so a bare year such as `2023` is a number.

use std::{fmt, sync::LazyLock};

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    Number,
    Date,
    Text,
    Empty,
    Missing,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Date => "date",
            ValueType::Text => "text",
            ValueType::Empty => "empty",
            ValueType::Missing => "missing",
        }
    }

    /// True for the labels that take part in the consistency judgment.
    pub fn is_classified(&self) -> bool {
        matches!(self, ValueType::Number | ValueType::Date | ValueType::Text)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum DateFormat {
    Date(&'static str),
    DateTime(&'static str),
}

impl DateFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Date(fmt) | DateFormat::DateTime(fmt) => fmt,
        }
    }

    fn parses(&self, value: &str) -> bool {
        if !matches_layout(value, self.pattern()) {
            return false;
        }
        match self {
            DateFormat::Date(fmt) => NaiveDate::parse_from_str(value, fmt).is_ok(),
            DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt).is_ok(),
        }
    }
}

/// Checks the character layout of `value` against a strftime pattern before
/// chrono sees it: `%Y` takes exactly four digits, the other fields one or
/// two, a space takes a run of whitespace and anything else must match
/// literally. chrono alone would also take a signed year or padding
/// whitespace inside a field.
fn matches_layout(value: &str, pattern: &str) -> bool {
    let mut rest = value.as_bytes();
    let mut spec = pattern.bytes();
    while let Some(token) = spec.next() {
        let consumed = match token {
            b'%' => match spec.next() {
                Some(b'Y') => leading_digits(rest, 4).filter(|n| *n == 4),
                Some(b'm' | b'd' | b'H' | b'M' | b'S') => leading_digits(rest, 2),
                _ => None,
            },
            b' ' => {
                let n = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();
                (n > 0).then_some(n)
            }
            literal => (rest.first() == Some(&literal)).then_some(1),
        };
        match consumed {
            Some(n) => rest = &rest[n..],
            None => return false,
        }
    }
    rest.is_empty()
}

fn leading_digits(bytes: &[u8], max: usize) -> Option<usize> {
    let n = bytes.iter().take(max).take_while(|b| b.is_ascii_digit()).count();
    (n > 0).then_some(n)
}

/// Exact date layouts, tried in order. `01/02/2023` is accepted by the
/// day-first entry before the month-first one is reached.
pub const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Date("%Y-%m-%d"),
    DateFormat::Date("%d/%m/%Y"),
    DateFormat::Date("%m/%d/%Y"),
    DateFormat::Date("%Y/%m/%d"),
    DateFormat::Date("%d-%m-%Y"),
    DateFormat::DateTime("%Y-%m-%d %H:%M:%S"),
    DateFormat::DateTime("%d/%m/%Y %H:%M:%S"),
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%S"),
    DateFormat::DateTime("%Y-%m-%dT%H:%M:%SZ"),
    DateFormat::Date("%d.%m.%Y"),
    DateFormat::Date("%Y.%m.%d"),
];

// Anchored at the start only; trailing content is allowed.
static LOOSE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|\d{1,2}[-/.]\d{1,2}[-/.]\d{4})")
        .expect("loose date pattern compiles")
});

type Test = fn(&str) -> bool;

const CASCADE: &[(ValueType, Test)] = &[
    (ValueType::Number, is_number),
    (ValueType::Date, matches_date_format),
    (ValueType::Date, matches_loose_date),
];

pub fn classify(raw: Option<&str>) -> ValueType {
    let Some(raw) = raw else {
        return ValueType::Missing;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValueType::Empty;
    }
    CASCADE
        .iter()
        .find(|(_, test)| test(trimmed))
        .map(|(label, _)| *label)
        .unwrap_or(ValueType::Text)
}

/// Accepts what a conventional float literal parser accepts: sign, decimal
/// point, exponent, `inf`/`infinity`/`nan`, and `_` between digits.
pub fn is_number(value: &str) -> bool {
    if !value.contains('_') {
        return value.parse::<f64>().is_ok();
    }
    let bytes = value.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(idx, byte)| {
        *byte != b'_'
            || (idx > 0
                && bytes[idx - 1].is_ascii_digit()
                && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit))
    });
    separators_ok && value.replace('_', "").parse::<f64>().is_ok()
}

pub fn matches_date_format(value: &str) -> bool {
    DATE_FORMATS.iter().any(|format| format.parses(value))
}

pub fn matches_loose_date(value: &str) -> bool {
    LOOSE_DATE.is_match(value)
}
