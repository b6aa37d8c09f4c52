use std::collections::BTreeMap;

use itertools::Itertools;

use crate::classify::{ValueType, classify};

/// Outcome of a single pass over one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVerdict {
    /// Classified types in order of first appearance.
    pub types_found: Vec<ValueType>,
    pub type_counts: BTreeMap<ValueType, usize>,
    pub missing_count: usize,
    pub total_classified: usize,
    pub dominant_type: Option<ValueType>,
    pub is_consistent: bool,
    pub detail: Option<String>,
}

impl ColumnVerdict {
    pub fn count(&self, value_type: ValueType) -> usize {
        self.type_counts.get(&value_type).copied().unwrap_or(0)
    }

    pub fn types_label(&self) -> String {
        self.types_found.iter().join(", ")
    }
}

#[derive(Debug, Default)]
struct TypeTally {
    order: Vec<ValueType>,
    counts: BTreeMap<ValueType, usize>,
    missing: usize,
}

impl TypeTally {
    fn ingest(&mut self, value_type: ValueType) {
        match value_type {
            ValueType::Missing => self.missing += 1,
            classified if classified.is_classified() => {
                let count = self.counts.entry(classified).or_insert(0);
                if *count == 0 {
                    self.order.push(classified);
                }
                *count += 1;
            }
            _ => {}
        }
    }

    // Ties go to the earliest variant: number, then date, then text.
    fn dominant(&self) -> Option<ValueType> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(value_type, _)| *value_type)
    }

    fn finish(self) -> ColumnVerdict {
        let dominant_type = self.dominant();
        let is_consistent = self.order.len() <= 1;
        let detail = (!is_consistent).then(|| {
            format!(
                "Mixture of types: {}",
                self.order
                    .iter()
                    .map(|value_type| format!("{value_type}({})", self.counts[value_type]))
                    .join(", ")
            )
        });
        ColumnVerdict {
            total_classified: self.counts.values().sum(),
            types_found: self.order,
            type_counts: self.counts,
            missing_count: self.missing,
            dominant_type,
            is_consistent,
            detail,
        }
    }
}

/// Classifies every value of a column and summarises the mixture of types.
///
/// `None` entries are the missing marker. Blank cells are dropped, missing
/// cells are counted but never affect consistency or the dominant type.
pub fn analyze<'a, I>(values: I) -> ColumnVerdict
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut tally = TypeTally::default();
    for value in values {
        tally.ingest(classify(value));
    }
    tally.finish()
}
