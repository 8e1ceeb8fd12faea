//! Saved-record list state shared by the history and per-radiologist views.
//!
//! DESIGN
//! ======
//! The fetched list is kept as-is; search and ordering are derived on read so
//! changing the query never loses data. Expansion is tracked by record key.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use std::cmp::Ordering;
use std::collections::HashSet;

use time::Date;

use crate::net::types::DiagnosticRecord;
use crate::util::format::parse_leading_date;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    PrecisionDesc,
    PrecisionAsc,
}

impl SortOrder {
    /// Orders offered in the history selector. Precision ordering exists but
    /// is not exposed.
    pub const OFFERED: [Self; 2] = [Self::DateDesc, Self::DateAsc];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date_desc",
            Self::DateAsc => "date_asc",
            Self::PrecisionDesc => "prec_desc",
            Self::PrecisionAsc => "prec_asc",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "Fecha: más recientes",
            Self::DateAsc => "Fecha: más antiguos",
            Self::PrecisionDesc => "Precisión: mayor a menor",
            Self::PrecisionAsc => "Precisión: menor a mayor",
        }
    }

    /// Unknown values fall back to the default order.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "date_asc" => Self::DateAsc,
            "prec_desc" => Self::PrecisionDesc,
            "prec_asc" => Self::PrecisionAsc,
            _ => Self::DateDesc,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordsState {
    pub items: Vec<DiagnosticRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub query: String,
    pub sort: SortOrder,
    expanded: HashSet<String>,
}

impl RecordsState {
    /// Empty list awaiting its first fetch.
    #[must_use]
    pub fn loading() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Replace the list after a fetch; expansion is reset.
    pub fn set_items(&mut self, items: Vec<DiagnosticRecord>) {
        self.items = items;
        self.expanded.clear();
        self.loading = false;
        self.error = None;
    }

    /// Flip the detail panel of one record.
    pub fn toggle(&mut self, key: &str) {
        if !self.expanded.remove(key) {
            self.expanded.insert(key.to_owned());
        }
    }

    #[must_use]
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.contains(key)
    }

    /// Records matching the query, in the selected order.
    #[must_use]
    pub fn visible(&self) -> Vec<DiagnosticRecord> {
        let mut out = filter_records(&self.items, &self.query);
        sort_records(&mut out, self.sort);
        out
    }
}

/// Case-insensitive substring match across key, city, parish, canton and
/// gender. A blank query keeps everything.
#[must_use]
pub fn filter_records(items: &[DiagnosticRecord], query: &str) -> Vec<DiagnosticRecord> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|r| matches_term(r, &term)).cloned().collect()
}

fn matches_term(record: &DiagnosticRecord, term: &str) -> bool {
    [&record.key, &record.city, &record.parish, &record.canton, &record.gender]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

/// Stable sort. Unparseable dates sort as the oldest; missing precision as 0.
pub fn sort_records(items: &mut [DiagnosticRecord], order: SortOrder) {
    match order {
        SortOrder::DateDesc => items.sort_by(|a, b| record_date(b).cmp(&record_date(a))),
        SortOrder::DateAsc => items.sort_by(|a, b| record_date(a).cmp(&record_date(b))),
        SortOrder::PrecisionDesc => items.sort_by(|a, b| cmp_precision(b, a)),
        SortOrder::PrecisionAsc => items.sort_by(|a, b| cmp_precision(a, b)),
    }
}

fn record_date(record: &DiagnosticRecord) -> Date {
    parse_leading_date(&record.inference_date).unwrap_or(Date::MIN)
}

fn cmp_precision(a: &DiagnosticRecord, b: &DiagnosticRecord) -> Ordering {
    a.precision.unwrap_or(0.0).total_cmp(&b.precision.unwrap_or(0.0))
}
