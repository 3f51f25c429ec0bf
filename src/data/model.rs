use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Record – one row of the production table
// ---------------------------------------------------------------------------

/// A single daily measurement for one (country, source) pair.
///
/// Serialized with the display labels used everywhere downstream of the
/// loader, so exported rows and the raw preview share one header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub country: String,
    pub source: String,
    #[serde(rename = "Production (m³)")]
    pub production_m3: f64,
    #[serde(rename = "Service Hours")]
    pub service_hours: f64,
    #[serde(rename = "Efficiency (m³/hour)")]
    pub production_m3_per_hour: f64,
}

impl Record {
    /// Column headers in preview order.
    pub const COLUMNS: [&'static str; 6] = [
        "date",
        "country",
        "source",
        "Production (m³)",
        "Service Hours",
        "Efficiency (m³/hour)",
    ];

    /// Value of a categorical field.
    pub fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Country => &self.country,
            CategoryField::Source => &self.source,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric – the numeric columns under their display labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Metric {
    #[default]
    #[serde(rename = "Production (m³)")]
    Production,
    #[serde(rename = "Efficiency (m³/hour)")]
    Efficiency,
    #[serde(rename = "Service Hours")]
    ServiceHours,
}

impl Metric {
    /// Selector order.
    pub const ALL: [Metric; 3] = [Metric::Production, Metric::Efficiency, Metric::ServiceHours];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Production => "Production (m³)",
            Metric::Efficiency => "Efficiency (m³/hour)",
            Metric::ServiceHours => "Service Hours",
        }
    }

    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::Production => record.production_m3,
            Metric::Efficiency => record.production_m3_per_hour,
            Metric::ServiceHours => record.service_hours,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The categorical columns a user can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    Country,
    Source,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records of the session, in file order. Every record has a valid date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date in the table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}

// ---------------------------------------------------------------------------
// Selection – what the user has ticked
// ---------------------------------------------------------------------------

/// Inclusive lists: an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub sources: BTreeSet<String>,
}

impl Selection {
    /// Everything selected: all countries, and every source offered for them.
    pub fn all(table: &Table) -> Self {
        let countries: BTreeSet<String> =
            super::filter::distinct_values(table, CategoryField::Country)
                .into_iter()
                .collect();
        let sources = super::filter::cascade_sources(table, &countries)
            .into_iter()
            .collect();
        Selection { countries, sources }
    }
}
