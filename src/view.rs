use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::data::filter::{cascade_sources, distinct_values, filter, FilteredTable};
use crate::data::model::{CategoryField, Metric, Record, Selection, Table};
use crate::data::summary::{summarize, SummaryMetrics};

/// Maximum rows in the raw-data preview.
pub const PREVIEW_ROW_LIMIT: usize = 100;

pub const NO_DATA_MESSAGE: &str =
    "No data found for the selected filters. Please adjust your selections.";

// ---------------------------------------------------------------------------
// View model – everything one frame needs, independent of egui
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub metric: Metric,
    pub country_options: Vec<String>,
    /// Sources offered under the current country selection.
    pub source_options: Vec<String>,
    pub filtered_rows: usize,
    pub body: ViewBody,
    /// First rows of the filtered table, when the preview is switched on.
    pub preview: Option<Vec<Record>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewBody {
    /// Filtered table is empty; no metrics, no chart.
    NoData { message: String },
    Data { metrics: MetricCards, chart: ChartSpec },
}

impl ViewBody {
    pub fn metrics(&self) -> Option<&MetricCards> {
        match self {
            ViewBody::Data { metrics, .. } => Some(metrics),
            ViewBody::NoData { .. } => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            ViewBody::Data { chart, .. } => Some(chart),
            ViewBody::NoData { .. } => None,
        }
    }
}

/// The three headline figures, raw and formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCards {
    pub summary: SummaryMetrics,
    pub total_production: String,
    pub avg_efficiency: String,
    pub total_service_hours: String,
}

impl MetricCards {
    pub fn new(summary: SummaryMetrics) -> Self {
        MetricCards {
            total_production: format!("{} M m³", format_number(summary.total_production, 2)),
            avg_efficiency: format!("{} m³/hour", format_number(summary.avg_efficiency, 2)),
            total_service_hours: format!("{} hours", format_number(summary.total_service_hours, 0)),
            summary,
        }
    }
}

/// A line chart: date on x, the chosen metric on y, one line per source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub source: String,
    pub points: Vec<ChartPoint>,
}

/// One plotted value plus what the tooltip shows for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub country: String,
    pub source: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// render
// ---------------------------------------------------------------------------

/// Build the view for the current table and selection. Pure.
pub fn render(table: &Table, selection: &Selection, metric: Metric, show_raw: bool) -> ViewModel {
    let filtered = filter(table, &selection.countries, &selection.sources);

    let body = if filtered.is_empty() {
        ViewBody::NoData {
            message: NO_DATA_MESSAGE.to_string(),
        }
    } else {
        match summarize(&filtered) {
            Some(summary) => ViewBody::Data {
                metrics: MetricCards::new(summary),
                chart: chart_spec(&filtered, metric),
            },
            None => ViewBody::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            },
        }
    };

    ViewModel {
        metric,
        country_options: distinct_values(table, CategoryField::Country),
        source_options: cascade_sources(table, &selection.countries),
        filtered_rows: filtered.len(),
        body,
        preview: show_raw.then(|| filtered.head(PREVIEW_ROW_LIMIT)),
    }
}

/// Group the filtered rows into one series per source, first-seen order.
///
/// Points within a series are in date order (stable, so same-date points
/// keep table order); lines are drawn point to point in that order.
pub fn chart_spec(filtered: &FilteredTable<'_>, metric: Metric) -> ChartSpec {
    let mut series: Vec<ChartSeries> = Vec::new();

    for r in filtered.iter() {
        let point = ChartPoint {
            date: r.date,
            country: r.country.clone(),
            source: r.source.clone(),
            value: metric.value(r),
        };
        match series.iter_mut().find(|s| s.source == r.source) {
            Some(s) => s.points.push(point),
            None => series.push(ChartSeries {
                source: r.source.clone(),
                points: vec![point],
            }),
        }
    }

    for s in &mut series {
        s.points.sort_by_key(|p| p.date);
    }

    ChartSpec {
        title: format!("{metric} by Source Over Time"),
        x_title: "Date".to_string(),
        y_title: metric.label().to_string(),
        series,
    }
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// Fixed decimals with `,` thousands separators: `1234567.891` → `1,234,567.89`.
pub fn format_number(n: f64, decimals: usize) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };

    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }

    if n.is_sign_negative() {
        format!("-{res}")
    } else {
        res
    }
}
