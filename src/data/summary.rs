use serde::Serialize;

use super::filter::FilteredTable;

/// Production is reported in millions of cubic metres.
pub const PRODUCTION_SCALE: f64 = 1_000_000.0;

/// Headline figures for a non-empty filtered table. Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// Σ production, in million m³.
    pub total_production: f64,
    /// Mean efficiency (m³/hour) over rows with a value.
    pub avg_efficiency: f64,
    /// Σ service hours.
    pub total_service_hours: f64,
}

/// Compute the summary, or `None` for an empty table.
///
/// Callers branch on emptiness before getting here; the `None` arm only
/// keeps a NaN from ever being produced. Missing values (`NaN`) are skipped
/// in sums and excluded from the mean.
pub fn summarize(filtered: &FilteredTable<'_>) -> Option<SummaryMetrics> {
    if filtered.is_empty() {
        return None;
    }

    let mut production = 0.0;
    let mut hours = 0.0;
    let mut eff_sum = 0.0;
    let mut eff_count = 0usize;

    for r in filtered.iter() {
        if !r.production_m3.is_nan() {
            production += r.production_m3;
        }
        if !r.service_hours.is_nan() {
            hours += r.service_hours;
        }
        if !r.production_m3_per_hour.is_nan() {
            eff_sum += r.production_m3_per_hour;
            eff_count += 1;
        }
    }

    let avg_efficiency = if eff_count == 0 {
        f64::NAN
    } else {
        eff_sum / eff_count as f64
    };

    Some(SummaryMetrics {
        total_production: production / PRODUCTION_SCALE,
        avg_efficiency,
        total_service_hours: hours,
    })
}
