use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{GridMark, Legend, Line, Plot, PlotPoint, PlotPoints};

use crate::color::ColorMap;
use crate::view::ChartSpec;

// ---------------------------------------------------------------------------
// Time-series plot (central panel)
// ---------------------------------------------------------------------------

/// Dates are plotted as days since 0001-01-01.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Flattened copy of the chart for the hover label.
struct TooltipPoint {
    source: String,
    x: f64,
    label: String,
}

/// Render one line per source of `chart`.
pub fn time_series_plot(ui: &mut Ui, chart: &ChartSpec, colors: &ColorMap, height: f32) {
    let y_title = chart.y_title.clone();

    let tooltip: Vec<TooltipPoint> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .map(|p| TooltipPoint {
            source: p.source.clone(),
            x: date_to_x(p.date),
            label: format!(
                "date: {}\ncountry: {}\nsource: {}\n{}: {}",
                p.date, p.country, p.source, y_title, p.value
            ),
        })
        .collect();

    Plot::new("time_series_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(chart.x_title.clone())
        .y_axis_label(chart.y_title.clone())
        .x_axis_formatter(|mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            x_to_date(mark.value)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let nearest = tooltip
                .iter()
                .filter(|p| p.source == name)
                .min_by(|a, b| (a.x - value.x).abs().total_cmp(&(b.x - value.x).abs()));
            match nearest {
                Some(p) => p.label.clone(),
                None => {
                    let date = x_to_date(value.x).map(|d| d.to_string()).unwrap_or_default();
                    format!("date: {date}\n{y_title}: {:.2}", value.y)
                }
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .filter(|p| p.value.is_finite())
                    .map(|p| [date_to_x(p.date), p.value])
                    .collect();

                let line = Line::new(points)
                    .name(&series.source)
                    .color(colors.color_for(&series.source))
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}
