use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Metric, Record};
use crate::state::AppState;
use crate::ui::plot;
use crate::view::{MetricCards, ViewBody};

// ---------------------------------------------------------------------------
// Central panel – headline metrics, chart, raw preview
// ---------------------------------------------------------------------------

pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    if let Some(err) = &state.error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(err).color(Color32::RED).heading());
        });
        return;
    }

    let mut metric = state.metric;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let Some(view) = &state.view else {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Loading…");
                });
                return;
            };

            ui.heading("Water Production Dashboard: Country and Source Analysis");
            ui.label("Analyzing daily production and efficiency metrics over time for water sources.");
            ui.add_space(8.0);

            if let ViewBody::NoData { message } = &view.body {
                ui.label(RichText::new(message).color(Color32::YELLOW));
            }

            if let Some(metrics) = view.body.metrics() {
                metric_cards(ui, metrics);
                ui.separator();
            }

            if let Some(chart) = view.body.chart() {
                ui.strong("Production and Efficiency Over Time");
                egui::ComboBox::from_id_salt("metric")
                    .selected_text(metric.label())
                    .show_ui(ui, |ui: &mut Ui| {
                        for m in Metric::ALL {
                            ui.selectable_value(&mut metric, m, m.label());
                        }
                    });
                ui.label(RichText::new(&chart.title).italics());
                plot::time_series_plot(ui, chart, &state.color_map, 360.0);
            }

            if let Some(rows) = &view.preview {
                ui.add_space(8.0);
                ui.strong(format!("Raw Data (First {} rows)", crate::view::PREVIEW_ROW_LIMIT));
                raw_table(ui, rows);
            }
        });

    state.set_metric(metric);
}

fn metric_cards(ui: &mut Ui, cards: &MetricCards) {
    let entries = [
        ("Total Production", &cards.total_production),
        ("Average Efficiency", &cards.avg_efficiency),
        ("Total Service Hours", &cards.total_service_hours),
    ];
    ui.columns(3, |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(entries) {
            col.label(title);
            col.label(RichText::new(value.as_str()).size(26.0).strong());
        }
    });
}

fn raw_table(ui: &mut Ui, rows: &[Record]) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(80.0), Record::COLUMNS.len())
        .header(20.0, |mut header| {
            for title in Record::COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                let cells = [
                    r.date.to_string(),
                    r.country.clone(),
                    r.source.clone(),
                    r.production_m3.to_string(),
                    r.service_hours.to_string(),
                    r.production_m3_per_hour.to_string(),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
