use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    let Some(view) = &state.view else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the options so we can mutate state inside the loops.
    let countries = view.country_options.clone();
    let sources = view.source_options.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Country selector ----
            let header = format!(
                "Select Country  ({}/{})",
                state.selection.countries.len(),
                countries.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("countries")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_countries();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_countries();
                        }
                    });
                    for country in &countries {
                        let mut checked = state.selection.countries.contains(country);
                        if ui.checkbox(&mut checked, country.as_str()).changed() {
                            state.toggle_country(country);
                        }
                    }
                });

            // ---- Source selector (options follow the country selection) ----
            // Re-read: a country change above may have changed the offered sources.
            let sources = state
                .view
                .as_ref()
                .map(|v| v.source_options.clone())
                .unwrap_or(sources);
            let n_selected = sources
                .iter()
                .filter(|s| state.selection.sources.contains(*s))
                .count();
            let header = format!("Select Source  ({n_selected}/{})", sources.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("sources")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_sources();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_sources();
                        }
                    });
                    for source in &sources {
                        let mut checked = state.selection.sources.contains(source);
                        let text = RichText::new(source).color(state.color_map.color_for(source));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_source(source);
                        }
                    }
                });

            ui.separator();

            let mut show_raw = state.show_raw;
            if ui.checkbox(&mut show_raw, "Show Raw Data").changed() {
                state.set_show_raw(show_raw);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export view…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(view)) = (&state.table, &state.view) {
            ui.label(format!(
                "{} records loaded, {} matching",
                table.len(),
                view.filtered_rows
            ))
            .on_hover_text(format!(
                "{} (parsed {}×)",
                state.store.path().display(),
                state.store.load_count()
            ));
            if let Some((first, last)) = table.date_range() {
                ui.separator();
                ui.label(format!("{first} – {last}"));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
        if let Some(err) = &state.error {
            ui.separator();
            ui.label(RichText::new(err).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open production data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.status_message = None;
        state.open_path(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export current view")
        .add_filter("JSON", &["json"])
        .set_file_name("view.json")
        .save_file();

    if let Some(path) = file {
        match state.export_view(&path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                state.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
