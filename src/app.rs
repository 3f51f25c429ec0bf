use eframe::egui;

use crate::state::AppState;
use crate::ui::{metrics, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AquaPanelApp {
    pub state: AppState,
}

impl AquaPanelApp {
    /// Build the app and load the default data file once.
    pub fn new(mut state: AppState) -> Self {
        state.load();
        Self { state }
    }
}

impl Default for AquaPanelApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for AquaPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, chart, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            metrics::dashboard(ui, &mut self.state);
        });
    }
}
