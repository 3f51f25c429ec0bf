use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::filter::{cascade_sources, distinct_values, reconcile_sources};
use crate::data::model::{CategoryField, Metric, Selection, Table};
use crate::data::store::DataStore;
use crate::view::{render, ViewModel};

/// Where the dashboard looks for data on startup.
pub const DEFAULT_DATA_PATH: &str = "data/production_basic_aggregated.csv";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub store: DataStore,

    /// Loaded table (None until a load succeeds).
    pub table: Option<Arc<Table>>,

    pub selection: Selection,

    /// Metric shown on the chart.
    pub metric: Metric,

    /// Whether the raw-data preview is shown.
    pub show_raw: bool,

    /// View for the current table and selection (None while halted).
    pub view: Option<ViewModel>,

    /// Colours per source, built over the whole table.
    pub color_map: ColorMap,

    /// Terminal load error shown instead of the dashboard.
    pub error: Option<String>,

    /// Non-fatal status line (export results and the like).
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DataStore::new(DEFAULT_DATA_PATH))
    }
}

impl AppState {
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            table: None,
            selection: Selection::default(),
            metric: Metric::default(),
            show_raw: false,
            view: None,
            color_map: ColorMap::default(),
            error: None,
            status_message: None,
        }
    }

    /// Fetch the table from the store and reset selections to "everything".
    ///
    /// This is the one place a load failure is turned into UI state: the
    /// message is kept and the table and view are cleared, so nothing further
    /// renders for this cycle.
    pub fn load(&mut self) {
        log::debug!(
            "Fetching table for {} (cached: {})",
            self.store.path().display(),
            self.store.is_loaded()
        );
        match self.store.table() {
            Ok(table) => {
                if table.is_empty() {
                    log::warn!("{} has no rows with a valid date", self.store.path().display());
                }
                self.selection = Selection::all(&table);
                self.color_map =
                    ColorMap::new(&distinct_values(&table, CategoryField::Source));
                self.table = Some(table);
                self.error = None;
                self.rerender();
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.store.path().display());
                self.error = Some(e.to_string());
                self.table = None;
                self.view = None;
            }
        }
    }

    /// Drop the cache and load again.
    pub fn reload(&mut self) {
        self.store.invalidate();
        self.load();
    }

    /// Switch to another data file.
    pub fn open_path(&mut self, path: PathBuf) {
        self.store.set_path(path);
        self.load();
    }

    /// Recompute the view after any change.
    pub fn rerender(&mut self) {
        self.view = self
            .table
            .as_deref()
            .map(|t| render(t, &self.selection, self.metric, self.show_raw));
    }

    // -- country selector --

    pub fn toggle_country(&mut self, country: &str) {
        let mut countries = self.selection.countries.clone();
        if !countries.remove(country) {
            countries.insert(country.to_string());
        }
        self.set_countries(countries);
    }

    pub fn select_all_countries(&mut self) {
        if let Some(t) = &self.table {
            let all = distinct_values(t, CategoryField::Country).into_iter().collect();
            self.set_countries(all);
        }
    }

    pub fn select_no_countries(&mut self) {
        self.set_countries(Default::default());
    }

    fn set_countries(&mut self, countries: std::collections::BTreeSet<String>) {
        if let Some(t) = &self.table {
            let before = cascade_sources(t, &self.selection.countries);
            let after = cascade_sources(t, &countries);
            self.selection.sources = reconcile_sources(&before, &after, &self.selection.sources);
        }
        self.selection.countries = countries;
        self.rerender();
    }

    // -- source selector --

    pub fn toggle_source(&mut self, source: &str) {
        if !self.selection.sources.remove(source) {
            self.selection.sources.insert(source.to_string());
        }
        self.rerender();
    }

    pub fn select_all_sources(&mut self) {
        if let Some(t) = &self.table {
            self.selection.sources = cascade_sources(t, &self.selection.countries)
                .into_iter()
                .collect();
            self.rerender();
        }
    }

    pub fn select_no_sources(&mut self) {
        self.selection.sources.clear();
        self.rerender();
    }

    // -- display options --

    pub fn set_metric(&mut self, metric: Metric) {
        if self.metric != metric {
            self.metric = metric;
            self.rerender();
        }
    }

    pub fn set_show_raw(&mut self, show_raw: bool) {
        if self.show_raw != show_raw {
            self.show_raw = show_raw;
            self.rerender();
        }
    }

    /// Write the current view model as pretty JSON.
    pub fn export_view(&self, path: &Path) -> Result<()> {
        let view = self.view.as_ref().context("nothing to export")?;
        let json = serde_json::to_string_pretty(view).context("serializing view")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewBody;
    use std::io::Write;

    fn fixture() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "date,country,source,production_m3,service_hours,production_m3_per_hour\n\
             2023-01-01,A,X,1000000,5,10\n\
             2023-01-01,A,Y,2000000,7,20\n\
             2023-01-02,B,X,3000000,1,30\n\
             2023-01-02,B,Z,4000000,1,40\n\
             2023-13-40,CountryA,SourceX,100,10,10"
        )
        .unwrap();
        file
    }

    fn loaded(file: &tempfile::NamedTempFile) -> AppState {
        let mut state = AppState::new(DataStore::new(file.path()));
        state.load();
        state
    }

    #[test]
    fn load_selects_everything() {
        let file = fixture();
        let state = loaded(&file);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.filtered_rows, 4);
        assert_eq!(view.country_options, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(state.selection.sources.len(), 3);
        assert!(state.error.is_none());
    }

    #[test]
    fn missing_file_halts_rendering() {
        let mut state = AppState::new(DataStore::new("no/such/file.csv"));
        state.load();
        assert!(state.view.is_none());
        assert!(state.table.is_none());
        assert!(state.error.as_deref().unwrap().contains("was not found"));

        state.toggle_country("A");
        assert!(state.view.is_none());
    }

    #[test]
    fn narrowing_countries_prunes_sources() {
        let file = fixture();
        let mut state = loaded(&file);

        state.toggle_country("B");
        assert_eq!(state.view.as_ref().unwrap().source_options, vec!["X".to_string(), "Y".to_string()]);
        assert!(!state.selection.sources.contains("Z"));
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 2);

        state.toggle_country("B");
        assert!(state.selection.sources.contains("Z"));
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 4);
    }

    #[test]
    fn deselected_source_stays_deselected() {
        let file = fixture();
        let mut state = loaded(&file);

        state.toggle_source("X");
        state.toggle_country("A");
        state.toggle_country("A");
        assert!(!state.selection.sources.contains("X"));
    }

    #[test]
    fn clearing_countries_shows_warning() {
        let file = fixture();
        let mut state = loaded(&file);
        state.select_no_countries();

        let view = state.view.as_ref().unwrap();
        assert!(matches!(view.body, ViewBody::NoData { .. }));
        assert!(view.source_options.is_empty());

        state.select_all_countries();
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 4);
    }

    #[test]
    fn source_all_and_none() {
        let file = fixture();
        let mut state = loaded(&file);
        state.select_no_sources();
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 0);
        state.select_all_sources();
        assert_eq!(state.view.as_ref().unwrap().filtered_rows, 4);
    }

    #[test]
    fn metric_and_preview_rerender() {
        let file = fixture();
        let mut state = loaded(&file);
        state.set_metric(Metric::ServiceHours);
        state.set_show_raw(true);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.body.chart().unwrap().y_title, "Service Hours");
        assert_eq!(view.preview.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn reload_reads_file_again() {
        let file = fixture();
        let mut state = loaded(&file);
        state.load();
        assert_eq!(state.store.load_count(), 1);
        state.reload();
        assert_eq!(state.store.load_count(), 2);
    }

    #[test]
    fn export_writes_json() {
        let file = fixture();
        let state = loaded(&file);
        let out = tempfile::NamedTempFile::new().unwrap();
        state.export_view(out.path()).unwrap();
        let text = std::fs::read_to_string(out.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["filtered_rows"], 4);
    }
}
