use std::collections::BTreeMap;

use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Slider, Ui};

use crate::data::loader;
use crate::data::model::Dataset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_range_section(ui, state, &dataset);
            ui.separator();
            country_section(ui, state, &dataset);
        });
}

fn year_range_section(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    let (lo, hi) = dataset.year_span.unwrap_or((2015, 2020));

    ui.strong("Year range");
    let (start, end) = &mut state.filters.year_range;
    ui.add(Slider::new(start, lo..=hi).text("from"));
    ui.add(Slider::new(end, lo..=hi).text("to"));
    state.normalize_year_range();
}

fn country_section(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!(
            "Countries  ({}/{})",
            state.filters.selected_countries.len(),
            dataset.iso3_codes.len()
        ));
        if ui.small_button("All").clicked() {
            state.select_all_countries();
        }
        if ui.small_button("None").clicked() {
            state.select_no_countries();
        }
    });

    // Group observed codes by region; reference-table metadata wins when
    // both know the country.
    let mut by_region: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
    for code in &dataset.iso3_codes {
        let (region, name) = match dataset.countries.iter().find(|c| &c.iso3 == code) {
            Some(c) => (c.region.clone(), c.name.clone()),
            None => {
                let region = dataset
                    .observations
                    .iter()
                    .find(|o| &o.iso3 == code)
                    .map(|o| o.region.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                (region, dataset.country_name(code))
            }
        };
        by_region.entry(region).or_default().push((code.clone(), name));
    }

    for (region, mut entries) in by_region {
        entries.sort_by(|a, b| a.1.cmp(&b.1));
        let n_selected = entries
            .iter()
            .filter(|(code, _)| state.filters.selected_countries.contains(code))
            .count();
        let header_text = format!("{region}  ({n_selected}/{})", entries.len());

        egui::CollapsingHeader::new(RichText::new(header_text).strong())
            .id_salt(&region)
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for (code, name) in &entries {
                    let mut checked = state.filters.selected_countries.contains(code);
                    if ui.checkbox(&mut checked, format!("{name} ({code})")).changed() {
                        state.toggle_country(code);
                    }
                }
            });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open observations…").clicked() {
                open_observations_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open country reference…").clicked() {
                open_reference_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} observations, {} countries, {} indicators",
                ds.len(),
                ds.iso3_codes.len(),
                ds.indicator_labels.len()
            ));
        }

        ui.separator();

        ui.label("Placeholder seed");
        ui.add(DragValue::new(&mut state.placeholder_seed));

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_observations_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open observation data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_observations(&path) {
            Ok(observations) => {
                // Keep an already-loaded reference table.
                let countries = state
                    .dataset
                    .take()
                    .map(|ds| ds.countries)
                    .unwrap_or_default();
                let dataset = Dataset::from_parts(observations, countries);
                log::info!(
                    "Loaded {} observations covering {} indicators",
                    dataset.len(),
                    dataset.indicator_labels.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load observations: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn open_reference_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open country reference table")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_country_reference(&path) {
            Ok(countries) => {
                log::info!("Loaded reference table with {} countries", countries.len());
                state.set_country_reference(countries);
            }
            Err(e) => {
                log::error!("Failed to load country reference: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
