use std::collections::BTreeSet;

use crate::data::filter::{init_filter_state, FilterState};
use crate::data::model::{CountryRef, Dataset};
use crate::pipeline::catalog::Topic;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user loads a file).
    pub dataset: Option<Dataset>,

    /// Country / year-range selections.
    pub filters: FilterState,

    /// Which dashboard topic is shown in the central panel.
    pub topic: Topic,

    /// Seed for placeholder generation; panels re-render deterministically
    /// for a fixed seed.
    pub placeholder_seed: u64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            filters: FilterState::default(),
            topic: Topic::IllicitFlows,
            placeholder_seed: 42,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and initialise the filters from it.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = init_filter_state(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Attach (or replace) the country reference table, rebuilding indexes.
    pub fn set_country_reference(&mut self, countries: Vec<CountryRef>) {
        let observations = self
            .dataset
            .take()
            .map(|ds| ds.observations)
            .unwrap_or_default();
        let dataset = Dataset::from_parts(observations, countries);
        // Keep the user's year range; refresh the country list.
        let year_range = self.filters.year_range;
        self.filters = init_filter_state(&dataset);
        self.filters.year_range = year_range;
        self.dataset = Some(dataset);
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, iso3: &str) {
        if !self.filters.selected_countries.remove(iso3) {
            self.filters.selected_countries.insert(iso3.to_string());
        }
    }

    /// Select every country the dataset knows.
    pub fn select_all_countries(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.selected_countries = ds.iso3_codes.iter().cloned().collect();
        }
    }

    /// Clear the country selection.
    pub fn select_no_countries(&mut self) {
        self.filters.selected_countries = BTreeSet::new();
    }

    /// Clamp the year range to the dataset span and keep start <= end.
    pub fn normalize_year_range(&mut self) {
        if let Some(ds) = &self.dataset {
            if let Some((lo, hi)) = ds.year_span {
                let (start, end) = &mut self.filters.year_range;
                *start = (*start).clamp(lo, hi);
                *end = (*end).clamp(lo, hi);
            }
        }
        if self.filters.year_range.0 > self.filters.year_range.1 {
            self.filters.year_range.1 = self.filters.year_range.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn obs(year: i32, iso3: &str) -> Observation {
        Observation {
            year,
            iso3: iso3.into(),
            country: iso3.into(),
            region: "Europe".into(),
            indicator_label: "x".into(),
            value: Some(1.0),
        }
    }

    #[test]
    fn set_dataset_selects_everything() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_parts(
            vec![obs(2016, "DEU"), obs(2019, "FRA")],
            Vec::new(),
        ));
        assert_eq!(state.filters.selected_countries.len(), 2);
        assert_eq!(state.filters.year_range, (2016, 2019));
    }

    #[test]
    fn toggle_country_round_trips() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_parts(vec![obs(2019, "DEU")], Vec::new()));
        state.toggle_country("DEU");
        assert!(state.filters.selected_countries.is_empty());
        state.toggle_country("DEU");
        assert!(state.filters.selected_countries.contains("DEU"));
    }

    #[test]
    fn normalize_year_range_clamps_to_span() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::from_parts(
            vec![obs(2016, "DEU"), obs(2019, "DEU")],
            Vec::new(),
        ));
        state.filters.year_range = (2000, 2030);
        state.normalize_year_range();
        assert_eq!(state.filters.year_range, (2016, 2019));
    }
}
