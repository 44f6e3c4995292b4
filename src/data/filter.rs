use std::collections::BTreeSet;

use super::model::{Dataset, Series};

// ---------------------------------------------------------------------------
// Filter state: user selections from the sidebar
// ---------------------------------------------------------------------------

/// Country and year-range selections chosen via the sidebar.
/// An empty country set means "nothing selected" (hide everything), mirroring
/// the per-column filter convention elsewhere in the app.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub selected_countries: BTreeSet<String>,
    /// Inclusive (start, end).
    pub year_range: (i32, i32),
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            selected_countries: BTreeSet::new(),
            year_range: (2015, 2020),
        }
    }
}

/// Initialise a [`FilterState`] with all countries selected and the year
/// range spanning the whole dataset.
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    FilterState {
        selected_countries: dataset.iso3_codes.iter().cloned().collect(),
        year_range: dataset.year_span.unwrap_or((2015, 2020)),
    }
}

/// Restrict a resolved series to the current selections.
///
/// A row passes when its ISO3 code is in the selected set and its year lies
/// inside the inclusive range. Placeholder rows for countries the dataset
/// never saw would otherwise vanish here, so codes absent from the selected
/// set pass when the selection covers every known code (no effective filter).
pub fn apply(series: &Series, filters: &FilterState, dataset: &Dataset) -> Series {
    let all_selected = !dataset.iso3_codes.is_empty()
        && filters.selected_countries.len() >= dataset.iso3_codes.len();
    let (start, end) = filters.year_range;

    let rows = series
        .rows
        .iter()
        .filter(|obs| {
            if obs.year < start || obs.year > end {
                return false;
            }
            all_selected
                || filters.selected_countries.contains(&obs.iso3)
                || !dataset.iso3_codes.contains(&obs.iso3)
        })
        .cloned()
        .collect();

    Series::new(rows)
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

    fn dataset() -> Dataset {
        Dataset::from_parts(vec![obs(2016, "DEU"), obs(2018, "FRA"), obs(2020, "JPN")], Vec::new())
    }

    #[test]
    fn year_range_is_inclusive() {
        let ds = dataset();
        let filters = FilterState {
            selected_countries: ds.iso3_codes.iter().cloned().collect(),
            year_range: (2016, 2018),
        };
        let out = apply(&Series::new(ds.observations.clone()), &filters, &ds);
        assert_eq!(out.len(), 2);
        assert!(out.rows.iter().all(|o| (2016..=2018).contains(&o.year)));
    }

    #[test]
    fn deselected_country_is_hidden() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.selected_countries.remove("FRA");
        let out = apply(&Series::new(ds.observations.clone()), &filters, &ds);
        assert!(out.rows.iter().all(|o| o.iso3 != "FRA"));
    }

    #[test]
    fn placeholder_codes_survive_unknown_to_dataset() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        // USA never appears in the dataset, e.g. a default placeholder code.
        let series = Series::new(vec![obs(2018, "USA")]);
        let out = apply(&series, &filters, &ds);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn empty_selection_hides_known_countries() {
        let ds = dataset();
        let filters = FilterState {
            selected_countries: BTreeSet::new(),
            year_range: (2015, 2020),
        };
        let out = apply(&Series::new(ds.observations.clone()), &filters, &ds);
        assert!(out.is_empty());
    }
}
