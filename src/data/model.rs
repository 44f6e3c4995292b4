use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Observation – a single indicator fact
// ---------------------------------------------------------------------------

/// One observed value of an indicator for a country and year.
///
/// `value` is `None` when the source reported the observation as missing;
/// downstream aggregation skips missing values instead of coercing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    /// ISO3 country code, e.g. "DEU".
    pub iso3: String,
    /// Display name, e.g. "Germany".
    pub country: String,
    pub region: String,
    pub indicator_label: String,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Series – observations sharing one conceptual indicator
// ---------------------------------------------------------------------------

/// A collection of observations for one indicator (possibly multi-country,
/// multi-year). Ordering carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct Series {
    pub rows: Vec<Observation>,
}

impl Series {
    pub fn new(rows: Vec<Observation>) -> Self {
        Series { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent year present, or `None` for an empty series.
    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|o| o.year).max()
    }
}

// ---------------------------------------------------------------------------
// CountryRef – one row of the country reference table
// ---------------------------------------------------------------------------

/// Country reference entry: display metadata plus map coordinates.
#[derive(Debug, Clone)]
pub struct CountryRef {
    pub iso3: String,
    pub name: String,
    pub region: String,
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded data with pre-computed indexes
// ---------------------------------------------------------------------------

/// The full loaded dataset: observations, the country reference table, and
/// the unique-value indexes the sidebar filters are built from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    pub countries: Vec<CountryRef>,
    /// Sorted unique indicator labels.
    pub indicator_labels: Vec<String>,
    /// Sorted unique ISO3 codes present in the observations.
    pub iso3_codes: Vec<String>,
    /// Sorted unique region names.
    pub regions: Vec<String>,
    /// Inclusive (min, max) year span, `None` when there are no observations.
    pub year_span: Option<(i32, i32)>,
}

impl Dataset {
    /// Build indexes from loaded observations and an optional reference table.
    pub fn from_parts(observations: Vec<Observation>, countries: Vec<CountryRef>) -> Self {
        let mut labels: BTreeSet<String> = BTreeSet::new();
        let mut codes: BTreeSet<String> = BTreeSet::new();
        let mut regions: BTreeSet<String> = BTreeSet::new();
        let mut year_span: Option<(i32, i32)> = None;

        for obs in &observations {
            labels.insert(obs.indicator_label.clone());
            codes.insert(obs.iso3.clone());
            regions.insert(obs.region.clone());
            year_span = Some(match year_span {
                None => (obs.year, obs.year),
                Some((lo, hi)) => (lo.min(obs.year), hi.max(obs.year)),
            });
        }
        for c in &countries {
            regions.insert(c.region.clone());
        }

        Dataset {
            observations,
            countries,
            indicator_labels: labels.into_iter().collect(),
            iso3_codes: codes.into_iter().collect(),
            regions: regions.into_iter().collect(),
            year_span,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset holds no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Reference-table name for a code, falling back to the code itself.
    pub fn country_name(&self, iso3: &str) -> String {
        self.countries
            .iter()
            .find(|c| c.iso3 == iso3)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| iso3.to_string())
    }

    /// First `limit` distinct ISO3 codes in observation order, topped up from
    /// the reference table. Used to pick placeholder countries.
    pub fn leading_iso3(&self, limit: usize) -> Vec<String> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut out = Vec::new();
        let obs = self.observations.iter().map(|o| o.iso3.as_str());
        let refs = self.countries.iter().map(|c| c.iso3.as_str());
        for code in obs.chain(refs) {
            if out.len() == limit {
                break;
            }
            if seen.insert(code) {
                out.push(code.to_string());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, iso3: &str, label: &str, value: f64) -> Observation {
        Observation {
            year,
            iso3: iso3.into(),
            country: iso3.into(),
            region: "Europe".into(),
            indicator_label: label.into(),
            value: Some(value),
        }
    }

    #[test]
    fn dataset_indexes() {
        let ds = Dataset::from_parts(
            vec![
                obs(2018, "DEU", "GDP (current US$)", 1.0),
                obs(2016, "FRA", "Tax Revenue - % of GDP - value", 2.0),
                obs(2020, "DEU", "GDP (current US$)", 3.0),
            ],
            Vec::new(),
        );
        assert_eq!(ds.iso3_codes, vec!["DEU", "FRA"]);
        assert_eq!(ds.indicator_labels.len(), 2);
        assert_eq!(ds.year_span, Some((2016, 2020)));
    }

    #[test]
    fn leading_iso3_prefers_observed_codes() {
        let countries = vec![
            CountryRef {
                iso3: "KEN".into(),
                name: "Kenya".into(),
                region: "Africa".into(),
                lat: 0.0,
                lon: 37.9,
            },
            CountryRef {
                iso3: "GHA".into(),
                name: "Ghana".into(),
                region: "Africa".into(),
                lat: 7.9,
                lon: -1.0,
            },
        ];
        let ds = Dataset::from_parts(vec![obs(2019, "DEU", "x", 1.0)], countries);
        assert_eq!(ds.leading_iso3(5), vec!["DEU", "KEN", "GHA"]);
        assert_eq!(ds.leading_iso3(1), vec!["DEU"]);
    }

    #[test]
    fn latest_year_of_series() {
        let s = Series::new(vec![obs(2018, "DEU", "x", 1.0), obs(2020, "DEU", "x", 2.0)]);
        assert_eq!(s.latest_year(), Some(2020));
        assert_eq!(Series::default().latest_year(), None);
    }
}
