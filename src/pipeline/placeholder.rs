use rand::Rng;

use crate::data::model::{Observation, Series};

// ---------------------------------------------------------------------------
// Placeholder configuration
// ---------------------------------------------------------------------------

/// Fixed country set used when the dataset offers no ISO3 codes.
pub const DEFAULT_COUNTRIES: [&str; 5] = ["USA", "GBR", "FRA", "DEU", "JPN"];

/// Default synthetic window, 2015..=2020.
pub fn default_years() -> Vec<i32> {
    (2015..=2020).collect()
}

/// Per-indicator placeholder configuration.
///
/// When `variants` is non-empty, one full country × year grid is generated
/// per variant and the variant string becomes the row's `indicator_label`
/// (used for multi-component indicators such as intended/actual expenditure).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderSpec {
    pub label: &'static str,
    pub base_value: f64,
    /// Year-over-year growth rate, e.g. 0.05 for +5 % per year.
    pub trend: f64,
    /// Bounded relative perturbation magnitude; 0 disables randomness.
    pub variation: f64,
    pub variants: &'static [&'static str],
}

impl PlaceholderSpec {
    pub const fn flat(label: &'static str, base_value: f64) -> Self {
        PlaceholderSpec {
            label,
            base_value,
            trend: 0.0,
            variation: 0.0,
            variants: &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Produce a synthetic series covering exactly `countries` × `years`
/// (× variants when configured).
///
/// The value for year index `i` is
/// `base_value * (1 + trend)^i * (1 + variation * u)` with
/// `u ~ Uniform(-1, 1)`. The perturbation is only drawn when
/// `variation > 0`, so trend-only series are identical across seeds; all
/// randomness comes from the injected `rng`, making two calls with equal
/// arguments and seed produce identical series.
pub fn generate<R: Rng>(
    countries: &[String],
    years: &[i32],
    spec: &PlaceholderSpec,
    rng: &mut R,
) -> Series {
    let labels: Vec<&str> = if spec.variants.is_empty() {
        vec![spec.label]
    } else {
        spec.variants.to_vec()
    };

    let mut rows = Vec::with_capacity(labels.len() * countries.len() * years.len());
    for label in &labels {
        for iso3 in countries {
            let (country, region) = country_meta(iso3);
            for (i, &year) in years.iter().enumerate() {
                let mut value = spec.base_value * (1.0 + spec.trend).powi(i as i32);
                if spec.variation > 0.0 {
                    let u: f64 = rng.gen_range(-1.0..=1.0);
                    value *= 1.0 + spec.variation * u;
                }
                rows.push(Observation {
                    year,
                    iso3: iso3.clone(),
                    country: country.clone(),
                    region: region.to_string(),
                    indicator_label: label.to_string(),
                    value: Some(value),
                });
            }
        }
    }
    Series::new(rows)
}

/// Display name and region for the default placeholder codes; anything else
/// falls back to the code itself and region "Unknown".
fn country_meta(iso3: &str) -> (String, &'static str) {
    match iso3 {
        "USA" => ("United States".to_string(), "North America"),
        "GBR" => ("United Kingdom".to_string(), "Europe"),
        "FRA" => ("France".to_string(), "Europe"),
        "DEU" => ("Germany".to_string(), "Europe"),
        "JPN" => ("Japan".to_string(), "Asia"),
        other => (other.to_string(), "Unknown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn covers_exactly_countries_times_years() {
        let spec = PlaceholderSpec::flat("Test Indicator", 10.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let series = generate(&codes(&["USA", "KEN"]), &[2018, 2019, 2020], &spec, &mut rng);
        assert_eq!(series.len(), 6);
        assert!(series.rows.iter().all(|o| o.indicator_label == "Test Indicator"));
        assert!(series.rows.iter().all(|o| (2018..=2020).contains(&o.year)));
    }

    #[test]
    fn trend_compounds_per_year_index() {
        let spec = PlaceholderSpec {
            trend: 0.1,
            ..PlaceholderSpec::flat("x", 100.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let series = generate(&codes(&["DEU"]), &[2015, 2016, 2017], &spec, &mut rng);
        let values: Vec<f64> = series.rows.iter().map(|o| o.value.unwrap()).collect();
        assert_eq!(values[0], 100.0);
        assert!((values[1] - 110.0).abs() < 1e-9);
        assert!((values[2] - 121.0).abs() < 1e-9);
    }

    #[test]
    fn identical_seed_yields_identical_series() {
        let spec = PlaceholderSpec {
            variation: 0.5,
            ..PlaceholderSpec::flat("x", 50.0)
        };
        let countries = codes(&DEFAULT_COUNTRIES);
        let years = default_years();

        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let s1 = generate(&countries, &years, &spec, &mut a);
        let s2 = generate(&countries, &years, &spec, &mut b);
        assert_eq!(s1.rows, s2.rows);
    }

    #[test]
    fn variation_is_bounded() {
        let spec = PlaceholderSpec {
            variation: 0.1,
            ..PlaceholderSpec::flat("x", 100.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let series = generate(&codes(&["USA"]), &default_years(), &spec, &mut rng);
        for obs in &series.rows {
            let v = obs.value.unwrap();
            assert!((90.0..=110.0).contains(&v), "value {v} outside perturbation bound");
        }
    }

    #[test]
    fn variants_expand_the_grid() {
        let spec = PlaceholderSpec {
            variants: &["Intended", "Actual"],
            ..PlaceholderSpec::flat("Expenditure out-turn", 25.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let series = generate(&codes(&["USA"]), &[2019, 2020], &spec, &mut rng);
        assert_eq!(series.len(), 4);
        assert_eq!(
            series.rows.iter().filter(|o| o.indicator_label == "Intended").count(),
            2
        );
    }

    #[test]
    fn unknown_code_falls_back_to_code_and_unknown_region() {
        let spec = PlaceholderSpec::flat("x", 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let series = generate(&codes(&["ZZZ"]), &[2020], &spec, &mut rng);
        assert_eq!(series.rows[0].country, "ZZZ");
        assert_eq!(series.rows[0].region, "Unknown");
    }
}
