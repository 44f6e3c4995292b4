use rand::Rng;

use crate::data::model::{Dataset, Series};

use super::placeholder::{self, PlaceholderSpec, DEFAULT_COUNTRIES};

// ---------------------------------------------------------------------------
// Matcher – how an indicator family selects its observations
// ---------------------------------------------------------------------------

/// Label matching mode. The source data mixes exact labels, free-text
/// substring matches, and fixed label sets per indicator family, so all
/// three are kept as explicit variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Matcher {
    /// `indicator_label` equals the label verbatim.
    Exact(&'static str),
    /// Case-insensitive substring match. An empty pattern is a programmer
    /// error and hard-fails.
    Contains(&'static str),
    /// Membership in a fixed set of exact labels. Must be non-empty.
    AnyOf(&'static [&'static str]),
}

impl Matcher {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Exact(l) => label == *l,
            Matcher::Contains(pattern) => {
                assert!(!pattern.is_empty(), "substring matcher must not be empty");
                label.to_lowercase().contains(&pattern.to_lowercase())
            }
            Matcher::AnyOf(labels) => {
                assert!(!labels.is_empty(), "label-set matcher must not be empty");
                labels.iter().any(|l| label == *l)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// All observations whose label satisfies the matcher. Pure selection, no
/// fallback; an empty result is an empty series.
pub fn select(dataset: &Dataset, matcher: &Matcher) -> Series {
    let rows = dataset
        .observations
        .iter()
        .filter(|obs| matcher.matches(&obs.indicator_label))
        .cloned()
        .collect();
    Series::new(rows)
}

/// Resolve an indicator: select matching observations, or fall back to a
/// generated placeholder series when nothing matches. Never fails on an
/// empty dataset.
pub fn resolve<R: Rng>(
    dataset: &Dataset,
    matcher: &Matcher,
    spec: &PlaceholderSpec,
    rng: &mut R,
) -> Series {
    let selected = select(dataset, matcher);
    if !selected.is_empty() {
        return selected;
    }
    fallback(dataset, spec, rng)
}

/// Generate the placeholder series for an indicator: the first ≤5 distinct
/// ISO3 codes the dataset knows (the fixed default set when it knows none)
/// over the default year window.
pub fn fallback<R: Rng>(dataset: &Dataset, spec: &PlaceholderSpec, rng: &mut R) -> Series {
    let mut countries = dataset.leading_iso3(DEFAULT_COUNTRIES.len());
    if countries.is_empty() {
        countries = DEFAULT_COUNTRIES.iter().map(|s| s.to_string()).collect();
    }
    log::debug!(
        "no observations for '{}', generating placeholder series for {} countries",
        spec.label,
        countries.len()
    );
    placeholder::generate(&countries, &placeholder::default_years(), spec, rng)
}
