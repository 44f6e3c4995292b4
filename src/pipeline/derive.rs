use std::collections::BTreeMap;

use crate::data::model::{Observation, Series};

// ---------------------------------------------------------------------------
// Derived metrics: joining two indicator series
// ---------------------------------------------------------------------------

/// How the joined numerator/denominator pair is combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation {
    /// `num / den`
    Ratio,
    /// `num / den * 100`
    Percentage,
}

/// Join two series on `(year, iso3)` and compute the derived value.
///
/// Inner-join semantics: rows present in only one series are dropped. Rows
/// whose denominator is missing or non-positive are dropped too (the safe
/// division never yields infinity). Country and region metadata come from
/// the numerator side; every output row carries the synthetic `label`.
pub fn derive(numerator: &Series, denominator: &Series, relation: Relation, label: &str) -> Series {
    let mut den_index: BTreeMap<(i32, &str), f64> = BTreeMap::new();
    for obs in &denominator.rows {
        if let Some(v) = obs.value {
            den_index.insert((obs.year, obs.iso3.as_str()), v);
        }
    }

    let mut rows = Vec::new();
    for obs in &numerator.rows {
        let Some(num) = obs.value else { continue };
        let Some(&den) = den_index.get(&(obs.year, obs.iso3.as_str())) else {
            continue;
        };
        if den <= 0.0 {
            continue;
        }
        let value = match relation {
            Relation::Ratio => num / den,
            Relation::Percentage => num / den * 100.0,
        };
        rows.push(Observation {
            indicator_label: label.to_string(),
            value: Some(value),
            ..obs.clone()
        });
    }
    Series::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(year: i32, iso3: &str, value: Option<f64>) -> Observation {
        Observation {
            year,
            iso3: iso3.into(),
            country: iso3.into(),
            region: "Europe".into(),
            indicator_label: "src".into(),
            value,
        }
    }

    #[test]
    fn percentage_end_to_end() {
        let num = Series::new(vec![obs(2020, "USA", Some(10.0))]);
        let den = Series::new(vec![obs(2020, "USA", Some(200.0))]);
        let out = derive(&num, &den, Relation::Percentage, "IFFs as % of GDP");
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].value, Some(5.0));
        assert_eq!(out.rows[0].indicator_label, "IFFs as % of GDP");
    }

    #[test]
    fn ratio_relation() {
        let num = Series::new(vec![obs(2019, "DEU", Some(12.0))]);
        let den = Series::new(vec![obs(2019, "DEU", Some(16.0))]);
        let out = derive(&num, &den, Relation::Ratio, "Tax Effort Ratio");
        assert_eq!(out.rows[0].value, Some(0.75));
    }

    #[test]
    fn non_positive_denominator_never_produces_a_value() {
        let num = Series::new(vec![
            obs(2018, "DEU", Some(5.0)),
            obs(2019, "DEU", Some(5.0)),
            obs(2020, "DEU", Some(5.0)),
        ]);
        let den = Series::new(vec![
            obs(2018, "DEU", Some(0.0)),
            obs(2019, "DEU", Some(-3.0)),
            obs(2020, "DEU", Some(2.0)),
        ]);
        let out = derive(&num, &den, Relation::Ratio, "d");
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].year, 2020);
        assert_eq!(out.rows[0].value, Some(2.5));
    }

    #[test]
    fn inner_join_drops_unmatched_rows() {
        let num = Series::new(vec![obs(2018, "DEU", Some(1.0)), obs(2019, "FRA", Some(1.0))]);
        let den = Series::new(vec![obs(2018, "DEU", Some(2.0)), obs(2018, "JPN", Some(2.0))]);
        let out = derive(&num, &den, Relation::Ratio, "d");
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows[0].iso3, "DEU");
    }

    #[test]
    fn missing_values_are_dropped_not_propagated() {
        let num = Series::new(vec![obs(2018, "DEU", None), obs(2019, "DEU", Some(4.0))]);
        let den = Series::new(vec![obs(2018, "DEU", Some(2.0)), obs(2019, "DEU", None)]);
        let out = derive(&num, &den, Relation::Ratio, "d");
        assert!(out.is_empty());
    }
}
