use serde::Serialize;

use crate::data::model::Series;

// ---------------------------------------------------------------------------
// Metric summary over the latest year
// ---------------------------------------------------------------------------

/// Mean/max/min over the most recent year of a series. The all-zero value is
/// the documented sentinel for "nothing to summarize"; the presentation
/// layer always receives this shape, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSummary {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl MetricSummary {
    pub const ZERO: MetricSummary = MetricSummary {
        average: 0.0,
        max: 0.0,
        min: 0.0,
    };
}

/// Summarize a series over its maximum year present, ignoring missing
/// values. Empty input (or a latest year with only missing values) yields
/// [`MetricSummary::ZERO`].
pub fn summarize(series: &Series) -> MetricSummary {
    let Some(latest) = series.latest_year() else {
        return MetricSummary::ZERO;
    };

    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    for obs in series.rows.iter().filter(|o| o.year == latest) {
        let Some(v) = obs.value else { continue };
        count += 1;
        sum += v;
        max = max.max(v);
        min = min.min(v);
    }

    if count == 0 {
        return MetricSummary::ZERO;
    }
    MetricSummary {
        average: sum / count as f64,
        max,
        min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn obs(year: i32, value: Option<f64>) -> Observation {
        Observation {
            year,
            iso3: "DEU".into(),
            country: "Germany".into(),
            region: "Europe".into(),
            indicator_label: "x".into(),
            value,
        }
    }

    #[test]
    fn empty_series_yields_zero_sentinel() {
        assert_eq!(summarize(&Series::default()), MetricSummary::ZERO);
    }

    #[test]
    fn restricts_to_latest_year() {
        let series = Series::new(vec![
            obs(2018, Some(10.0)),
            obs(2018, Some(20.0)),
            obs(2019, Some(30.0)),
        ]);
        let s = summarize(&series);
        assert_eq!(s.average, 30.0);
        assert_eq!(s.max, 30.0);
        assert_eq!(s.min, 30.0);
    }

    #[test]
    fn mean_max_min_over_latest_year() {
        let series = Series::new(vec![
            obs(2020, Some(2.0)),
            obs(2020, Some(4.0)),
            obs(2020, Some(9.0)),
            obs(2015, Some(1000.0)),
        ]);
        let s = summarize(&series);
        assert_eq!(s.average, 5.0);
        assert_eq!(s.max, 9.0);
        assert_eq!(s.min, 2.0);
    }

    #[test]
    fn missing_values_are_ignored() {
        let series = Series::new(vec![obs(2020, None), obs(2020, Some(7.0))]);
        let s = summarize(&series);
        assert_eq!(s.average, 7.0);
    }

    #[test]
    fn all_missing_latest_year_yields_zero_sentinel() {
        let series = Series::new(vec![obs(2019, Some(5.0)), obs(2020, None)]);
        assert_eq!(summarize(&series), MetricSummary::ZERO);
    }
}
