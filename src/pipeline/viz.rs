use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::Series;

use super::summary::{summarize, MetricSummary};

// ---------------------------------------------------------------------------
// Chart-ready package – the seam to the rendering layer
// ---------------------------------------------------------------------------

/// Chart-type hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ChartKind {
    Line,
    Bar,
    StackedBar,
}

/// Which field groups the series into chart traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GroupBy {
    /// One trace per country display name.
    Country,
    /// One trace per indicator label (multi-component indicators).
    Indicator,
}

/// One chart trace: `(year, value)` points sorted by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartGroup {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

/// Renderer-agnostic chart description. `no_data` marks the explicit empty
/// state; the renderer shows an annotation instead of axes full of nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub groups: Vec<ChartGroup>,
    pub no_data: bool,
}

/// What one indicator panel needs: the chart plus its metric tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VizPackage {
    pub chart: ChartSpec,
    pub metrics: MetricSummary,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Wrap a resolved, filtered series into a [`VizPackage`]. An empty series
/// (or one with only missing values) degrades to the explicit "no data"
/// chart with zeroed metrics.
pub fn build(
    series: &Series,
    group_by: GroupBy,
    kind: ChartKind,
    title: &str,
    y_label: &str,
) -> VizPackage {
    let mut grouped: BTreeMap<String, Vec<(i32, f64)>> = BTreeMap::new();
    for obs in &series.rows {
        let Some(value) = obs.value else { continue };
        let key = match group_by {
            GroupBy::Country => obs.country.clone(),
            GroupBy::Indicator => obs.indicator_label.clone(),
        };
        grouped.entry(key).or_default().push((obs.year, value));
    }

    if grouped.is_empty() {
        return VizPackage {
            chart: ChartSpec {
                title: title.to_string(),
                x_label: "Year".to_string(),
                y_label: y_label.to_string(),
                kind,
                groups: Vec::new(),
                no_data: true,
            },
            metrics: MetricSummary::ZERO,
        };
    }

    let groups = grouped
        .into_iter()
        .map(|(name, mut points)| {
            points.sort_by_key(|&(year, _)| year);
            ChartGroup { name, points }
        })
        .collect();

    VizPackage {
        chart: ChartSpec {
            title: title.to_string(),
            x_label: "Year".to_string(),
            y_label: y_label.to_string(),
            kind,
            groups,
            no_data: false,
        },
        metrics: summarize(series),
    }
}
