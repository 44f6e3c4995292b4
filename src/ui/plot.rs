use std::collections::BTreeMap;

use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::pipeline::catalog::IndicatorSpec;
use crate::pipeline::summary::MetricSummary;
use crate::pipeline::viz::{ChartKind, ChartSpec, VizPackage};

// ---------------------------------------------------------------------------
// Indicator panel (central panel building block)
// ---------------------------------------------------------------------------

/// Render one indicator: title, chart, and the three metric tiles.
pub fn indicator_panel(ui: &mut Ui, spec: &IndicatorSpec, pkg: &VizPackage) {
    ui.strong(spec.title);
    ui.label(RichText::new(spec.subtitle).weak().small());
    ui.add_space(2.0);

    chart(ui, spec.key, &pkg.chart);
    metric_row(ui, spec.key, &pkg.metrics);
}

// ---------------------------------------------------------------------------
// Chart rendering
// ---------------------------------------------------------------------------

fn chart(ui: &mut Ui, id: &str, spec: &ChartSpec) {
    if spec.no_data {
        ui.group(|ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.add_space(24.0);
                ui.label(RichText::new("No data available for the selected filters").heading());
                ui.add_space(24.0);
            });
        });
        return;
    }

    let color_map = ColorMap::new(spec.groups.iter().map(|g| g.name.as_str()));

    Plot::new(id)
        .legend(Legend::default())
        .height(260.0)
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .show(ui, |plot_ui| match spec.kind {
            ChartKind::Line => {
                for group in &spec.groups {
                    let points: PlotPoints = group
                        .points
                        .iter()
                        .map(|&(year, value)| [f64::from(year), value])
                        .collect();
                    let line = Line::new(points)
                        .name(&group.name)
                        .color(color_map.color_for(&group.name))
                        .width(1.5);
                    plot_ui.line(line);
                }
            }
            ChartKind::Bar => {
                // Side-by-side bars: offset each group within the year slot.
                let n = spec.groups.len().max(1);
                let width = 0.8 / n as f64;
                for (i, group) in spec.groups.iter().enumerate() {
                    let offset = (i as f64 - (n as f64 - 1.0) / 2.0) * width;
                    let bars: Vec<Bar> = group
                        .points
                        .iter()
                        .map(|&(year, value)| {
                            Bar::new(f64::from(year) + offset, value).width(width)
                        })
                        .collect();
                    let chart = BarChart::new(bars)
                        .name(&group.name)
                        .color(color_map.color_for(&group.name));
                    plot_ui.bar_chart(chart);
                }
            }
            ChartKind::StackedBar => {
                // Stack groups per year via running base offsets.
                let mut base: BTreeMap<i32, f64> = BTreeMap::new();
                for group in &spec.groups {
                    let bars: Vec<Bar> = group
                        .points
                        .iter()
                        .map(|&(year, value)| {
                            let offset = base.entry(year).or_insert(0.0);
                            let bar = Bar::new(f64::from(year), value)
                                .base_offset(*offset)
                                .width(0.6);
                            *offset += value;
                            bar
                        })
                        .collect();
                    let chart = BarChart::new(bars)
                        .name(&group.name)
                        .color(color_map.color_for(&group.name));
                    plot_ui.bar_chart(chart);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

fn metric_row(ui: &mut Ui, id: &str, metrics: &MetricSummary) {
    ui.push_id(("metrics", id), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .column(Column::remainder())
            .column(Column::remainder())
            .column(Column::remainder())
            .header(18.0, |mut header| {
                for title in ["Average", "Maximum", "Minimum"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                body.row(20.0, |mut row| {
                    for value in [metrics.average, metrics.max, metrics.min] {
                        row.col(|ui| {
                            ui.label(format_metric(value));
                        });
                    }
                });
            });
    });
}

/// Compact human formatting: large magnitudes collapse to K/M/B suffixes.
fn format_metric(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_metric;

    #[test]
    fn metric_formatting_scales() {
        assert_eq!(format_metric(2.34), "2.3");
        assert_eq!(format_metric(15_300.0), "15.3K");
        assert_eq!(format_metric(2_500_000.0), "2.5M");
        assert_eq!(format_metric(1_200_000_000.0), "1.2B");
        assert_eq!(format_metric(-3_000_000.0), "-3.0M");
    }
}
