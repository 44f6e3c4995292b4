use eframe::egui::{self, ScrollArea, Ui};

use crate::pipeline::catalog::{self, Topic};
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GovScopeApp {
    pub state: AppState,
}

impl eframe::App for GovScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: topic tabs + indicator panels ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open an observation file to view indicators  (File → Open…)");
            });
            return;
        }
    };

    // Topic tabs, mirroring the dashboard's topic pages.
    ui.horizontal(|ui: &mut Ui| {
        for topic in Topic::ALL {
            if ui
                .selectable_label(state.topic == topic, topic.label())
                .clicked()
            {
                state.topic = topic;
            }
        }
    });
    ui.separator();

    // Each panel re-runs its pipeline from the immutable dataset every
    // frame; selections and seed are the only inputs that change.
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for spec in catalog::topic_indicators(state.topic) {
                let package =
                    catalog::run(&dataset, spec, &state.filters, state.placeholder_seed);
                plot::indicator_panel(ui, spec, &package);
                ui.separator();
            }
        });
}
