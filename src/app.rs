use std::sync::Arc;

use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::model::LaunchTable;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    pub fn new(table: Arc<LaunchTable>, config: &DashboardConfig) -> Self {
        Self {
            state: AppState::new(table, config),
        }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: plotted rows ----
        egui::TopBottomPanel::bottom("records_panel")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                plot::records_table(ui, &self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::proportion_chart(ui, &self.state);
            ui.separator();
            let height = ui.available_height() - 30.0;
            plot::scatter_chart(ui, &self.state, height.max(150.0));
        });
    }
}
