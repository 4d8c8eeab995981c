use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::export_json;
use crate::controller::ControlEvent;
use crate::data::aggregate::aggregate_single_site;
use crate::data::model::PayloadRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the site dropdown and payload range controls, then feed any change
/// to the controller.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Launch site ----
    ui.strong("Launch Site");
    let mut site = state.selection.site.clone();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(site.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.site_options {
                ui.selectable_value(&mut site, option.clone(), option.label());
            }
        });
    if site != state.selection.site {
        state.apply(ControlEvent::SiteChanged(site));
    }
    ui.add_space(8.0);

    // ---- Payload range (two handles) ----
    ui.strong("Payload range (kg)");
    let bounds = state.table().payload_bounds();
    let current = state.selection.payload_range;
    let mut lo = current.min();
    let mut hi = current.max();

    let lo_changed = ui
        .add(
            egui::Slider::new(&mut lo, bounds.min()..=bounds.max())
                .step_by(state.payload_step_kg)
                .text("min"),
        )
        .changed();
    let hi_changed = ui
        .add(
            egui::Slider::new(&mut hi, bounds.min()..=bounds.max())
                .step_by(state.payload_step_kg)
                .text("max"),
        )
        .changed();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{:.0}", bounds.min())).weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new(format!("{:.0}", bounds.max())).weak());
        });
    });

    // Dragging one handle past the other pushes it along.
    if lo_changed || hi_changed {
        if lo > hi {
            if lo_changed {
                hi = lo;
            } else {
                lo = hi;
            }
        }
        state.apply(ControlEvent::PayloadRangeChanged(PayloadRange::new(lo, hi)));
    }
    if ui.small_button("Reset range").clicked() {
        state.apply(ControlEvent::PayloadRangeChanged(bounds));
    }

    ui.separator();

    // ---- Summary of the plotted rows ----
    let visible = state.visible_records();
    let counts = aggregate_single_site(visible.iter().copied());
    ui.label(format!("{} launches plotted", counts.total()));
    ui.label(format!("{} successful, {} failed", counts.successes, counts.failures));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} launches from {} sites",
            state.table().len(),
            state.table().sites().len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .add_filter("JSON", &["json"])
        .set_file_name("launch_charts.json")
        .save_file();

    if let Some(path) = file {
        match export_json(&[&state.proportion_chart, &state.scatter_chart], &path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
