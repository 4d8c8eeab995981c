use std::f32::consts::TAU;

use eframe::egui::epaint::Mesh;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::chart::{ChartBody, ChartSpec, Slice};
use crate::color::{outcome_color, ColorMap};
use crate::state::AppState;

const PIE_SEGMENTS: usize = 180;

/// Hover hit box half-height, in class units.
const HOVER_Y_RADIUS: f64 = 0.1;
/// Smallest hover hit box half-width, in kg.
const MIN_HOVER_X_RADIUS_KG: f64 = 50.0;

// ---------------------------------------------------------------------------
// Proportion (pie) chart
// ---------------------------------------------------------------------------

/// Render chart 1 as a pie with a legend on the right.
pub fn proportion_chart(ui: &mut Ui, state: &AppState) {
    let chart = &state.proportion_chart;
    ui.heading(&chart.title);

    let ChartBody::Proportion { slices } = &chart.body else {
        return;
    };
    if chart.is_empty() {
        empty_chart(ui, "No launches for this selection");
        return;
    }

    let total: usize = slices.iter().map(|s| s.value).sum();
    let height = 240.0_f32.min(ui.available_height().max(120.0));

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(height), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let mut start = -TAU / 4.0;
        for slice in slices.iter().filter(|s| s.value > 0) {
            let sweep = TAU * slice.value as f32 / total as f32;
            let color = slice_color(&state.site_colors, slice);
            painter.add(Shape::mesh(slice_mesh(center, radius, start, sweep, color)));

            let mid = start + sweep / 2.0;
            let label_pos = center + Vec2::angled(mid) * radius * 0.65;
            painter.text(
                label_pos,
                Align2::CENTER_CENTER,
                format!("{:.1}%", 100.0 * slice.value as f32 / total as f32),
                FontId::proportional(13.0),
                Color32::WHITE,
            );
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            ui.label(egui::RichText::new(&chart.series_name).italics());
            for slice in slices {
                legend_row(ui, slice, slice_color(&state.site_colors, slice));
            }
        });
    });
}

/// Outcome slices get fixed green / red; site slices come from the site palette.
fn slice_color(site_colors: &ColorMap, slice: &Slice) -> Color32 {
    match slice.outcome {
        Some(outcome) => outcome_color(outcome),
        None => site_colors.color_for(&slice.label),
    }
}

/// Triangle fan covering one pie slice.
fn slice_mesh(center: Pos2, radius: f32, start: f32, sweep: f32, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    let steps = ((PIE_SEGMENTS as f32 * sweep / TAU).ceil() as usize).max(1);

    mesh.colored_vertex(center, color);
    for i in 0..=steps {
        let angle = start + sweep * i as f32 / steps as f32;
        mesh.colored_vertex(center + Vec2::angled(angle) * radius, color);
    }
    for i in 1..=steps as u32 {
        mesh.add_triangle(0, i, i + 1);
    }
    mesh
}

fn legend_row(ui: &mut Ui, slice: &Slice, color: Color32) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
        ui.painter().rect_filled(rect, 2.0, color);
        ui.label(format!("{}: {}", slice.label, slice.value));
    });
}

fn empty_chart(ui: &mut Ui, message: &str) {
    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), 120.0),
        Sense::hover(),
    );
    ui.painter()
        .rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::DARK_GRAY), egui::StrokeKind::Inside);
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(14.0),
        Color32::GRAY,
    );
}

// ---------------------------------------------------------------------------
// Scatter chart (payload vs class)
// ---------------------------------------------------------------------------

/// Render chart 2: one point per filtered launch, grouped into series by
/// booster category so the legend doubles as a colour key.
pub fn scatter_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let chart: &ChartSpec = &state.scatter_chart;
    ui.heading(&chart.title);

    let ChartBody::Scatter {
        points,
        x_axis_title,
        y_axis_title,
    } = &chart.body
    else {
        return;
    };

    let bounds = state.table().payload_bounds();

    // Series keyed by category, in first-seen order.
    let mut series: Vec<(String, Vec<[f64; 2]>)> = Vec::new();
    for p in points {
        let key = p
            .category
            .clone()
            .unwrap_or_else(|| chart.series_name.clone());
        match series.iter_mut().find(|(k, _)| *k == key) {
            Some((_, pts)) => pts.push([p.x, f64::from(p.y)]),
            None => series.push((key, vec![[p.x, f64::from(p.y)]])),
        }
    }

    // Hover text: launch site of the point under the cursor.
    let x_radius = ((bounds.max() - bounds.min()) * 0.02).max(MIN_HOVER_X_RADIUS_KG);
    let hover_points: Vec<([f64; 2], String)> = points
        .iter()
        .map(|p| ([p.x, f64::from(p.y)], p.label.clone()))
        .collect();

    Plot::new("payload_scatter")
        .legend(Legend::default())
        .height(height)
        .x_axis_label(x_axis_title.as_str())
        .y_axis_label(y_axis_title.as_str())
        .include_x(bounds.min())
        .include_x(bounds.max())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |_name, value| {
            match hovered_launch(&hover_points, [value.x, value.y], x_radius) {
                Some((pos, site)) => format!("{site}\n{:.0} kg, class {}", pos[0], pos[1]),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for (name, pts) in series {
                let color = state.category_colors.color_for(&name);
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(&name)
                        .color(color)
                        .radius(4.0),
                );
            }
        });

    if chart.is_empty() {
        ui.label(egui::RichText::new("No launches in the selected payload range").weak());
    }
}

/// Closest point (by payload) inside the hit box around `cursor`, if any.
fn hovered_launch<'a>(
    points: &'a [([f64; 2], String)],
    cursor: [f64; 2],
    x_radius: f64,
) -> Option<&'a ([f64; 2], String)> {
    points
        .iter()
        .filter(|(pos, _)| {
            (pos[0] - cursor[0]).abs() <= x_radius && (pos[1] - cursor[1]).abs() <= HOVER_Y_RADIUS
        })
        .min_by(|(a, _), (b, _)| {
            (a[0] - cursor[0]).abs().total_cmp(&(b[0] - cursor[0]).abs())
        })
}

// ---------------------------------------------------------------------------
// Records table
// ---------------------------------------------------------------------------

/// Rows behind the scatter chart.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let rows = state.visible_records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(50.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Flight", "Launch Site", "Payload (kg)", "Outcome", "Booster"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let rec = rows[row.index()];
                row.col(|ui: &mut Ui| {
                    ui.label(rec.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&rec.launch_site);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.0}", rec.payload_mass_kg));
                });
                row.col(|ui: &mut Ui| {
                    ui.colored_label(outcome_color(rec.outcome), rec.outcome.to_string());
                });
                row.col(|ui: &mut Ui| {
                    let booster = match (&rec.booster_version, &rec.booster_category) {
                        (Some(v), Some(c)) => format!("{v} ({c})"),
                        (Some(v), None) => v.clone(),
                        (None, Some(c)) => c.clone(),
                        (None, None) => String::new(),
                    };
                    ui.label(booster);
                });
            });
        });
}
