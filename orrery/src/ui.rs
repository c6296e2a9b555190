//! Controls and info panels drawn with egui

use egui::{Align2, Color32, Context, RichText};

use crate::animator::Projection;
use crate::catalog::{BodyId, BodySpec, Catalog};
use crate::controls::{AnimationControls, SPEED_RANGE, SPEED_STEP};

/// Pause/play, speed slider, orbit toggle and view switch
pub fn draw_controls(ctx: &Context, controls: &mut AnimationControls, projection: &mut Projection) {
    egui::Area::new(egui::Id::new("controls"))
        .anchor(Align2::CENTER_BOTTOM, [0.0, -16.0])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.button(controls.pause_label()).clicked() {
                        controls.toggle_pause();
                    }

                    ui.separator();
                    ui.label("Speed: ");
                    let mut speed = controls.speed_multiplier;
                    let slider = egui::Slider::new(&mut speed, SPEED_RANGE)
                        .step_by(SPEED_STEP as f64)
                        .show_value(false);
                    if ui.add(slider).changed() {
                        controls.set_speed_multiplier(speed);
                    }
                    ui.label(controls.speed_label());

                    ui.separator();
                    if ui.button(controls.orbits_label()).clicked() {
                        controls.toggle_orbits();
                    }

                    ui.separator();
                    let next = projection.toggled();
                    if ui.button(format!("{} view", next.label())).clicked() {
                        *projection = next;
                    }
                });
            });
        });
}

/// Facts about the selected body. Returns `false` once the close button is pressed.
pub fn draw_planet_info(ctx: &Context, planet: &BodySpec) -> bool {
    let mut open = true;

    egui::Window::new(RichText::new(planet.display_name()).heading().color(Color32::LIGHT_BLUE))
        .id(egui::Id::new("planet_info"))
        .anchor(Align2::RIGHT_TOP, [-16.0, 48.0])
        .collapsible(false)
        .resizable(false)
        .default_width(280.0)
        .title_bar(true)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    if ui.button("×").clicked() {
                        open = false;
                    }
                });
            });

            egui::Grid::new("planet_info_grid")
                .num_columns(2)
                .spacing([16.0, 8.0])
                .show(ui, |ui| {
                    info_cell(ui, "Diameter", &planet.info.diameter);
                    info_cell(ui, "Day Length", &planet.info.day_length);
                    ui.end_row();
                    info_cell(ui, "Year Length", &planet.info.year_length);
                    info_cell(ui, "Temperature", &planet.info.temperature);
                    ui.end_row();
                });

            ui.separator();
            ui.label(RichText::new(&planet.info.description).italics());
        });

    open
}

fn info_cell(ui: &mut egui::Ui, title: &str, value: &str) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).strong().color(Color32::YELLOW));
        ui.label(value);
    });
}

/// Clickable list of bodies, for selecting ones too small to hit in the view
pub fn draw_body_list(ctx: &Context, catalog: &Catalog, selected: &mut Option<BodyId>) {
    egui::SidePanel::left("body_list")
        .resizable(false)
        .default_width(120.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Planets").color(Color32::LIGHT_BLUE));
            ui.separator();
            for (id, spec) in catalog.iter() {
                let is_selected = *selected == Some(id);
                if ui.selectable_label(is_selected, spec.display_name()).clicked() {
                    *selected = if is_selected { None } else { Some(id) };
                }
            }
        });
}

pub struct StatusLine {
    pub scale: f32,
    pub fps: f32,
    pub paused: bool,
    pub projection: Projection,
}

pub fn draw_status_bar(ctx: &Context, status: &StatusLine) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("View: {}", status.projection.label()));
            ui.separator();
            ui.label(format!("Scale: {:.2}", status.scale));
            ui.separator();
            ui.label(format!("FPS: {:.0}", status.fps));
            ui.separator();
            if status.paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
        });
    });
}
