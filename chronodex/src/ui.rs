//! UI module for the Chronodex planner
//!
//! Side panel with the activity list and actions, the activity editor window
//! and the clear-all confirmation, using egui.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use chronodex_shared::{format_hex_color, parse_hex_color, Activity, ActivityId, EditorState};
use nannou_egui::egui;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(255, 140, 110);
const MUTED: egui::Color32 = egui::Color32::from_rgb(140, 145, 160);

/// Result of side panel interactions
#[derive(Default)]
pub struct SidebarResult {
    /// Add an activity at the current quarter hour
    pub add_now: bool,
    /// Open the editor on a new draft
    pub new_activity: bool,
    /// Open the editor on an existing activity
    pub edit: Option<ActivityId>,
    /// Delete straight from the list
    pub delete: Option<ActivityId>,
    /// Ask to clear every activity
    pub request_clear: bool,
    /// Reset pan and zoom
    pub reset_view: bool,
}

/// Result of editor window interactions
#[derive(Default)]
pub struct EditorResult {
    pub save: bool,
    pub delete: bool,
    pub cancel: bool,
}

fn swatch(color: &str) -> egui::Color32 {
    parse_hex_color(color)
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(MUTED)
}

/// Draw the side panel
pub fn draw_sidebar(
    ctx: &egui::Context,
    activities: &[Activity],
    now: NaiveDateTime,
    dragging: Option<ActivityId>,
) -> SidebarResult {
    let mut result = SidebarResult::default();

    let mut style = (*ctx.style()).clone();
    style.visuals.window_fill = egui::Color32::from_rgb(24, 26, 33);
    style.visuals.panel_fill = egui::Color32::from_rgb(24, 26, 33);
    style.visuals.override_text_color = Some(egui::Color32::from_rgb(220, 222, 230));
    ctx.set_style(style);

    egui::SidePanel::right("sidebar")
        .resizable(false)
        .min_width(260.0)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading(egui::RichText::new("Chronodex").color(ACCENT).size(18.0));
            ui.label(
                egui::RichText::new(now.format("%A %d %B, %H:%M").to_string())
                    .size(12.0)
                    .color(MUTED),
            );
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Add now (N)").clicked() {
                    result.add_now = true;
                }
                if ui.button("New…").clicked() {
                    result.new_activity = true;
                }
            });

            ui.add_space(8.0);
            ui.separator();

            let mut sorted: Vec<&Activity> = activities.iter().collect();
            sorted.sort_by_key(|a| a.start_minute());

            ui.label(
                egui::RichText::new(format!("{} activities", sorted.len()))
                    .size(11.0)
                    .color(MUTED),
            );

            egui::ScrollArea::vertical()
                .max_height(420.0)
                .show(ui, |ui| {
                    for activity in sorted {
                        let is_dragging = dragging == Some(activity.id);
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new("■").color(swatch(&activity.color)));
                            let title = if is_dragging {
                                egui::RichText::new(&activity.title).strong()
                            } else {
                                egui::RichText::new(&activity.title)
                            };
                            if ui.button(title).clicked() {
                                result.edit = Some(activity.id);
                            }
                            ui.label(
                                egui::RichText::new(activity.format_span())
                                    .size(11.0)
                                    .color(MUTED),
                            );
                            if ui.small_button("✕").clicked() {
                                result.delete = Some(activity.id);
                            }
                        });
                    }
                });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset view (R)").clicked() {
                    result.reset_view = true;
                }
                let clear = ui.add_enabled(!activities.is_empty(), egui::Button::new("Clear all"));
                if clear.clicked() {
                    result.request_clear = true;
                }
            });

            ui.add_space(10.0);
            ui.label(
                egui::RichText::new(
                    "Drag a wedge to move it, drag its handles to resize. \
                     Click a wedge to edit. Scroll to zoom, middle-drag to pan.",
                )
                .size(11.0)
                .color(MUTED),
            );
        });

    result
}

fn time_of_day_row(ui: &mut egui::Ui, label: &str, time: NaiveDateTime) -> Option<NaiveTime> {
    let mut hour = time.hour();
    let mut minute = time.minute();
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).color(MUTED));
        changed |= ui
            .add(egui::DragValue::new(&mut hour).clamp_range(0..=23).suffix(" h"))
            .changed();
        changed |= ui
            .add(
                egui::DragValue::new(&mut minute)
                    .clamp_range(0..=59)
                    .speed(0.25)
                    .suffix(" min"),
            )
            .changed();
    });
    if changed {
        NaiveTime::from_hms_opt(hour, minute, 0)
    } else {
        None
    }
}

/// Draw the editor window for the draft held by the controller
pub fn draw_editor(ctx: &egui::Context, editor: &mut EditorState, palette: &[String]) -> EditorResult {
    let mut result = EditorResult::default();
    let heading = if editor.is_new {
        "New activity"
    } else {
        "Edit activity"
    };

    egui::Window::new(heading)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let draft = &mut editor.draft;

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Title").color(MUTED));
                ui.text_edit_singleline(&mut draft.title);
            });

            if let Some(time) = time_of_day_row(ui, "Start", draft.start_time) {
                draft.set_start_time_of_day(time);
            }
            if let Some(time) = time_of_day_row(ui, "End  ", draft.end_time) {
                draft.set_end_time_of_day(time);
            }
            ui.label(
                egui::RichText::new(format!(
                    "{} h {:02} min",
                    draft.duration_minutes / 60,
                    draft.duration_minutes % 60
                ))
                .size(11.0)
                .color(MUTED),
            );

            ui.add_space(6.0);
            ui.horizontal_wrapped(|ui| {
                for color in palette {
                    let selected = draft.color.eq_ignore_ascii_case(color);
                    let button = egui::Button::new(if selected { "✔" } else { "  " })
                        .fill(swatch(color));
                    if ui.add(button).clicked() {
                        draft.color = color.clone();
                    }
                }
                let mut rgb = parse_hex_color(&draft.color).unwrap_or([128, 128, 128]);
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    draft.color = format_hex_color(rgb);
                }
            });

            ui.add_space(8.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    result.save = true;
                }
                if !editor.is_new && ui.button("Delete").clicked() {
                    result.delete = true;
                }
                if ui.button("Cancel (Esc)").clicked() {
                    result.cancel = true;
                }
            });
        });

    result
}

/// Ask before clearing everything. `Some(true)` confirms, `Some(false)` cancels.
pub fn draw_clear_confirmation(ctx: &egui::Context, count: usize) -> Option<bool> {
    let mut answer = None;
    egui::Window::new("Clear all activities?")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("This removes all {} activities.", count));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .button(egui::RichText::new("Clear all").color(ACCENT))
                    .clicked()
                {
                    answer = Some(true);
                }
                if ui.button("Keep").clicked() {
                    answer = Some(false);
                }
            });
        });
    answer
}
