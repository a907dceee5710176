//! Chronodex
//!
//! A 24-hour radial day planner. Activities are wedges around a dial where
//! midnight sits at the top; they can be moved and resized by dragging and
//! edited in a side window. Overlapping activities stack outward on rings.

mod drawing;
mod ui;

use std::rc::Rc;

use chronodex_shared::{
    local_now, Affine, Controller, FaceLayout, FileStorage, InteractionSettings, KeyValueStorage,
    LocalStore, MemoryStorage, MinuteClock, Point, PointerEvent, PointerSample,
};
use log::{info, warn};
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "chronodex";
const SIDEBAR_WIDTH: f32 = 260.0;
const HINT: &str = "N add now  ·  Esc cancel  ·  R reset view  ·  +/- zoom";

type Store = LocalStore<Box<dyn KeyValueStorage>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).run();
}

/// Persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    face: FaceLayout,
    interaction: InteractionSettings,
    view_zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            face: FaceLayout::default(),
            interaction: InteractionSettings::default(),
            view_zoom: 1.0,
        }
    }
}

/// Application state
pub struct Model {
    controller: Controller<Store>,
    minute_clock: MinuteClock,

    // View state (pan/zoom)
    pub view_offset: Vec2,
    pub view_zoom: f32,
    pub is_panning: bool,
    pub last_mouse_pos: Point2,

    // egui integration
    egui: Egui,
}

impl Model {
    /// Apply pan delta
    pub fn pan(&mut self, delta: Vec2) {
        self.view_offset += delta;
    }

    /// Apply zoom
    pub fn zoom(&mut self, factor: f32) {
        self.view_zoom = (self.view_zoom * factor).clamp(0.3, 3.0);
        save_config(self);
    }

    /// Reset view to default
    pub fn reset_view(&mut self) {
        self.view_offset = vec2(0.0, 0.0);
        self.view_zoom = 1.0;
        save_config(self);
    }

    /// A modal window owns the input
    fn is_modal_open(&self) -> bool {
        self.controller.editor().is_some() || self.controller.clear_pending()
    }

    /// Surface-to-window transform for the current canvas, pan and zoom
    fn surface_transform(&self, window_rect: Rect) -> Affine {
        let canvas = canvas_rect(window_rect);
        let layout = self.controller.layout();
        let fit = canvas.w().min(canvas.h()) as f64 / layout.view_size;
        let scale = fit * self.view_zoom as f64;
        Affine::translate(-layout.center.x, -layout.center.y)
            .then(&Affine::scale(scale, -scale))
            .then(&Affine::translate(
                (canvas.x() + self.view_offset.x) as f64,
                (canvas.y() + self.view_offset.y) as f64,
            ))
    }

    fn sample(&self, window_rect: Rect, pos: Point2) -> PointerSample {
        PointerSample::new(
            Point::new(pos.x as f64, pos.y as f64),
            Some(self.surface_transform(window_rect)),
        )
    }
}

/// Canvas area, excluding the sidebar on the right
fn canvas_rect(window_rect: Rect) -> Rect {
    let canvas_width = window_rect.w() - SIDEBAR_WIDTH;
    Rect::from_x_y_w_h(
        window_rect.left() + canvas_width / 2.0,
        window_rect.y(),
        canvas_width,
        window_rect.h(),
    )
}

fn save_config(model: &Model) {
    let config = Config {
        face: *model.controller.layout(),
        interaction: model.controller.settings().clone(),
        view_zoom: model.view_zoom,
    };
    if let Err(e) = chronodex_shared::save_config(CONFIG_NAME, &config) {
        warn!("failed to save config: {}", e);
    }
}

fn open_storage() -> Box<dyn KeyValueStorage> {
    match FileStorage::in_data_dir() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            warn!("{}; activities will not outlive this session", e);
            Box::new(MemoryStorage::new())
        }
    }
}

fn model(app: &App) -> Model {
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("Chronodex")
        .size(1000, 750)
        .min_size(700, 500)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .mouse_wheel(mouse_wheel)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config: Config = match chronodex_shared::load_config(CONFIG_NAME) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!("{}; using defaults", e);
            Config::default()
        }
    };

    let store = Rc::new(LocalStore::open(open_storage()));
    let mut minute_clock = MinuteClock::new();
    let now = minute_clock.poll(local_now()).unwrap_or_else(local_now);
    let controller = Controller::new(store, config.face, config.interaction, now);
    info!(
        "chronodex started with {} activities",
        controller.activities().len()
    );

    Model {
        controller,
        minute_clock,
        view_offset: vec2(0.0, 0.0),
        view_zoom: config.view_zoom,
        is_panning: false,
        last_mouse_pos: pt2(0.0, 0.0),
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    if let Some(now) = model.minute_clock.poll(local_now()) {
        model.controller.tick(now);
    }

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let activities = model.controller.activities();
    let sidebar = ui::draw_sidebar(
        &ctx,
        &activities,
        model.controller.now(),
        model.controller.drag_state().activity_id(),
    );

    let palette = model.controller.settings().palette.clone();
    let editor_result = model
        .controller
        .editor_mut()
        .map(|editor| ui::draw_editor(&ctx, editor, &palette));

    let clear_answer = if model.controller.clear_pending() {
        ui::draw_clear_confirmation(&ctx, activities.len())
    } else {
        None
    };

    drop(ctx);

    // Apply UI results
    if let Some(result) = editor_result {
        if result.save {
            model.controller.save_editor();
        } else if result.delete {
            model.controller.delete_from_editor();
        } else if result.cancel {
            model.controller.cancel_editor();
        }
    }

    match clear_answer {
        Some(true) => {
            model.controller.confirm_clear();
        }
        Some(false) => model.controller.cancel_clear(),
        None => {}
    }

    if model.is_modal_open() {
        return;
    }
    if sidebar.add_now {
        model.controller.add_now();
    }
    if sidebar.new_activity {
        model.controller.open_new_editor();
    }
    if let Some(id) = sidebar.edit {
        model.controller.edit(id);
    }
    if let Some(id) = sidebar.delete {
        model.controller.delete(id);
    }
    if sidebar.request_clear {
        model.controller.request_clear();
    }
    if sidebar.reset_view {
        model.reset_view();
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    // Draw background
    draw.background().color(drawing::colors::BACKGROUND);

    let canvas = canvas_rect(window_rect);
    let ctm = model.surface_transform(window_rect);
    let layout = model.controller.layout();
    let shapes = model.controller.shapes();
    let active = model.controller.drag_state().activity_id();
    let now_angle = model.controller.current_time_angle();

    // Layers: dial, wedges, labels, handles, now hand
    drawing::draw_dial(&draw, layout, &ctm);
    drawing::draw_activities(&draw, &shapes, &ctm, active);
    drawing::draw_labels(&draw, &shapes, &ctm);
    drawing::draw_handles(&draw, &shapes, layout, &ctm);
    drawing::draw_now_hand(&draw, layout, now_angle, &ctm);

    let now_text = model.controller.now().format("%H:%M").to_string();
    drawing::draw_footer(&draw, canvas, &now_text, HINT);

    // Render to frame
    draw.to_frame(app, &frame).unwrap();

    // Render egui on top
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Escape - close the topmost modal, otherwise drop the drag
    if key == Key::Escape {
        if model.controller.editor().is_some() {
            model.controller.cancel_editor();
        } else if model.controller.clear_pending() {
            model.controller.cancel_clear();
        } else {
            model.controller.end_drag();
        }
        return;
    }

    // The editor's text fields own the keyboard
    if model.is_modal_open() {
        return;
    }

    match key {
        // N - add an activity at the current quarter hour
        Key::N => {
            model.controller.add_now();
        }
        // R - reset view
        Key::R => model.reset_view(),
        // + / = - zoom in
        Key::Equals | Key::Plus => model.zoom(1.1),
        // - - zoom out
        Key::Minus => model.zoom(0.9),
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    let pos = app.mouse.position();
    let window_rect = app.window_rect();
    if model.is_modal_open() || !canvas_rect(window_rect).contains(pos) {
        return;
    }

    match button {
        MouseButton::Left => {
            let sample = model.sample(window_rect, pos);
            if model.controller.handle(PointerEvent::Down(sample)).is_none() {
                // Empty space pans the face
                model.is_panning = true;
            }
            model.last_mouse_pos = pos;
        }
        MouseButton::Middle => {
            model.is_panning = true;
            model.last_mouse_pos = pos;
        }
        _ => {}
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    match button {
        MouseButton::Left => {
            model.is_panning = false;
            // A release without edits is a click on the activity
            if let Some(id) = model.controller.handle(PointerEvent::Up) {
                model.controller.open_editor(id);
            }
        }
        MouseButton::Middle => {
            model.is_panning = false;
        }
        _ => {}
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if model.controller.drag_state().is_dragging() {
        let sample = model.sample(app.window_rect(), pos);
        model.controller.handle(PointerEvent::Move(sample));
    } else if model.is_panning {
        let delta = pos - model.last_mouse_pos;
        model.pan(delta);
    }

    // Update last mouse position for future reference
    model.last_mouse_pos = pos;
}

fn mouse_wheel(app: &App, model: &mut Model, delta: MouseScrollDelta, _phase: TouchPhase) {
    if !canvas_rect(app.window_rect()).contains(app.mouse.position()) {
        return;
    }

    let scroll_amount = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
    };

    if scroll_amount > 0.0 {
        model.zoom(1.1);
    } else if scroll_amount < 0.0 {
        model.zoom(0.9);
    }
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    match event {
        nannou::winit::event::WindowEvent::Focused(false) => {
            // Releases outside the window never arrive
            model.controller.end_drag();
            model.is_panning = false;
        }
        nannou::winit::event::WindowEvent::Touch(touch) => {
            let window_rect = app.window_rect();

            // Convert touch position to nannou coordinates
            let pos_x = touch.location.x as f32 - window_rect.w() / 2.0;
            let pos_y = window_rect.h() / 2.0 - touch.location.y as f32;
            let pos = pt2(pos_x, pos_y);

            match touch.phase {
                nannou::winit::event::TouchPhase::Started => {
                    if !model.is_modal_open() && canvas_rect(window_rect).contains(pos) {
                        let sample = model.sample(window_rect, pos);
                        model.controller.handle(PointerEvent::Down(sample));
                    }
                }
                nannou::winit::event::TouchPhase::Moved => {
                    let sample = model.sample(window_rect, pos);
                    model.controller.handle(PointerEvent::Move(sample));
                }
                nannou::winit::event::TouchPhase::Ended => {
                    if let Some(id) = model.controller.handle(PointerEvent::TouchEnd) {
                        model.controller.open_editor(id);
                    }
                }
                nannou::winit::event::TouchPhase::Cancelled => {
                    model.controller.handle(PointerEvent::TouchCancel);
                }
            }
        }
        _ => {}
    }
}
