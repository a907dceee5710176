//! Drawing module - clock face and activity wedge rendering
//!
//! The shared layout works in surface coordinates (y down). Everything here is
//! mapped through the surface transform into nannou's window space before it
//! is drawn.

use chronodex_shared::{
    half_hour_tick_angles, hour_tick_angles, parse_hex_color, ActivityId, ActivityShape, Affine,
    FaceLayout, Point, TextAnchor,
};
use nannou::prelude::*;

const LABEL_WIDTH: f32 = 140.0;
const ARC_SEGMENTS: usize = 72;

/// Color palette for the planner theme
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 20,
        green: 22,
        blue: 28,
        standard: std::marker::PhantomData,
    };
    pub const DIAL: Srgb<u8> = Srgb {
        red: 34,
        green: 37,
        blue: 46,
        standard: std::marker::PhantomData,
    };
    pub const TICK_MAJOR: Srgb<u8> = Srgb {
        red: 150,
        green: 155,
        blue: 170,
        standard: std::marker::PhantomData,
    };
    pub const TICK_MINOR: Srgb<u8> = Srgb {
        red: 80,
        green: 84,
        blue: 96,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 235,
        green: 236,
        blue: 240,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 140,
        green: 145,
        blue: 160,
        standard: std::marker::PhantomData,
    };
    pub const NOW_HAND: Srgb<u8> = Srgb {
        red: 255,
        green: 90,
        blue: 80,
        standard: std::marker::PhantomData,
    };
    pub const FALLBACK_ACTIVITY: Srgb<u8> = Srgb {
        red: 120,
        green: 130,
        blue: 150,
        standard: std::marker::PhantomData,
    };
}

/// Surface point to window point
fn to_screen(ctm: &Affine, point: Point) -> Point2 {
    let p = ctm.apply(point);
    pt2(p.x as f32, p.y as f32)
}

/// Uniform scale of the surface transform
fn surface_scale(ctm: &Affine) -> f32 {
    ctm.determinant().abs().sqrt() as f32
}

fn activity_color(color: &str) -> Srgb<u8> {
    parse_hex_color(color)
        .map(|[r, g, b]| Srgb::new(r, g, b))
        .unwrap_or(colors::FALLBACK_ACTIVITY)
}

/// Draw the dial disc, hour and half-hour ticks and hour numerals
pub fn draw_dial(draw: &Draw, layout: &FaceLayout, ctm: &Affine) {
    let scale = surface_scale(ctm);
    let center = to_screen(ctm, layout.center);

    draw.ellipse()
        .xy(center)
        .radius(layout.dial_radius as f32 * scale)
        .color(colors::DIAL);

    for angle in half_hour_tick_angles() {
        let is_hour = angle % 15.0 == 0.0;
        let inner = if is_hour {
            layout.dial_radius - 12.0
        } else {
            layout.dial_radius - 6.0
        };
        draw.line()
            .start(to_screen(ctm, layout.point_at(inner, angle)))
            .end(to_screen(ctm, layout.point_at(layout.dial_radius, angle)))
            .weight(if is_hour { 2.0 } else { 1.0 })
            .color(if is_hour {
                colors::TICK_MAJOR
            } else {
                colors::TICK_MINOR
            });
    }

    for (hour, angle) in hour_tick_angles().enumerate() {
        if hour % 3 != 0 {
            continue;
        }
        draw.text(&format!("{:02}", hour))
            .xy(to_screen(ctm, layout.point_at(layout.dial_radius - 24.0, angle)))
            .color(colors::TEXT_SECONDARY)
            .font_size(11);
    }
}

/// Draw the activity wedges, outer rings first so inner rings stay on top
pub fn draw_activities(
    draw: &Draw,
    shapes: &[ActivityShape],
    ctm: &Affine,
    active: Option<ActivityId>,
) {
    let mut ordered: Vec<&ActivityShape> = shapes.iter().collect();
    ordered.sort_by(|a, b| b.level.cmp(&a.level));

    for shape in ordered {
        let color = activity_color(&shape.color);
        let is_active = active == Some(shape.id);
        let alpha = if is_active { 235 } else { 190 };

        let outline: Vec<Point2> = shape
            .path
            .outline(ARC_SEGMENTS)
            .into_iter()
            .map(|p| to_screen(ctm, p))
            .collect();

        draw.polygon()
            .points(outline.iter().cloned())
            .color(srgba(color.red, color.green, color.blue, alpha));

        let rim: Vec<Point2> = outline.iter().skip(1).cloned().collect();
        draw.polyline()
            .weight(if is_active { 2.5 } else { 1.5 })
            .points(rim)
            .color(color);
    }
}

/// Draw start and end handles for every activity
pub fn draw_handles(draw: &Draw, shapes: &[ActivityShape], layout: &FaceLayout, ctm: &Affine) {
    let radius = layout.handle_radius as f32 * surface_scale(ctm);
    for shape in shapes {
        let color = activity_color(&shape.color);
        for handle in [shape.start_handle, shape.end_handle] {
            let pos = to_screen(ctm, handle);
            draw.ellipse()
                .xy(pos)
                .radius(radius)
                .color(colors::BACKGROUND)
                .stroke(color)
                .stroke_weight(2.0);
        }
    }
}

/// Draw the title next to each wedge, aligned away from the face
pub fn draw_labels(draw: &Draw, shapes: &[ActivityShape], ctm: &Affine) {
    for shape in shapes {
        let pos = to_screen(ctm, shape.label_position);
        let text = shape.title.as_str();
        match shape.label_anchor {
            TextAnchor::Start => {
                draw.text(text)
                    .xy(pos + vec2(LABEL_WIDTH / 2.0, 0.0))
                    .w(LABEL_WIDTH)
                    .color(colors::TEXT_PRIMARY)
                    .font_size(12)
                    .left_justify();
            }
            TextAnchor::End => {
                draw.text(text)
                    .xy(pos - vec2(LABEL_WIDTH / 2.0, 0.0))
                    .w(LABEL_WIDTH)
                    .color(colors::TEXT_PRIMARY)
                    .font_size(12)
                    .right_justify();
            }
            TextAnchor::Middle => {
                draw.text(text)
                    .xy(pos)
                    .w(LABEL_WIDTH)
                    .color(colors::TEXT_PRIMARY)
                    .font_size(12)
                    .center_justify();
            }
        }
    }
}

/// Draw the current-time hand out to the dial rim
pub fn draw_now_hand(draw: &Draw, layout: &FaceLayout, angle: f64, ctm: &Affine) {
    let center = to_screen(ctm, layout.center);
    let tip = to_screen(ctm, layout.point_at(layout.dial_radius, angle));

    draw.line()
        .start(center)
        .end(tip)
        .weight(2.0)
        .color(colors::NOW_HAND);

    draw.ellipse()
        .xy(tip)
        .radius(4.0)
        .color(colors::NOW_HAND);

    draw.ellipse()
        .xy(center)
        .radius(5.0)
        .color(colors::NOW_HAND);
}

/// Draw the readout of the current time and the interaction hint
pub fn draw_footer(draw: &Draw, canvas: Rect, now_text: &str, hint: &str) {
    draw.text(now_text)
        .xy(pt2(canvas.x(), canvas.top() - 24.0))
        .w(canvas.w())
        .color(colors::TEXT_PRIMARY)
        .font_size(18);

    draw.text(hint)
        .xy(pt2(canvas.x(), canvas.bottom() + 20.0))
        .w(canvas.w())
        .color(colors::TEXT_SECONDARY)
        .font_size(11);
}
