//! Face layout - overlap levels, per-activity shapes and hit testing

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityId};
use crate::geometry::{
    describe_arc, label_anchor, normalize_angle, polar_to_cartesian, time_to_angle, ArcPath, Point,
    TextAnchor,
};

/// Which part of an activity a drag grabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragMode {
    /// The start handle
    Start,
    /// The end handle
    End,
    /// The whole wedge
    Move,
}

/// An activity together with the ring it renders on
#[derive(Debug, Clone, PartialEq)]
pub struct LeveledActivity {
    pub activity: Activity,
    pub level: usize,
}

/// Assign each activity the lowest ring on which it overlaps nothing already
/// placed, visiting activities in start order.
pub fn leveled_activities(activities: &[Activity]) -> Vec<LeveledActivity> {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by_key(|a| a.start_minute());

    let mut rings: Vec<Vec<&Activity>> = Vec::new();
    let mut leveled = Vec::with_capacity(sorted.len());
    for activity in sorted {
        let level = rings
            .iter()
            .position(|ring| ring.iter().all(|placed| !placed.overlaps(activity)))
            .unwrap_or(rings.len());
        if level == rings.len() {
            rings.push(Vec::new());
        }
        rings[level].push(activity);
        leveled.push(LeveledActivity {
            activity: activity.clone(),
            level,
        });
    }
    leveled
}

/// Sizing of the face in surface units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceLayout {
    /// Width and height of the square drawing surface
    pub view_size: f64,
    pub center: Point,
    /// Radius of level 0 wedges
    pub base_radius: f64,
    /// Extra radius per overlap level
    pub level_step: f64,
    pub handle_radius: f64,
    /// Distance between a wedge's rim and its label
    pub label_offset: f64,
    /// Radius of the hour dial and the current-time hand
    pub dial_radius: f64,
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self {
            view_size: 400.0,
            center: Point::new(200.0, 200.0),
            base_radius: 110.0,
            level_step: 25.0,
            handle_radius: 7.0,
            label_offset: 16.0,
            dial_radius: 190.0,
        }
    }
}

/// Everything a renderer needs to draw one activity
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityShape {
    pub id: ActivityId,
    pub title: String,
    pub color: String,
    pub level: usize,
    pub radius: f64,
    pub path: ArcPath,
    pub start_handle: Point,
    pub end_handle: Point,
    pub label_position: Point,
    pub label_anchor: TextAnchor,
}

impl ActivityShape {
    /// Whether a face angle falls within the wedge's sweep
    pub fn covers_angle(&self, angle: f64) -> bool {
        let offset = normalize_angle(angle - self.path.start_angle);
        offset <= self.path.sweep()
    }
}

impl FaceLayout {
    pub fn ring_radius(&self, level: usize) -> f64 {
        self.base_radius + level as f64 * self.level_step
    }

    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        polar_to_cartesian(self.center.x, self.center.y, radius, angle)
    }

    pub fn shape(&self, leveled: &LeveledActivity) -> ActivityShape {
        let activity = &leveled.activity;
        let radius = self.ring_radius(leveled.level);
        let start = activity.start_angle();
        let end = start + activity.duration_minutes as f64 * 0.25;
        let path = describe_arc(self.center.x, self.center.y, radius, start, end);
        let mid = normalize_angle(start + path.sweep() / 2.0);

        ActivityShape {
            id: activity.id,
            title: activity.title.clone(),
            color: activity.color.clone(),
            level: leveled.level,
            radius,
            start_handle: self.point_at(radius, start),
            end_handle: self.point_at(radius, path.end_angle),
            label_position: self.point_at(radius + self.label_offset, mid),
            label_anchor: label_anchor(mid),
            path,
        }
    }

    pub fn shapes(&self, activities: &[Activity]) -> Vec<ActivityShape> {
        leveled_activities(activities)
            .iter()
            .map(|leveled| self.shape(leveled))
            .collect()
    }

    /// Find what sits under a surface point. Handles win over wedge bodies and
    /// inner rings win over outer ones.
    pub fn hit_test(&self, shapes: &[ActivityShape], point: Point) -> Option<(ActivityId, DragMode)> {
        let grab = self.handle_radius * 1.5;
        for shape in shapes {
            if point.distance(shape.end_handle) <= grab {
                return Some((shape.id, DragMode::End));
            }
            if point.distance(shape.start_handle) <= grab {
                return Some((shape.id, DragMode::Start));
            }
        }

        let distance = point.distance(self.center);
        let angle = self.angle_of(point);

        let mut ordered: Vec<&ActivityShape> = shapes.iter().collect();
        ordered.sort_by(|a, b| a.radius.total_cmp(&b.radius));
        ordered
            .into_iter()
            .find(|shape| distance <= shape.radius && shape.covers_angle(angle))
            .map(|shape| (shape.id, DragMode::Move))
    }

    /// Angle and tip of the current-time hand
    pub fn current_time_hand(&self, now: NaiveDateTime) -> (f64, Point) {
        let angle = time_to_angle(&now);
        (angle, self.point_at(self.dial_radius, angle))
    }

    /// Angle of `point` seen from the face center, ignoring any screen transform
    pub fn angle_of(&self, point: Point) -> f64 {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        normalize_angle(dy.atan2(dx).to_degrees() + 90.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn block(title: &str, start: (u32, u32), end: (u32, u32)) -> Activity {
        Activity::new(title, at(start.0, start.1), at(end.0, end.1), "#4f86f7")
    }

    fn level_of(leveled: &[LeveledActivity], title: &str) -> usize {
        leveled
            .iter()
            .find(|l| l.activity.title == title)
            .map(|l| l.level)
            .unwrap()
    }

    #[test]
    fn test_overlapping_pair_gets_two_levels() {
        let leveled = leveled_activities(&[
            block("b", (9, 30), (10, 30)),
            block("a", (9, 0), (10, 0)),
        ]);
        assert_eq!(level_of(&leveled, "a"), 0);
        assert_eq!(level_of(&leveled, "b"), 1);
    }

    #[test]
    fn test_three_mutual_overlaps_use_three_levels() {
        let leveled = leveled_activities(&[
            block("a", (9, 0), (12, 0)),
            block("b", (9, 30), (11, 0)),
            block("c", (10, 0), (10, 30)),
        ]);
        let mut levels: Vec<usize> = leveled.iter().map(|l| l.level).collect();
        levels.sort();
        assert_eq!(levels, vec![0, 1, 2]);
    }

    #[test]
    fn test_touching_blocks_share_level() {
        let leveled = leveled_activities(&[
            block("a", (9, 0), (10, 0)),
            block("b", (10, 0), (11, 0)),
        ]);
        assert_eq!(level_of(&leveled, "a"), 0);
        assert_eq!(level_of(&leveled, "b"), 0);
    }

    #[test]
    fn test_freed_level_is_reused() {
        let leveled = leveled_activities(&[
            block("a", (9, 0), (10, 0)),
            block("b", (9, 30), (10, 30)),
            block("c", (10, 0), (11, 0)),
        ]);
        assert_eq!(level_of(&leveled, "c"), 0);
    }

    #[test]
    fn test_levels_do_not_touch_source() {
        let source = vec![block("a", (9, 0), (10, 0)), block("b", (9, 30), (10, 30))];
        let before = source.clone();
        let _ = leveled_activities(&source);
        assert_eq!(source, before);
    }

    #[test]
    fn test_shape_geometry() {
        let layout = FaceLayout::default();
        let leveled = LeveledActivity {
            activity: block("a", (3, 0), (9, 0)),
            level: 1,
        };
        let shape = layout.shape(&leveled);
        assert_eq!(shape.radius, 135.0);
        assert_eq!(shape.path.start_angle, 45.0);
        assert_eq!(shape.path.end_angle, 135.0);
        assert_eq!(shape.label_anchor, TextAnchor::Start);
        // Label sits at 3 o'clock, outside the rim
        assert!((shape.label_position.x - (200.0 + 135.0 + 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_prefers_handles_then_inner_rings() {
        let layout = FaceLayout::default();
        let shapes = layout.shapes(&[
            block("a", (3, 0), (9, 0)),
            block("b", (4, 0), (10, 0)),
        ]);
        let a = shapes.iter().find(|s| s.title == "a").unwrap();
        let b = shapes.iter().find(|s| s.title == "b").unwrap();

        assert_eq!(layout.hit_test(&shapes, a.end_handle), Some((a.id, DragMode::End)));
        assert_eq!(layout.hit_test(&shapes, b.start_handle), Some((b.id, DragMode::Start)));

        // Inside both wedges at 6 o'clock: the inner ring wins
        let inside = layout.point_at(50.0, 90.0);
        assert_eq!(layout.hit_test(&shapes, inside), Some((a.id, DragMode::Move)));

        // Between the rims, only the outer wedge
        let between = layout.point_at(125.0, 120.0);
        assert_eq!(layout.hit_test(&shapes, between), Some((b.id, DragMode::Move)));

        let empty = layout.point_at(50.0, 270.0);
        assert_eq!(layout.hit_test(&shapes, empty), None);
    }

    #[test]
    fn test_wrapping_shape_covers_midnight() {
        let layout = FaceLayout::default();
        let shapes = layout.shapes(&[block("night", (23, 0), (1, 0))]);
        assert!(shapes[0].covers_angle(0.0));
        assert!(shapes[0].covers_angle(350.0));
        assert!(!shapes[0].covers_angle(180.0));
    }

    #[test]
    fn test_current_time_hand() {
        let layout = FaceLayout::default();
        let (angle, tip) = layout.current_time_hand(at(18, 0));
        assert_eq!(angle, 270.0);
        assert!((tip.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let layout: FaceLayout =
            toml::from_str("level_step = 30.0\n[center]\nx = 150.0\ny = 150.0\n").unwrap();
        assert_eq!(layout.level_step, 30.0);
        assert_eq!(layout.center, Point::new(150.0, 150.0));
        assert_eq!(layout.base_radius, FaceLayout::default().base_radius);
        assert_eq!(layout.ring_radius(2), layout.base_radius + 60.0);
    }
}
