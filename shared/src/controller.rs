//! Interaction controller - turns pointer gestures into activity edits
//!
//! The controller keeps a read-only projection of the store's activity list
//! plus the ephemeral state of the current gesture and the editor window. It
//! never mutates the list itself: every edit is pushed to the store, which
//! echoes the new list back through the subscription.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::activity::{round_to_quarter_hour, Activity, ActivityId, DEFAULT_PALETTE};
use crate::geometry::{angle_delta, angle_to_time, snap_angle_to_15_min, Point};
use crate::layout::{ActivityShape, DragMode, FaceLayout};
use crate::store::{ActivityStore, Subscription};
use crate::transform::{pointer_angle, Affine};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Tunables for gestures and new activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Angular travel a move gesture needs before it edits anything
    pub move_threshold_degrees: f64,
    pub default_duration_minutes: i64,
    pub default_title: String,
    pub palette: Vec<String>,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            move_threshold_degrees: 2.0,
            default_duration_minutes: 60,
            default_title: "New activity".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A pointer position in screen space with the surface transform at the time
/// of the event. `ctm` maps surface coordinates to screen coordinates and is
/// `None` when the surface is not available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub screen: Point,
    pub ctm: Option<Affine>,
}

impl PointerSample {
    pub fn new(screen: Point, ctm: Option<Affine>) -> Self {
        Self { screen, ctm }
    }

    /// Position in surface coordinates, if the transform can be inverted
    pub fn local(&self) -> Option<Point> {
        self.ctm
            .as_ref()
            .and_then(Affine::inverse)
            .map(|inverse| inverse.apply(self.screen))
    }
}

/// Pointer and touch input fed into [`Controller::handle`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerSample),
    Move(PointerSample),
    Up,
    TouchEnd,
    TouchCancel,
}

/// Drag gesture state
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        activity_id: ActivityId,
        mode: DragMode,
        /// Pointer angle when the gesture started
        anchor_angle: f64,
        original_start: NaiveDateTime,
        original_end: NaiveDateTime,
        original_duration: i64,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn activity_id(&self) -> Option<ActivityId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { activity_id, .. } => Some(*activity_id),
        }
    }
}

/// Private copy of an activity being edited
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub draft: Activity,
    /// The draft is not in the store yet
    pub is_new: bool,
}

pub struct Controller<S: ActivityStore> {
    store: Rc<S>,
    activities: Rc<RefCell<Vec<Activity>>>,
    _subscription: Subscription<S>,
    layout: FaceLayout,
    settings: InteractionSettings,
    drag: DragState,
    has_moved: bool,
    editor: Option<EditorState>,
    clear_pending: bool,
    now: NaiveDateTime,
}

impl<S: ActivityStore> Controller<S> {
    /// Subscribe to `store`; the subscription ends when the controller drops.
    pub fn new(
        store: Rc<S>,
        layout: FaceLayout,
        settings: InteractionSettings,
        now: NaiveDateTime,
    ) -> Self {
        let activities = Rc::new(RefCell::new(Vec::new()));
        let projection = Rc::clone(&activities);
        let subscription = Subscription::new(
            Rc::clone(&store),
            Box::new(move |list: &[Activity]| {
                *projection.borrow_mut() = list.to_vec();
            }),
        );

        Self {
            store,
            activities,
            _subscription: subscription,
            layout,
            settings,
            drag: DragState::Idle,
            has_moved: false,
            editor: None,
            clear_pending: false,
            now,
        }
    }

    pub fn layout(&self) -> &FaceLayout {
        &self.layout
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.activities.borrow().clone()
    }

    pub fn find(&self, id: ActivityId) -> Option<Activity> {
        self.activities.borrow().iter().find(|a| a.id == id).cloned()
    }

    pub fn shapes(&self) -> Vec<ActivityShape> {
        self.layout.shapes(&self.activities.borrow())
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Whether the current or last gesture edited something
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    fn angle_for(&self, sample: &PointerSample) -> f64 {
        pointer_angle(sample.screen, sample.ctm.as_ref(), self.layout.center)
    }

    // ---- drag gesture ----

    /// Start dragging `mode` of an activity. Returns false for unknown ids.
    pub fn pointer_down(&mut self, id: ActivityId, mode: DragMode, sample: PointerSample) -> bool {
        let Some(activity) = self.find(id) else {
            return false;
        };
        self.has_moved = false;
        self.drag = DragState::Dragging {
            activity_id: id,
            mode,
            anchor_angle: self.angle_for(&sample),
            original_start: activity.start_time,
            original_end: activity.end_time,
            original_duration: activity.duration_minutes,
        };
        debug!("drag {:?} on {} started", mode, id);
        true
    }

    /// Hit test the pointer against the face and start a drag on whatever is
    /// under it.
    pub fn pointer_down_at(&mut self, sample: PointerSample) -> Option<(ActivityId, DragMode)> {
        let local = sample.local()?;
        let (id, mode) = self.layout.hit_test(&self.shapes(), local)?;
        self.pointer_down(id, mode, sample).then_some((id, mode))
    }

    /// Apply pointer motion to the active drag. Returns true when an updated
    /// activity was pushed to the store.
    pub fn pointer_move(&mut self, sample: PointerSample) -> bool {
        let DragState::Dragging {
            activity_id,
            mode,
            anchor_angle,
            original_start,
            original_end,
            original_duration,
        } = self.drag.clone()
        else {
            return false;
        };
        let Some(current) = self.find(activity_id) else {
            return false;
        };

        let angle = self.angle_for(&sample);
        let updated = match mode {
            DragMode::Move => {
                let travel = angle_delta(anchor_angle, angle).abs();
                if !self.has_moved && travel <= self.settings.move_threshold_degrees {
                    return false;
                }
                self.has_moved = true;

                let delta = angle_delta(
                    snap_angle_to_15_min(anchor_angle),
                    snap_angle_to_15_min(angle),
                );
                let offset =
                    Duration::milliseconds((delta / 15.0 * MILLIS_PER_HOUR).round() as i64);
                Activity {
                    start_time: original_start + offset,
                    end_time: original_end + offset,
                    duration_minutes: original_duration,
                    ..current.clone()
                }
            }
            DragMode::Start => {
                let start = angle_to_time(snap_angle_to_15_min(angle), current.end_time);
                current.with_times(start, current.end_time)
            }
            DragMode::End => {
                let end = angle_to_time(snap_angle_to_15_min(angle), current.start_time);
                current.with_times(current.start_time, end)
            }
        };

        if updated.start_time == current.start_time && updated.end_time == current.end_time {
            return false;
        }
        self.has_moved = true;
        self.store.update(updated);
        true
    }

    /// Release the active drag, whatever it was. Returns the released activity.
    pub fn end_drag(&mut self) -> Option<ActivityId> {
        let released = self.drag.activity_id();
        if let Some(id) = released {
            debug!("drag on {} ended", id);
        }
        self.drag = DragState::Idle;
        released
    }

    /// Dispatch a pointer or touch event. Returns the activity the event acted
    /// on: the one grabbed, edited or released.
    pub fn handle(&mut self, event: PointerEvent) -> Option<ActivityId> {
        match event {
            PointerEvent::Down(sample) => self.pointer_down_at(sample).map(|(id, _)| id),
            PointerEvent::Move(sample) => {
                if self.pointer_move(sample) {
                    self.drag.activity_id()
                } else {
                    None
                }
            }
            PointerEvent::Up | PointerEvent::TouchEnd | PointerEvent::TouchCancel => {
                self.end_drag()
            }
        }
    }

    // ---- editor ----

    pub fn editor(&self) -> Option<&EditorState> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorState> {
        self.editor.as_mut()
    }

    /// Open the editor on a copy of an activity. A click that ends a drag does
    /// not open it.
    pub fn open_editor(&mut self, id: ActivityId) -> bool {
        if self.has_moved {
            debug!("editor suppressed after drag on {}", id);
            return false;
        }
        self.edit(id)
    }

    /// Open the editor on a copy of an activity, regardless of the last gesture
    pub fn edit(&mut self, id: ActivityId) -> bool {
        let Some(activity) = self.find(id) else {
            return false;
        };
        self.editor = Some(EditorState {
            draft: activity,
            is_new: false,
        });
        true
    }

    /// Open the editor on a fresh draft starting at the current quarter hour
    pub fn open_new_editor(&mut self) {
        self.editor = Some(EditorState {
            draft: self.new_activity(),
            is_new: true,
        });
    }

    /// Push the draft to the store and close the editor
    pub fn save_editor(&mut self) -> bool {
        let Some(EditorState { mut draft, is_new }) = self.editor.take() else {
            return false;
        };
        draft.refresh_duration();
        if is_new {
            self.store.add(draft);
        } else {
            self.store.update(draft);
        }
        true
    }

    /// Delete the edited activity and close the editor
    pub fn delete_from_editor(&mut self) -> bool {
        let Some(editor) = self.editor.take() else {
            return false;
        };
        if !editor.is_new {
            self.store.delete(editor.draft.id);
        }
        true
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
    }

    // ---- list actions ----

    fn new_activity(&self) -> Activity {
        let start = round_to_quarter_hour(self.now);
        let minutes = self.settings.default_duration_minutes;
        let end = Duration::try_minutes(minutes)
            .and_then(|length| start.checked_add_signed(length))
            .unwrap_or_else(|| {
                warn!("default duration of {} minutes is out of range, using 60", minutes);
                start + Duration::minutes(60)
            });
        let count = self.activities.borrow().len();
        let color = if self.settings.palette.is_empty() {
            DEFAULT_PALETTE[count % DEFAULT_PALETTE.len()].to_string()
        } else {
            self.settings.palette[count % self.settings.palette.len()].clone()
        };
        Activity::new(self.settings.default_title.clone(), start, end, color)
    }

    /// Add an activity at the nearest quarter hour with the default duration
    pub fn add_now(&mut self) -> ActivityId {
        let activity = self.new_activity();
        let id = activity.id;
        info!("adding activity at {}", activity.start_time.format("%H:%M"));
        self.store.add(activity);
        id
    }

    pub fn delete(&mut self, id: ActivityId) {
        self.store.delete(id);
    }

    /// Ask for confirmation before clearing everything
    pub fn request_clear(&mut self) {
        self.clear_pending = true;
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Clear all activities if a clear was requested
    pub fn confirm_clear(&mut self) -> bool {
        if !self.clear_pending {
            return false;
        }
        self.clear_pending = false;
        self.drag = DragState::Idle;
        self.editor = None;
        self.store.clear();
        true
    }

    pub fn cancel_clear(&mut self) {
        self.clear_pending = false;
    }

    // ---- current time ----

    pub fn tick(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn current_time_angle(&self) -> f64 {
        self.layout.current_time_hand(self.now).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalStore, MemoryStorage};
    use chrono::{NaiveDate, Timelike};
    use std::cell::Cell;

    type Store = LocalStore<MemoryStorage>;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn setup(blocks: &[(u32, u32, u32, u32)]) -> (Rc<Store>, Controller<Store>, Vec<ActivityId>) {
        let store = Rc::new(LocalStore::open(MemoryStorage::new()));
        let mut ids = Vec::new();
        for &(sh, sm, eh, em) in blocks {
            let activity = Activity::new("block", at(sh, sm), at(eh, em), "#4f86f7");
            ids.push(activity.id);
            store.add(activity);
        }
        let controller = Controller::new(
            Rc::clone(&store),
            FaceLayout::default(),
            InteractionSettings::default(),
            at(9, 8),
        );
        (store, controller, ids)
    }

    fn sample_at(controller: &Controller<Store>, angle: f64) -> PointerSample {
        PointerSample::new(
            controller.layout().point_at(100.0, angle),
            Some(Affine::IDENTITY),
        )
    }

    fn count_updates(store: &Rc<Store>) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        // The first call is the initial emission
        store.subscribe(Box::new(move |_| sink.set(sink.get() + 1)));
        count.set(0);
        count
    }

    #[test]
    fn test_projection_follows_store() {
        let (store, controller, ids) = setup(&[(9, 0, 10, 0)]);
        assert_eq!(controller.activities().len(), 1);
        store.delete(ids[0]);
        assert!(controller.activities().is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (store, controller, _) = setup(&[]);
        assert_eq!(store.listener_count(), 1);
        drop(controller);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_move_below_threshold_changes_nothing() {
        let (store, mut controller, ids) = setup(&[(6, 0, 7, 0)]);
        let before = store.snapshot();
        assert!(controller.pointer_down(ids[0], DragMode::Move, sample_at(&controller, 90.0)));
        assert!(!controller.pointer_move(sample_at(&controller, 91.0)));
        assert!(!controller.has_moved());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_move_past_threshold_shifts_both_ends() {
        let (store, mut controller, ids) = setup(&[(6, 0, 7, 0)]);
        controller.pointer_down(ids[0], DragMode::Move, sample_at(&controller, 90.0));
        assert!(controller.pointer_move(sample_at(&controller, 93.0)));
        assert!(controller.has_moved());

        let moved = store.snapshot()[0].clone();
        assert_eq!(moved.start_time, at(6, 15));
        assert_eq!(moved.end_time, at(7, 15));
        assert_eq!(moved.duration_minutes, 60);

        // Once latched, moves are measured from the original endpoints
        assert!(controller.pointer_move(sample_at(&controller, 120.0)));
        let moved = store.snapshot()[0].clone();
        assert_eq!(moved.start_time, at(8, 0));
        assert_eq!(moved.end_time, at(9, 0));
    }

    #[test]
    fn test_move_across_midnight_takes_short_way() {
        let (store, mut controller, ids) = setup(&[(23, 30, 0, 30)]);
        controller.pointer_down(ids[0], DragMode::Move, sample_at(&controller, 352.5));
        assert!(controller.pointer_move(sample_at(&controller, 7.5)));
        let moved = store.snapshot()[0].clone();
        assert_eq!((moved.start_time.hour(), moved.start_time.minute()), (0, 30));
        assert_eq!(moved.start_time, at(23, 30) + Duration::hours(1));
        assert_eq!(moved.duration_minutes, 60);
    }

    #[test]
    fn test_end_drag_resizes() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        controller.pointer_down(ids[0], DragMode::End, sample_at(&controller, 150.0));
        assert!(controller.pointer_move(sample_at(&controller, 164.0)));
        let resized = store.snapshot()[0].clone();
        assert_eq!(resized.start_time, at(9, 0));
        assert_eq!(resized.end_time, at(11, 0));
        assert_eq!(resized.duration_minutes, 120);
    }

    #[test]
    fn test_start_drag_wraps_duration() {
        let (store, mut controller, ids) = setup(&[(23, 0, 1, 0)]);
        controller.pointer_down(ids[0], DragMode::Start, sample_at(&controller, 345.0));
        assert!(controller.pointer_move(sample_at(&controller, 330.0)));
        let resized = store.snapshot()[0].clone();
        assert_eq!(resized.start_time, at(22, 0));
        assert_eq!(resized.duration_minutes, 180);
    }

    #[test]
    fn test_noop_moves_do_not_write() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        let updates = count_updates(&store);
        controller.pointer_down(ids[0], DragMode::End, sample_at(&controller, 150.0));
        // Still snaps to 10:00
        assert!(!controller.pointer_move(sample_at(&controller, 151.0)));
        assert!(!controller.pointer_move(sample_at(&controller, 149.0)));
        assert_eq!(updates.get(), 0);
        assert!(controller.pointer_move(sample_at(&controller, 153.0)));
        assert_eq!(updates.get(), 1);
    }

    #[test]
    fn test_release_always_returns_to_idle() {
        let (_store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        for release in [PointerEvent::Up, PointerEvent::TouchEnd, PointerEvent::TouchCancel] {
            controller.pointer_down(ids[0], DragMode::Start, sample_at(&controller, 135.0));
            assert!(controller.drag_state().is_dragging());
            assert_eq!(controller.handle(release), Some(ids[0]));
            assert_eq!(*controller.drag_state(), DragState::Idle);
        }
        // Releasing while idle is harmless
        assert_eq!(controller.handle(PointerEvent::Up), None);
    }

    #[test]
    fn test_stale_drag_stays_active_until_released() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        controller.pointer_down(ids[0], DragMode::End, sample_at(&controller, 150.0));
        for angle in [160.0, 170.0, 180.0] {
            controller.pointer_move(sample_at(&controller, angle));
        }
        assert_eq!(controller.drag_state().activity_id(), Some(ids[0]));
        assert_eq!(store.snapshot()[0].end_time, at(12, 0));
        controller.end_drag();
        assert!(!controller.pointer_move(sample_at(&controller, 200.0)));
        assert_eq!(store.snapshot()[0].end_time, at(12, 0));
    }

    #[test]
    fn test_drag_of_deleted_activity_is_ignored() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        controller.pointer_down(ids[0], DragMode::End, sample_at(&controller, 150.0));
        store.delete(ids[0]);
        assert!(!controller.pointer_move(sample_at(&controller, 200.0)));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_missing_surface_fails_soft() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        let blind = PointerSample::new(Point::new(10.0, 10.0), None);
        assert_eq!(controller.pointer_down_at(blind), None);

        controller.pointer_down(ids[0], DragMode::End, sample_at(&controller, 150.0));
        // Angle 0 puts the end at midnight
        assert!(controller.pointer_move(blind));
        assert_eq!(store.snapshot()[0].end_time, at(0, 0));
    }

    #[test]
    fn test_pointer_down_at_hits_handles_and_wedges() {
        let (_store, mut controller, ids) = setup(&[(6, 0, 12, 0)]);
        let layout = *controller.layout();
        let end_handle = layout.point_at(layout.base_radius, 180.0);
        let grabbed = controller.pointer_down_at(PointerSample::new(end_handle, Some(Affine::IDENTITY)));
        assert_eq!(grabbed, Some((ids[0], DragMode::End)));
        controller.end_drag();

        let body = layout.point_at(60.0, 135.0);
        let grabbed = controller.pointer_down_at(PointerSample::new(body, Some(Affine::IDENTITY)));
        assert_eq!(grabbed, Some((ids[0], DragMode::Move)));
    }

    #[test]
    fn test_editor_suppressed_after_drag() {
        let (store, mut controller, ids) = setup(&[(6, 0, 7, 0)]);
        controller.pointer_down(ids[0], DragMode::Move, sample_at(&controller, 90.0));
        controller.pointer_move(sample_at(&controller, 100.0));
        controller.end_drag();
        assert!(!controller.open_editor(ids[0]));
        assert!(controller.editor().is_none());

        // Opening from the list ignores the last gesture
        assert!(controller.edit(ids[0]));
        controller.cancel_editor();

        // A plain click opens it
        controller.pointer_down(ids[0], DragMode::Move, sample_at(&controller, 90.0));
        controller.pointer_move(sample_at(&controller, 91.0));
        controller.end_drag();
        assert!(controller.open_editor(ids[0]));

        // Draft edits stay private until saved
        controller.editor_mut().unwrap().draft.title = "Gym".to_string();
        assert_eq!(store.snapshot()[0].title, "block");
        controller.cancel_editor();
        assert_eq!(store.snapshot()[0].title, "block");
    }

    #[test]
    fn test_editor_save_and_delete() {
        let (store, mut controller, ids) = setup(&[(9, 0, 10, 0)]);
        assert!(controller.open_editor(ids[0]));
        {
            let draft = &mut controller.editor_mut().unwrap().draft;
            draft.title = "Standup".to_string();
            draft.end_time = at(9, 15);
        }
        assert!(controller.save_editor());
        assert!(controller.editor().is_none());
        let saved = store.snapshot()[0].clone();
        assert_eq!(saved.title, "Standup");
        assert_eq!(saved.duration_minutes, 15);

        assert!(controller.open_editor(ids[0]));
        assert!(controller.delete_from_editor());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_new_editor_adds_on_save() {
        let (store, mut controller, _) = setup(&[]);
        controller.open_new_editor();
        assert!(controller.editor().unwrap().is_new);
        controller.cancel_editor();
        assert!(store.snapshot().is_empty());

        controller.open_new_editor();
        assert!(controller.save_editor());
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn test_add_now_snaps_to_quarter_hour() {
        let (store, mut controller, _) = setup(&[]);
        let id = controller.add_now();
        let added = store.snapshot().into_iter().find(|a| a.id == id).unwrap();
        assert_eq!(added.duration_minutes, 60);
        assert_eq!(added.start_time.minute() % 15, 0);
        assert_eq!(added.start_time, at(9, 15));

        controller.tick(at(13, 52));
        let id = controller.add_now();
        let added = store.snapshot().into_iter().find(|a| a.id == id).unwrap();
        assert_eq!(added.start_time, at(13, 45));
        assert_eq!(added.end_time, at(14, 45));
        assert_ne!(added.color, store.snapshot()[0].color);
    }

    #[test]
    fn test_clear_needs_confirmation() {
        let (store, mut controller, _) = setup(&[(9, 0, 10, 0), (11, 0, 12, 0)]);
        assert!(!controller.confirm_clear());
        assert_eq!(store.snapshot().len(), 2);

        controller.request_clear();
        controller.cancel_clear();
        assert!(!controller.confirm_clear());

        controller.request_clear();
        assert!(controller.clear_pending());
        assert!(controller.confirm_clear());
        assert!(store.snapshot().is_empty());
        assert!(controller.activities().is_empty());
    }

    #[test]
    fn test_handle_reports_grabbed_and_edited_activity() {
        let (_store, mut controller, ids) = setup(&[(6, 0, 7, 0)]);
        let body = controller.layout().point_at(50.0, 97.5);
        let down = PointerEvent::Down(PointerSample::new(body, Some(Affine::IDENTITY)));
        assert_eq!(controller.handle(down), Some(ids[0]));

        // Inside the threshold nothing is edited
        assert_eq!(controller.handle(PointerEvent::Move(sample_at(&controller, 98.5))), None);
        assert_eq!(
            controller.handle(PointerEvent::Move(sample_at(&controller, 105.0))),
            Some(ids[0])
        );

        // A release after an edit is not a click
        let released = controller.handle(PointerEvent::TouchEnd);
        assert_eq!(released, Some(ids[0]));
        assert!(!controller.open_editor(ids[0]));
    }

    #[test]
    fn test_out_of_range_default_duration_falls_back() {
        let store = Rc::new(LocalStore::open(MemoryStorage::new()));
        let settings = InteractionSettings {
            default_duration_minutes: i64::MAX,
            ..InteractionSettings::default()
        };
        let mut controller =
            Controller::new(Rc::clone(&store), FaceLayout::default(), settings, at(9, 8));
        controller.add_now();
        let added = &store.snapshot()[0];
        assert_eq!(added.start_time, at(9, 15));
        assert_eq!(added.end_time, at(10, 15));
        assert_eq!(added.duration_minutes, 60);
    }

    #[test]
    fn test_current_time_angle_follows_tick() {
        let (_store, mut controller, _) = setup(&[]);
        controller.tick(at(12, 0));
        assert_eq!(controller.current_time_angle(), 180.0);
        controller.tick(at(18, 30));
        assert_eq!(controller.current_time_angle(), 277.5);
    }
}
