//! Shared library for the Chronodex radial day planner
//!
//! Geometry kernel, activity model, persisted store, face layout and the
//! interaction controller. Nothing here depends on a rendering backend.

pub mod activity;
pub mod clock;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod layout;
pub mod store;
pub mod transform;

pub use activity::{
    duration_minutes, format_hex_color, parse_hex_color, round_to_quarter_hour, Activity,
    ActivityId, DEFAULT_PALETTE,
};
pub use clock::{local_now, MinuteClock};
pub use config::{config_dir, config_path, data_dir, load_config, save_config, ConfigError};
pub use controller::{
    Controller, DragState, EditorState, InteractionSettings, PointerEvent, PointerSample,
};
pub use geometry::{
    angle_delta, angle_to_time, describe_arc, half_hour_tick_angles, hour_tick_angles,
    label_anchor, normalize_angle, polar_to_cartesian, snap_angle_to_15_min, time_to_angle,
    ArcPath, Point, TextAnchor,
};
pub use layout::{leveled_activities, ActivityShape, DragMode, FaceLayout, LeveledActivity};
pub use store::{
    ActivityStore, FileStorage, KeyValueStorage, ListenerId, LocalStore, MemoryStorage,
    StorageError, Subscription, STORAGE_KEY,
};
pub use transform::{pointer_angle, Affine};
