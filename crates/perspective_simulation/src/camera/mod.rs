//! Camera domain — dual camera rig
//!
//! - Eye camera: scene capture, смотрит прямо на target, её view-projection
//!   экспортируется в shader (PVRow0..PVRow3)
//! - Display camera: side view на boom'е, soft clamped offset (limit_angle)

pub mod aim;
pub mod angle;
pub mod components;
pub mod events;
pub mod hierarchy;
pub mod systems;
pub mod view_projection;


pub use aim::{aim_at, orientation_towards, RigAim, RigPose};
pub use angle::limit_angle;
pub use components::*;
pub use events::LookTowards;
pub use systems::{aim_camera_rig, export_view_projection};
pub use view_projection::{project_to_screen, EyeView, ViewProjection, AXIS_REMAP, PV_ROW_NAMES};
