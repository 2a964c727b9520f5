//! Player controller domain — mouse aim
//!
//! Каждый кадр: pointer ray → trace → exponential smoothing target →
//! `LookTowards` персонажу. Delta time используется только в режиме
//! `TargetSmoothing::FrameRateIndependent`.

pub mod components;
pub mod smoothing;
pub mod systems;
pub mod trace;

pub use components::*;
pub use smoothing::TargetSmoothing;
pub use systems::{possess, smooth_look_target, trace_pointer};
pub use trace::{PlaneRayQuery, PointerHit, PointerRay, RayQuery, RayQueryService, TRACE_DISTANCE};
