//! Player controller компоненты

use bevy::prelude::*;

use super::smoothing::TargetSmoothing;
use super::trace::{PointerHit, TRACE_DISTANCE};
use crate::config::ControllerConfig;

/// Player controller (отдельная entity, управляет possessed персонажем)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(LookTarget, PointerHit)]
pub struct PlayerController {
    pub smoothing: TargetSmoothing,
    pub trace_distance: f32,
    /// Видимость курсора в окне (aim мышью)
    pub show_cursor: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            smoothing: TargetSmoothing::default(),
            trace_distance: TRACE_DISTANCE,
            show_cursor: true,
        }
    }
}

impl PlayerController {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            smoothing: config.smoothing,
            trace_distance: config.trace_distance,
            ..default()
        }
    }
}

/// Controller → персонаж которым он управляет
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Possessed(pub Entity);

/// Target Point — сглаженная aim точка
///
/// `None` до первого попадания trace; первое попадание берётся как есть.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct LookTarget(pub Option<Vec3>);
