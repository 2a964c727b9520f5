//! Camera events

use bevy::prelude::*;

/// Event: навести camera rig персонажа на world точку
///
/// Генерируется:
/// - `smooth_look_target` (player controller), только когда trace попал
///
/// Обрабатывается:
/// - `aim_camera_rig`
#[derive(Event, Debug, Clone, Copy)]
pub struct LookTowards {
    pub character: Entity,
    pub target: Vec3,
}
