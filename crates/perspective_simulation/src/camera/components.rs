//! Camera rig компоненты
//!
//! Иерархия (spawn_player_character):
//! ```text
//! PlayerCharacter (root, capsule, никогда не вращается)
//! ├─ CameraBoom (yaw 180°, socket offset)
//! │  └─ DisplayCamera (arm_length за boom'ом)
//! ├─ EyeCamera (+ EyeProjection)
//! └─ CharacterSprite
//! ```

use bevy::prelude::*;

use crate::config::{CameraConfig, EyeConfig};

/// Rig параметры на персонаже
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    /// Camera Offset Limit (градусы). Не меняется после spawn.
    pub max_offset_degrees: f32,
    pub eye: Entity,
    pub display: Entity,
}

/// Side-view display камера (то, что видит игрок)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct DisplayCamera;

/// Последний clamped offset display камеры (градусы)
///
/// Инвариант: |yaw| ≤ limit, |pitch| ≤ limit
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DisplayAim {
    pub yaw: f32,
    pub pitch: f32,
}

/// Spring arm без collision test
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CameraBoom {
    pub arm_length: f32,
    pub socket_offset: Vec3,
}

impl CameraBoom {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            arm_length: config.arm_length,
            socket_offset: Vec3::from_array(config.socket_offset),
        }
    }

    /// Local transform boom'а относительно capsule root
    pub fn boom_transform(config: &CameraConfig) -> Transform {
        Transform::from_rotation(Quat::from_rotation_y(config.boom_yaw_degrees.to_radians()))
    }

    /// Local transform display камеры на конце arm (forward boom'а = −Z)
    pub fn camera_local_transform(&self) -> Transform {
        Transform::from_translation(self.socket_offset + Vec3::Z * self.arm_length)
    }
}

/// Eye scene-capture камера, её view уходит в shader
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct EyeCamera;

/// Perspective параметры eye камеры
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EyeProjection {
    pub fov_y_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for EyeProjection {
    fn default() -> Self {
        Self::from_config(&EyeConfig::default())
    }
}

impl EyeProjection {
    pub fn from_config(config: &EyeConfig) -> Self {
        Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect_ratio: config.aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }
}
