//! Camera aiming — eye (unclamped) + display camera (soft clamped)
//!
//! Conventions (Bevy): right-handed, Y up, forward = −Z.
//! Orientation строится как `Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0)`:
//! - yaw вокруг Y (0 = смотрим в −Z)
//! - pitch вокруг локального X (+ = вверх)
//! - roll всегда 0

use bevy::prelude::*;

use super::angle::limit_angle;

/// Forward короче этого (в квадрате) считаем вырожденным
pub const MIN_FORWARD_LENGTH_SQUARED: f32 = 1e-6;

/// Мировые позы камер rig'а (снимок GlobalTransform на момент aim)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigPose {
    pub eye_position: Vec3,
    /// World rotation родителя eye (capsule root)
    pub eye_parent_rotation: Quat,
    pub display_position: Vec3,
    /// World rotation родителя display камеры (camera boom)
    pub display_parent_rotation: Quat,
}

/// Результат aim для display камеры
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayAimResult {
    /// Clamped yaw offset (градусы), |yaw| ≤ limit
    pub yaw: f32,
    /// Clamped pitch offset (градусы), |pitch| ≤ limit
    pub pitch: f32,
    /// Новая local rotation (инверсия clamped rotation)
    pub local_rotation: Quat,
}

/// Результат `aim_at`. `None` = камера не трогается (forward вырожден).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigAim {
    /// World rotation eye камеры
    pub eye_rotation: Option<Quat>,
    /// Local rotation eye относительно родителя
    pub eye_local_rotation: Option<Quat>,
    pub display: Option<DisplayAimResult>,
}

/// Yaw/pitch (радианы) для направления. `None` для нулевого или нечислового вектора.
pub fn yaw_pitch_towards(direction: Vec3) -> Option<(f32, f32)> {
    if !direction.is_finite() || direction.length_squared() < MIN_FORWARD_LENGTH_SQUARED {
        return None;
    }

    let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
    let yaw = (-direction.x).atan2(-direction.z);
    let pitch = direction.y.atan2(horizontal);
    Some((yaw, pitch))
}

/// Rotation чей forward (−Z) совпадает с `direction`, roll = 0
pub fn orientation_towards(direction: Vec3) -> Option<Quat> {
    let (yaw, pitch) = yaw_pitch_towards(direction)?;
    Some(Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0))
}

/// Навести rig на `target`
///
/// 1. Eye: rotation = смотреть прямо на target (без clamp).
/// 2. Display: world rotation на target → parent-local.
/// 3. Yaw и pitch независимо через `limit_angle`, roll = 0.
/// 4. Local rotation = inverse(clamped) (компенсирует 180° yaw boom'а).
pub fn aim_at(pose: &RigPose, target: Vec3, limit_degrees: f32) -> RigAim {
    let eye_rotation = orientation_towards(target - pose.eye_position);
    let eye_local_rotation = eye_rotation.map(|world| pose.eye_parent_rotation.inverse() * world);

    let display = orientation_towards(target - pose.display_position).map(|world| {
        let local = pose.display_parent_rotation.inverse() * world;
        let (yaw, pitch, _roll) = local.to_euler(EulerRot::YXZ);

        let yaw = limit_angle(yaw.to_degrees(), limit_degrees);
        let pitch = limit_angle(pitch.to_degrees(), limit_degrees);

        let clamped = Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0);
        DisplayAimResult {
            yaw,
            pitch,
            local_rotation: clamped.inverse(),
        }
    });

    RigAim {
        eye_rotation,
        eye_local_rotation,
        display,
    }
}
