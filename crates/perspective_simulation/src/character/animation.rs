//! Sprite: выбор flipbook анимации + поворот к направлению движения

use bevy::prelude::*;

use super::movement::CharacterVelocity;

/// Какой flipbook сейчас играет
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AnimationKind {
    #[default]
    Idle,
    Running,
}

/// Asset references двух анимаций (scene/asset path)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpriteAnimations {
    pub running: String,
    pub idle: String,
}

impl Default for SpriteAnimations {
    fn default() -> Self {
        Self {
            running: "flipbooks/running.png".to_string(),
            idle: "flipbooks/idle.png".to_string(),
        }
    }
}

impl SpriteAnimations {
    pub fn path(&self, kind: AnimationKind) -> &str {
        match kind {
            AnimationKind::Idle => &self.idle,
            AnimationKind::Running => &self.running,
        }
    }
}

/// Текущая анимация sprite (меняется только при смене состояния)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CurrentAnimation(pub AnimationKind);

/// Sprite child персонажа, поворачивается к движению (root неподвижен)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterSprite {
    pub owner: Entity,
    /// deg/s
    pub rotation_rate: f32,
}

/// Любая ненулевая скорость → Running
pub fn desired_animation(velocity: Vec3) -> AnimationKind {
    if velocity.length_squared() > 0.0 {
        AnimationKind::Running
    } else {
        AnimationKind::Idle
    }
}

pub fn update_animation(
    characters: Query<&CharacterVelocity>,
    mut sprites: Query<(&CharacterSprite, &mut CurrentAnimation)>,
) {
    for (sprite, mut current) in sprites.iter_mut() {
        let Ok(velocity) = characters.get(sprite.owner) else {
            continue;
        };

        let desired = desired_animation(velocity.0);
        // set_if_neq: Changed<CurrentAnimation> только на реальной смене
        current.set_if_neq(CurrentAnimation(desired));
    }
}

/// Yaw sprite'а к горизонтальной скорости, не быстрее rotation_rate
pub fn orient_to_movement(
    time: Res<Time>,
    characters: Query<&CharacterVelocity>,
    mut sprites: Query<(&CharacterSprite, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (sprite, mut transform) in sprites.iter_mut() {
        let Ok(velocity) = characters.get(sprite.owner) else {
            continue;
        };

        let horizontal = Vec3::new(velocity.0.x, 0.0, velocity.0.z);
        if horizontal.length_squared() < 1e-6 {
            continue;
        }

        let desired = Transform::IDENTITY.looking_to(horizontal, Vec3::Y).rotation;
        let max_angle = sprite.rotation_rate.to_radians() * delta;
        transform.rotation = rotate_towards(transform.rotation, desired, max_angle);
    }
}

fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle < f32::EPSILON {
        to
    } else {
        from.slerp(to, max_angle / angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_desired_animation() {
        assert_eq!(desired_animation(Vec3::ZERO), AnimationKind::Idle);
        assert_eq!(desired_animation(Vec3::new(0.0, -0.5, 0.0)), AnimationKind::Running);
        assert_eq!(desired_animation(Vec3::new(6.0, 0.0, 0.0)), AnimationKind::Running);
    }

    #[test]
    fn test_rotate_towards_is_rate_limited() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_y(PI);
        let step = 720f32.to_radians() / 64.0;

        let next = rotate_towards(from, to, step);
        assert!((from.angle_between(next) - step).abs() < 1e-4);

        // 180° при 720°/s → 0.25 sec = 16 шагов
        let mut current = from;
        for _ in 0..16 {
            current = rotate_towards(current, to, step);
        }
        assert!(current.angle_between(to) < 1e-3);
    }

    #[test]
    fn test_animation_paths() {
        let animations = SpriteAnimations::default();
        assert_eq!(animations.path(AnimationKind::Running), "flipbooks/running.png");
        assert_eq!(animations.path(AnimationKind::Idle), "flipbooks/idle.png");
    }
}
