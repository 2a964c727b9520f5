//! Character movement (side-scroller)
//!
//! Архитектура:
//! - Velocity интегрируем сами: walk acceleration, braking, gravity, jump
//! - `MovementBackend::Rapier`: шаг отдаём KinematicCharacterController,
//!   коллизии капсулы и grounded берём из KinematicCharacterControllerOutput
//! - `MovementBackend::Kinematic` (headless без rapier plugin): шаг пишется
//!   в Transform, пол = GROUND_LEVEL
//! - Root персонажа не вращается, поворачивается только sprite child
//!
//! Axis mapping: MoveRight → world −X, MoveForward → world −Z
//! (камера смотрит на персонажа с −Z в +Z, её right = −X)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::MovementConfig;

/// Earth gravity (m/s²), масштабируется `gravity_scale`
pub const GRAVITY: f32 = -9.81;
/// Walk acceleration (2048 cm/s²)
pub const MAX_ACCELERATION: f32 = 20.48;
/// Торможение без input на земле
pub const BRAKING_DECELERATION: f32 = 20.48;
/// Уровень пола для headless ground check
pub const GROUND_LEVEL: f32 = 0.0;
/// Допуск сравнения desired/effective translation (m)
const CONTACT_EPSILON: f32 = 1e-4;

pub const MOVE_RIGHT_AXIS: Vec3 = Vec3::NEG_X;
pub const MOVE_FORWARD_AXIS: Vec3 = Vec3::NEG_Z;

/// Кто применяет шаг капсулы
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MovementBackend {
    /// Transform += velocity·dt, пол на GROUND_LEVEL
    #[default]
    Kinematic,
    /// Rapier character controller (client, RapierPhysicsPlugin в FixedUpdate)
    Rapier,
}

/// Параметры движения персонажа
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(CharacterVelocity, MovementInput)]
pub struct CharacterMovement {
    pub max_walk_speed: f32,
    pub jump_velocity: f32,
    pub gravity_scale: f32,
    /// Доля ускорения в воздухе (0..1)
    pub air_control: f32,
    pub ground_friction: f32,
    /// Capsule center → низ капсулы
    pub capsule_half_height: f32,
    pub grounded: bool,
}

impl Default for CharacterMovement {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl CharacterMovement {
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            max_walk_speed: config.max_walk_speed,
            jump_velocity: config.jump_velocity,
            gravity_scale: config.gravity_scale,
            air_control: config.air_control,
            ground_friction: config.ground_friction,
            capsule_half_height: config.capsule_half_height,
            grounded: false,
        }
    }

    pub fn gravity(&self) -> f32 {
        GRAVITY * self.gravity_scale
    }
}

/// Скорость персонажа (m/s), интегрируется в Transform
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterVelocity(pub Vec3);

/// Входные оси движения (-1..1) + jump
///
/// Для headless тестов — заполняем напрямую.
/// Для игры — client из ButtonInput<KeyCode>.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    pub move_right: f32,
    pub move_forward: f32,
    /// Jump держится (pressed → true, released → false)
    pub jump: bool,
}

impl MovementInput {
    /// World направление желаемого движения (длина ≤ 1)
    pub fn world_direction(&self) -> Vec3 {
        let direction = MOVE_RIGHT_AXIS * self.move_right.clamp(-1.0, 1.0)
            + MOVE_FORWARD_AXIS * self.move_forward.clamp(-1.0, 1.0);
        direction.clamp_length_max(1.0)
    }
}

/// Горизонтальная скорость за один шаг (walk accel / braking / air control)
pub fn step_horizontal_velocity(
    movement: &CharacterMovement,
    velocity: Vec3,
    input_direction: Vec3,
    delta: f32,
) -> Vec3 {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);

    let next = if input_direction.length_squared() > 1e-4 {
        let desired = input_direction * movement.max_walk_speed;
        let control = if movement.grounded { 1.0 } else { movement.air_control };
        move_towards(horizontal, desired, MAX_ACCELERATION * control * delta)
    } else if movement.grounded {
        let damped = horizontal * (1.0 - movement.ground_friction * delta).max(0.0);
        move_towards(damped, Vec3::ZERO, BRAKING_DECELERATION * delta)
    } else {
        horizontal
    };

    Vec3::new(next.x, velocity.y, next.z)
}

fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance < f32::EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Контакт после rapier шага → (grounded, скорректированная velocity)
///
/// Ось, по которой effective translation меньше половины desired, считается
/// заблокированной (стена / потолок) и её скорость гасится.
pub fn resolve_contact(velocity: Vec3, grounded: bool, desired: Vec3, effective: Vec3) -> (bool, Vec3) {
    let mut velocity = velocity;
    let grounded = grounded && velocity.y <= 0.0;

    for axis in 0..3 {
        let wanted = desired[axis];
        if wanted.abs() <= CONTACT_EPSILON {
            continue;
        }
        let moved = effective[axis] * wanted.signum();
        if moved < wanted.abs() * 0.5 && velocity[axis] * wanted > 0.0 {
            velocity[axis] = 0.0;
        }
    }

    if grounded {
        velocity.y = 0.0;
    }
    (grounded, velocity)
}

/// Ground check перед шагом
///
/// Rapier backend: по output прошлого шага character controller'а.
/// Kinematic backend: низ капсулы на GROUND_LEVEL и не летим вверх.
pub fn ground_detection(
    backend: Res<MovementBackend>,
    mut query: Query<(
        &mut Transform,
        &mut CharacterMovement,
        &mut CharacterVelocity,
        Option<&KinematicCharacterControllerOutput>,
    )>,
) {
    for (mut transform, mut movement, mut velocity, output) in query.iter_mut() {
        if *backend == MovementBackend::Rapier {
            let Some(output) = output else {
                // Rapier ещё не сделал ни одного шага
                movement.grounded = false;
                continue;
            };
            let (grounded, corrected) = resolve_contact(
                velocity.0,
                output.grounded,
                output.desired_translation,
                output.effective_translation,
            );
            movement.grounded = grounded;
            velocity.0 = corrected;
            continue;
        }

        let floor_y = GROUND_LEVEL + movement.capsule_half_height;
        if transform.translation.y <= floor_y + 1e-3 && velocity.0.y <= 0.0 {
            transform.translation.y = floor_y;
            velocity.0.y = 0.0;
            movement.grounded = true;
        } else {
            movement.grounded = false;
        }
    }
}

/// Walk/air движение от input
pub fn apply_movement_input(
    mut query: Query<(&CharacterMovement, &MovementInput, &mut CharacterVelocity)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (movement, input, mut velocity) in query.iter_mut() {
        velocity.0 = step_horizontal_velocity(movement, velocity.0, input.world_direction(), delta);
    }
}

/// Jump пока кнопка держится и персонаж на земле
pub fn apply_jump(mut query: Query<(&mut CharacterMovement, &MovementInput, &mut CharacterVelocity)>) {
    for (mut movement, input, mut velocity) in query.iter_mut() {
        if input.jump && movement.grounded {
            velocity.0.y = movement.jump_velocity;
            movement.grounded = false;
        }
    }
}

pub fn apply_gravity(mut query: Query<(&CharacterMovement, &mut CharacterVelocity)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (movement, mut velocity) in query.iter_mut() {
        if !movement.grounded {
            velocity.0.y += movement.gravity() * delta;
        }
    }
}

/// Шаг velocity·dt: в character controller (rapier) или прямо в Transform
pub fn integrate_velocity(
    backend: Res<MovementBackend>,
    mut query: Query<
        (&CharacterVelocity, &mut Transform, Option<&mut KinematicCharacterController>),
        With<CharacterMovement>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (velocity, mut transform, controller) in query.iter_mut() {
        let step = velocity.0 * delta;
        match (*backend, controller) {
            (MovementBackend::Rapier, Some(mut controller)) => controller.translation = Some(step),
            _ => transform.translation += step,
        }
    }
}

/// Синхронизация нашей velocity в rapier (для contact events в client)
pub fn sync_velocity_to_rapier(mut query: Query<(&CharacterVelocity, &mut Velocity), With<CharacterMovement>>) {
    for (velocity, mut rapier_velocity) in query.iter_mut() {
        rapier_velocity.linvel = velocity.0;
    }
}

/// Персонажи в одной группе, коллайдят со всем
pub fn character_collision_groups() -> CollisionGroups {
    CollisionGroups::new(Group::GROUP_1, Group::ALL)
}

/// Rapier character controller капсулы (slide по стенам, snap к полу)
pub fn character_controller() -> KinematicCharacterController {
    KinematicCharacterController {
        up: Vec3::Y,
        offset: CharacterLength::Absolute(0.01),
        snap_to_ground: Some(CharacterLength::Absolute(0.2)),
        ..default()
    }
}

/// Rapier компоненты капсулы персонажа
pub fn character_physics_bundle(config: &MovementConfig) -> impl Bundle {
    // capsule_y(half_height цилиндра, radius): полная половина высоты = cylinder + radius
    let cylinder_half = (config.capsule_half_height - config.capsule_radius).max(0.0);
    (
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(cylinder_half, config.capsule_radius),
        character_controller(),
        Velocity::default(),
        character_collision_groups(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: f32 = 1.0 / 64.0;

    fn grounded_movement() -> CharacterMovement {
        CharacterMovement {
            grounded: true,
            ..default()
        }
    }

    #[test]
    fn test_axis_mapping() {
        let input = MovementInput {
            move_right: 1.0,
            move_forward: 0.0,
            jump: false,
        };
        assert_eq!(input.world_direction(), Vec3::NEG_X);

        let input = MovementInput {
            move_right: 0.0,
            move_forward: 1.0,
            jump: false,
        };
        assert_eq!(input.world_direction(), Vec3::NEG_Z);

        // Диагональ не быстрее
        let input = MovementInput {
            move_right: 1.0,
            move_forward: 1.0,
            jump: false,
        };
        assert!((input.world_direction().length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_accelerates_to_max_walk_speed() {
        let movement = grounded_movement();
        let mut velocity = Vec3::ZERO;

        for _ in 0..64 {
            velocity = step_horizontal_velocity(&movement, velocity, Vec3::NEG_X, DELTA);
        }

        // 6 m/s / 20.48 m/s² ≈ 0.3 sec < 1 sec
        assert!((velocity.x + movement.max_walk_speed).abs() < 1e-4, "velocity = {:?}", velocity);
        assert_eq!(velocity.z, 0.0);
    }

    #[test]
    fn test_braking_stops_on_ground() {
        let movement = grounded_movement();
        let mut velocity = Vec3::new(6.0, 0.0, 0.0);

        for _ in 0..32 {
            velocity = step_horizontal_velocity(&movement, velocity, Vec3::ZERO, DELTA);
        }
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_air_keeps_momentum_without_input() {
        let movement = CharacterMovement {
            grounded: false,
            ..default()
        };
        let velocity = Vec3::new(6.0, 3.0, 0.0);

        let next = step_horizontal_velocity(&movement, velocity, Vec3::ZERO, DELTA);
        assert_eq!(next, velocity);
    }

    #[test]
    fn test_air_control_scales_acceleration() {
        let ground = grounded_movement();
        let air = CharacterMovement {
            grounded: false,
            ..default()
        };

        let on_ground = step_horizontal_velocity(&ground, Vec3::ZERO, Vec3::NEG_X, DELTA);
        let in_air = step_horizontal_velocity(&air, Vec3::ZERO, Vec3::NEG_X, DELTA);

        assert!((in_air.x / on_ground.x - air.air_control).abs() < 1e-4);
    }

    #[test]
    fn test_contact_blocked_by_wall_stops_horizontal() {
        let velocity = Vec3::new(-6.0, 0.0, 0.0);
        let desired = velocity * DELTA;

        let (grounded, corrected) = resolve_contact(velocity, true, desired, Vec3::ZERO);
        assert!(grounded);
        assert_eq!(corrected, Vec3::ZERO);
    }

    #[test]
    fn test_contact_free_move_keeps_velocity() {
        let velocity = Vec3::new(-6.0, -2.0, 0.0);
        let desired = velocity * DELTA;

        let (grounded, corrected) = resolve_contact(velocity, false, desired, desired);
        assert!(!grounded);
        assert_eq!(corrected, velocity);
    }

    #[test]
    fn test_contact_landing_on_platform() {
        // Падаем на платформу: vertical шаг съеден, горизонтальный прошёл
        let velocity = Vec3::new(3.0, -8.0, 0.0);
        let desired = velocity * DELTA;
        let effective = Vec3::new(desired.x, 0.0, 0.0);

        let (grounded, corrected) = resolve_contact(velocity, true, desired, effective);
        assert!(grounded);
        assert_eq!(corrected, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_contact_ceiling_cancels_jump() {
        let velocity = Vec3::new(0.0, 10.0, 0.0);
        let desired = velocity * DELTA;

        let (grounded, corrected) = resolve_contact(velocity, false, desired, Vec3::ZERO);
        assert!(!grounded);
        assert_eq!(corrected.y, 0.0);
    }

    #[test]
    fn test_contact_grounded_ignored_while_rising() {
        // Output прошлого шага ещё grounded, но уже прыгнули
        let velocity = Vec3::new(0.0, 10.0, 0.0);
        let desired = velocity * DELTA;

        let (grounded, corrected) = resolve_contact(velocity, true, desired, desired);
        assert!(!grounded);
        assert_eq!(corrected, velocity);
    }

    #[test]
    fn test_rapier_backend_routes_step_to_controller() {
        use bevy::ecs::system::RunSystemOnce;
        use std::time::Duration;

        let mut world = World::new();
        let mut time = Time::<Fixed>::from_hz(64.0);
        time.advance_by(Duration::from_secs_f64(1.0 / 64.0));
        world.insert_resource(time);
        world.insert_resource(MovementBackend::Rapier);

        let entity = world
            .spawn((
                CharacterMovement::default(),
                CharacterVelocity(Vec3::new(-6.4, 0.0, 0.0)),
                Transform::default(),
                character_controller(),
            ))
            .id();

        world.run_system_once(integrate_velocity).expect("system runs");

        let controller = world.get::<KinematicCharacterController>(entity).expect("controller");
        let step = controller.translation.expect("step queued");
        assert!((step - Vec3::new(-0.1, 0.0, 0.0)).length() < 1e-5, "step = {:?}", step);
        assert_eq!(world.get::<Transform>(entity).expect("transform").translation, Vec3::ZERO);
    }

    #[test]
    fn test_rapier_backend_without_output_is_airborne() {
        use bevy::ecs::system::RunSystemOnce;

        let mut world = World::new();
        world.insert_resource(MovementBackend::Rapier);
        let entity = world
            .spawn((
                CharacterMovement {
                    grounded: true,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.96, 0.0),
            ))
            .id();

        world.run_system_once(ground_detection).expect("system runs");

        assert!(!world.get::<CharacterMovement>(entity).expect("movement").grounded);
    }

    #[test]
    fn test_gravity_scale() {
        let movement = CharacterMovement::default();
        assert!((movement.gravity() + 19.62).abs() < 1e-4);
    }
}
