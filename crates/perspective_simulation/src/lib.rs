//! Perspective Simulation Core
//!
//! ECS-логика side-scroller персонажа на Bevy 0.16 (headless):
//! - character: движение, sprite анимация, spawn
//! - controller: mouse aim (trace + smoothing)
//! - camera: dual camera rig, soft clamp, view-projection export
//! - parameters: shader parameter collections
//!
//! Rendering/input/window — в `perspective_client`.

use bevy::prelude::*;

pub mod camera;
pub mod character;
pub mod config;
pub mod controller;
pub mod logger;
pub mod parameters;
pub mod player;

pub use camera::{CameraRig, DisplayAim, DisplayCamera, EyeCamera, EyeProjection, LookTowards};
pub use character::{spawn_player_character, spawn_player_controller, SpawnedCharacter};
pub use config::{ConfigError, GameConfig};
pub use controller::{LookTarget, PlaneRayQuery, PlayerController, PointerHit, PointerRay, Possessed, RayQueryService};
pub use logger::{log, log_error, log_info, log_warning, LogLevel, LogPrinter, LOGGER_LEVEL};
pub use parameters::{ParameterCollections, LOS_COLLECTION};
pub use player::Player;

/// Порядок gameplay систем в Update
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PerspectiveSet {
    /// Резолв bindings (spawn / новый registry)
    Bind,
    /// Pointer trace → smoothing → aim
    Aim,
    /// View-projection export (каждый tick)
    Export,
    /// Sprite facing + animation
    Sprite,
}

/// Главный plugin (объединяет все подсистемы)
///
/// Ожидает `GameConfig` resource (если нет — вставляет default).
/// `RayQueryService` и `ParameterCollections` инжектятся снаружи.
pub struct PerspectivePlugin;

impl Plugin for PerspectivePlugin {
    fn build(&self, app: &mut App) {
        use bevy_rapier3d::plugin::PhysicsSet;

        app.init_resource::<GameConfig>()
            .init_resource::<PointerRay>()
            .init_resource::<character::MovementBackend>()
            // Fixed timestep 64Hz для movement
            .insert_resource(Time::<Fixed>::from_hz(64.0))
            .add_event::<LookTowards>();

        app.configure_sets(
            Update,
            (
                PerspectiveSet::Bind,
                PerspectiveSet::Aim,
                PerspectiveSet::Export,
                PerspectiveSet::Sprite,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                character::ground_detection,
                character::apply_jump,
                character::apply_movement_input,
                character::apply_gravity,
                character::integrate_velocity,
                character::sync_velocity_to_rapier,
            )
                .chain()
                .before(PhysicsSet::SyncBackend),
        );

        app.add_systems(
            Update,
            (
                parameters::resolve_parameter_bindings.in_set(PerspectiveSet::Bind),
                (
                    controller::trace_pointer,
                    controller::smooth_look_target,
                    camera::aim_camera_rig,
                )
                    .chain()
                    .in_set(PerspectiveSet::Aim),
                camera::export_view_projection.in_set(PerspectiveSet::Export),
                (character::orient_to_movement, character::update_animation).in_set(PerspectiveSet::Sprite),
            ),
        );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(config: GameConfig) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(config)
        .insert_resource(RayQueryService::new(PlaneRayQuery::default()))
        .insert_resource(ParameterCollections::with_line_of_sight())
        .add_plugins(PerspectivePlugin);

    app
}

/// Startup system: default pawn + controller (game mode)
pub fn spawn_default_player(mut commands: Commands, config: Res<GameConfig>) {
    let character = spawn_player_character(&mut commands, &config, Vec3::new(0.0, config.movement.capsule_half_height, 0.0));
    spawn_player_controller(&mut commands, &config, character.root);
    logger::log_info("Default player spawned");
}
