//! Default pawn + controller setup (game mode)

use bevy::prelude::*;

use super::animation::{CharacterSprite, CurrentAnimation, SpriteAnimations};
use super::movement::{character_physics_bundle, CharacterMovement};
use crate::camera::{CameraBoom, CameraRig, DisplayAim, DisplayCamera, EyeCamera, EyeProjection};
use crate::config::GameConfig;
use crate::controller::{possess, PlayerController};
use crate::parameters::ParameterBinding;
use crate::player::Player;

/// Entities созданного персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedCharacter {
    pub root: Entity,
    pub boom: Entity,
    pub display: Entity,
    pub eye: Entity,
    pub sprite: Entity,
}

/// Spawn персонажа с полным camera rig
///
/// - Root: Transform, CharacterMovement, Rapier capsule, ParameterBinding, CameraRig
/// - CameraBoom (yaw 180°) → DisplayCamera на конце arm
/// - EyeCamera + EyeProjection (child of root)
/// - CharacterSprite (поворачивается к движению)
pub fn spawn_player_character(commands: &mut Commands, config: &GameConfig, position: Vec3) -> SpawnedCharacter {
    let root = commands
        .spawn((
            Name::new("PlayerCharacter"),
            Player,
            Transform::from_translation(position),
            CharacterMovement::from_config(&config.movement),
            character_physics_bundle(&config.movement),
            ParameterBinding::new(config.parameters.collection.clone()),
        ))
        .id();

    let boom_component = CameraBoom::from_config(&config.camera);
    let boom = commands
        .spawn((
            Name::new("CameraBoom"),
            boom_component,
            CameraBoom::boom_transform(&config.camera),
            ChildOf(root),
        ))
        .id();

    let display = commands
        .spawn((
            Name::new("SideViewCamera"),
            DisplayCamera,
            DisplayAim::default(),
            boom_component.camera_local_transform(),
            ChildOf(boom),
        ))
        .id();

    let eye = commands
        .spawn((
            Name::new("EyeSceneCapture"),
            EyeCamera,
            EyeProjection::from_config(&config.eye),
            Transform::from_translation(Vec3::from_array(config.eye.offset)),
            ChildOf(root),
        ))
        .id();

    let sprite = commands
        .spawn((
            Name::new("Sprite"),
            CharacterSprite {
                owner: root,
                rotation_rate: config.movement.rotation_rate,
            },
            SpriteAnimations::default(),
            CurrentAnimation::default(),
            Transform::default(),
            ChildOf(root),
        ))
        .id();

    commands.entity(root).insert(CameraRig {
        max_offset_degrees: config.camera.max_offset_degrees,
        eye,
        display,
    });

    SpawnedCharacter {
        root,
        boom,
        display,
        eye,
        sprite,
    }
}

/// Spawn player controller и possess персонажа
///
/// Possess выполняется командой: к этому моменту CameraRig уже вставлен.
pub fn spawn_player_controller(commands: &mut Commands, config: &GameConfig, character: Entity) -> Entity {
    let controller = commands
        .spawn((Name::new("PlayerController"), PlayerController::from_config(&config.controller)))
        .id();

    commands.queue(move |world: &mut World| {
        possess(world, controller, character);
    });

    controller
}
