//! Character domain — движение, sprite, spawn
//!
//! Все movement системы в FixedUpdate (64Hz), sprite в Update.

pub mod animation;
pub mod movement;
pub mod spawn;

pub use animation::{
    desired_animation, orient_to_movement, update_animation, AnimationKind, CharacterSprite, CurrentAnimation,
    SpriteAnimations,
};
pub use movement::{
    apply_gravity, apply_jump, apply_movement_input, character_controller, ground_detection, integrate_velocity,
    resolve_contact, sync_velocity_to_rapier, CharacterMovement, CharacterVelocity, MovementBackend, MovementInput,
};
pub use spawn::{spawn_player_character, spawn_player_controller, SpawnedCharacter};
