//! Player marker component
//!
//! Отмечает персонажа (pawn), которого создал game mode для игрока.

use bevy::prelude::Component;

/// Marker component для player pawn
///
/// Controller живёт отдельной entity (`PlayerController` + `Possessed`),
/// этот marker только для client'а: по нему ищется персонаж для input и visuals.
///
/// # Possession
/// ```ignore
/// commands.entity(controller).insert(Possessed(new_pawn));
/// ```
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;
