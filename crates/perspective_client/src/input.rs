use bevy::prelude::*;
use perspective_simulation::character::MovementInput;
use perspective_simulation::Player;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, read_movement_input);
    }
}

/// Keyboard/touch → MovementInput player pawn'а
///
/// - A/D: MoveRight axis
/// - W/S: MoveForward axis
/// - Space или любое касание: jump (держится пока нажато)
fn read_movement_input(
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut query: Query<&mut MovementInput, With<Player>>,
) {
    let axis = |positive: KeyCode, negative: KeyCode| {
        let mut value = 0.0;
        if keys.pressed(positive) {
            value += 1.0;
        }
        if keys.pressed(negative) {
            value -= 1.0;
        }
        value
    };

    let input = MovementInput {
        move_right: axis(KeyCode::KeyD, KeyCode::KeyA),
        move_forward: axis(KeyCode::KeyW, KeyCode::KeyS),
        jump: keys.pressed(KeyCode::Space) || touches.iter().next().is_some(),
    };

    for mut movement in query.iter_mut() {
        movement.set_if_neq(input);
    }
}
