use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use perspective_simulation::{DisplayCamera, PerspectiveSet, PlayerController, PointerRay};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (
            attach_display_camera,
            apply_cursor_visibility,
            update_pointer_ray.before(PerspectiveSet::Aim),
        ));
    }
}

/// Render камера на DisplayCamera entity из simulation rig
fn attach_display_camera(
    mut commands: Commands,
    query: Query<Entity, Added<DisplayCamera>>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 60f32.to_radians(),
                ..default()
            }),
        ));
        perspective_simulation::log("Display camera attached");
    }
}

/// `PlayerController::show_cursor` → курсор primary window
fn apply_cursor_visibility(
    controllers: Query<&PlayerController, Changed<PlayerController>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Some(controller) = controllers.iter().last() else {
        return;
    };
    for mut window in windows.iter_mut() {
        window.cursor_options.visible = controller.show_cursor;
    }
}

/// Cursor → world ray через display камеру
///
/// Курсор вне окна → PointerRay(None), trace в этом кадре не делается.
fn update_pointer_ray(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<DisplayCamera>>,
    mut pointer: ResMut<PointerRay>,
) {
    let (Ok(window), Ok((camera, camera_transform))) = (windows.single(), cameras.single()) else {
        pointer.0 = None;
        return;
    };

    pointer.0 = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor).ok());
}
