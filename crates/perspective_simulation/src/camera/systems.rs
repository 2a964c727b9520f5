//! Camera rig systems (Update, main thread)

use bevy::prelude::*;

use super::aim::{aim_at, RigPose};
use super::components::{CameraRig, DisplayAim, DisplayCamera, EyeCamera, EyeProjection};
use super::events::LookTowards;
use super::hierarchy::{parent_world_transform, world_transform, HierarchyQuery};
use super::view_projection::{publish_rows, EyeView, ViewProjection};
use crate::logger;
use crate::parameters::{ParameterBinding, ParameterCollections};

/// Навести eye + display камеры персонажа на target из `LookTowards`
///
/// Вырожденный forward (target совпал с камерой) → эта камера не трогается.
pub fn aim_camera_rig(
    mut events: EventReader<LookTowards>,
    rigs: Query<&CameraRig>,
    mut cameras: ParamSet<(
        HierarchyQuery,
        Query<&mut Transform, (With<EyeCamera>, Without<DisplayCamera>)>,
        Query<(&mut Transform, &mut DisplayAim), (With<DisplayCamera>, Without<EyeCamera>)>,
    )>,
) {
    for event in events.read() {
        let Ok(rig) = rigs.get(event.character) else {
            logger::log_warning(&format!("LookTowards: {:?} has no CameraRig", event.character));
            continue;
        };

        let pose = {
            let hierarchy = cameras.p0();
            let (Some(eye), Some(eye_parent), Some(display), Some(display_parent)) = (
                world_transform(rig.eye, &hierarchy),
                parent_world_transform(rig.eye, &hierarchy),
                world_transform(rig.display, &hierarchy),
                parent_world_transform(rig.display, &hierarchy),
            ) else {
                logger::log_warning(&format!("LookTowards: {:?} rig hierarchy incomplete", event.character));
                continue;
            };

            RigPose {
                eye_position: eye.translation,
                eye_parent_rotation: eye_parent.rotation,
                display_position: display.translation,
                display_parent_rotation: display_parent.rotation,
            }
        };

        let aim = aim_at(&pose, event.target, rig.max_offset_degrees);

        if let Some(local_rotation) = aim.eye_local_rotation {
            if let Ok(mut transform) = cameras.p1().get_mut(rig.eye) {
                transform.rotation = local_rotation;
            }
        }

        if let Some(display) = aim.display {
            if let Ok((mut transform, mut offset)) = cameras.p2().get_mut(rig.display) {
                transform.rotation = display.local_rotation;
                *offset = DisplayAim {
                    yaw: display.yaw,
                    pitch: display.pitch,
                };
            }
        }
    }
}

/// Export view-projection eye камеры в parameter collection (каждый tick)
///
/// Нет resolved binding или registry → пропускаем, без retry.
pub fn export_view_projection(
    characters: Query<(Entity, &CameraRig, &ParameterBinding)>,
    hierarchy: HierarchyQuery,
    projections: Query<&EyeProjection, With<EyeCamera>>,
    registry: Option<ResMut<ParameterCollections>>,
) {
    let Some(mut registry) = registry else {
        return;
    };

    for (entity, rig, binding) in characters.iter() {
        if !binding.resolved {
            continue;
        }

        let (Some(eye_world), Ok(projection)) = (world_transform(rig.eye, &hierarchy), projections.get(rig.eye)) else {
            continue;
        };

        let Some(collection) = registry.get_mut(&binding.collection) else {
            logger::log_error(&format!(
                "{:?}: resolved collection '{}' disappeared from registry",
                entity, binding.collection
            ));
            continue;
        };

        let eye = EyeView {
            position: eye_world.translation,
            rotation: eye_world.rotation,
            projection: *projection,
        };
        publish_rows(collection, &ViewProjection::from_eye(&eye));
    }
}
