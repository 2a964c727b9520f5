//! Player controller systems
//!
//! Порядок (chain в Update):
//! 1. trace_pointer — PointerRay → RayQueryService → PointerHit
//! 2. smooth_look_target — PointerHit → LookTarget → LookTowards event
//! 3. camera::aim_camera_rig — LookTowards → rig rotations

use bevy::prelude::*;

use super::components::{LookTarget, PlayerController, Possessed};
use super::trace::{PointerHit, PointerRay, RayQueryService};
use crate::camera::{CameraRig, LookTowards};
use crate::logger;

/// Trace pointer ray через injected ray-query service
///
/// Без service (client trace'ит сам через rapier) система ничего не пишет.
pub fn trace_pointer(
    pointer: Res<PointerRay>,
    service: Option<Res<RayQueryService>>,
    mut controllers: Query<(&PlayerController, &mut PointerHit)>,
) {
    let Some(service) = service else {
        return;
    };

    for (controller, mut hit) in controllers.iter_mut() {
        hit.0 = pointer
            .0
            .and_then(|ray| service.0.cast(ray.origin, ray.direction.as_vec3(), controller.trace_distance));
    }
}

/// Сгладить target и отправить персонажу `LookTowards`
///
/// Нет попадания → target не меняется, aim в этом кадре не вызывается.
pub fn smooth_look_target(
    time: Res<Time>,
    mut controllers: Query<(Entity, &PlayerController, &PointerHit, &Possessed, &mut LookTarget)>,
    characters: Query<(), With<CameraRig>>,
    mut look_events: EventWriter<LookTowards>,
) {
    for (controller_entity, controller, hit, possessed, mut target) in controllers.iter_mut() {
        let Some(hit_point) = hit.0 else {
            continue;
        };

        if characters.get(possessed.0).is_err() {
            logger::log(&format!(
                "{:?}: possessed {:?} is not a valid character, skip aim",
                controller_entity, possessed.0
            ));
            continue;
        }

        let point = match target.0 {
            Some(current) => controller.smoothing.blend(current, hit_point, time.delta_secs()),
            None => hit_point,
        };
        target.0 = Some(point);

        look_events.write(LookTowards {
            character: possessed.0,
            target: point,
        });
    }
}

/// Possess: привязать controller к персонажу (аналог OnPossess + Cast)
///
/// Возвращает `false` если pawn не персонаж с camera rig.
pub fn possess(world: &mut World, controller: Entity, pawn: Entity) -> bool {
    if world.get::<CameraRig>(pawn).is_none() {
        logger::log_warning(&format!("{:?}: cannot possess {:?}, not a player character", controller, pawn));
        return false;
    }

    let Ok(mut entity) = world.get_entity_mut(controller) else {
        return false;
    };
    entity.insert(Possessed(pawn));
    logger::log_info(&format!("{:?} possessed {:?}", controller, pawn));
    true
}
