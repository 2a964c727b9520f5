use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use perspective_simulation::controller::smooth_look_target;
use perspective_simulation::{PerspectiveSet, PlayerController, PointerHit, PointerRay, Possessed};

pub struct RapierTracePlugin;

impl Plugin for RapierTracePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            trace_pointer_rapier
                .in_set(PerspectiveSet::Aim)
                .before(smooth_look_target),
        );
    }
}

/// Line trace pointer ray по rapier коллайдерам (possessed персонаж исключён)
fn trace_pointer_rapier(
    rapier_context: ReadRapierContext,
    pointer: Res<PointerRay>,
    mut controllers: Query<(&PlayerController, Option<&Possessed>, &mut PointerHit)>,
) {
    let context = rapier_context.single().ok();

    for (controller, possessed, mut hit) in controllers.iter_mut() {
        let (Some(context), Some(ray)) = (context.as_ref(), pointer.0) else {
            hit.0 = None;
            continue;
        };

        let mut filter = QueryFilter::exclude_dynamic();
        if let Some(possessed) = possessed {
            filter = filter.exclude_rigid_body(possessed.0);
        }

        let direction = ray.direction.as_vec3();
        hit.0 = context
            .cast_ray(ray.origin, direction, controller.trace_distance, true, filter)
            .map(|(_entity, toi)| ray.origin + direction * toi);
    }
}
