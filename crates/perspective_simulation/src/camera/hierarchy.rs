//! World transform по цепочке ChildOf
//!
//! GlobalTransform propagate'ится только в PostUpdate, а aim/export читают
//! позы в том же кадре, где FixedUpdate сдвинул персонажа и aim повернул eye.
//! Поэтому world pose собираем из local Transform'ов напрямую.

use bevy::prelude::*;

/// Глубже rig не бывает; защита от циклов в сломанной иерархии
const MAX_DEPTH: usize = 32;

pub type HierarchyQuery<'w, 's> = Query<'w, 's, (&'static Transform, Option<&'static ChildOf>)>;

/// World transform `entity` (compose от root к entity)
pub fn world_transform(entity: Entity, hierarchy: &HierarchyQuery) -> Option<Transform> {
    let mut chain = Vec::with_capacity(4);
    let mut current = entity;

    loop {
        let (transform, child_of) = hierarchy.get(current).ok()?;
        chain.push(*transform);

        match child_of {
            Some(child_of) if chain.len() < MAX_DEPTH => current = child_of.parent(),
            Some(_) => return None,
            None => break,
        }
    }

    Some(
        chain
            .into_iter()
            .rev()
            .fold(Transform::IDENTITY, |world, local| world.mul_transform(local)),
    )
}

/// World transform родителя; entity без родителя → IDENTITY
pub fn parent_world_transform(entity: Entity, hierarchy: &HierarchyQuery) -> Option<Transform> {
    let (_, child_of) = hierarchy.get(entity).ok()?;
    match child_of {
        Some(child_of) => world_transform(child_of.parent(), hierarchy),
        None => Some(Transform::IDENTITY),
    }
}
