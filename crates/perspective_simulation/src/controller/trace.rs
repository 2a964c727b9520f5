//! Pointer trace: screen ray → первая blocking точка в мире

use bevy::math::Ray3d;
use bevy::prelude::*;

/// Длина trace от pointer'а (9999 cm в метрах)
pub const TRACE_DISTANCE: f32 = 99.99;

/// Collision/ray-query collaborator
///
/// Реализации: `PlaneRayQuery` (headless, gameplay plane), rapier query в client.
pub trait RayQuery: Send + Sync {
    /// Первая blocking точка на отрезке `origin + direction·[0, max_distance]`
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Injected ray-query service (resolve'ится при setup, не global singleton)
#[derive(Resource)]
pub struct RayQueryService(pub Box<dyn RayQuery>);

impl RayQueryService {
    pub fn new(query: impl RayQuery + 'static) -> Self {
        Self(Box::new(query))
    }
}

/// Бесконечная плоскость (side-scroller gameplay plane)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRayQuery {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Default for PlaneRayQuery {
    /// Плоскость z = 0, по которой бегает персонаж
    fn default() -> Self {
        Self {
            point: Vec3::ZERO,
            normal: Vec3::Z,
        }
    }
}

impl RayQuery for PlaneRayQuery {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3> {
        let direction = direction.try_normalize()?;
        let denom = direction.dot(self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }

        let distance = (self.point - origin).dot(self.normal) / denom;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        Some(origin + direction * distance)
    }
}

/// Pointer ray текущего кадра (world space)
///
/// Заполняется client'ом из cursor position (`Camera::viewport_to_world`),
/// в headless — сценарием. `None` = курсор вне окна.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PointerRay(pub Option<Ray3d>);

/// Результат trace controller'а в этом кадре (`None` = ничего не задели)
///
/// Живёт на controller entity: каждый trace'ит со своим `trace_distance`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerHit(pub Option<Vec3>);
