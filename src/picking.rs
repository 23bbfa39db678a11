//! Screen-point picking with a ground-plane fallback.
//!
//! A pick either lands on a registered object (drives selection) or yields a
//! world point with no object (drives placement). When the engine reports no
//! renderable under the pointer, the camera ray is intersected with the
//! ground plane `y = 0` instead, so a pick on the empty scene still produces a
//! usable placement point.

#[cfg(test)]
#[path = "picking_test.rs"]
mod picking_test;

use glam::DVec3;
use serde::Serialize;

use crate::backend::{Ray, RenderBackend};
use crate::consts::GROUND_Y;
use crate::registry::ObjectRegistry;
use crate::scene::ObjectId;

/// What a pick landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickSurface {
    /// A registered scene object.
    Object,
    /// A renderable the registry does not own (grid, helpers).
    Renderable,
    /// The ground plane, reached by the camera ray.
    Ground,
}

/// Outcome of picking a screen point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickResult {
    pub hit: bool,
    pub surface: PickSurface,
    /// The registered object under the pointer. `None` for placement points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_point: Option<DVec3>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_normal: Option<DVec3>,
}

impl PickResult {
    /// A hit on a registered object.
    #[must_use]
    pub fn object(id: ObjectId, point: DVec3, normal: DVec3) -> Self {
        Self::new(PickSurface::Object, Some(id), point, normal)
    }

    /// A placement point on an unregistered renderable.
    #[must_use]
    pub fn renderable(point: DVec3, normal: DVec3) -> Self {
        Self::new(PickSurface::Renderable, None, point, normal)
    }

    /// A placement point on the ground plane.
    #[must_use]
    pub fn ground(point: DVec3) -> Self {
        Self::new(PickSurface::Ground, None, point, DVec3::Y)
    }

    fn new(surface: PickSurface, object_id: Option<ObjectId>, point: DVec3, normal: DVec3) -> Self {
        Self { hit: true, surface, object_id, world_point: Some(point), world_normal: Some(normal) }
    }

    /// Returns `true` if the pick landed on a registered object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.object_id.is_some()
    }
}

/// Pick the screen point `(x, y)`.
///
/// A renderable hit that resolves in the registry reports its object id. A
/// hit on an unregistered renderable (the reference grid, for instance) is a
/// placement point on that surface. With nothing under the pointer the camera
/// ray is intersected with the ground.
pub fn pick(
    x: f64,
    y: f64,
    registry: &ObjectRegistry,
    backend: &mut dyn RenderBackend,
    parallel_epsilon: f64,
) -> PickResult {
    if let Some(hit) = backend.pick(x, y) {
        return match registry.find_by_handle(hit.handle) {
            Ok(object) => PickResult::object(object.id.clone(), hit.point, hit.normal),
            Err(_) => PickResult::renderable(hit.point, hit.normal),
        };
    }

    let ray = backend.cast_ray(x, y);
    PickResult::ground(intersect_ground(&ray, parallel_epsilon))
}

/// Intersect `ray` with the ground plane.
///
/// A ray whose `|direction.y|` is below `parallel_epsilon` never reaches the
/// plane in a stable way; its origin projected onto the plane is returned
/// instead, so the result is always finite for a finite origin.
#[must_use]
pub fn intersect_ground(ray: &Ray, parallel_epsilon: f64) -> DVec3 {
    let Ray { origin, direction } = *ray;
    if direction.y.abs() < parallel_epsilon {
        return DVec3::new(origin.x, GROUND_Y, origin.z);
    }

    let t = (GROUND_Y - origin.y) / direction.y;
    DVec3::new(origin.x + t * direction.x, GROUND_Y, origin.z + t * direction.z)
}
