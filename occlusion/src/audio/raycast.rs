//! Audio-specific raycasting implementation
//!
//! Provides the raycast service the obstruction sampler queries, plus a
//! ray-AABB implementation of it over the world's occluder geometry.

use crate::audio::components::{LayerMask, Occluder};
use crate::core::entity::{Transform, World};
use crate::core::AABB;
use glam::Vec3;
use tracing::trace;

/// Ray structure for audio raycasting
#[derive(Debug, Clone, Copy)]
pub struct AudioRay {
    /// Ray origin in world space
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

/// Geometry query used for obstruction counting
///
/// Implementations must report every intersection along the ray, not just
/// the closest one.
pub trait RaycastService: Send + Sync {
    /// Count all intersections along `direction` from `origin` within
    /// `max_distance`, restricted to geometry on `mask`
    fn cast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> u32;
}

/// Perform ray-AABB intersection test (slab method)
///
/// Returns the entry distance if the ray enters the box within `max_distance`.
/// A box containing the ray origin is not reported.
pub fn ray_aabb_intersection(ray: &AudioRay, aabb: &AABB, max_distance: f32) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < f32::EPSILON {
            // Parallel to this slab: must already lie between its planes
            if origin < aabb.min[axis] || origin > aabb.max[axis] {
                return None;
            }
            continue;
        }

        let inv = direction.recip();
        let (near, far) = {
            let a = (aabb.min[axis] - origin) * inv;
            let b = (aabb.max[axis] - origin) * inv;
            (a.min(b), a.max(b))
        };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);

        if t_enter > t_exit {
            return None;
        }
    }

    // Origin inside (or on) the box, or the box lies behind the origin
    if t_enter <= 0.0 || t_enter > max_distance {
        return None;
    }
    Some(t_enter)
}

/// Snapshot of the world's sound-blocking geometry
///
/// Built once per update so emitters can be processed while the world is
/// borrowed mutably, or from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct OccluderSet {
    shapes: Vec<(AABB, LayerMask)>,
}

impl OccluderSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather every entity with `AABB`, `Transform` and `Occluder`, in world space
    pub fn from_world(world: &World) -> Self {
        let shapes: Vec<_> = world
            .query::<(&AABB, &Transform, &Occluder)>()
            .iter()
            .map(|(_, (aabb, transform, occluder))| (aabb.transformed(transform), occluder.layers))
            .collect();

        trace!("Gathered {} occluders", shapes.len());
        Self { shapes }
    }

    /// Add a world-space box on the given layers
    pub fn push(&mut self, aabb: AABB, layers: LayerMask) {
        self.shapes.push((aabb, layers));
    }

    /// Number of shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the set holds no shapes
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl RaycastService for OccluderSet {
    fn cast_all(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> u32 {
        let ray = AudioRay { origin, direction };

        self.shapes
            .iter()
            .filter(|(_, layers)| layers.intersects(mask))
            .filter(|(aabb, _)| ray_aabb_intersection(&ray, aabb, max_distance).is_some())
            .count() as u32
    }
}
