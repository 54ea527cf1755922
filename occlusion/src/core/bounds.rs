//! Axis-aligned bounds used as occluder geometry

use crate::core::entity::Transform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box component, in the entity's local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AABB {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centred on `center` with the given half extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size/extents of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// World-space bounds of this box after applying `transform`
    ///
    /// Rotated boxes are re-fitted around their eight transformed corners.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let matrix = transform.to_matrix();
        let (mut min, mut max) = (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY));

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world_corner = matrix.transform_point3(corner);
            min = min.min(world_corner);
            max = max.max(world_corner);
        }

        Self { min, max }
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
    }
}
