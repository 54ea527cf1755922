//! Line-of-sight obstruction sampling between an emitter and the listener

use crate::audio::components::LayerMask;
use crate::audio::raycast::RaycastService;
use glam::Vec3;
use tracing::trace;

/// Listener position raised by the configured ear height
pub fn corrected_listener_position(listener_position: Vec3, height_correction: f32) -> Vec3 {
    listener_position + Vec3::Y * height_correction
}

/// Count occluder intersections on the ray from the emitter to the listener
///
/// Every intersection counts: two overlapping walls yield two obstructions.
/// An emitter sitting exactly on the listener casts no ray and reports zero.
pub fn sample<R: RaycastService + ?Sized>(
    raycaster: &R,
    emitter_position: Vec3,
    listener_position: Vec3,
    height_correction: f32,
    max_distance: f32,
    occluder_layers: LayerMask,
) -> u32 {
    let target = corrected_listener_position(listener_position, height_correction);

    let Some(direction) = (target - emitter_position).try_normalize() else {
        return 0;
    };

    let count = raycaster.cast_all(emitter_position, direction, max_distance, occluder_layers);
    trace!(count, max_distance, "Obstruction sample");
    count
}
