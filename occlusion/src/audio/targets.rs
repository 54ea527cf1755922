//! Target values for the occlusion-driven parameters
//!
//! All functions here are pure: they map the listener distance and the
//! obstruction count onto the value each parameter should converge toward.
//!
//! - Gain falls linearly with the obstruction count and is clamped to the
//!   configured range (a `0.0` minimum means no floor).
//! - Cutoff starts from a logistic distance curve that stays near
//!   [`FULL_BAND_CUTOFF_HZ`] until the falloff start distance, then subtracts
//!   an arctangent wall term that saturates after a handful of walls.
//! - Spatial blend falls linearly with the obstruction count and may go
//!   negative unless a floor is configured.

use crate::config::{CutoffConfig, GainConfig, OcclusionConfig, SpatialBlendConfig};

/// Cutoff frequency treated as an open (unfiltered) low-pass
pub const FULL_BAND_CUTOFF_HZ: f32 = 22000.0;

/// One value per driven parameter; `None` for stages that are disabled
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterSet {
    /// Output gain
    pub gain: Option<f32>,
    /// Low-pass cutoff in Hz
    pub cutoff: Option<f32>,
    /// Spatial blend
    pub spatial_blend: Option<f32>,
}

/// Target gain for `obstructions` occluders between emitter and listener
///
/// Clamped to `[gain.min, gain.max]` only when `gain.min` is non-zero; a zero
/// minimum leaves the linear value untouched.
pub fn target_gain(obstructions: u32, gain: &GainConfig) -> f32 {
    let target = gain.max - gain.per_wall * obstructions as f32;
    if gain.min != 0.0 {
        target.max(gain.min).min(gain.max)
    } else {
        target
    }
}

/// Distance-only cutoff: a logistic curve centred on the start distance
pub fn distance_cutoff(distance: f32, cutoff: &CutoffConfig) -> f32 {
    if cutoff.distance_coefficient == 0.0 {
        return FULL_BAND_CUTOFF_HZ;
    }

    let falloff = (1.0 + cutoff.distance_coefficient).powf(cutoff.start_distance - distance);
    FULL_BAND_CUTOFF_HZ * (1.0 - 1.0 / (1.0 + falloff))
}

/// Cutoff removed by `obstructions` occluders, relative to the distance cutoff
pub fn wall_cutoff(obstructions: u32, distance_cut: f32, per_wall: f32) -> f32 {
    if obstructions == 0 {
        return 0.0;
    }

    (obstructions as f32 * (1.0 + 10.0 * per_wall)).atan() * distance_cut * per_wall
}

/// Target low-pass cutoff in Hz
///
/// Unfloored unless `cutoff.min` is set; the host filter is expected to
/// clamp very low values itself.
pub fn target_cutoff(distance: f32, obstructions: u32, cutoff: &CutoffConfig) -> f32 {
    let distance_cut = distance_cutoff(distance, cutoff);
    let target = distance_cut - wall_cutoff(obstructions, distance_cut, cutoff.per_wall);
    apply_floor(target, cutoff.min)
}

/// Target spatial blend, unfloored unless `spatial_blend.min` is set
pub fn target_spatial_blend(obstructions: u32, spatial_blend: &SpatialBlendConfig) -> f32 {
    let target = spatial_blend.max - spatial_blend.per_wall * obstructions as f32;
    apply_floor(target, spatial_blend.min)
}

/// Targets for every enabled stage
pub fn compute_targets(distance: f32, obstructions: u32, config: &OcclusionConfig) -> ParameterSet {
    ParameterSet {
        gain: config
            .gain
            .enabled
            .then(|| target_gain(obstructions, &config.gain)),
        cutoff: config
            .cutoff
            .enabled
            .then(|| target_cutoff(distance, obstructions, &config.cutoff)),
        spatial_blend: config
            .spatial_blend
            .enabled
            .then(|| target_spatial_blend(obstructions, &config.spatial_blend)),
    }
}

fn apply_floor(value: f32, floor: Option<f32>) -> f32 {
    floor.map_or(value, |floor| value.max(floor))
}
