//! Configuration types for the occlusion pipeline
//!
//! A configuration is supplied once per emitter and never changes while the
//! emitter is active. Values are checked by [`OcclusionConfig::validate`] when
//! loaded so the per-tick code never has to guard against them.

use crate::audio::components::LayerMask;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error when reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A smoothing coefficient below zero never converges
    #[error("{field} smoothing must be zero or positive, got {value}")]
    NegativeSmoothing {
        /// Name of the offending option
        field: &'static str,
        /// Value that was supplied
        value: f32,
    },

    /// Lower bound above the upper bound
    #[error("{field} minimum {min} is greater than maximum {max}")]
    InvertedBounds {
        /// Name of the offending option
        field: &'static str,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// NaN or infinite option
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending option
        field: &'static str,
        /// Value that was supplied
        value: f32,
    },

    /// A per-wall step below zero makes obstructions raise the parameter
    #[error("{field} per_wall must be zero or positive, got {value}")]
    NegativePerWall {
        /// Name of the offending option
        field: &'static str,
        /// Value that was supplied
        value: f32,
    },

    /// Effective distance must be a positive length
    #[error("max_distance must be positive, got {0}")]
    InvalidMaxDistance(f32),
}

/// Gain (volume) stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    /// Whether the gain stage runs
    pub enabled: bool,
    /// Gain floor; `0.0` disables the floor entirely
    pub min: f32,
    /// Gain with no occluders in the way
    pub max: f32,
    /// Gain removed per obstruction
    pub per_wall: f32,
    /// Smoothing divisor; `0.0` applies the target immediately
    pub smoothing: f32,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min: 0.01,
            max: 1.0,
            per_wall: 0.05,
            smoothing: 10.0,
        }
    }
}

/// Low-pass cutoff stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutoffConfig {
    /// Whether the cutoff stage runs
    pub enabled: bool,
    /// Strength of the per-wall cutoff reduction (0..1)
    pub per_wall: f32,
    /// Shape of the distance falloff; `0.0` disables distance cutoff
    pub distance_coefficient: f32,
    /// Distance at which the distance falloff reaches its midpoint
    pub start_distance: f32,
    /// Smoothing divisor; `0.0` applies the target immediately
    pub smoothing: f32,
    /// Optional floor for the target cutoff in Hz
    pub min: Option<f32>,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_wall: 0.56,
            distance_coefficient: 0.3,
            start_distance: 20.0,
            smoothing: 10.0,
            min: None,
        }
    }
}

/// Spatial blend stage settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialBlendConfig {
    /// Whether the spatial blend stage runs
    pub enabled: bool,
    /// Spatial blend with no occluders in the way
    pub max: f32,
    /// Spatial blend removed per obstruction
    pub per_wall: f32,
    /// Smoothing divisor; `0.0` applies the target immediately
    pub smoothing: f32,
    /// Optional floor for the target spatial blend
    pub min: Option<f32>,
}

impl Default for SpatialBlendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max: 1.0,
            per_wall: 0.042,
            smoothing: 10.0,
            min: None,
        }
    }
}

/// Complete occlusion configuration for one emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Gain stage
    pub gain: GainConfig,
    /// Low-pass cutoff stage
    pub cutoff: CutoffConfig,
    /// Spatial blend stage
    pub spatial_blend: SpatialBlendConfig,
    /// Vertical offset added to the listener position (ear height)
    pub height_correction: f32,
    /// Beyond this distance the emitter is not processed at all
    pub max_distance: f32,
    /// Collision layers treated as sound-blocking geometry
    pub occluder_layers: LayerMask,
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            gain: GainConfig::default(),
            cutoff: CutoffConfig::default(),
            spatial_blend: SpatialBlendConfig::default(),
            height_correction: 1.0,
            max_distance: 50.0,
            occluder_layers: LayerMask::DEFAULT_OCCLUDERS,
        }
    }
}

impl OcclusionConfig {
    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(?config, "Parsed occlusion config");
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = ?path, "Loading occlusion config");
        Self::from_json_str(&json)
    }

    /// Reject values that would make the pipeline diverge or misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("gain.min", self.gain.min),
            ("gain.max", self.gain.max),
            ("gain.per_wall", self.gain.per_wall),
            ("gain.smoothing", self.gain.smoothing),
            ("cutoff.per_wall", self.cutoff.per_wall),
            ("cutoff.distance_coefficient", self.cutoff.distance_coefficient),
            ("cutoff.start_distance", self.cutoff.start_distance),
            ("cutoff.smoothing", self.cutoff.smoothing),
            ("spatial_blend.max", self.spatial_blend.max),
            ("spatial_blend.per_wall", self.spatial_blend.per_wall),
            ("spatial_blend.smoothing", self.spatial_blend.smoothing),
            ("height_correction", self.height_correction),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        for (field, value) in [
            ("cutoff.min", self.cutoff.min),
            ("spatial_blend.min", self.spatial_blend.min),
        ] {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("gain", self.gain.smoothing),
            ("cutoff", self.cutoff.smoothing),
            ("spatial_blend", self.spatial_blend.smoothing),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeSmoothing { field, value });
            }
        }

        for (field, value) in [
            ("gain", self.gain.per_wall),
            ("cutoff", self.cutoff.per_wall),
            ("spatial_blend", self.spatial_blend.per_wall),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativePerWall { field, value });
            }
        }

        if self.gain.min > self.gain.max {
            return Err(ConfigError::InvertedBounds {
                field: "gain",
                min: self.gain.min,
                max: self.gain.max,
            });
        }
        if let Some(min) = self.spatial_blend.min {
            if min > self.spatial_blend.max {
                return Err(ConfigError::InvertedBounds {
                    field: "spatial_blend",
                    min,
                    max: self.spatial_blend.max,
                });
            }
        }

        // NaN fails the comparison as well
        if !(self.max_distance > 0.0) || self.max_distance.is_infinite() {
            return Err(ConfigError::InvalidMaxDistance(self.max_distance));
        }

        Ok(())
    }
}
