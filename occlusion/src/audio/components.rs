//! Audio components for the ECS

use crate::audio::driver::EmitterState;
use crate::audio::sink::AudioSink;
use crate::config::{ConfigError, OcclusionConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bit set of collision layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches no layer
    pub const NONE: Self = Self(0);
    /// Matches every layer
    pub const ALL: Self = Self(u32::MAX);
    /// Layer 11, reserved for sound-blocking geometry
    pub const DEFAULT_OCCLUDERS: Self = Self(1 << 11);

    /// Mask containing only layer `index` (0..32)
    pub const fn layer(index: u32) -> Self {
        Self(1 << index)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether the two masks share at least one layer
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Add layer `index` to this mask
    pub const fn with_layer(self, index: u32) -> Self {
        Self(self.0 | (1 << index))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT_OCCLUDERS
    }
}

/// Audio listener component (typically attached to the player camera)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioListener {
    /// Whether this listener is active
    pub active: bool,
}

impl Default for AudioListener {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Static geometry that blocks sound
///
/// Paired with an [`AABB`](crate::core::AABB) and a
/// [`Transform`](crate::core::entity::Transform) on the same entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Occluder {
    /// Layers this geometry lives on
    pub layers: LayerMask,
}

impl Occluder {
    /// Occluder on the given layers
    pub fn on_layers(layers: LayerMask) -> Self {
        Self { layers }
    }
}

/// Sound emitter driven by the occlusion pipeline
pub struct OcclusionEmitter {
    /// Shared configuration, validated on construction
    pub(crate) config: Arc<OcclusionConfig>,
    /// Host-side playback parameters; `None` faults the emitter
    pub sink: Option<Box<dyn AudioSink>>,
    /// Smoothed values owned by this emitter
    pub state: EmitterState,
    /// Inactive emitters are skipped and lose their state
    pub active: bool,
}

impl OcclusionEmitter {
    /// Create an active emitter writing into `sink`
    pub fn new(
        config: Arc<OcclusionConfig>,
        sink: impl AudioSink + 'static,
    ) -> Result<Self, ConfigError> {
        let mut emitter = Self::without_sink(config)?;
        emitter.sink = Some(Box::new(sink));
        Ok(emitter)
    }

    /// Create an emitter with no sink attached
    pub fn without_sink(config: Arc<OcclusionConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sink: None,
            state: EmitterState::default(),
            active: true,
        })
    }

    /// Configuration this emitter runs with
    pub fn config(&self) -> &Arc<OcclusionConfig> {
        &self.config
    }

    /// Swap in a new configuration, keeping the smoothed state
    pub fn set_config(&mut self, config: Arc<OcclusionConfig>) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Activate or deactivate the emitter; deactivation discards its state
    pub fn set_active(&mut self, active: bool) {
        if !active {
            self.state.reset();
        }
        self.active = active;
    }
}
