//! Raycasted sound occlusion for game audio
//!
//! This crate computes, every fixed tick, how strongly static geometry
//! blocks the path between a sound emitter and the listener, and smooths
//! the emitter's gain, low-pass cutoff and spatial blend toward matching
//! targets. Audio rendering itself stays with the host; parameters are
//! written through the [`audio::AudioSink`] trait.

pub mod audio;
pub mod config;
pub mod core;

// Re-export commonly used types
pub mod prelude {
    // Entity system types
    pub use crate::core::entity::{Entity, Transform, World};
    pub use crate::core::AABB;

    // Math types
    pub use glam::Vec3;

    // Config types
    pub use crate::config::{
        ConfigError, CutoffConfig, GainConfig, OcclusionConfig, SpatialBlendConfig,
    };

    // Occlusion types
    pub use crate::audio::{
        occlusion_update_system, occlusion_update_system_parallel, AudioListener, AudioSink,
        EmitterState, LayerMask, ListenerProvider, OccluderSet, Occluder, OcclusionEmitter,
        OcclusionStats, RaycastService, TickAccumulator, TickError, TickOutcome, VoiceHandle,
    };
}

/// Initialize logging for the occlusion crate
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
