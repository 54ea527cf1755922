//! Raycasted sound occlusion
//!
//! Each tick an emitter casts one ray toward the listener, counts the
//! occluders it crosses, and drives gain, low-pass cutoff and spatial blend
//! toward values derived from that count and the listener distance:
//! - Obstruction sampling against a single occluder layer
//! - Pure target-value functions (gain, cutoff, spatial blend)
//! - Exponential smoothing with per-emitter memory
//! - A tick driver and ECS systems that tie them together

pub mod accumulator;
pub mod components;
pub mod driver;
pub mod listener;
pub mod obstruction;
pub mod raycast;
pub mod sink;
pub mod smoothing;
pub mod system;
pub mod targets;


// Re-export commonly used types
pub use accumulator::TickAccumulator;
pub use components::{AudioListener, LayerMask, OcclusionEmitter, Occluder};
pub use driver::{EmitterState, TickError, TickOutcome, TickReport};
pub use listener::ListenerProvider;
pub use raycast::{OccluderSet, RaycastService};
pub use sink::{AudioSink, VoiceHandle, VoiceParams};
pub use system::{occlusion_update_system, occlusion_update_system_parallel, OcclusionStats};
pub use targets::{ParameterSet, FULL_BAND_CUTOFF_HZ};
