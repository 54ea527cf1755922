//! Per-emitter tick driver
//!
//! Runs the occlusion pipeline for one emitter: distance gate, obstruction
//! sample, target values, smoothing, and finally the writes into the sink.

use crate::audio::obstruction::{corrected_listener_position, sample};
use crate::audio::raycast::RaycastService;
use crate::audio::sink::AudioSink;
use crate::audio::smoothing::SmoothedValue;
use crate::audio::targets::{compute_targets, ParameterSet, FULL_BAND_CUTOFF_HZ};
use crate::config::OcclusionConfig;
use glam::Vec3;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Conditions that stop an emitter from being processed
///
/// These are fatal for the emitter: once raised it is skipped until it is
/// reactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickError {
    /// Emitter has no audio sink attached
    #[error("emitter has no audio sink attached")]
    MissingSink,

    /// Cutoff stage enabled but the voice has no low-pass filter
    #[error("audio sink has no low-pass filter for the cutoff stage")]
    LowPassUnavailable,

    /// Configuration fails validation
    #[error("occlusion config failed validation")]
    InvalidConfig,

    /// No geometry query available for obstruction sampling
    #[error("no raycast service available for obstruction sampling")]
    MissingRaycaster,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Listener beyond the effective distance; nothing was computed or written
    OutOfRange {
        /// Distance to the height-corrected listener
        distance: f32,
    },
    /// Pipeline ran and wrote the enabled parameters
    Applied(TickReport),
    /// Emitter was faulted by an earlier tick and is no longer processed
    Faulted,
}

/// Values computed during one applied tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Distance to the height-corrected listener
    pub distance: f32,
    /// Occluder intersections between emitter and listener
    pub obstructions: u32,
    /// Targets for the enabled stages
    pub targets: ParameterSet,
    /// Smoothed values written to the sink
    pub applied: ParameterSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CurrentValues {
    gain: SmoothedValue,
    cutoff: SmoothedValue,
    spatial_blend: SmoothedValue,
}

/// Smoothed parameter state owned by one emitter
///
/// Created empty; seeded from the sink on the first tick that passes the
/// distance gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmitterState {
    current: Option<CurrentValues>,
    fault: Option<TickError>,
}

impl EmitterState {
    /// Fresh, unseeded state
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard smoothed values and any fault, as on (re)activation
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the state has been seeded from a sink
    pub fn is_seeded(&self) -> bool {
        self.current.is_some()
    }

    /// Fault that stopped this emitter, if any
    pub fn fault(&self) -> Option<TickError> {
        self.fault
    }

    /// Current smoothed values (unseeded state reports `None` everywhere)
    pub fn current(&self) -> ParameterSet {
        match &self.current {
            Some(values) => ParameterSet {
                gain: Some(values.gain.current()),
                cutoff: Some(values.cutoff.current()),
                spatial_blend: Some(values.spatial_blend.current()),
            },
            None => ParameterSet::default(),
        }
    }

    /// Run one tick of the pipeline
    ///
    /// `raycaster` and `sink` are optional so a missing capability surfaces
    /// as a [`TickError`] rather than a panic. Errors fault the emitter; later
    /// ticks return [`TickOutcome::Faulted`] until [`reset`](Self::reset).
    pub fn tick<R, S>(
        &mut self,
        config: &OcclusionConfig,
        emitter_position: Vec3,
        listener_position: Vec3,
        raycaster: Option<&R>,
        sink: Option<&mut S>,
    ) -> Result<TickOutcome, TickError>
    where
        R: RaycastService + ?Sized,
        S: AudioSink + ?Sized,
    {
        if self.fault.is_some() {
            return Ok(TickOutcome::Faulted);
        }

        let result = self.run(config, emitter_position, listener_position, raycaster, sink);
        if let Err(err) = result {
            warn!(error = %err, "Occlusion emitter faulted, skipping further ticks");
            self.fault = Some(err);
        }
        result
    }

    fn run<R, S>(
        &mut self,
        config: &OcclusionConfig,
        emitter_position: Vec3,
        listener_position: Vec3,
        raycaster: Option<&R>,
        sink: Option<&mut S>,
    ) -> Result<TickOutcome, TickError>
    where
        R: RaycastService + ?Sized,
        S: AudioSink + ?Sized,
    {
        config.validate().map_err(|err| {
            debug!(error = %err, "Rejected occlusion config");
            TickError::InvalidConfig
        })?;
        let sink = sink.ok_or(TickError::MissingSink)?;
        let raycaster = raycaster.ok_or(TickError::MissingRaycaster)?;
        if config.cutoff.enabled && sink.low_pass_cutoff().is_none() {
            return Err(TickError::LowPassUnavailable);
        }

        let listener = corrected_listener_position(listener_position, config.height_correction);
        let distance = emitter_position.distance(listener);

        if distance >= config.max_distance {
            trace!(distance, max_distance = config.max_distance, "Emitter out of range");
            return Ok(TickOutcome::OutOfRange { distance });
        }

        let obstructions = sample(
            raycaster,
            emitter_position,
            listener_position,
            config.height_correction,
            distance,
            config.occluder_layers,
        );
        let targets = compute_targets(distance, obstructions, config);

        let current = self.current.get_or_insert_with(|| {
            let seeded = CurrentValues {
                gain: SmoothedValue::new(sink.gain()),
                cutoff: SmoothedValue::new(sink.low_pass_cutoff().unwrap_or(FULL_BAND_CUTOFF_HZ)),
                spatial_blend: SmoothedValue::new(sink.spatial_blend()),
            };
            debug!(?seeded, "Seeded occlusion state from sink");
            seeded
        });

        let mut applied = ParameterSet::default();

        if let Some(target) = targets.gain {
            let value = current.gain.advance(target, config.gain.smoothing);
            sink.set_gain(value);
            applied.gain = Some(value);
        }
        if let Some(target) = targets.cutoff {
            let value = current.cutoff.advance(target, config.cutoff.smoothing);
            sink.set_low_pass_cutoff(value);
            applied.cutoff = Some(value);
        }
        if let Some(target) = targets.spatial_blend {
            let value = current.spatial_blend.advance(target, config.spatial_blend.smoothing);
            sink.set_spatial_blend(value);
            applied.spatial_blend = Some(value);
        }

        trace!(
            distance,
            obstructions,
            gain = ?applied.gain,
            cutoff = ?applied.cutoff,
            spatial_blend = ?applied.spatial_blend,
            "Applied occlusion parameters"
        );

        Ok(TickOutcome::Applied(TickReport {
            distance,
            obstructions,
            targets,
            applied,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::components::LayerMask;
    use crate::audio::raycast::OccluderSet;
    use crate::audio::sink::{VoiceHandle, VoiceParams};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fixed hit count, counting how often it is queried
    #[derive(Default)]
    struct FixedHits {
        hits: u32,
        calls: AtomicU32,
    }

    impl RaycastService for FixedHits {
        fn cast_all(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask) -> u32 {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.hits
        }
    }

    fn instant_config() -> OcclusionConfig {
        let mut config = OcclusionConfig::default();
        config.gain.smoothing = 0.0;
        config.cutoff.smoothing = 0.0;
        config.spatial_blend.smoothing = 0.0;
        config
    }

    #[test]
    fn test_out_of_range_skips_everything() {
        let config = OcclusionConfig::default();
        let raycaster = FixedHits::default();
        let mut voice = VoiceHandle::default();
        let mut state = EmitterState::new();

        let outcome = state
            .tick(
                &config,
                Vec3::ZERO,
                Vec3::new(config.max_distance + 1.0, -config.height_correction, 0.0),
                Some(&raycaster),
                Some(&mut voice),
            )
            .unwrap();

        assert!(matches!(outcome, TickOutcome::OutOfRange { .. }));
        assert_eq!(raycaster.calls.load(Ordering::Relaxed), 0);
        assert!(!state.is_seeded());
        assert_eq!(voice.params(), VoiceParams::default());
    }

    #[test]
    fn test_gate_is_inclusive_at_max_distance() {
        let config = OcclusionConfig::default();
        let raycaster = FixedHits::default();
        let mut voice = VoiceHandle::default();
        let mut state = EmitterState::new();

        // Listener's ear exactly at max_distance
        let listener = Vec3::new(config.max_distance, -config.height_correction, 0.0);
        let outcome = state
            .tick(&config, Vec3::ZERO, listener, Some(&raycaster), Some(&mut voice))
            .unwrap();
        assert!(matches!(outcome, TickOutcome::OutOfRange { .. }));
    }

    #[test]
    fn test_instant_config_applies_targets() {
        let config = instant_config();
        let raycaster = FixedHits {
            hits: 4,
            ..Default::default()
        };
        let mut voice = VoiceHandle::default();
        let mut state = EmitterState::new();

        let outcome = state
            .tick(
                &config,
                Vec3::ZERO,
                Vec3::new(10.0, 0.0, 0.0),
                Some(&raycaster),
                Some(&mut voice),
            )
            .unwrap();

        let TickOutcome::Applied(report) = outcome else {
            panic!("expected applied tick, got {outcome:?}");
        };
        assert_eq!(report.obstructions, 4);
        assert_eq!(report.applied, report.targets);

        let params = voice.params();
        assert!((params.gain - 0.8).abs() < 1e-6);
        assert!((params.spatial_blend - (1.0 - 0.042 * 4.0)).abs() < 1e-6);
        assert_eq!(params.low_pass_cutoff, report.targets.cutoff);
    }

    #[test]
    fn test_first_tick_seeds_from_sink() {
        let config = OcclusionConfig::default();
        let raycaster = FixedHits::default();
        let mut voice = VoiceHandle::new(VoiceParams {
            gain: 0.0,
            low_pass_cutoff: Some(1000.0),
            spatial_blend: 0.0,
        });
        let mut state = EmitterState::new();

        state
            .tick(&config, Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Some(&raycaster), Some(&mut voice))
            .unwrap();

        // One tenth of the way from the seeded values toward the targets
        let params = voice.params();
        assert!((params.gain - 0.1).abs() < 1e-6);
        assert!((params.spatial_blend - 0.1).abs() < 1e-6);
        let cutoff = params.low_pass_cutoff.unwrap();
        assert!(cutoff > 1000.0 && cutoff < 4000.0);
    }

    #[test]
    fn test_state_persists_between_ticks() {
        let config = OcclusionConfig::default();
        let raycaster = FixedHits::default();
        let mut voice = VoiceHandle::new(VoiceParams {
            gain: 0.0,
            ..Default::default()
        });
        let mut state = EmitterState::new();

        for _ in 0..2 {
            state
                .tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice))
                .unwrap();
        }
        // Host changes the gain behind our back; the filter keeps its own memory
        voice.set_gain(0.9);
        state
            .tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice))
            .unwrap();

        // 1 - 0.9^3
        assert!((voice.params().gain - 0.271).abs() < 1e-5);
    }

    #[test]
    fn test_disabled_stage_is_untouched() {
        let mut config = instant_config();
        config.spatial_blend.enabled = false;
        let raycaster = FixedHits {
            hits: 3,
            ..Default::default()
        };
        let mut voice = VoiceHandle::new(VoiceParams {
            spatial_blend: 0.33,
            ..Default::default()
        });
        let mut state = EmitterState::new();

        let outcome = state
            .tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice))
            .unwrap();

        let TickOutcome::Applied(report) = outcome else {
            panic!("expected applied tick");
        };
        assert!(report.applied.spatial_blend.is_none());
        assert_eq!(voice.params().spatial_blend, 0.33);
        assert_eq!(state.current().spatial_blend, Some(0.33));
    }

    #[test]
    fn test_missing_sink_faults_without_retry() {
        let config = OcclusionConfig::default();
        let raycaster = FixedHits::default();
        let mut state = EmitterState::new();

        let result = state.tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), None::<&mut VoiceHandle>);
        assert_eq!(result, Err(TickError::MissingSink));
        assert_eq!(state.fault(), Some(TickError::MissingSink));

        // Even with a sink now, the emitter stays faulted
        let mut voice = VoiceHandle::default();
        let outcome = state
            .tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice))
            .unwrap();
        assert_eq!(outcome, TickOutcome::Faulted);
        assert_eq!(raycaster.calls.load(Ordering::Relaxed), 0);

        state.reset();
        assert!(state.fault().is_none());
        assert!(matches!(
            state.tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice)),
            Ok(TickOutcome::Applied(_))
        ));
    }

    #[test]
    fn test_missing_low_pass_faults_only_when_cutoff_enabled() {
        let mut config = OcclusionConfig::default();
        let raycaster = OccluderSet::new();
        let mut voice = VoiceHandle::without_low_pass();

        let mut state = EmitterState::new();
        assert_eq!(
            state.tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice)),
            Err(TickError::LowPassUnavailable)
        );

        config.cutoff.enabled = false;
        let mut state = EmitterState::new();
        assert!(matches!(
            state.tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice)),
            Ok(TickOutcome::Applied(_))
        ));
    }

    #[test]
    fn test_invalid_config_faults_before_writing() {
        let mut config = OcclusionConfig::default();
        config.gain.smoothing = -2.0;
        let raycaster = FixedHits::default();
        let mut voice = VoiceHandle::new(VoiceParams {
            gain: 0.5,
            ..Default::default()
        });
        let mut state = EmitterState::new();

        for _ in 0..20 {
            let _ = state.tick(&config, Vec3::ZERO, Vec3::X, Some(&raycaster), Some(&mut voice));
        }

        assert_eq!(state.fault(), Some(TickError::InvalidConfig));
        assert_eq!(voice.params().gain, 0.5);
        assert_eq!(raycaster.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_missing_raycaster_faults() {
        let config = OcclusionConfig::default();
        let mut voice = VoiceHandle::default();
        let mut state = EmitterState::new();

        assert_eq!(
            state.tick(&config, Vec3::ZERO, Vec3::X, None::<&OccluderSet>, Some(&mut voice)),
            Err(TickError::MissingRaycaster)
        );
    }
}
