//! Host-side audio parameter sinks
//!
//! The occlusion pipeline never renders audio. It only reads and writes three
//! parameters on whatever playback voice the host attaches to an emitter.

use std::sync::{Arc, Mutex};

/// Parameters the occlusion pipeline drives on a playing voice
///
/// Readers are only used to seed the smoothed state the first time an
/// emitter is ticked.
pub trait AudioSink: Send + Sync {
    /// Current output gain
    fn gain(&self) -> f32;

    /// Set output gain
    fn set_gain(&mut self, gain: f32);

    /// Current low-pass cutoff in Hz, or `None` if the voice has no low-pass filter
    fn low_pass_cutoff(&self) -> Option<f32>;

    /// Set low-pass cutoff in Hz
    fn set_low_pass_cutoff(&mut self, cutoff_hz: f32);

    /// Current spatial blend (0 = 2D, 1 = fully positional)
    fn spatial_blend(&self) -> f32;

    /// Set spatial blend
    fn set_spatial_blend(&mut self, blend: f32);
}

/// Snapshot of a voice's parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceParams {
    /// Output gain
    pub gain: f32,
    /// Low-pass cutoff in Hz, `None` if no filter is attached
    pub low_pass_cutoff: Option<f32>,
    /// Spatial blend
    pub spatial_blend: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            gain: 1.0,
            low_pass_cutoff: Some(crate::audio::targets::FULL_BAND_CUTOFF_HZ),
            spatial_blend: 1.0,
        }
    }
}

/// Handle to a playing voice's parameters
///
/// Clones share the same parameters, so the host keeps one clone for
/// rendering while the emitter writes through another.
#[derive(Debug, Clone, Default)]
pub struct VoiceHandle {
    inner: Arc<Mutex<VoiceParams>>,
}

impl VoiceHandle {
    /// Create a handle with the given starting parameters
    pub fn new(params: VoiceParams) -> Self {
        Self {
            inner: Arc::new(Mutex::new(params)),
        }
    }

    /// Create a handle for a voice with no low-pass filter attached
    pub fn without_low_pass() -> Self {
        Self::new(VoiceParams {
            low_pass_cutoff: None,
            ..Default::default()
        })
    }

    /// Copy of the current parameters
    pub fn params(&self) -> VoiceParams {
        match self.inner.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut VoiceParams)) {
        if let Ok(mut guard) = self.inner.lock() {
            f(&mut guard);
        }
    }
}

impl AudioSink for VoiceHandle {
    fn gain(&self) -> f32 {
        self.params().gain
    }

    fn set_gain(&mut self, gain: f32) {
        self.update(|p| p.gain = gain);
    }

    fn low_pass_cutoff(&self) -> Option<f32> {
        self.params().low_pass_cutoff
    }

    fn set_low_pass_cutoff(&mut self, cutoff_hz: f32) {
        self.update(|p| {
            if p.low_pass_cutoff.is_some() {
                p.low_pass_cutoff = Some(cutoff_hz);
            }
        });
    }

    fn spatial_blend(&self) -> f32 {
        self.params().spatial_blend
    }

    fn set_spatial_blend(&mut self, blend: f32) {
        self.update(|p| p.spatial_blend = blend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_parameters() {
        let host = VoiceHandle::default();
        let mut emitter_side = host.clone();

        emitter_side.set_gain(0.25);
        emitter_side.set_low_pass_cutoff(4000.0);
        emitter_side.set_spatial_blend(0.5);

        let params = host.params();
        assert_eq!(params.gain, 0.25);
        assert_eq!(params.low_pass_cutoff, Some(4000.0));
        assert_eq!(params.spatial_blend, 0.5);
    }

    #[test]
    fn test_missing_low_pass_stays_missing() {
        let mut voice = VoiceHandle::without_low_pass();
        voice.set_low_pass_cutoff(1000.0);
        assert_eq!(voice.low_pass_cutoff(), None);
    }
}
