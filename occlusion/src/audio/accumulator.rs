//! Fixed-rate tick accumulator
//!
//! The occlusion pipeline is tuned per tick, not per second, so it has to run
//! at a fixed rate regardless of the host frame rate. The accumulator turns
//! variable frame deltas into a whole number of ticks.

use tracing::warn;

/// Default tick rate in Hz
pub const DEFAULT_TICK_RATE: f32 = 50.0;

/// Most ticks a single frame may request before the backlog is dropped
const MAX_TICKS_PER_FRAME: u32 = 8;

/// Accumulator for fixed timestep occlusion updates
#[derive(Debug, Clone)]
pub struct TickAccumulator {
    /// Accumulated time since the last tick
    accumulated: f32,
    /// Fixed tick length in seconds
    pub fixed_timestep: f32,
}

impl TickAccumulator {
    /// Create a new accumulator with the given fixed timestep
    pub fn new(fixed_timestep: f32) -> Self {
        Self {
            accumulated: 0.0,
            fixed_timestep,
        }
    }

    /// Create an accumulator ticking `rate` times per second
    pub fn with_rate(rate: f32) -> Self {
        Self::new(1.0 / rate)
    }

    /// Add delta time to the accumulator
    /// Returns the number of ticks to run
    pub fn accumulate(&mut self, delta_time: f32) -> u32 {
        self.accumulated += delta_time.max(0.0);

        // Prevent spiral of death after a long stall
        let limit = self.fixed_timestep * MAX_TICKS_PER_FRAME as f32;
        if self.accumulated > limit {
            warn!(
                "Occlusion tick backlog of {:.3}s, dropping to {} ticks",
                self.accumulated, MAX_TICKS_PER_FRAME
            );
            self.accumulated = limit;
        }

        let ticks = (self.accumulated / self.fixed_timestep) as u32;
        self.accumulated -= ticks as f32 * self.fixed_timestep;
        ticks
    }

    /// Reset the accumulator to zero
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }

    /// Get the current accumulated time
    pub fn accumulated_time(&self) -> f32 {
        self.accumulated
    }
}

impl Default for TickAccumulator {
    fn default() -> Self {
        Self::with_rate(DEFAULT_TICK_RATE)
    }
}
