//! Stateful temporal reactors: raw 0..1 signal + timestamp -> animation driver.
//!
//! Each reactor instance belongs to exactly one driver stream. Instances are
//! not shared between threads; a render worker that evaluates frames out of
//! order keeps its own instances and relies on the regression reset below to
//! stay consistent.

mod pulse;
mod trigger;
mod waves;

pub use pulse::PulseReactor;
pub use trigger::{TriggerOutput, TriggerReactor};
pub use waves::{wave_direction, WaveInstance, WavePool, WavePoolOutput, WaveUniform};

use log::debug;

/// A timestamp this far (seconds) behind the last-seen one resets history
pub const REGRESSION_TOLERANCE_S: f64 = 0.05;

/// Result of advancing a [`ReplayClock`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    /// Seconds since the previous evaluation (0 after a reset)
    pub dt: f64,

    /// History must be discarded (first evaluation or timeline regression)
    pub reset: bool,
}

/// Last-seen timestamp of one reactor, with the timeline-regression rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayClock {
    last_time: f64,
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self {
            last_time: f64::NEG_INFINITY,
        }
    }
}

impl ReplayClock {
    /// Last timestamp seen, or -inf before the first evaluation
    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Advance to `time`.
    ///
    /// The first evaluation and any timestamp more than
    /// [`REGRESSION_TOLERANCE_S`] behind the last one report `reset` with
    /// `dt = 0`, so history restarts exactly as a fresh instance would.
    pub fn advance(&mut self, time: f64) -> ClockStep {
        let first = self.last_time == f64::NEG_INFINITY;
        let regressed = time < self.last_time - REGRESSION_TOLERANCE_S;
        if regressed {
            debug!(
                "Timeline regressed from {:.3}s to {:.3}s, resetting reactor",
                self.last_time, time
            );
        }

        let reset = first || regressed;
        if reset {
            self.last_time = time;
        }

        let dt = (time - self.last_time).max(0.0);
        self.last_time = time;
        ClockStep { dt, reset }
    }
}
