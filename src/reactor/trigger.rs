//! Rising-edge trigger with linear (or stacking) decay.

use serde::Serialize;

use super::ReplayClock;
use crate::params::TriggerParams;

/// Output of one trigger evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriggerOutput {
    /// Decaying hit intensity (0..1, or 0..ceiling when additive)
    pub intensity: f64,

    /// Input crossed the threshold on this evaluation
    pub just_triggered: bool,

    /// Time of the most recent crossing (-inf before the first)
    pub trigger_time: f64,
}

/// Fires once per upward threshold crossing and decays linearly afterwards.
///
/// A sustained input above the threshold fires only on the crossing.
#[derive(Debug, Clone)]
pub struct TriggerReactor {
    was_above: bool,
    trigger_time: f64,
    stacked: f64,
    clock: ReplayClock,
}

impl Default for TriggerReactor {
    fn default() -> Self {
        Self {
            was_above: false,
            trigger_time: f64::NEG_INFINITY,
            stacked: 0.0,
            clock: ReplayClock::default(),
        }
    }
}

impl TriggerReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, input: f64, time: f64, params: &TriggerParams) -> TriggerOutput {
        let step = self.clock.advance(time);
        if step.reset {
            self.was_above = false;
            self.trigger_time = f64::NEG_INFINITY;
            self.stacked = 0.0;
        }

        let is_above = input > params.threshold;
        let just_triggered = is_above && !self.was_above;
        if just_triggered {
            self.trigger_time = time;
            if params.additive {
                self.stacked = (self.stacked + 1.0).min(params.ceiling);
            }
        }
        self.was_above = is_above;

        let intensity = if params.additive {
            self.stacked = (self.stacked - step.dt / params.decay_duration_s).max(0.0);
            self.stacked
        } else {
            let elapsed = time - self.trigger_time;
            if elapsed >= 0.0 {
                (1.0 - elapsed / params.decay_duration_s).max(0.0)
            } else {
                0.0
            }
        };

        TriggerOutput {
            intensity,
            just_triggered,
            trigger_time: self.trigger_time,
        }
    }
}
