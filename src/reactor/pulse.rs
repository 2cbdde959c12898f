//! Envelope follower: instant attack, exponential release (or additive accumulation).

use super::ReplayClock;
use crate::params::PulseParams;

/// Evaluation cadence the decay curve is tuned against (evaluations per second)
const DECAY_REFERENCE_RATE: f64 = 60.0;

/// Gain applied to `input * add_rate * dt` in additive mode
const ADDITIVE_GAIN: f64 = 10.0;

/// Smoothed envelope of one driver signal
#[derive(Debug, Clone, Default)]
pub struct PulseReactor {
    value: f64,
    clock: ReplayClock,
}

impl PulseReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stored envelope value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Feed one sample of `input` at `time` seconds and return the envelope
    pub fn evaluate(&mut self, input: f64, time: f64, params: &PulseParams) -> f64 {
        let step = self.clock.advance(time);
        if step.reset {
            self.value = 0.0;
        }

        // Shape the linear knob, then express it per reference tick
        let decay_per_second = 1.0 - (1.0 - params.decay).powi(3);
        let retain = decay_per_second.powf(step.dt * DECAY_REFERENCE_RATE);

        if params.additive {
            let next = (self.value * retain + input * params.add_rate * step.dt * ADDITIVE_GAIN)
                .min(params.ceiling);
            self.value = next;
            next
        } else {
            let next = input.max(self.value * retain);
            self.value = next;
            next.min(1.0)
        }
    }
}
