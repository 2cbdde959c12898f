//! Bounded pool of concurrent expanding "wave" events.

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use serde::Serialize;
use std::collections::VecDeque;
use std::f64::consts::TAU;

use super::ReplayClock;
use crate::params::WaveParams;

/// One spawned wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveInstance {
    /// Timestamp of the crossing that spawned the wave (seconds)
    pub start_time: f64,

    /// Unit direction derived from `start_time`
    pub origin: DVec2,
}

impl WaveInstance {
    pub fn spawn(start_time: f64) -> Self {
        Self {
            start_time,
            origin: wave_direction(start_time),
        }
    }

    pub fn age_at(&self, time: f64) -> f64 {
        time - self.start_time
    }
}

/// Deterministic unit direction for a timestamp.
///
/// A sine hash rather than an RNG: the same timestamp always yields the same
/// direction, which keeps replays identical.
pub fn wave_direction(time: f64) -> DVec2 {
    let hashed = (time * 12.9898 + 78.233).sin() * 43758.5453;
    let seed = hashed - hashed.floor();
    let angle = seed * TAU;
    DVec2::new(angle.cos(), angle.sin())
}

/// GPU-side wave slot (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WaveUniform {
    pub origin: [f32; 2],
    pub age: f32,
    /// 1.0 for a live wave, 0.0 for an empty slot
    pub active: f32,
}

/// Output of one wave pool evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WavePoolOutput {
    /// Active waves, oldest first
    pub waves: Vec<WaveInstance>,

    /// Input crossed the threshold on this evaluation
    pub just_triggered: bool,

    /// `time - start_time` for each entry of `waves`
    pub ages: Vec<f64>,
}

impl WavePoolOutput {
    /// Pack the newest `N` waves into fixed uniform slots, oldest first,
    /// zero-filling unused slots.
    pub fn to_uniforms<const N: usize>(&self) -> [WaveUniform; N] {
        let mut slots = [WaveUniform::default(); N];
        let skip = self.waves.len().saturating_sub(N);
        for (slot, (wave, age)) in slots
            .iter_mut()
            .zip(self.waves.iter().zip(&self.ages).skip(skip))
        {
            *slot = WaveUniform {
                origin: wave.origin.as_vec2().to_array(),
                age: *age as f32,
                active: 1.0,
            };
        }
        slots
    }
}

/// Rising-edge detector that keeps a FIFO of recent waves
#[derive(Debug, Clone, Default)]
pub struct WavePool {
    waves: VecDeque<WaveInstance>,
    was_above: bool,
    clock: ReplayClock,
}

impl WavePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn evaluate(&mut self, input: f64, time: f64, params: &WaveParams) -> WavePoolOutput {
        if self.clock.advance(time).reset {
            self.waves.clear();
            self.was_above = false;
        }

        let is_above = input > params.threshold;
        let just_triggered = is_above && !self.was_above;
        self.was_above = is_above;

        if just_triggered {
            self.waves.push_back(WaveInstance::spawn(time));
            while self.waves.len() > params.max_count {
                self.waves.pop_front();
            }
        }

        // Drop waves from the future (out-of-order leftovers) and expired ones
        self.waves
            .retain(|w| w.start_time <= time && w.age_at(time) < params.max_age_s);

        let waves: Vec<WaveInstance> = self.waves.iter().copied().collect();
        let ages = waves.iter().map(|w| w.age_at(time)).collect();
        WavePoolOutput {
            waves,
            just_triggered,
            ages,
        }
    }
}
