//! Classic drifting waves
//!
//! The time parameter is integrated from a speed that itself swings
//! sinusoidally, so the pattern speeds up, slows down and reverses. Along
//! the strip a position accumulator advances by a per-frame delta, which
//! means pixels must be sampled in increasing order within a frame.

use super::{FrameTime, Waveform};
use crate::color::Rgbf;
use crate::config::ClassicSettings;
use crate::math::{scale_sine, unit_sine};

/// How far the sweep start drifts with time.
const POSITION_DRIFT: f64 = 0.3;
/// Rate at which the sweep delta breathes.
const DELTA_RATE: f64 = 0.1;
const DELTA_MIN: f64 = 0.5;
const DELTA_MAX: f64 = 1.5;

#[derive(Debug, Clone)]
pub(crate) struct ClassicWave {
    settings: ClassicSettings,
    seed: f64,
    time: f64,
    position: f64,
    delta: f64,
}

impl ClassicWave {
    pub(crate) const fn new(settings: ClassicSettings, seed: f64) -> Self {
        Self {
            settings,
            seed,
            time: 0.0,
            position: seed,
            delta: 0.0,
        }
    }
}

impl Waveform for ClassicWave {
    fn time_tick(&mut self, time: FrameTime) {
        let s = &self.settings;
        let speed = s.speed * libm::sin(s.acceleration * time.t + self.seed);
        self.time += speed * time.dt;

        self.position = self.seed + POSITION_DRIFT * self.time;
        self.delta =
            s.morph * scale_sine(DELTA_RATE * self.time + self.seed, DELTA_MIN, DELTA_MAX) / s.width;
    }

    fn sample(&mut self, _position: usize, color: Rgbf) -> Rgbf {
        self.position += self.delta;

        let level = unit_sine(0.2 * self.time + self.position)
            * unit_sine(self.time + 0.2 * self.position);
        let mut level = libm::pow(level, self.settings.power);
        if let Some(map) = self.settings.level {
            level = map.apply(level);
        }

        color.scale(level)
    }
}
