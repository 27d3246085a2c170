//! Frequency modulated envelope
//!
//! Brightness along the strip follows `sin(C·x + D·sin(M·x))`. The
//! modulation depth `D` slowly breathes, which keeps the pattern from ever
//! looking periodic.

use core::f64::consts::TAU;

use super::{FrameTime, Waveform};
use crate::color::Rgbf;
use crate::config::FmSettings;
use crate::math::{fm, scale_sine, unit_sine};

const CARRIER: f64 = 1.0;
const MODULATION: f64 = 0.25;

const DEPTH_RATE: f64 = 0.05;
const DEPTH_MIN: f64 = 0.5;
const DEPTH_MAX: f64 = 4.0;

/// Time scale fed into the modulated time term.
const TIME_RATE: f64 = 0.2;

/// Phase advance across one `width` of pixels.
const POSITION_SCALE: f64 = TAU;

#[derive(Debug, Clone)]
pub(crate) struct FmWave {
    settings: FmSettings,
    seed: f64,
    time: f64,
    depth: f64,
}

impl FmWave {
    pub(crate) const fn new(settings: FmSettings, seed: f64) -> Self {
        Self {
            settings,
            seed,
            time: 0.0,
            depth: DEPTH_MIN,
        }
    }
}

impl Waveform for FmWave {
    fn time_tick(&mut self, time: FrameTime) {
        let s = &self.settings;
        self.depth = scale_sine(DEPTH_RATE * s.morph * time.t + self.seed, DEPTH_MIN, DEPTH_MAX);
        self.time =
            fm(TIME_RATE * s.speed * time.t, CARRIER, self.depth, MODULATION) + s.speed * time.t;
    }

    #[allow(clippy::cast_precision_loss)]
    fn sample(&mut self, position: usize, color: Rgbf) -> Rgbf {
        let s = &self.settings;
        let x = self.time + (POSITION_SCALE / s.width) * position as f64 + self.seed + s.slide;
        let level = libm::pow(unit_sine(fm(x, CARRIER, self.depth, MODULATION)), s.power);
        color.scale(level)
    }
}
