//! Grayscale test ramp
//!
//! Even pixels ramp up along the strip, odd pixels ramp down, which makes
//! wiring and ordering problems easy to spot.

use heapless::Vec;

use super::{FrameTime, Waveform};
use crate::color::Rgbf;

#[derive(Debug, Clone)]
pub(crate) struct TestPattern<const MAX_LEDS: usize> {
    len: usize,
    cache: Vec<f64, MAX_LEDS>,
}

impl<const MAX_LEDS: usize> TestPattern<MAX_LEDS> {
    /// Create the pattern with its ramp already in place.
    pub(crate) fn new(len: usize) -> Self {
        let mut pattern = Self {
            len,
            cache: Vec::new(),
        };
        pattern.fill();
        pattern
    }

    #[allow(clippy::cast_precision_loss)]
    fn fill(&mut self) {
        let len = self.len as f64;
        self.cache.clear();
        self.cache.extend((0..self.len).map(|i| {
            let ramp = (i + 1) as f64 / len;
            let level = if i % 2 == 0 { ramp } else { 1.0 - ramp };
            level * 255.0
        }));
    }
}

impl<const MAX_LEDS: usize> Waveform for TestPattern<MAX_LEDS> {
    // Rebuilt every tick although the content never changes
    fn time_tick(&mut self, _time: FrameTime) {
        self.fill();
    }

    fn sample(&mut self, position: usize, _color: Rgbf) -> Rgbf {
        Rgbf::gray(self.cache[position])
    }
}
