//! Moving stripes
//!
//! A square wave with period `2 * width` travels along the strip. Each edge
//! gets a one pixel linear ramp so moving stripes don't flicker.

use super::{FrameTime, Waveform};
use crate::color::Rgbf;
use crate::config::StripesSettings;
use crate::math::wrap;

#[derive(Debug, Clone)]
pub(crate) struct StripesWave {
    settings: StripesSettings,
    offset: f64,
}

impl StripesWave {
    pub(crate) const fn new(settings: StripesSettings) -> Self {
        Self {
            settings,
            offset: 0.0,
        }
    }

    const fn period(&self) -> f64 {
        self.settings.width * 2.0
    }
}

impl Waveform for StripesWave {
    fn time_tick(&mut self, time: FrameTime) {
        self.offset = wrap(self.settings.speed * time.t, self.period());
    }

    #[allow(clippy::cast_precision_loss)]
    fn sample(&mut self, position: usize, color: Rgbf) -> Rgbf {
        let x = wrap(position as f64 - self.offset, self.period());
        color.scale(coverage(x, self.settings.width))
    }
}

/// Coverage of a stripe at `x` within one period, 0-1.
fn coverage(x: f64, width: f64) -> f64 {
    if x < width {
        x.min(1.0)
    } else {
        (1.0 - (x - width)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage() {
        assert_eq!(coverage(0.0, 4.0), 0.0);
        assert_eq!(coverage(0.5, 4.0), 0.5);
        assert_eq!(coverage(2.0, 4.0), 1.0);
        assert_eq!(coverage(4.0, 4.0), 1.0);
        assert_eq!(coverage(4.5, 4.0), 0.5);
        assert_eq!(coverage(6.0, 4.0), 0.0);
    }
}
