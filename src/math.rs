//! Waveform math shared by the emitters and the scheduler.
//!
//! Everything here is pure and operates on `f64` so long running time
//! parameters keep their precision.

use crate::schedule::TimeOfDay;

/// Map `sin(x)` from `[-1, 1]` into `[min, max]`.
#[inline]
pub fn scale_sine(x: f64, min: f64, max: f64) -> f64 {
    (libm::sin(x) * 0.5 + 0.5) * (max - min) + min
}

/// [`scale_sine`] into the unit range.
#[inline]
pub fn unit_sine(x: f64) -> f64 {
    scale_sine(x, 0.0, 1.0)
}

/// Frequency modulation synthesis: `sin(C·x + D·sin(M·x))`
///
/// * `carrier` - carrier frequency scale (C)
/// * `depth` - modulation depth (D), supplied by the caller every tick
/// * `modulation` - modulation frequency scale (M).
#[inline]
pub fn fm(x: f64, carrier: f64, depth: f64, modulation: f64) -> f64 {
    libm::sin(carrier * x + depth * libm::sin(modulation * x))
}

/// Returns true if `now` is at or after `time` on the same day.
///
/// Hours are compared first, then minutes. Windows spanning midnight are
/// not handled here.
pub const fn is_after(now: TimeOfDay, time: TimeOfDay) -> bool {
    if now.hour != time.hour {
        return now.hour > time.hour;
    }
    now.minute >= time.minute
}

/// Floating modulo that always returns a value in `[0, period)`.
#[inline]
pub(crate) fn wrap(value: f64, period: f64) -> f64 {
    let rem = libm::fmod(value, period);
    if rem < 0.0 { rem + period } else { rem }
}
