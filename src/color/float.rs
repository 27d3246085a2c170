use crate::color::Rgb;

/// Floating point color used while compositing emitters.
///
/// Channels live on the same 0-255 scale as [`Rgb`] but are not clamped:
/// blend arithmetic may overflow, go negative or become non-finite until the
/// pixel is converted back with [`Rgbf::to_rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgbf {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgbf {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Gray level with the same value in every channel.
    pub const fn gray(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Multiply every channel by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        self.map(|c| c * factor)
    }

    /// Sum of all channels.
    pub fn brightness(self) -> f64 {
        self.r + self.g + self.b
    }

    /// Apply `f` to every channel.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Combine two colors channel by channel.
    #[must_use]
    pub fn zip(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }

    /// Clamp every channel to 0-255 and round to the nearest integer.
    ///
    /// `NaN` channels end up black.
    pub fn to_rgb(self) -> Rgb {
        Rgb {
            r: clamp_channel(self.r),
            g: clamp_channel(self.g),
            b: clamp_channel(self.b),
        }
    }
}

impl From<Rgb> for Rgbf {
    fn from(color: Rgb) -> Self {
        Self::new(f64::from(color.r), f64::from(color.g), f64::from(color.b))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    libm::round(value.clamp(0.0, 255.0)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_channel() {
        assert_eq!(clamp_channel(-12.0), 0);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(f64::INFINITY), 255);
        assert_eq!(clamp_channel(f64::NEG_INFINITY), 0);
        assert_eq!(clamp_channel(f64::NAN), 0);
        assert_eq!(clamp_channel(63.75), 64);
    }
}
