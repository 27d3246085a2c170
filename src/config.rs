//! Emitter and composer configuration
//!
//! The caller hands over raw [`EmitterConfig`] values, usually produced by an
//! external loader. They are never modified: [`EmitterConfig::resolve`] fills
//! in the defaults and produces an [`EmitterSettings`] whose waveform variant
//! carries exactly the parameters its mode needs.

use embassy_time::Duration;

use crate::blend::BlendMode;
use crate::color::{Rgb, rgb_from_array};
use crate::error::ConfigError;
use crate::schedule::ScheduleRule;

pub const DEFAULT_POWER: f64 = 1.0;
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_MORPH: f64 = 1.0;
pub const DEFAULT_ACCELERATION: f64 = 0.1;
pub const DEFAULT_WIDTH: f64 = 8.0;
pub const DEFAULT_SCALE: f64 = 1.0;
pub const DEFAULT_OFFSET: f64 = 0.0;
pub const DEFAULT_SLIDE: f64 = 0.0;
pub const DEFAULT_STROBE_PERIOD_MS: u64 = 100;

const MODE_NAME_CONSTANT: &str = "constant";
const MODE_NAME_STRIPES: &str = "stripes";
const MODE_NAME_TEST: &str = "test";
const MODE_NAME_CLASSIC: &str = "classic";
const MODE_NAME_FM: &str = "fm";

/// Waveform produced by an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaveformMode {
    /// Base color everywhere
    #[default]
    Constant,
    /// Moving anti-aliased stripes
    Stripes,
    /// Static grayscale ramp for checking the strip
    Test,
    /// Drifting product of two sines
    Classic,
    /// Frequency modulated brightness envelope
    Fm,
}

impl WaveformMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Constant => MODE_NAME_CONSTANT,
            Self::Stripes => MODE_NAME_STRIPES,
            Self::Test => MODE_NAME_TEST,
            Self::Classic => MODE_NAME_CLASSIC,
            Self::Fm => MODE_NAME_FM,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_CONSTANT => Some(Self::Constant),
            MODE_NAME_STRIPES => Some(Self::Stripes),
            MODE_NAME_TEST => Some(Self::Test),
            MODE_NAME_CLASSIC => Some(Self::Classic),
            MODE_NAME_FM => Some(Self::Fm),
            _ => None,
        }
    }
}

/// Raw emitter configuration as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmitterConfig {
    /// Base color
    pub color: [u8; 3],
    pub mode: WaveformMode,
    /// Exponent applied to the brightness level
    pub power: Option<f64>,
    pub speed: Option<f64>,
    /// Rate at which the pattern changes shape
    pub morph: Option<f64>,
    pub acceleration: Option<f64>,
    /// Spatial period in pixels
    pub width: Option<f64>,
    pub blend: Option<BlendMode>,
    pub strobe: bool,
    pub strobe_period_ms: Option<u64>,
    /// Explicit seed, otherwise drawn at construction
    pub seed: Option<f64>,
    /// Share the seed of the previous emitter
    pub linked: bool,
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    pub slide: Option<f64>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            color: [255, 255, 255],
            mode: WaveformMode::Constant,
            power: None,
            speed: None,
            morph: None,
            acceleration: None,
            width: None,
            blend: None,
            strobe: false,
            strobe_period_ms: None,
            seed: None,
            linked: false,
            scale: None,
            offset: None,
            slide: None,
        }
    }
}

impl EmitterConfig {
    /// Create a config for `mode` with the given base color.
    pub fn new(mode: WaveformMode, color: Rgb) -> Self {
        Self {
            color: [color.r, color.g, color.b],
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = Some(blend);
        self
    }

    #[must_use]
    pub const fn with_strobe(mut self, period_ms: u64) -> Self {
        self.strobe = true;
        self.strobe_period_ms = Some(period_ms);
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: f64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub const fn linked(mut self) -> Self {
        self.linked = true;
        self
    }

    /// Apply defaults and validate.
    pub fn resolve(&self) -> Result<EmitterSettings, ConfigError> {
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidWidth);
        }

        let strobe = if self.strobe {
            let period = self.strobe_period_ms.unwrap_or(DEFAULT_STROBE_PERIOD_MS);
            if period == 0 {
                return Err(ConfigError::InvalidStrobePeriod);
            }
            Some(Duration::from_millis(period))
        } else {
            None
        };

        let seed = match (self.seed, self.linked) {
            (Some(seed), _) => SeedSource::Explicit(seed),
            (None, true) => SeedSource::Linked,
            (None, false) => SeedSource::Random,
        };

        let power = self.power.unwrap_or(DEFAULT_POWER);
        let speed = self.speed.unwrap_or(DEFAULT_SPEED);
        let morph = self.morph.unwrap_or(DEFAULT_MORPH);

        let waveform = match self.mode {
            WaveformMode::Constant => WaveformSettings::Constant,
            WaveformMode::Test => WaveformSettings::Test,
            WaveformMode::Stripes => WaveformSettings::Stripes(StripesSettings { width, speed }),
            WaveformMode::Classic => WaveformSettings::Classic(ClassicSettings {
                power,
                speed,
                morph,
                acceleration: self.acceleration.unwrap_or(DEFAULT_ACCELERATION),
                width,
                level: self.level_map(),
            }),
            WaveformMode::Fm => WaveformSettings::Fm(FmSettings {
                power,
                speed,
                morph,
                width,
                slide: self.slide.unwrap_or(DEFAULT_SLIDE),
            }),
        };

        Ok(EmitterSettings {
            color: rgb_from_array(self.color),
            blend: self.blend.unwrap_or_default(),
            strobe,
            seed,
            waveform,
        })
    }

    fn level_map(&self) -> Option<LevelMap> {
        if self.scale.is_none() && self.offset.is_none() {
            return None;
        }
        Some(LevelMap {
            scale: self.scale.unwrap_or(DEFAULT_SCALE),
            offset: self.offset.unwrap_or(DEFAULT_OFFSET),
        })
    }
}

/// Where an emitter's seed comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedSource {
    Explicit(f64),
    /// Inherited from the previous emitter
    Linked,
    /// Drawn once at construction
    Random,
}

/// Fully resolved emitter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterSettings {
    pub color: Rgb,
    pub blend: BlendMode,
    /// Strobe period, if strobing
    pub strobe: Option<Duration>,
    pub seed: SeedSource,
    pub waveform: WaveformSettings,
}

/// Mode specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaveformSettings {
    Constant,
    Stripes(StripesSettings),
    Test,
    Classic(ClassicSettings),
    Fm(FmSettings),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripesSettings {
    pub width: f64,
    /// Pixels per second
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicSettings {
    pub power: f64,
    pub speed: f64,
    pub morph: f64,
    pub acceleration: f64,
    pub width: f64,
    pub level: Option<LevelMap>,
}

/// Linear rescale of a brightness level, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelMap {
    pub scale: f64,
    pub offset: f64,
}

impl LevelMap {
    pub fn apply(self, level: f64) -> f64 {
        (level * self.scale + self.offset).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FmSettings {
    pub power: f64,
    pub speed: f64,
    pub morph: f64,
    pub width: f64,
    /// Constant phase offset along the strip
    pub slide: f64,
}

/// Everything needed to build a [`Composer`](crate::Composer).
#[derive(Debug, Clone)]
pub struct ComposerConfig<'c> {
    pub strip_length: usize,
    /// Emitters in blend order
    pub emitters: &'c [EmitterConfig],
    pub schedule: &'c [ScheduleRule],
    pub schedule_enabled: bool,
    /// Minimum delay between frames, zero when not set
    pub frame_delay: Option<Duration>,
    /// Interval between schedule evaluations
    pub schedule_interval: Option<Duration>,
}

impl<'c> ComposerConfig<'c> {
    /// Config that runs `emitters` forever without a schedule.
    pub const fn new(strip_length: usize, emitters: &'c [EmitterConfig]) -> Self {
        Self {
            strip_length,
            emitters,
            schedule: &[],
            schedule_enabled: true,
            frame_delay: None,
            schedule_interval: None,
        }
    }

    #[must_use]
    pub const fn with_schedule(mut self, schedule: &'c [ScheduleRule]) -> Self {
        self.schedule = schedule;
        self
    }

    #[must_use]
    pub const fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }
}
