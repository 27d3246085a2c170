//! Emitters
//!
//! An emitter is one independently configured animated color source. Every
//! frame it is advanced once with [`Emitter::time_tick`] and then sampled
//! for each pixel with [`Emitter::position_tick`].
//!
//! Mode specific state lives in a per-mode phase variant, so an emitter only
//! carries the state its waveform needs.

mod classic;
mod fm;
mod strobe;
mod stripes;
mod test_pattern;

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand::Rng;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::blend::BlendMode;
use crate::color::Rgbf;
use crate::config::{EmitterConfig, EmitterSettings, SeedSource, WaveformMode, WaveformSettings};
use crate::error::ConfigError;
use classic::ClassicWave;
use fm::FmWave;
use strobe::Strobe;
use stripes::StripesWave;
use test_pattern::TestPattern;

/// Seeds are drawn uniformly from `[-SEED_RANGE, SEED_RANGE)`.
pub const SEED_RANGE: f64 = 1000.0;

/// Frame timing in seconds, as seen by the waveforms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameTime {
    /// Absolute time
    pub(crate) t: f64,
    /// Time since the previous frame
    pub(crate) dt: f64,
}

impl FrameTime {
    #[allow(clippy::cast_precision_loss)]
    fn new(now: Instant, dt: Duration) -> Self {
        Self {
            t: now.as_micros() as f64 / 1_000_000.0,
            dt: dt.as_micros() as f64 / 1_000_000.0,
        }
    }
}

pub(crate) trait Waveform {
    /// Advance the phase state by one frame.
    fn time_tick(&mut self, time: FrameTime);

    /// Sample the contribution at `position` from the current phase state.
    fn sample(&mut self, position: usize, color: Rgbf) -> Rgbf;
}

/// Waveform state - enum containing every mode.
#[derive(Debug, Clone)]
enum Phase<const MAX_LEDS: usize> {
    Constant,
    Stripes(StripesWave),
    Test(TestPattern<MAX_LEDS>),
    Classic(ClassicWave),
    Fm(FmWave),
}

impl<const MAX_LEDS: usize> Phase<MAX_LEDS> {
    fn new(waveform: WaveformSettings, strip_length: usize, seed: f64) -> Self {
        match waveform {
            WaveformSettings::Constant => Self::Constant,
            WaveformSettings::Stripes(settings) => Self::Stripes(StripesWave::new(settings)),
            WaveformSettings::Test => Self::Test(TestPattern::new(strip_length)),
            WaveformSettings::Classic(settings) => Self::Classic(ClassicWave::new(settings, seed)),
            WaveformSettings::Fm(settings) => Self::Fm(FmWave::new(settings, seed)),
        }
    }

    fn time_tick(&mut self, time: FrameTime) {
        match self {
            Self::Constant => {}
            Self::Stripes(wave) => wave.time_tick(time),
            Self::Test(wave) => wave.time_tick(time),
            Self::Classic(wave) => wave.time_tick(time),
            Self::Fm(wave) => wave.time_tick(time),
        }
    }

    fn sample(&mut self, position: usize, color: Rgbf) -> Rgbf {
        match self {
            Self::Constant => color,
            Self::Stripes(wave) => wave.sample(position, color),
            Self::Test(wave) => wave.sample(position, color),
            Self::Classic(wave) => wave.sample(position, color),
            Self::Fm(wave) => wave.sample(position, color),
        }
    }

    const fn mode(&self) -> WaveformMode {
        match self {
            Self::Constant => WaveformMode::Constant,
            Self::Stripes(_) => WaveformMode::Stripes,
            Self::Test(_) => WaveformMode::Test,
            Self::Classic(_) => WaveformMode::Classic,
            Self::Fm(_) => WaveformMode::Fm,
        }
    }
}

/// One animated color source.
#[derive(Debug, Clone)]
pub struct Emitter<const MAX_LEDS: usize> {
    color: Rgbf,
    blend: BlendMode,
    seed: f64,
    strobe: Option<Strobe>,
    phase: Phase<MAX_LEDS>,
}

impl<const MAX_LEDS: usize> Emitter<MAX_LEDS> {
    /// Create an emitter for a strip of `strip_length` pixels.
    ///
    /// `seed` is used as is, [`SeedSource`] is resolved by the caller.
    pub fn new(
        settings: &EmitterSettings,
        strip_length: usize,
        seed: f64,
    ) -> Result<Self, ConfigError> {
        check_strip_length::<MAX_LEDS>(strip_length)?;
        Ok(Self {
            color: Rgbf::from(settings.color),
            blend: settings.blend,
            seed,
            strobe: settings.strobe.map(Strobe::new),
            phase: Phase::new(settings.waveform, strip_length, seed),
        })
    }

    /// Advance the phase state by `dt`.
    pub fn time_tick(&mut self, now: Instant, dt: Duration) {
        self.phase.time_tick(FrameTime::new(now, dt));
        if let Some(strobe) = self.strobe.as_mut() {
            strobe.tick(dt);
        }
    }

    /// Sample the contribution at `position`.
    ///
    /// Within a frame positions must be sampled in increasing order: classic
    /// emitters advance a running accumulator on every call.
    ///
    /// # Panics
    ///
    /// Test pattern emitters panic if `position` is outside the strip.
    pub fn position_tick(&mut self, position: usize) -> Rgbf {
        let color = self.phase.sample(position, self.color);
        if self.is_strobed_off() {
            return Rgbf::BLACK;
        }
        color
    }

    pub const fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    pub const fn seed(&self) -> f64 {
        self.seed
    }

    pub const fn mode(&self) -> WaveformMode {
        self.phase.mode()
    }

    /// Returns true if the strobe currently gates the output off.
    pub fn is_strobed_off(&self) -> bool {
        self.strobe.as_ref().is_some_and(|strobe| !strobe.is_on())
    }
}

/// Draw a fresh seed.
pub fn draw_seed<R: Rng>(rng: &mut R) -> f64 {
    rng.random_range(-SEED_RANGE..SEED_RANGE)
}

/// Build emitters in configuration order.
///
/// Linked emitters reuse the seed of the emitter before them. A linked
/// first emitter has nothing to link to and draws its own seed.
pub fn build_emitters<R, const MAX_LEDS: usize, const MAX_EMITTERS: usize>(
    configs: &[EmitterConfig],
    strip_length: usize,
    rng: &mut R,
) -> Result<Vec<Emitter<MAX_LEDS>, MAX_EMITTERS>, ConfigError>
where
    R: Rng,
{
    check_strip_length::<MAX_LEDS>(strip_length)?;
    if configs.is_empty() {
        return Err(ConfigError::NoEmitters);
    }

    let mut emitters = Vec::new();
    let mut previous_seed = None;
    for config in configs {
        let settings = config.resolve()?;
        let seed = match (settings.seed, previous_seed) {
            (SeedSource::Explicit(seed), _) => seed,
            (SeedSource::Linked, Some(seed)) => seed,
            (SeedSource::Linked | SeedSource::Random, _) => draw_seed(rng),
        };
        #[cfg(feature = "esp32-log")]
        println!("[emitter] {} seed={}", config.mode.as_str(), seed);

        let emitter = Emitter::new(&settings, strip_length, seed)?;
        emitters
            .push(emitter)
            .map_err(|_| ConfigError::TooManyEmitters { max: MAX_EMITTERS })?;
        previous_seed = Some(seed);
    }
    Ok(emitters)
}

const fn check_strip_length<const MAX_LEDS: usize>(length: usize) -> Result<(), ConfigError> {
    if length == 0 {
        return Err(ConfigError::MissingStripLength);
    }
    if length > MAX_LEDS {
        return Err(ConfigError::StripTooLong {
            length,
            max: MAX_LEDS,
        });
    }
    Ok(())
}
