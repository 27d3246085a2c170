//! Strip sinks
//!
//! A sink turns computed pixel colors into light. Hardware drivers live
//! outside this crate; [`BufferedSink`] is an in-memory strip useful for
//! simulation and tests.

use core::fmt::{self, Write};

use heapless::String;

use crate::color::Rgb;

/// Maximum length of the line kept by [`BufferedSink`].
pub const LOG_LINE_SIZE: usize = 96;

/// Abstract strip sink
///
/// Implement this trait to drive a physical or simulated LED strip.
pub trait StripSink {
    /// Error returned by pixel writes and commits.
    type Error;

    /// Write one pixel into the pending frame.
    ///
    /// Fails if `index` is outside the strip.
    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), Self::Error>;

    /// Commit the pending frame to the device.
    fn update(&mut self) -> Result<(), Self::Error>;

    /// Turn every pixel off and release the device.
    fn off(&mut self);

    /// Best-effort diagnostics.
    fn log(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Pixel index outside the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOutOfRange {
    pub index: usize,
    pub length: usize,
}

impl fmt::Display for PixelOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pixel {} outside strip of {} leds", self.index, self.length)
    }
}

impl core::error::Error for PixelOutOfRange {}

/// In-memory strip with a pending and a committed frame.
#[derive(Debug, Clone)]
pub struct BufferedSink<const MAX_LEDS: usize> {
    length: usize,
    pending: [Rgb; MAX_LEDS],
    committed: [Rgb; MAX_LEDS],
    commits: u32,
    on: bool,
    last_log: String<LOG_LINE_SIZE>,
}

impl<const MAX_LEDS: usize> BufferedSink<MAX_LEDS> {
    /// Create a strip of `length` pixels, capped at `MAX_LEDS`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.min(MAX_LEDS),
            pending: [Rgb::default(); MAX_LEDS],
            committed: [Rgb::default(); MAX_LEDS],
            commits: 0,
            on: false,
            last_log: String::new(),
        }
    }

    /// Colors shown by the strip after the last commit.
    pub fn pixels(&self) -> &[Rgb] {
        &self.committed[..self.length]
    }

    /// Number of committed frames.
    pub const fn commits(&self) -> u32 {
        self.commits
    }

    /// Returns true once a frame was committed and until the strip is turned off.
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// Last diagnostic line, truncated to [`LOG_LINE_SIZE`].
    pub fn last_log(&self) -> &str {
        &self.last_log
    }
}

impl<const MAX_LEDS: usize> StripSink for BufferedSink<MAX_LEDS> {
    type Error = PixelOutOfRange;

    fn set_pixel(&mut self, index: usize, color: Rgb) -> Result<(), Self::Error> {
        if index >= self.length {
            return Err(PixelOutOfRange {
                index,
                length: self.length,
            });
        }
        self.pending[index] = color;
        Ok(())
    }

    fn update(&mut self) -> Result<(), Self::Error> {
        self.committed = self.pending;
        self.commits = self.commits.wrapping_add(1);
        self.on = true;
        Ok(())
    }

    fn off(&mut self) {
        self.pending = [Rgb::default(); MAX_LEDS];
        self.committed = [Rgb::default(); MAX_LEDS];
        self.on = false;
    }

    fn log(&mut self, args: fmt::Arguments<'_>) {
        self.last_log.clear();
        let _ = Truncate(&mut self.last_log).write_fmt(args);
    }
}

/// Writer that keeps as many characters as fit and drops the rest.
struct Truncate<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncate<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
