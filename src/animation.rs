//! Animation loop
//!
//! Renders frames from a set of emitters into a [`StripSink`]. The loop is
//! driven from outside: the caller invokes [`AnimationLoop::tick`] and
//! sleeps for the returned duration, no async runtime or timer is needed.
//!
//! Every frame:
//! 1. the frame delta is computed from the previous tick
//! 2. every emitter advances its time state, in configuration order
//! 3. every pixel is sampled from all emitters in increasing position order,
//!    blended, clamped and written to the sink
//! 4. the frame is committed
//! 5. roughly once per second the frame rate is reported through the sink

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::blend::blend;
use crate::color::Rgbf;
use crate::emitter::Emitter;
use crate::sink::StripSink;

/// Interval between frame rate reports.
pub const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    Paused,
}

/// Timing of a rendered frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Frame rate accounting.
#[derive(Debug, Clone, Copy)]
struct FrameStats {
    frames: u32,
    since_report: Duration,
}

impl FrameStats {
    const fn new() -> Self {
        Self {
            frames: 0,
            since_report: Duration::from_millis(0),
        }
    }

    /// Count a frame, returns frames per second once a report is due.
    fn record(&mut self, dt: Duration) -> Option<u64> {
        self.frames = self.frames.saturating_add(1);
        self.since_report += dt;
        if self.since_report < FPS_REPORT_INTERVAL {
            return None;
        }
        let fps = u64::from(self.frames) * 1000 / self.since_report.as_millis().max(1);
        *self = Self::new();
        Some(fps)
    }
}

/// Frame loop over a fixed set of emitters.
pub struct AnimationLoop<S: StripSink, const MAX_LEDS: usize, const MAX_EMITTERS: usize> {
    sink: S,
    emitters: Vec<Emitter<MAX_LEDS>, MAX_EMITTERS>,
    strip_length: usize,

    state: LoopState,
    frame_duration: Duration,
    next_frame: Instant,
    last_tick: Option<Instant>,
    stats: FrameStats,
}

impl<S: StripSink, const MAX_LEDS: usize, const MAX_EMITTERS: usize>
    AnimationLoop<S, MAX_LEDS, MAX_EMITTERS>
{
    /// Create a stopped loop.
    ///
    /// `frame_duration` is the minimum delay between frames, zero renders as
    /// fast as the caller ticks. The strip length is checked when the
    /// emitters are built, so it is trusted here.
    pub fn new(
        sink: S,
        emitters: Vec<Emitter<MAX_LEDS>, MAX_EMITTERS>,
        strip_length: usize,
        frame_duration: Duration,
    ) -> Self {
        Self {
            sink,
            emitters,
            strip_length,
            state: LoopState::Stopped,
            frame_duration,
            next_frame: Instant::from_millis(0),
            last_tick: None,
            stats: FrameStats::new(),
        }
    }

    pub const fn state(&self) -> LoopState {
        self.state
    }

    pub fn emitters(&self) -> &[Emitter<MAX_LEDS>] {
        &self.emitters
    }

    pub const fn strip_length(&self) -> usize {
        self.strip_length
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Stopped -> Running
    ///
    /// Returns false if the loop was not stopped.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state != LoopState::Stopped {
            return false;
        }
        self.enter_running(now);
        true
    }

    /// Running or Paused -> Stopped, turns the strip off.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        self.set_state(LoopState::Stopped);
        self.sink.off();
        true
    }

    /// Running -> Paused, turns the strip off.
    pub fn pause(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.set_state(LoopState::Paused);
        self.sink.off();
        true
    }

    /// Paused -> Running.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.state != LoopState::Paused {
            return false;
        }
        self.enter_running(now);
        true
    }

    /// Any state -> Stopped, the strip is always turned off.
    pub fn shutdown(&mut self) {
        self.set_state(LoopState::Stopped);
        self.sink.off();
    }

    /// Render a frame if one is due.
    ///
    /// Returns `None` unless the loop is running.
    pub fn tick(&mut self, now: Instant) -> Result<Option<FrameResult>, S::Error> {
        if self.state != LoopState::Running {
            return Ok(None);
        }

        if now < self.next_frame {
            return Ok(Some(FrameResult {
                next_deadline: self.next_frame,
                sleep_duration: self.next_frame.saturating_duration_since(now),
            }));
        }

        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift = self.frame_duration + self.frame_duration;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.render(now)?;

        self.next_frame += self.frame_duration;
        let sleep_duration = self.next_frame.saturating_duration_since(now);

        Ok(Some(FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }))
    }

    /// Render one frame unconditionally.
    pub fn render(&mut self, now: Instant) -> Result<(), S::Error> {
        let dt = self
            .last_tick
            .map_or(Duration::from_millis(0), |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);

        for emitter in &mut self.emitters {
            emitter.time_tick(now, dt);
        }

        for position in 0..self.strip_length {
            let color = self.emitters.iter_mut().fold(Rgbf::BLACK, |acc, emitter| {
                let contribution = emitter.position_tick(position);
                blend(emitter.blend_mode(), acc, contribution)
            });
            self.sink.set_pixel(position, color.to_rgb())?;
        }
        self.sink.update()?;

        if let Some(fps) = self.stats.record(dt) {
            self.sink.log(format_args!("{fps} fps"));
        }
        Ok(())
    }

    fn enter_running(&mut self, now: Instant) {
        self.set_state(LoopState::Running);
        // Time spent stopped or paused is not fed into the emitters
        self.last_tick = None;
        self.next_frame = now;
        self.stats = FrameStats::new();
    }

    fn set_state(&mut self, state: LoopState) {
        #[cfg(feature = "esp32-log")]
        println!("[animation] {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}
