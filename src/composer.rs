//! Composer - the main orchestrator
//!
//! Owns the animation loop and the scheduler and interleaves their cadences
//! on a single thread of control: every [`Composer::tick`] drains pending
//! control commands, evaluates the schedule when its interval has elapsed
//! and renders a frame when one is due. Ticks never overlap, so no locking
//! is involved.
//!
//! # Usage
//!
//! ```ignore
//! static CONTROL: ControlChannel = ControlChannel::new();
//!
//! let mut composer = Composer::<_, 150, 4>::new(sink, &config, &mut rng, CONTROL.receiver())?;
//! // Hand CONTROL.sender() to the signal handler
//!
//! loop {
//!     match composer.tick(now(), wall_clock())? {
//!         TickOutcome::Continue { sleep } => sleep_for(sleep),
//!         TickOutcome::Finished => break,
//!     }
//! }
//! ```

use embassy_time::{Duration, Instant};
use rand::Rng;

use crate::animation::{AnimationLoop, LoopState};
use crate::config::ComposerConfig;
use crate::control::{ControlReceiver, LoopCommand};
use crate::emitter::build_emitters;
use crate::error::ConfigError;
use crate::schedule::{DEFAULT_SCHEDULE_INTERVAL, ScheduleAction, ScheduleRule, Scheduler, TimeOfDay};
use crate::sink::StripSink;

/// Suggested sleep while nothing is animating.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a composer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Call `tick` again after `sleep`
    Continue { sleep: Duration },
    /// Shutdown completed, the strip is off
    Finished,
}

/// Animation loop plus scheduler, driven by one periodic call.
pub struct Composer<'a, S: StripSink, const MAX_LEDS: usize, const MAX_EMITTERS: usize> {
    animation: AnimationLoop<S, MAX_LEDS, MAX_EMITTERS>,
    scheduler: Scheduler,
    control: ControlReceiver<'a>,
    auto_started: bool,
    finished: bool,
}

impl<'a, S: StripSink, const MAX_LEDS: usize, const MAX_EMITTERS: usize>
    Composer<'a, S, MAX_LEDS, MAX_EMITTERS>
{
    /// Build the emitters and the schedule from `config`.
    ///
    /// Seeds that are neither configured nor linked are drawn from `rng`.
    /// `control` is the receiving end of the lifecycle layer's shutdown
    /// handle.
    pub fn new<R: Rng>(
        sink: S,
        config: &ComposerConfig<'_>,
        rng: &mut R,
        control: ControlReceiver<'a>,
    ) -> Result<Self, ConfigError> {
        let emitters =
            build_emitters::<R, MAX_LEDS, MAX_EMITTERS>(config.emitters, config.strip_length, rng)?;
        let scheduler = Scheduler::new(
            config.schedule,
            config.schedule_enabled,
            config.schedule_interval.unwrap_or(DEFAULT_SCHEDULE_INTERVAL),
        )?;
        let mut animation = AnimationLoop::new(
            sink,
            emitters,
            config.strip_length,
            config.frame_delay.unwrap_or(Duration::from_millis(0)),
        );

        for rule in scheduler.rules().iter().filter(|rule| rule.crosses_midnight()) {
            animation.sink_mut().log(format_args!(
                "schedule window {:02}:{:02}-{:02}:{:02} crosses midnight and will never match",
                rule.start.hour, rule.start.minute, rule.end.hour, rule.end.minute
            ));
        }

        Ok(Self {
            animation,
            scheduler,
            control,
            auto_started: false,
            finished: false,
        })
    }

    /// Run one step of the composer.
    pub fn tick(&mut self, now: Instant, clock: TimeOfDay) -> Result<TickOutcome, S::Error> {
        if self.finished {
            return Ok(TickOutcome::Finished);
        }

        self.process_commands(now);
        if self.finished {
            return Ok(TickOutcome::Finished);
        }

        self.process_schedule(now, clock);

        let frame = self.animation.tick(now)?;
        let sleep = [
            frame.map(|frame| frame.sleep_duration),
            self.scheduler.until_next_check(now),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(IDLE_POLL_INTERVAL);

        Ok(TickOutcome::Continue { sleep })
    }

    /// Stop everything and turn the strip off.
    pub fn shutdown(&mut self) {
        self.animation.shutdown();
        self.scheduler.clear();
        self.finished = true;
    }

    pub const fn state(&self) -> LoopState {
        self.animation.state()
    }

    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Currently matched schedule window.
    pub const fn active_rule(&self) -> Option<ScheduleRule> {
        self.scheduler.active_rule()
    }

    pub const fn animation(&self) -> &AnimationLoop<S, MAX_LEDS, MAX_EMITTERS> {
        &self.animation
    }

    pub const fn animation_mut(&mut self) -> &mut AnimationLoop<S, MAX_LEDS, MAX_EMITTERS> {
        &mut self.animation
    }

    pub const fn sink(&self) -> &S {
        self.animation.sink()
    }

    /// Drain pending control commands (non-blocking).
    fn process_commands(&mut self, now: Instant) {
        while let Some(command) = self.control.try_receive() {
            match command {
                LoopCommand::Start => {
                    self.animation.start(now);
                }
                LoopCommand::Pause => {
                    self.animation.pause();
                }
                LoopCommand::Resume => {
                    self.animation.resume(now);
                }
                LoopCommand::Shutdown => {
                    self.shutdown();
                    return;
                }
            }
        }
    }

    fn process_schedule(&mut self, now: Instant, clock: TimeOfDay) {
        if self.scheduler.is_unscheduled() {
            // Without a schedule the animation runs forever
            if !self.auto_started {
                self.animation.start(now);
                self.auto_started = true;
            }
            return;
        }

        match self.scheduler.poll(now, clock) {
            ScheduleAction::Start(_) => {
                self.animation.start(now);
            }
            ScheduleAction::Stop(_) => {
                self.animation.stop();
            }
            ScheduleAction::Idle => {}
        }
    }
}
