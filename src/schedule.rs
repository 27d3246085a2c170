//! Time window scheduler
//!
//! Evaluates ON windows against the wall clock on a slow cadence and tells
//! the caller when the animation should start or stop.

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::error::ConfigError;
use crate::math::is_after;

/// Maximum number of schedule rules.
pub const MAX_SCHEDULE_RULES: usize = 8;

/// Default interval between schedule evaluations.
pub const DEFAULT_SCHEDULE_INTERVAL: Duration = Duration::from_secs(10);

/// Wall clock hour and minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub const fn is_valid(self) -> bool {
        self.hour < 24 && self.minute < 60
    }
}

/// A single ON window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ScheduleRule {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleRule {
    pub const fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Returns true if `now` is at or after the start and before the end.
    pub const fn contains(self, now: TimeOfDay) -> bool {
        is_after(now, self.start) && !is_after(now, self.end)
    }

    /// Returns true if `now` is at or after the end.
    pub const fn has_ended(self, now: TimeOfDay) -> bool {
        is_after(now, self.end)
    }

    /// Returns true if the window ends before it starts.
    ///
    /// Such windows never match: the comparison works within a single day.
    pub const fn crosses_midnight(self) -> bool {
        !is_after(self.end, self.start)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for time in [self.start, self.end] {
            if !time.is_valid() {
                return Err(ConfigError::InvalidTimeOfDay {
                    hour: time.hour,
                    minute: time.minute,
                });
            }
        }
        Ok(self)
    }
}

/// What the animation should do after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    /// A window has opened
    Start(ScheduleRule),
    /// The active window has closed
    Stop(ScheduleRule),
    /// Nothing changed
    Idle,
}

/// Scheduler over a fixed set of ON windows.
#[derive(Debug, Clone)]
pub struct Scheduler {
    rules: Vec<ScheduleRule, MAX_SCHEDULE_RULES>,
    enabled: bool,
    active: Option<ScheduleRule>,
    interval: Duration,
    next_check: Option<Instant>,
}

impl Scheduler {
    /// Create a scheduler from the configured rules.
    ///
    /// When `enabled` is false the rules are kept but never evaluated.
    pub fn new(
        rules: &[ScheduleRule],
        enabled: bool,
        interval: Duration,
    ) -> Result<Self, ConfigError> {
        let mut stored = Vec::new();
        for rule in rules {
            stored
                .push(rule.validate()?)
                .map_err(|_| ConfigError::TooManyRules {
                    max: MAX_SCHEDULE_RULES,
                })?;
        }
        Ok(Self {
            rules: stored,
            enabled,
            active: None,
            interval,
            next_check: None,
        })
    }

    /// Returns true if the animation should simply run forever.
    pub fn is_unscheduled(&self) -> bool {
        !self.enabled || self.rules.is_empty()
    }

    pub fn rules(&self) -> &[ScheduleRule] {
        &self.rules
    }

    /// Currently matched window, if any.
    pub const fn active_rule(&self) -> Option<ScheduleRule> {
        self.active
    }

    /// Evaluate the rules if the check interval has elapsed.
    pub fn poll(&mut self, now: Instant, clock: TimeOfDay) -> ScheduleAction {
        if self.is_unscheduled() {
            return ScheduleAction::Idle;
        }
        if self.next_check.is_some_and(|next| now < next) {
            return ScheduleAction::Idle;
        }
        self.next_check = Some(now + self.interval);
        self.evaluate(clock)
    }

    /// Time left until the next evaluation is due.
    pub fn until_next_check(&self, now: Instant) -> Option<Duration> {
        if self.is_unscheduled() {
            return None;
        }
        Some(
            self.next_check
                .map_or(Duration::from_millis(0), |next| {
                    next.saturating_duration_since(now)
                }),
        )
    }

    /// Evaluate the rules against the wall clock immediately.
    ///
    /// While no window is active the first matching rule becomes active.
    /// While a window is active only its end is checked.
    pub fn evaluate(&mut self, clock: TimeOfDay) -> ScheduleAction {
        if let Some(rule) = self.active {
            if rule.has_ended(clock) {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[schedule] window {:02}:{:02}-{:02}:{:02} closed",
                    rule.start.hour, rule.start.minute, rule.end.hour, rule.end.minute
                );
                self.active = None;
                return ScheduleAction::Stop(rule);
            }
            return ScheduleAction::Idle;
        }

        let Some(rule) = self.rules.iter().copied().find(|rule| rule.contains(clock)) else {
            return ScheduleAction::Idle;
        };
        #[cfg(feature = "esp32-log")]
        println!(
            "[schedule] window {:02}:{:02}-{:02}:{:02} opened",
            rule.start.hour, rule.start.minute, rule.end.hour, rule.end.minute
        );
        self.active = Some(rule);
        ScheduleAction::Start(rule)
    }

    /// Forget the active window, e.g. after a shutdown.
    pub fn clear(&mut self) {
        self.active = None;
    }
}
