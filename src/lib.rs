#![no_std]

pub mod animation;
pub mod blend;
pub mod color;
pub mod composer;
pub mod config;
pub mod control;
pub mod emitter;
pub mod error;
pub mod math;
pub mod schedule;
pub mod sink;

pub use animation::{AnimationLoop, FrameResult, LoopState};
pub use blend::{BlendMode, blend};
pub use composer::{Composer, TickOutcome};
pub use config::{ComposerConfig, EmitterConfig, EmitterSettings, WaveformMode};
pub use control::{ControlChannel, ControlReceiver, ControlSender, LoopCommand};
pub use emitter::Emitter;
pub use error::ConfigError;
pub use math::{fm, is_after, scale_sine};
pub use schedule::{ScheduleAction, ScheduleRule, Scheduler, TimeOfDay};
pub use sink::{BufferedSink, StripSink};

pub use color::{Rgb, Rgbf};
pub use embassy_time::{Duration, Instant};
