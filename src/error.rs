use core::fmt;

/// Errors detected while building the animation from its configuration.
///
/// All of them are fatal: the animation never starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Strip length is zero
    MissingStripLength,
    /// Strip is longer than the compiled-in frame capacity
    StripTooLong { length: usize, max: usize },
    /// No emitters are configured
    NoEmitters,
    /// More emitters than the compiled-in capacity
    TooManyEmitters { max: usize },
    /// Width must be a positive finite number
    InvalidWidth,
    /// Strobe period must be longer than zero
    InvalidStrobePeriod,
    /// More schedule rules than the compiled-in capacity
    TooManyRules { max: usize },
    /// Hour or minute out of range
    InvalidTimeOfDay { hour: u8, minute: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStripLength => write!(f, "strip length is missing"),
            Self::StripTooLong { length, max } => {
                write!(f, "strip length {length} exceeds capacity of {max} leds")
            }
            Self::NoEmitters => write!(f, "no emitters configured"),
            Self::TooManyEmitters { max } => write!(f, "more than {max} emitters configured"),
            Self::InvalidWidth => write!(f, "width must be positive"),
            Self::InvalidStrobePeriod => write!(f, "strobe period must be positive"),
            Self::TooManyRules { max } => write!(f, "more than {max} schedule rules configured"),
            Self::InvalidTimeOfDay { hour, minute } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
