//! Blend pipeline
//!
//! Each pixel starts black and every emitter's contribution is folded into
//! it in declaration order using the emitter's [`BlendMode`]. Some modes are
//! not commutative, so the order of emitters matters.
//!
//! Intermediate values are not clamped. Dodge and Burn can divide by zero,
//! the resulting infinities or `NaN`s propagate until the final clamp in
//! [`Rgbf::to_rgb`].

use crate::color::Rgbf;

const BLEND_NAME_SUM: &str = "sum";
const BLEND_NAME_AVERAGE: &str = "average";
const BLEND_NAME_MULTIPLY: &str = "multiply";
const BLEND_NAME_DODGE: &str = "dodge";
const BLEND_NAME_BURN: &str = "burn";
const BLEND_NAME_REPLACE: &str = "replace";
const BLEND_NAME_SHIFT: &str = "default";

/// Numeric policy used to combine a contribution into the running pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlendMode {
    /// `base + contribution`
    #[default]
    Sum,
    /// `(base + contribution) / 2`
    Average,
    /// `base * contribution`
    Multiply,
    /// `base / (1 - contribution / 255)`
    Dodge,
    /// `(1 - contribution / 255) / base`
    Burn,
    /// Contribution where it is non-zero, base elsewhere
    Replace,
    /// Shift the base towards a brighter contribution.
    ///
    /// Externally named `default`.
    #[cfg_attr(feature = "serde", serde(rename = "default"))]
    Shift,
}

impl BlendMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => BLEND_NAME_SUM,
            Self::Average => BLEND_NAME_AVERAGE,
            Self::Multiply => BLEND_NAME_MULTIPLY,
            Self::Dodge => BLEND_NAME_DODGE,
            Self::Burn => BLEND_NAME_BURN,
            Self::Replace => BLEND_NAME_REPLACE,
            Self::Shift => BLEND_NAME_SHIFT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            BLEND_NAME_SUM => Some(Self::Sum),
            BLEND_NAME_AVERAGE => Some(Self::Average),
            BLEND_NAME_MULTIPLY => Some(Self::Multiply),
            BLEND_NAME_DODGE => Some(Self::Dodge),
            BLEND_NAME_BURN => Some(Self::Burn),
            BLEND_NAME_REPLACE => Some(Self::Replace),
            BLEND_NAME_SHIFT => Some(Self::Shift),
            _ => None,
        }
    }
}

/// Combine `contribution` into `base`.
pub fn blend(mode: BlendMode, base: Rgbf, contribution: Rgbf) -> Rgbf {
    match mode {
        BlendMode::Sum => base.zip(contribution, |b, c| b + c),
        BlendMode::Average => base.zip(contribution, |b, c| (b + c) / 2.0),
        BlendMode::Multiply => base.zip(contribution, |b, c| b * c),
        BlendMode::Dodge => base.zip(contribution, |b, c| b / (1.0 - c / 255.0)),
        BlendMode::Burn => base.zip(contribution, |b, c| (1.0 - c / 255.0) / b),
        BlendMode::Replace => base.zip(contribution, |b, c| if c > 0.0 { c } else { b }),
        BlendMode::Shift => shift(base, contribution),
    }
}

/// Fold `(mode, contribution)` pairs into one pixel, starting from black.
pub fn fold(contributions: impl IntoIterator<Item = (BlendMode, Rgbf)>) -> Rgbf {
    contributions
        .into_iter()
        .fold(Rgbf::BLACK, |acc, (mode, color)| blend(mode, acc, color))
}

fn shift(base: Rgbf, contribution: Rgbf) -> Rgbf {
    let difference = contribution.brightness() - base.brightness();
    if difference <= 0.0 {
        return base;
    }
    let amount = difference / (3.0 * 255.0);
    base.zip(contribution, |b, c| b + (c - b) * amount)
}
