//! Quantized value ranges and two-stage validation of typed input.
//!
//! A [`QuantizedRange`] maps between a continuous value in `[min, max]` and a
//! discrete slider position in `[0, tick_count]`, where one tick is `step`
//! value units. Both directions truncate toward the lower tick, so any value
//! between two ticks maps to the lower one.

use thiserror::Error;

/// Construction-time contract violations.
///
/// A control group is only ever built from a valid range and an in-range
/// default; these are reported up front instead of dividing by zero later.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RangeError {
    /// A bound or the step is NaN or infinite.
    #[error("range bounds and step must be finite (min {min}, max {max}, step {step})")]
    NonFinite { min: f64, max: f64, step: f64 },
    /// The step is zero or negative.
    #[error("step must be positive, got {0}")]
    NonPositiveStep(f64),
    /// `min >= max`.
    #[error("minimum {min} must be below maximum {max}")]
    EmptyRange { min: f64, max: f64 },
    /// The initial value lies outside `[min, max]`.
    #[error("default {value} lies outside [{min}, {max}]")]
    DefaultOutOfRange { value: f64, min: f64, max: f64 },
    /// `(max - min) / step` exceeds the highest slider position, `u32::MAX`.
    #[error("range needs {ticks} ticks, at most {} are supported", u32::MAX)]
    TooManyTicks { ticks: f64 },
}

/// Why a piece of typed text cannot be committed as a value.
///
/// The two stages are kept distinct even though a control group renders both
/// the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// The text is not a number at all.
    #[error("{text:?} is not a number")]
    Unparseable { text: String },
    /// The text is a number but lies outside the range (NaN included).
    #[error("{value} lies outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// An inclusive `[min, max]` range quantized into ticks of size `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizedRange {
    min: f64,
    max: f64,
    step: f64,
    ticks: u32,
}

impl QuantizedRange {
    /// Build a range, checking `min < max`, `step > 0`, finiteness, and
    /// that every tick fits a `u32` slider position.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, RangeError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(RangeError::NonFinite { min, max, step });
        }
        if step <= 0.0 {
            return Err(RangeError::NonPositiveStep(step));
        }
        if min >= max {
            return Err(RangeError::EmptyRange { min, max });
        }
        let raw = ((max - min) / step).trunc();
        if raw > f64::from(u32::MAX) {
            return Err(RangeError::TooManyTicks { ticks: raw });
        }
        let ticks = raw as u32;
        Ok(Self {
            min,
            max,
            step,
            ticks,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Highest slider position: `trunc((max - min) / step)`.
    pub fn tick_count(&self) -> u32 {
        self.ticks
    }

    /// Inclusive bounds check. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Slider position for `value`: `trunc((value - min) / step)`, clamped
    /// to `[0, tick_count]`.
    pub fn position_of(&self, value: f64) -> u32 {
        let raw = ((value - self.min) / self.step).trunc();
        if raw <= 0.0 || raw.is_nan() {
            0
        } else {
            (raw as u32).min(self.ticks)
        }
    }

    /// Value at slider `position`: `position * step + min`. Positions past
    /// the last tick are clamped, and so is a last tick that rounds past `max`.
    pub fn value_at(&self, position: u32) -> f64 {
        (f64::from(position.min(self.ticks)) * self.step + self.min).min(self.max)
    }

    /// Stage one: parse `text` as a float. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<f64, InputError> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| InputError::Unparseable {
                text: text.to_string(),
            })
    }

    /// Stage two: accept `value` only if it lies within the range.
    pub fn check(&self, value: f64) -> Result<f64, InputError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(InputError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Both stages: the value `text` denotes, if it can be committed.
    pub fn validate(&self, text: &str) -> Result<f64, InputError> {
        Self::parse(text).and_then(|value| self.check(value))
    }
}

/// Canonical text for a value: the shortest decimal that parses back to the
/// same `f64`, always with a fractional part (`5.0`, not `5`).
///
/// Magnitudes below `1e-4` or from `1e16` up use exponent form with a signed,
/// at least two-digit exponent (`1e+16`, `1.5e-07`).
pub fn format_value(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
