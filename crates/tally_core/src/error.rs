//! Error types
//!
//! Input errors are user rejections: the state is left untouched and callers
//! are expected to log and move on. Config and format errors mean the host
//! handed us something inconsistent.

use thiserror::Error;

/// A keystroke that was not applied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("input {0:?} is neither a digit nor the decimal separator")]
    InvalidInput(String),

    #[error("a decimal separator was already entered")]
    SecondSeparator,

    #[error("at most {max} fraction digits may be entered")]
    FractionDigitsExceeded { max: usize },

    #[error("the value would exceed the maximum of {max}")]
    MaximumExceeded { max: f64 },

    #[error("the formatter does not allow fraction digits")]
    FloatsNotAllowed,

    #[error("there is nothing to delete")]
    EmptyValue,
}

/// Formatter configuration rejected by validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grouping separator {grouping:?} must not contain the decimal separator {decimal:?}")]
    SeparatorCollision { grouping: String, decimal: String },

    #[error("the decimal separator must not be empty")]
    EmptyDecimalSeparator,

    #[error("minimum fraction digits ({min}) exceed the maximum ({max})")]
    FractionDigitRange { min: usize, max: usize },

    #[error("maximum value must be a finite, non-negative number (got {0})")]
    InvalidMaximum(f64),

    #[error("failed to parse formatter config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A raw value that could not be read back as a decimal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("raw value {0:?} is not a valid decimal")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
