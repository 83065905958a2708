//! Tally Core
//!
//! The logic behind the numeric entry control, independent of any renderer:
//!
//! - **Numeric Input**: a raw, locale-independent digit string driven by keystrokes
//! - **Formatting**: grouping/decimal separators and fraction digit bounds
//! - **String Diffing**: where the formatted display stops matching what was typed
//! - **Configuration**: serde/TOML-backed formatter presets
//!
//! # Example
//!
//! ```rust
//! use tally_core::{DisplayFormatter, FormatterConfig, NumericInput};
//!
//! let mut input = NumericInput::new(FormatterConfig::decimal()).unwrap();
//! for key in ["1", "2", "3", "4", ".", "5"] {
//!     input.insert(key).unwrap();
//! }
//!
//! let display = DisplayFormatter::format(input.raw(), input.config(), input.cursor()).unwrap();
//! assert_eq!(input.raw(), "1234.5");
//! assert_eq!(display, "1,234.50");
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod input;

pub use config::FormatterConfig;
pub use diff::first_divergence;
pub use error::{ConfigError, FormatError, InputError};
pub use format::{DisplayFormatter, NumberFormatter};
pub use input::{EditCursor, Keystroke, NumericInput, DEFAULT_TEXT};
