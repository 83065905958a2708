//! Tally Widgets
//!
//! The numeric entry control and its on-screen keyboard.
//!
//! # Example
//!
//! ```rust
//! use tally_core::FormatterConfig;
//! use tally_text::{FixedAdvanceMeasurer, Size};
//! use tally_widgets::{shared, Key, NumberEntryField, NumericKeyboard};
//!
//! let measurer = FixedAdvanceMeasurer::default();
//! let mut field = NumberEntryField::new(FormatterConfig::decimal(), measurer).unwrap();
//! field.set_frame(Size::new(320.0, 64.0)).unwrap();
//! let field = shared(field);
//!
//! let mut keyboard = NumericKeyboard::new();
//! keyboard.attach(&field);
//! for key in [Key::Digit(1), Key::Digit(2), Key::DecimalSeparator, Key::Digit(5)] {
//!     keyboard.press(key).unwrap();
//! }
//!
//! assert_eq!(field.borrow().displayed_string(), "12.50");
//! ```

pub mod error;
pub mod field;
pub mod keyboard;

pub use error::{FieldError, Result};
pub use field::{EntryFieldConfig, FocusChange, NumberEntryField};
pub use keyboard::{shared, Key, NumericKeyboard, SharedField};
