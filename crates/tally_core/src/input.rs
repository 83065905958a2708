//! Numeric input state machine
//!
//! Keeps the raw value exactly as typed (digits plus at most one decimal
//! separator) and which part is being edited:
//!
//! ```text
//!   None ──separator──► Some(0) ──digit──► Some(1) ──digit──► ... Some(max)
//!    ▲                     │                  │
//!    └──────backspace──────┘◄───backspace─────┘
//! ```
//!
//! Rejected keystrokes return an [`InputError`] and leave the state untouched.

use crate::config::FormatterConfig;
use crate::error::{ConfigResult, InputError};
use crate::format::DisplayFormatter;

/// The placeholder shown for an empty value, and the digit synthesized when
/// the decimal separator is typed first.
pub const DEFAULT_TEXT: &str = "0";

/// `None` while the integer part is edited, otherwise the index of the
/// fraction digit to be typed next.
pub type EditCursor = Option<usize>;

/// A discrete key event from the numeric keyboard
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    /// A digit 0-9
    Digit(u8),
    /// The configured decimal separator
    DecimalSeparator,
    /// Remove the last entered character
    DeleteBackward,
}

/// Raw value, edit cursor and the config constraining them
#[derive(Clone, Debug)]
pub struct NumericInput {
    raw: String,
    cursor: EditCursor,
    config: FormatterConfig,
}

impl NumericInput {
    /// Create an empty input. Fails if the config is inconsistent.
    pub fn new(config: FormatterConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            raw: String::new(),
            cursor: None,
            config,
        })
    }

    /// The raw value as typed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn cursor(&self) -> EditCursor {
        self.cursor
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Whether anything has been entered
    pub fn has_text(&self) -> bool {
        !self.raw.is_empty()
    }

    /// Numeric value of the raw string; zero when empty.
    pub fn value(&self) -> f64 {
        // The raw value only ever holds digits and one separator.
        DisplayFormatter::parse(&self.raw, &self.config).unwrap_or(0.0)
    }

    /// Apply a keystroke
    pub fn apply(&mut self, keystroke: Keystroke) -> Result<(), InputError> {
        match keystroke {
            Keystroke::Digit(digit) if digit <= 9 => {
                let text = char::from(b'0' + digit).to_string();
                self.insert(&text)
            }
            Keystroke::Digit(digit) => Err(InputError::InvalidInput(digit.to_string())),
            Keystroke::DecimalSeparator => {
                let separator = self.config.decimal_separator.clone();
                self.insert(&separator)
            }
            Keystroke::DeleteBackward => self.delete_backward(),
        }
    }

    /// Insert a single digit or the decimal separator.
    pub fn insert(&mut self, input: &str) -> Result<(), InputError> {
        let is_separator = input == self.config.decimal_separator;
        let digit = parse_digit(input);
        if !is_separator && digit.is_none() {
            return Err(InputError::InvalidInput(input.to_string()));
        }

        match self.cursor {
            Some(position) => self.insert_fraction(input, is_separator, position),
            None if is_separator => self.insert_separator(input),
            None => self.insert_integer_digit(input),
        }
    }

    fn insert_fraction(
        &mut self,
        input: &str,
        is_separator: bool,
        position: usize,
    ) -> Result<(), InputError> {
        if is_separator {
            return Err(InputError::SecondSeparator);
        }
        if position >= self.config.max_fraction_digits {
            return Err(InputError::FractionDigitsExceeded {
                max: self.config.max_fraction_digits,
            });
        }

        let candidate = format!("{}{}", self.raw, input);
        self.check_maximum(&candidate)?;

        self.raw = candidate;
        self.cursor = Some(position + 1);
        Ok(())
    }

    fn insert_separator(&mut self, separator: &str) -> Result<(), InputError> {
        if !self.config.accepts_fraction() {
            return Err(InputError::FloatsNotAllowed);
        }

        if self.raw.is_empty() {
            self.insert_integer_digit(DEFAULT_TEXT)?;
        }

        self.raw.push_str(separator);
        self.cursor = Some(0);
        Ok(())
    }

    fn insert_integer_digit(&mut self, digit: &str) -> Result<(), InputError> {
        // No leading zeros: a lone "0" is replaced by the next digit
        let candidate = if self.raw == DEFAULT_TEXT {
            digit.to_string()
        } else {
            format!("{}{}", self.raw, digit)
        };
        self.check_maximum(&candidate)?;

        self.raw = candidate;
        Ok(())
    }

    /// Reject a candidate raw value whose number exceeds the maximum.
    ///
    /// Both sides are parsed decimals, so no tiny power-of-ten factor is ever
    /// multiplied in.
    fn check_maximum(&self, candidate: &str) -> Result<(), InputError> {
        let value = DisplayFormatter::parse(candidate, &self.config)
            .map_err(|_| InputError::InvalidInput(candidate.to_string()))?;
        if value > self.config.maximum_value {
            return Err(InputError::MaximumExceeded {
                max: self.config.maximum_value,
            });
        }
        Ok(())
    }

    /// Remove the last entered character.
    pub fn delete_backward(&mut self) -> Result<(), InputError> {
        if self.raw.is_empty() {
            return Err(InputError::EmptyValue);
        }

        match self.cursor {
            Some(0) => {
                // The separator itself, whatever its length
                let separator_len = self.config.decimal_separator.len();
                if self.raw.ends_with(self.config.decimal_separator.as_str()) {
                    self.raw.truncate(self.raw.len() - separator_len);
                } else {
                    self.raw.pop();
                }
                self.cursor = None;
            }
            Some(position) => {
                self.raw.pop();
                self.cursor = Some(position - 1);
            }
            None => {
                self.raw.pop();
            }
        }

        if self.raw.is_empty() {
            self.cursor = None;
        }
        Ok(())
    }

    /// Replace every `old` separator in the raw value with `new`.
    pub fn reencode(&mut self, old: &str, new: &str) {
        if old.is_empty() || old == new {
            return;
        }
        self.raw = self.raw.replace(old, new);
    }

    /// Swap the formatter config, carrying the raw value over.
    ///
    /// The raw value is re-encoded with the new decimal separator, then cut
    /// back to what the new config can represent.
    pub fn set_config(&mut self, config: FormatterConfig) -> ConfigResult<()> {
        config.validate()?;

        let old_separator = std::mem::replace(&mut self.config, config)
            .decimal_separator;
        let new_separator = self.config.decimal_separator.clone();
        self.reencode(&old_separator, &new_separator);
        tracing::debug!(
            old = %old_separator,
            new = %new_separator,
            raw = %self.raw,
            "Formatter config swapped"
        );

        self.truncate_fraction();
        Ok(())
    }

    /// Change the maximum; a raw value above it is replaced by the maximum.
    pub fn set_maximum_value(&mut self, maximum: f64) -> ConfigResult<()> {
        let config = self.config.clone().with_maximum_value(maximum);
        config.validate()?;
        self.config = config;

        if self.value() > maximum {
            let rendered = format!("{}", maximum);
            self.raw = rendered.replace('.', &self.config.decimal_separator);
            self.cursor = self.fraction_len();
            self.truncate_fraction();
            tracing::debug!(raw = %self.raw, "Raw value clamped to new maximum");
        }
        Ok(())
    }

    pub fn set_hide_decimals_if_integral(&mut self, hide: bool) {
        self.config.hide_decimals_if_integral = hide;
    }

    /// Replace the raw value wholesale. Digits and separators are validated
    /// by replaying them as keystrokes, so the invariants still hold.
    pub fn set_raw(&mut self, raw: &str) -> Result<(), InputError> {
        let mut replay = Self {
            raw: String::new(),
            cursor: None,
            config: self.config.clone(),
        };

        let separator = self.config.decimal_separator.clone();
        let mut rest = raw;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix(separator.as_str()) {
                replay.insert(&separator)?;
                rest = after;
            } else {
                let mut chars = rest.chars();
                let c = chars.next().unwrap_or_default();
                replay.insert(&c.to_string())?;
                rest = chars.as_str();
            }
        }

        *self = replay;
        Ok(())
    }

    /// Empty the raw value
    pub fn clear(&mut self) {
        self.raw.clear();
        self.cursor = None;
    }

    /// Number of fraction characters after the separator, if one is present
    fn fraction_len(&self) -> Option<usize> {
        self.raw
            .split_once(self.config.decimal_separator.as_str())
            .map(|(_, fraction)| fraction.chars().count())
    }

    /// Drop fraction digits the config no longer permits
    fn truncate_fraction(&mut self) {
        let Some(at) = self.raw.find(self.config.decimal_separator.as_str()) else {
            self.cursor = None;
            return;
        };

        if !self.config.accepts_fraction() {
            self.raw.truncate(at);
            self.cursor = None;
            return;
        }

        let fraction_start = at + self.config.decimal_separator.len();
        let max = self.config.max_fraction_digits;
        let kept: String = self.raw[fraction_start..].chars().take(max).collect();
        self.raw.truncate(fraction_start);
        self.raw.push_str(&kept);
        self.cursor = Some(kept.chars().count());
    }
}

fn parse_digit(input: &str) -> Option<u8> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(config: FormatterConfig) -> NumericInput {
        NumericInput::new(config).unwrap()
    }

    fn type_all(input: &mut NumericInput, keys: &[&str]) {
        for key in keys {
            input.insert(key).unwrap();
        }
    }

    #[test]
    fn test_fraction_digit_limit() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["1", "2", "3", ".", "4", "5"]);
        assert_eq!(state.raw(), "123.45");
        assert_eq!(state.cursor(), Some(2));

        assert_eq!(
            state.insert("6"),
            Err(InputError::FractionDigitsExceeded { max: 2 })
        );
        assert_eq!(state.raw(), "123.45");
        assert_eq!(state.cursor(), Some(2));
    }

    #[test]
    fn test_maximum_value_integer() {
        let mut state = input(FormatterConfig::decimal().with_maximum_value(99.0));
        type_all(&mut state, &["9", "9"]);
        assert_eq!(state.raw(), "99");

        assert_eq!(
            state.insert("9"),
            Err(InputError::MaximumExceeded { max: 99.0 })
        );
        assert_eq!(state.raw(), "99");
    }

    #[test]
    fn test_maximum_value_fraction() {
        let mut state = input(FormatterConfig::decimal().with_maximum_value(12.34));
        type_all(&mut state, &["1", "2", ".", "3"]);

        assert!(state.insert("5").is_err());
        state.insert("4").unwrap();
        assert_eq!(state.raw(), "12.34");
    }

    #[test]
    fn test_maximum_value_near_precision_limit() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["9"; 13]);
        type_all(&mut state, &[".", "9", "9"]);
        assert_eq!(state.raw(), "9999999999999.99");
        assert!(state.insert("9").is_err());
    }

    #[test]
    fn test_never_exceeds_maximum() {
        let maximum = 507.25;
        let mut state = input(FormatterConfig::decimal().with_maximum_value(maximum));
        let keys = ["5", "0", "9", "7", ".", "2", "6", "5", "1"];
        for key in keys.iter().cycle().take(40) {
            let _ = state.insert(key);
            assert!(state.value() <= maximum, "{} > {}", state.raw(), maximum);
        }
    }

    #[test]
    fn test_invalid_input_rejected() {
        let mut state = input(FormatterConfig::decimal());
        for bad in ["a", "12", "", ",", "-"] {
            assert_eq!(state.insert(bad), Err(InputError::InvalidInput(bad.to_string())));
        }
        assert_eq!(state.raw(), "");
    }

    #[test]
    fn test_separator_first_synthesizes_zero() {
        let mut state = input(FormatterConfig::decimal());
        state.insert(".").unwrap();
        assert_eq!(state.raw(), "0.");
        assert_eq!(state.cursor(), Some(0));

        assert_eq!(state.insert("."), Err(InputError::SecondSeparator));
    }

    #[test]
    fn test_separator_rejected_without_floats() {
        let mut state = input(FormatterConfig::integer());
        state.insert("4").unwrap();
        assert_eq!(state.insert("."), Err(InputError::FloatsNotAllowed));

        let mut state = input(FormatterConfig::decimal().with_fraction_digits(0, 0));
        assert_eq!(state.insert("."), Err(InputError::FloatsNotAllowed));
        assert_eq!(state.raw(), "");
    }

    #[test]
    fn test_no_leading_zeros() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["0", "0", "0"]);
        assert_eq!(state.raw(), "0");
        state.insert("7").unwrap();
        assert_eq!(state.raw(), "7");
    }

    #[test]
    fn test_delete_backward_walks_cursor() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["4", ".", "1", "2"]);

        state.delete_backward().unwrap();
        assert_eq!((state.raw(), state.cursor()), ("4.1", Some(1)));
        state.delete_backward().unwrap();
        assert_eq!((state.raw(), state.cursor()), ("4.", Some(0)));
        state.delete_backward().unwrap();
        assert_eq!((state.raw(), state.cursor()), ("4", None));
        state.delete_backward().unwrap();
        assert_eq!((state.raw(), state.cursor()), ("", None));

        assert_eq!(state.delete_backward(), Err(InputError::EmptyValue));
    }

    #[test]
    fn test_delete_then_reinsert_round_trip() {
        let mut state = input(FormatterConfig::decimal().with_fraction_digits(0, 3));
        let keys = ["3", "1", ".", "4", "1", "5"];
        for key in keys {
            state.insert(key).unwrap();
            let before = (state.raw().to_string(), state.cursor());

            state.delete_backward().unwrap();
            state.insert(key).unwrap();

            assert_eq!((state.raw().to_string(), state.cursor()), before);
        }
    }

    #[test]
    fn test_multi_char_separator_deleted_whole() {
        let config = FormatterConfig::decimal()
            .with_grouping_separator(" ")
            .with_decimal_separator("::");
        let mut state = input(config);
        type_all(&mut state, &["5", "::", "2"]);
        assert_eq!(state.raw(), "5::2");

        state.delete_backward().unwrap();
        state.delete_backward().unwrap();
        assert_eq!((state.raw(), state.cursor()), ("5", None));
    }

    #[test]
    fn test_apply_keystrokes() {
        let mut state = input(FormatterConfig::european());
        state.apply(Keystroke::Digit(8)).unwrap();
        state.apply(Keystroke::DecimalSeparator).unwrap();
        state.apply(Keystroke::Digit(5)).unwrap();
        assert_eq!(state.raw(), "8,5");
        assert_eq!(state.value(), 8.5);

        assert!(state.apply(Keystroke::Digit(10)).is_err());
        state.apply(Keystroke::DeleteBackward).unwrap();
        assert_eq!(state.raw(), "8,");
    }

    #[test]
    fn test_set_config_reencodes() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["1", ".", "5"]);

        state.set_config(FormatterConfig::european()).unwrap();
        assert_eq!(state.raw(), "1,5");
        assert_eq!(state.cursor(), Some(1));
        assert_eq!(state.value(), 1.5);
    }

    #[test]
    fn test_set_config_truncates_fraction() {
        let mut state = input(FormatterConfig::decimal().with_fraction_digits(0, 3));
        type_all(&mut state, &["1", ".", "2", "3", "4"]);

        state
            .set_config(FormatterConfig::decimal().with_fraction_digits(0, 1))
            .unwrap();
        assert_eq!((state.raw(), state.cursor()), ("1.2", Some(1)));

        state.set_config(FormatterConfig::integer()).unwrap();
        assert_eq!((state.raw(), state.cursor()), ("1", None));
    }

    #[test]
    fn test_set_config_rejects_collision() {
        let mut state = input(FormatterConfig::decimal());
        state.insert("3").unwrap();
        let bad = FormatterConfig::decimal().with_grouping_separator(".");
        assert!(state.set_config(bad).is_err());
        assert_eq!(state.config(), &FormatterConfig::decimal());
    }

    #[test]
    fn test_set_maximum_value_clamps() {
        let mut state = input(FormatterConfig::decimal());
        type_all(&mut state, &["5", "0", "0"]);

        state.set_maximum_value(123.45).unwrap();
        assert_eq!((state.raw(), state.cursor()), ("123.45", Some(2)));

        state.set_maximum_value(99.0).unwrap();
        assert_eq!((state.raw(), state.cursor()), ("99", None));

        assert!(state.set_maximum_value(-1.0).is_err());
    }

    #[test]
    fn test_set_raw_replays_keystrokes() {
        let mut state = input(FormatterConfig::decimal());
        state.set_raw("12.5").unwrap();
        assert_eq!((state.raw(), state.cursor()), ("12.5", Some(1)));

        assert!(state.set_raw("1.2.3").is_err());
        assert_eq!(state.raw(), "12.5");
    }
}
