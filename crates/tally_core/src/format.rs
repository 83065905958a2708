//! Number formatting
//!
//! [`NumberFormatter`] renders an `f64` with separators and fraction bounds.
//! [`DisplayFormatter`] turns the raw keystroke string into the string the
//! control shows.

use crate::config::FormatterConfig;
use crate::error::FormatError;
use crate::input::EditCursor;

/// Decimal separator used internally when reading raw values back as numbers
const INTERNAL_DECIMAL_SEPARATOR: &str = ".";

/// Renders numbers with grouping and fraction digit bounds
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatter {
    pub grouping_separator: String,
    pub grouping_size: usize,
    pub decimal_separator: String,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
}

impl NumberFormatter {
    /// Build a formatter from the rendering half of a config
    pub fn from_config(config: &FormatterConfig) -> Self {
        let (min_fraction_digits, max_fraction_digits) = config.fraction_digits();
        Self {
            grouping_separator: config.grouping_separator.clone(),
            grouping_size: config.grouping_size,
            decimal_separator: config.decimal_separator.clone(),
            min_fraction_digits,
            max_fraction_digits,
        }
    }

    /// Format a value, rounding to `max_fraction_digits` and trimming
    /// trailing zeros down to `min_fraction_digits`.
    pub fn format(&self, value: f64) -> String {
        let rendered = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (integer, fraction) = rendered
            .split_once(INTERNAL_DECIMAL_SEPARATOR)
            .unwrap_or((rendered.as_str(), ""));

        let mut fraction = fraction.to_string();
        while fraction.len() > self.min_fraction_digits && fraction.ends_with('0') {
            fraction.pop();
        }

        let mut result = String::with_capacity(rendered.len() + 8);
        if value.is_sign_negative() && value != 0.0 {
            result.push('-');
        }
        result.push_str(&self.group(integer));
        if !fraction.is_empty() {
            result.push_str(&self.decimal_separator);
            result.push_str(&fraction);
        }
        result
    }

    fn group(&self, digits: &str) -> String {
        if self.grouping_size == 0 || self.grouping_separator.is_empty() {
            return digits.to_string();
        }

        let count = digits.chars().count();
        let mut grouped = String::with_capacity(digits.len() * 2);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (count - i) % self.grouping_size == 0 {
                grouped.push_str(&self.grouping_separator);
            }
            grouped.push(c);
        }
        grouped
    }
}

/// Derives the displayed string from a raw value
pub struct DisplayFormatter;

impl DisplayFormatter {
    /// Read a raw value as a number. The raw value uses the configured
    /// decimal separator; an empty raw value is zero.
    pub fn parse(raw: &str, config: &FormatterConfig) -> Result<f64, FormatError> {
        if raw.is_empty() {
            return Ok(0.0);
        }

        let invalid = || FormatError::InvalidFormat(raw.to_string());

        let mut parts = raw.split(config.decimal_separator.as_str());
        let integer = parts.next().unwrap_or_default();
        let fraction = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(integer) || !all_digits(fraction) {
            return Err(invalid());
        }

        let normalized = format!(
            "{}{}{}",
            if integer.is_empty() { "0" } else { integer },
            INTERNAL_DECIMAL_SEPARATOR,
            if fraction.is_empty() { "0" } else { fraction },
        );
        normalized.parse::<f64>().map_err(|_| invalid())
    }

    /// Format a raw value for display.
    ///
    /// With `hide_decimals_if_integral` set and no fraction digit being edited,
    /// everything from the decimal separator on is dropped.
    pub fn format(
        raw: &str,
        config: &FormatterConfig,
        cursor: EditCursor,
    ) -> Result<String, FormatError> {
        let value = Self::parse(raw, config)?;
        let mut rendered = NumberFormatter::from_config(config).format(value);

        if config.hide_decimals_if_integral && cursor.is_none() {
            if let Some(at) = rendered.find(config.decimal_separator.as_str()) {
                rendered.truncate(at);
            }
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_decimals() -> FormatterConfig {
        FormatterConfig::decimal().with_hide_decimals_if_integral(false)
    }

    #[test]
    fn test_number_formatter_groups_integer_part() {
        let formatter = NumberFormatter::from_config(&FormatterConfig::decimal());
        assert_eq!(formatter.format(0.0), "0.00");
        assert_eq!(formatter.format(999.0), "999.00");
        assert_eq!(formatter.format(1234.5), "1,234.50");
        assert_eq!(formatter.format(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_number_formatter_trims_to_min_fraction() {
        let config = FormatterConfig::decimal().with_fraction_digits(0, 3);
        let formatter = NumberFormatter::from_config(&config);
        assert_eq!(formatter.format(12.0), "12");
        assert_eq!(formatter.format(12.5), "12.5");
        assert_eq!(formatter.format(12.125), "12.125");
    }

    #[test]
    fn test_number_formatter_custom_separators() {
        let formatter = NumberFormatter::from_config(&FormatterConfig::european());
        assert_eq!(formatter.format(1234567.5), "1.234.567,50");

        let config = FormatterConfig::decimal()
            .with_grouping_separator("\u{a0}")
            .with_grouping_size(4);
        let formatter = NumberFormatter::from_config(&config);
        assert_eq!(formatter.format(123456.0), "12\u{a0}3456.00");
    }

    #[test]
    fn test_number_formatter_without_floats() {
        let formatter = NumberFormatter::from_config(&FormatterConfig::integer());
        assert_eq!(formatter.format(1234.0), "1,234");
    }

    #[test]
    fn test_parse_raw_values() {
        let config = FormatterConfig::european();
        assert_eq!(DisplayFormatter::parse("", &config), Ok(0.0));
        assert_eq!(DisplayFormatter::parse("12", &config), Ok(12.0));
        assert_eq!(DisplayFormatter::parse("12,", &config), Ok(12.0));
        assert_eq!(DisplayFormatter::parse("12,5", &config), Ok(12.5));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let config = FormatterConfig::decimal();
        assert!(DisplayFormatter::parse("1.2.3", &config).is_err());
        assert!(DisplayFormatter::parse("1x", &config).is_err());
    }

    #[test]
    fn test_format_hides_decimals_while_editing_integer() {
        let config = FormatterConfig::decimal();
        assert_eq!(DisplayFormatter::format("1234", &config, None).unwrap(), "1,234");
        assert_eq!(DisplayFormatter::format("", &config, None).unwrap(), "0");
        assert_eq!(
            DisplayFormatter::format("1234.", &config, Some(0)).unwrap(),
            "1,234.00"
        );
    }

    #[test]
    fn test_format_shows_padding() {
        let config = show_decimals();
        assert_eq!(DisplayFormatter::format("12", &config, None).unwrap(), "12.00");
        assert_eq!(
            DisplayFormatter::format("12.3", &config, Some(1)).unwrap(),
            "12.30"
        );
    }

    #[test]
    fn test_format_invalid_raw() {
        let config = FormatterConfig::decimal();
        assert_eq!(
            DisplayFormatter::format("1.2.3", &config, None),
            Err(FormatError::InvalidFormat("1.2.3".to_string()))
        );
    }
}
