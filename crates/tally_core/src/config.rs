//! Formatter configuration presets.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// How raw values are rendered and which keystrokes they accept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Inserted between digit groups of the integer part. Empty disables grouping.
    pub grouping_separator: String,
    /// Number of integer digits per group.
    pub grouping_size: usize,
    /// Separates the integer part from the fraction; also the keyboard's decimal key.
    pub decimal_separator: String,
    /// Fraction digits always shown (padded with zeros).
    pub min_fraction_digits: usize,
    /// Fraction digits that may be entered and shown.
    pub max_fraction_digits: usize,
    /// Whether the decimal separator may be entered at all.
    pub allows_floats: bool,
    /// Drop the fractional part of the display while the integer part is edited.
    pub hide_decimals_if_integral: bool,
    /// Largest value the raw input may represent.
    pub maximum_value: f64,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self::decimal()
    }
}

impl FormatterConfig {
    /// `1,234.56` style with two fixed fraction digits.
    pub fn decimal() -> Self {
        Self {
            grouping_separator: ",".to_string(),
            grouping_size: 3,
            decimal_separator: ".".to_string(),
            min_fraction_digits: 2,
            max_fraction_digits: 2,
            allows_floats: true,
            hide_decimals_if_integral: true,
            maximum_value: 9_999_999_999_999.99,
        }
    }

    /// Whole numbers only; the decimal key is disabled.
    pub fn integer() -> Self {
        Self {
            min_fraction_digits: 0,
            max_fraction_digits: 0,
            allows_floats: false,
            ..Self::decimal()
        }
    }

    /// `1.234,56` style.
    pub fn european() -> Self {
        Self {
            grouping_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            ..Self::decimal()
        }
    }

    /// Parse a config from TOML; missing keys fall back to [`FormatterConfig::decimal`].
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the state machine and reconciler rely on.
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(first) = self.decimal_separator.chars().next() else {
            return Err(ConfigError::EmptyDecimalSeparator);
        };
        if self.grouping_separator.contains(first) {
            return Err(ConfigError::SeparatorCollision {
                grouping: self.grouping_separator.clone(),
                decimal: self.decimal_separator.clone(),
            });
        }
        if self.min_fraction_digits > self.max_fraction_digits {
            return Err(ConfigError::FractionDigitRange {
                min: self.min_fraction_digits,
                max: self.max_fraction_digits,
            });
        }
        if !self.maximum_value.is_finite() || self.maximum_value < 0.0 {
            return Err(ConfigError::InvalidMaximum(self.maximum_value));
        }
        Ok(())
    }

    /// Whether a decimal separator keystroke can ever be accepted.
    pub fn accepts_fraction(&self) -> bool {
        self.allows_floats && self.max_fraction_digits > 0
    }

    /// Fraction digit bounds as rendered; zero when floats are disallowed.
    pub fn fraction_digits(&self) -> (usize, usize) {
        if self.allows_floats {
            (self.min_fraction_digits, self.max_fraction_digits)
        } else {
            (0, 0)
        }
    }

    pub fn with_grouping_separator(mut self, separator: impl Into<String>) -> Self {
        self.grouping_separator = separator.into();
        self
    }

    pub fn with_grouping_size(mut self, size: usize) -> Self {
        self.grouping_size = size;
        self
    }

    pub fn with_decimal_separator(mut self, separator: impl Into<String>) -> Self {
        self.decimal_separator = separator.into();
        self
    }

    /// Set min and max fraction digits.
    pub fn with_fraction_digits(mut self, min: usize, max: usize) -> Self {
        self.min_fraction_digits = min;
        self.max_fraction_digits = max;
        self
    }

    pub fn with_floats(mut self, allows_floats: bool) -> Self {
        self.allows_floats = allows_floats;
        self
    }

    pub fn with_hide_decimals_if_integral(mut self, hide: bool) -> Self {
        self.hide_decimals_if_integral = hide;
        self
    }

    pub fn with_maximum_value(mut self, maximum: f64) -> Self {
        self.maximum_value = maximum;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(FormatterConfig::decimal().validate().is_ok());
        assert!(FormatterConfig::integer().validate().is_ok());
        assert!(FormatterConfig::european().validate().is_ok());
    }

    #[test]
    fn test_separator_collision_rejected() {
        let config = FormatterConfig::decimal().with_grouping_separator(".");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SeparatorCollision { .. })
        ));

        // Only the decimal separator's first character matters
        let config = FormatterConfig::decimal()
            .with_grouping_separator(" ,")
            .with_decimal_separator(",x");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_decimal_separator_rejected() {
        let config = FormatterConfig::decimal().with_decimal_separator("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDecimalSeparator)
        ));
    }

    #[test]
    fn test_fraction_range_rejected() {
        let config = FormatterConfig::decimal().with_fraction_digits(3, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_uses_defaults() {
        let config = FormatterConfig::from_toml_str(
            r#"
            grouping_separator = " "
            decimal_separator = ","
            max_fraction_digits = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.grouping_separator, " ");
        assert_eq!(config.decimal_separator, ",");
        assert_eq!(config.max_fraction_digits, 3);
        assert_eq!(config.min_fraction_digits, 2);
        assert_eq!(config.grouping_size, 3);
        assert!(config.allows_floats);
    }

    #[test]
    fn test_from_toml_validates() {
        let result = FormatterConfig::from_toml_str(r#"grouping_separator = ".""#);
        assert!(matches!(result, Err(ConfigError::SeparatorCollision { .. })));

        let result = FormatterConfig::from_toml_str("maximum_value = \"lots\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_integer_preset_disallows_fraction() {
        let config = FormatterConfig::integer();
        assert!(!config.accepts_fraction());
        assert_eq!(config.fraction_digits(), (0, 0));
    }
}
