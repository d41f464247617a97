use serde::{Deserialize, Serialize};

use crate::config::UtilsConfig;
use crate::i18n::Language;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
const SIZE_THRESHOLD: f64 = 1024.0;
const MAX_PRECISION: i32 = 12;

/// A number paired with its short display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub number: i64,
    pub format: String,
}

/// Number formatting functions
pub struct FormatUtils;

impl FormatUtils {
    /// Format a byte count: `50486525485.0` => `"47.02 GB"`
    ///
    /// The value is rounded to `precision` decimals and always printed with
    /// two. Non-positive sizes render as `"-"`; a precision of zero or less
    /// means 2.
    pub fn number_size(bytes: f64, precision: i32) -> String {
        let precision = if precision <= 0 { 2 } else { precision.min(MAX_PRECISION) };

        if bytes.is_nan() || bytes <= 0.0 {
            return "-".to_string();
        }

        let mut size = bytes;
        let mut unit_index = 0;

        while size >= SIZE_THRESHOLD && unit_index < SIZE_UNITS.len() - 1 {
            size /= SIZE_THRESHOLD;
            unit_index += 1;
        }

        let factor = 10f64.powi(precision);
        let rounded = (size * factor).round() / factor;
        format!("{:.2} {}", rounded, SIZE_UNITS[unit_index])
    }

    /// Abbreviate large counts: `64768456` => `"64.77 M"`
    pub fn number_format_short(n: i64) -> NumberFormat {
        let value = n as f64;

        let format = if n < 900 {
            n.to_string()
        } else if n < 900_000 {
            format!("{:.2} K", value / 1e3)
        } else if n < 900_000_000 {
            format!("{:.2} M", value / 1e6)
        } else if n < 900_000_000_000 {
            format!("{:.2} B", value / 1e9)
        } else {
            format!("{:.2} T", value / 1e12)
        };

        NumberFormat { number: n, format }
    }

    /// Round to a whole number and group digits with English separators
    pub fn separate_number(number: f64) -> String {
        Self::separate_number_with(number, Language::English)
    }

    /// Round to a whole number and group digits the way `language` does
    pub fn separate_number_with(number: f64, language: Language) -> String {
        let rounded = format!("{:.0}", number);
        let (sign, digits) = match rounded.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("", rounded.as_str()),
        };

        // inf and NaN
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return rounded;
        }

        let separator = language.group_separator();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());

        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push_str(separator);
            }
            grouped.push(digit);
        }

        format!("{}{}", sign, grouped)
    }
}

/// Number formatter bound to the configured locale and size precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormatter {
    locale: Language,
    precision: i32,
}

impl NumberFormatter {
    pub fn new(config: &UtilsConfig) -> Self {
        Self {
            locale: config.locale,
            precision: config.number_size_precision,
        }
    }

    pub fn locale(&self) -> Language {
        self.locale
    }

    pub fn number_size(&self, bytes: f64) -> String {
        FormatUtils::number_size(bytes, self.precision)
    }

    pub fn separate_number(&self, number: f64) -> String {
        FormatUtils::separate_number_with(number, self.locale)
    }
}

impl Default for NumberFormatter {
    fn default() -> Self {
        Self::new(&UtilsConfig::default())
    }
}
