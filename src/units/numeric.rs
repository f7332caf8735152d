use super::ConversionError;
use super::models::DisplayUnitValue;
use super::registry::{base_unit_for_display_unit, lookup};
use super::storage::round_half_up;
use once_cell::sync::Lazy;
use regex::Regex;

// Longest numeric prefix, the way form inputs are read.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("numeric prefix pattern")
});

/// Raw form field content: already a number, or text still to be read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for NumericInput<'_> {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(value: &'a str) -> Self {
        NumericInput::Text(value)
    }
}

/// Reads a number from user input. Text is read up to the first character
/// that cannot continue a number, so `"12.5 m"` gives `12.5`.
pub fn parse_numeric_value<'a>(input: impl Into<NumericInput<'a>>) -> Result<f64, ConversionError> {
    let text = match input.into() {
        NumericInput::Number(value) => return Ok(value),
        NumericInput::Text(text) => text,
    };
    let trimmed = text.trim_start();
    NUMERIC_PREFIX
        .find(trimmed)
        .and_then(|found| found.as_str().parse::<f64>().ok())
        .ok_or_else(|| ConversionError::InvalidNumber(text.to_string()))
}

pub fn is_decimal_value(value: f64) -> bool {
    value % 1.0 != 0.0
}

pub fn format_unit_value(value: &DisplayUnitValue, decimals: usize) -> String {
    format!("{:.*} {}", decimals, value.value, value.unit)
}

/// Message shown under an input once it has been read.
pub fn create_conversion_warning(original: &str, parsed: f64, unit: &str, is_decimal: bool) -> String {
    if !is_decimal {
        return format!("Value '{original}' interpreted as {parsed} {unit}.");
    }
    let factor = lookup(unit).map(|def| def.scale_factor()).unwrap_or(1.0);
    let scaled = round_half_up(parsed * factor);
    let base = base_unit_for_display_unit(unit);
    format!(
        "Unit conversion notice: '{original}' {unit} will be stored as {scaled:.0} {base} \
         (Unit-Safe BigInt). Decimals are preserved; values remain editable."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pass_through() {
        assert_eq!(parse_numeric_value(3.25), Ok(3.25));
    }

    #[test]
    fn text_reads_leading_number() {
        assert_eq!(parse_numeric_value("555.7"), Ok(555.7));
        assert_eq!(parse_numeric_value("  -12.5 m"), Ok(-12.5));
        assert_eq!(parse_numeric_value(".5"), Ok(0.5));
        assert_eq!(parse_numeric_value("1e3ft"), Ok(1000.0));
        assert_eq!(parse_numeric_value("7."), Ok(7.0));
        assert_eq!(parse_numeric_value("Infinity"), Ok(f64::INFINITY));
    }

    #[test]
    fn text_without_number_is_rejected() {
        assert_eq!(
            parse_numeric_value("abc"),
            Err(ConversionError::InvalidNumber("abc".into()))
        );
        assert!(parse_numeric_value("").is_err());
        assert!(parse_numeric_value("-").is_err());
        assert!(parse_numeric_value("m 12").is_err());
    }

    #[test]
    fn decimal_detection() {
        assert!(is_decimal_value(555.7));
        assert!(!is_decimal_value(555.0));
        assert!(!is_decimal_value(-3.0));
    }

    #[test]
    fn formatting() {
        let value = DisplayUnitValue::new(3.14159, "m");
        assert_eq!(format_unit_value(&value, 2), "3.14 m");
        assert_eq!(format_unit_value(&value, 0), "3 m");
    }

    #[test]
    fn conversion_notice_names_base_unit() {
        assert_eq!(
            create_conversion_warning("555.7", 555.7, "m2", true),
            "Unit conversion notice: '555.7' m2 will be stored as 5557000 cm2 (Unit-Safe BigInt). \
             Decimals are preserved; values remain editable."
        );
        assert_eq!(
            create_conversion_warning("0.125", 0.125, "m", true),
            "Unit conversion notice: '0.125' m will be stored as 13 cm (Unit-Safe BigInt). \
             Decimals are preserved; values remain editable."
        );
        assert_eq!(
            create_conversion_warning("12", 12.0, "ft", false),
            "Value '12' interpreted as 12 ft."
        );
    }
}
