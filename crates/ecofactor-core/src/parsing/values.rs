use crate::error::EcofactorError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a decimal number from an imported cell.
///
/// Handles formats like:
/// - "74.1" -> 74.1
/// - "74,1" -> 74.1 (decimal comma)
/// - "1.234,5" -> 1234.5 (dot as thousands separator when a comma is present)
/// - "1e-3" -> 0.001
pub fn parse_decimal(s: &str) -> Result<Decimal, EcofactorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(EcofactorError::ParseError("empty number".into()));
    }

    let normalized = if s.contains(',') && s.contains('.') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.replace(',', ".")
    };

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| EcofactorError::ParseError(format!("invalid number '{}': {}", s, e)))
}

/// Parse an optional numeric cell: blank cells are `None`.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, EcofactorError> {
    match s.map(str::trim) {
        None | Some("") | Some("-") => Ok(None),
        Some(v) => parse_decimal(v).map(Some),
    }
}

/// Parse a year cell. Accepts "2025" and spreadsheet artifacts like "2025.0".
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let d = parse_decimal(s).ok()?;
    if d.fract().is_zero() {
        d.to_i32()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_integer() {
        assert_eq!(parse_decimal("68").unwrap(), dec!(68));
    }

    #[test]
    fn test_dot_decimal() {
        assert_eq!(parse_decimal("74.1").unwrap(), dec!(74.1));
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_decimal("74,1").unwrap(), dec!(74.1));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_decimal("1.234,5").unwrap(), dec!(1234.5));
    }

    #[test]
    fn test_scientific() {
        assert_eq!(parse_decimal("1e-3").unwrap(), dec!(0.001));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_decimal("  0,6  ").unwrap(), dec!(0.6));
    }

    #[test]
    fn test_negative() {
        assert_eq!(parse_decimal("-3").unwrap(), dec!(-3));
    }

    #[test]
    fn test_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(parse_optional_decimal(None).unwrap(), None);
        assert_eq!(parse_optional_decimal(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_decimal(Some("3,0")).unwrap(), Some(dec!(3.0)));
    }

    #[test]
    fn test_year() {
        assert_eq!(parse_year("2025"), Some(2025));
        assert_eq!(parse_year("2025.0"), Some(2025));
        assert_eq!(parse_year("2025.5"), None);
        assert_eq!(parse_year("dois mil"), None);
    }
}
