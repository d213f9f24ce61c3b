use crate::error::CalcError;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::fmt::Display;
use std::str::FromStr;

/// Decimal places of the platform's fixed-point token encoding.
pub const UNIT_DECIMALS: usize = 8;
pub const UNITS_PER_TOKEN: u64 = 100_000_000;

/// Converts a token amount into its smallest-unit integer string.
///
/// Truncation works on the shortest decimal rendering of the amount, so it
/// neither rounds up past the unit precision nor loses a unit to float
/// noise (`1.15 * 1e8` is `114999999.99999999`).
pub fn to_smallest_unit(amount: f64) -> Result<String, CalcError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CalcError::InvalidAmount(amount.to_string()));
    }
    if amount == 0.0 {
        return Ok("0".to_string());
    }

    // f64 Display never uses an exponent
    let rendered = amount.to_string();
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let fraction: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(UNIT_DECIMALS)
        .collect();

    let units = BigUint::from_str(&format!("{}{}", whole, fraction))
        .map_err(|_| CalcError::InvalidAmount(amount.to_string()))?;
    Ok(units.to_string())
}

/// Converts a smallest-unit integer (numeric string or integer) back into
/// a token amount.
pub fn from_smallest_unit<U: Display>(units: U) -> Result<f64, CalcError> {
    let text = units.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalcError::InvalidAmount(text));
    }

    let value = BigUint::from_str(trimmed).map_err(|_| CalcError::InvalidAmount(text.clone()))?;
    let scale = BigUint::from(UNITS_PER_TOKEN);
    let whole = &value / &scale;
    let fraction = &value % &scale;

    let whole = whole
        .to_f64()
        .ok_or_else(|| CalcError::InvalidAmount(text.clone()))?;
    let fraction = if fraction.is_zero() {
        0.0
    } else {
        fraction.to_f64().unwrap_or(0.0) / UNITS_PER_TOKEN as f64
    };
    Ok(whole + fraction)
}

/// Parses a Cadence `UFix64` literal such as `"12.50000000"` into smallest units.
pub fn parse_ufix64(text: &str) -> Result<u64, CalcError> {
    let invalid = || CalcError::InvalidAmount(text.to_string());
    let trimmed = text.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty()
        || fraction.len() > UNIT_DECIMALS
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole: u64 = whole.parse().map_err(|_| invalid())?;
    let fraction: u64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = UNIT_DECIMALS)
            .parse()
            .map_err(|_| invalid())?
    };

    whole
        .checked_mul(UNITS_PER_TOKEN)
        .and_then(|units| units.checked_add(fraction))
        .ok_or_else(invalid)
}

/// Renders smallest units as a Cadence `UFix64` literal.
pub fn format_ufix64(units: u64) -> String {
    format!(
        "{}.{:0width$}",
        units / UNITS_PER_TOKEN,
        units % UNITS_PER_TOKEN,
        width = UNIT_DECIMALS
    )
}

/// Formats an amount for display: en-US digit grouping and at most
/// `max_decimals` fraction digits with trailing zeros trimmed.
pub fn format_amount(amount: f64, max_decimals: usize) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let rendered = format!("{:.*}", max_decimals, amount.abs());
    let (whole, fraction) = match rendered.split_once('.') {
        Some((whole, fraction)) => (whole, fraction.trim_end_matches('0')),
        None => (rendered.as_str(), ""),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let nonzero = grouped.bytes().any(|b| b != b'0' && b != b',') || !fraction.is_empty();
    let negative = amount < 0.0 && nonzero;
    let sign = if negative { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_smallest_unit() {
        assert_eq!(to_smallest_unit(0.0).unwrap(), "0");
        assert_eq!(to_smallest_unit(1.0).unwrap(), "100000000");
        assert_eq!(to_smallest_unit(50.5).unwrap(), "5050000000");
        assert_eq!(to_smallest_unit(1.15).unwrap(), "115000000");
        assert_eq!(to_smallest_unit(0.00000001).unwrap(), "1");
        // Truncates below the unit precision
        assert_eq!(to_smallest_unit(0.123456789).unwrap(), "12345678");
    }

    #[test]
    fn test_to_smallest_unit_never_rounds_up() {
        assert_eq!(to_smallest_unit(1.9999999999).unwrap(), "199999999");
        assert_eq!(to_smallest_unit(0.9999999999).unwrap(), "99999999");
        assert_eq!(to_smallest_unit(0.1234567899).unwrap(), "12345678");
        assert_eq!(to_smallest_unit(42.99999999999).unwrap(), "4299999999");
        assert_eq!(to_smallest_unit(1234.56789).unwrap(), "123456789000");
    }

    #[test]
    fn test_to_smallest_unit_rejects_bad_input() {
        assert!(matches!(to_smallest_unit(-1.0), Err(CalcError::InvalidAmount(_))));
        assert!(matches!(to_smallest_unit(f64::NAN), Err(CalcError::InvalidAmount(_))));
        assert!(matches!(
            to_smallest_unit(f64::INFINITY),
            Err(CalcError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_from_smallest_unit() {
        assert_eq!(from_smallest_unit("100000000").unwrap(), 1.0);
        assert_eq!(from_smallest_unit(250_000_000u64).unwrap(), 2.5);
        assert_eq!(from_smallest_unit(" 1 ").unwrap(), 0.00000001);
        assert_eq!(from_smallest_unit("0").unwrap(), 0.0);
    }

    #[test]
    fn test_from_smallest_unit_rejects_non_numeric() {
        for bad in ["", "abc", "-5", "1.5", "1e8"] {
            assert_eq!(
                from_smallest_unit(bad),
                Err(CalcError::InvalidAmount(bad.to_string())),
                "input {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_ufix64() {
        assert_eq!(parse_ufix64("1.5").unwrap(), 150_000_000);
        assert_eq!(parse_ufix64("12.50000000").unwrap(), 1_250_000_000);
        assert_eq!(parse_ufix64("7").unwrap(), 700_000_000);
        assert_eq!(parse_ufix64("0.00000001").unwrap(), 1);
        assert!(parse_ufix64("0.000000001").is_err());
        assert!(parse_ufix64("-1.0").is_err());
        assert!(parse_ufix64(".5").is_err());
        assert!(parse_ufix64("184467440738.0").is_err());

        assert_eq!(format_ufix64(1), "0.00000001");
        assert_eq!(format_ufix64(5_000_000_000), "50.00000000");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234567.891234, 4), "1,234,567.8912");
        assert_eq!(format_amount(0.0, 4), "0");
        assert_eq!(format_amount(100.5, 4), "100.5");
        assert_eq!(format_amount(999.99999, 4), "1,000");
        assert_eq!(format_amount(-1500.25, 2), "-1,500.25");
    }

    proptest! {
        #[test]
        fn prop_units_round_trip(x in 0.0f64..1_000_000.0) {
            let units = to_smallest_unit(x).unwrap();
            let back = from_smallest_unit(&units).unwrap();
            // One unit of truncation plus f64 rounding at large magnitudes
            let tolerance = 1e-8 + x * f64::EPSILON * 4.0;
            prop_assert!((back - x).abs() <= tolerance, "{} -> {} -> {}", x, units, back);
        }
    }
}
