//! Comparison normalization for cell values.
//!
//! Workbook producers round-trip numbers through different representations
//! (`1` vs `1.0`, differing float precision). Every cell is collapsed to a
//! canonical string here before two workbooks are compared, so the rest of
//! the diff never looks at value types.

use super::CellValue;
use chrono::Timelike;
use std::fmt::Write;

/// Distance from the nearest integer under which a number is treated as that integer.
pub const INTEGER_TOLERANCE: f64 = 1e-9;

/// Significant digits kept for non-integral numbers.
const SIGNIFICANT_DIGITS: usize = 10;

/// Canonical comparison string for a cell value.
pub fn normalize(value: &CellValue) -> String {
    let mut out = String::new();
    normalize_into(value, &mut out);
    out
}

/// [`normalize`] into a caller-owned buffer, replacing its contents.
pub fn normalize_into(value: &CellValue, out: &mut String) {
    out.clear();
    match value {
        CellValue::Empty => {}
        CellValue::Number(n) => out.push_str(&normalize_number(*n)),
        CellValue::Text(s) => out.push_str(s.trim()),
        CellValue::Boolean(b) => out.push_str(if *b { "True" } else { "False" }),
        CellValue::Temporal(dt) => {
            let _ = write!(out, "{}", dt.format("%Y-%m-%d %H:%M:%S"));
            push_micros(out, dt.nanosecond());
        }
        CellValue::Time(t) => {
            let _ = write!(out, "{}", t.format("%H:%M:%S"));
            push_micros(out, t.nanosecond());
        }
    }
}

/// Append `.ffffff` when the value has a sub-second part.
fn push_micros(out: &mut String, nanos: u32) {
    let micros = (nanos / 1_000) % 1_000_000;
    if micros != 0 {
        let _ = write!(out, ".{:06}", micros);
    }
}

/// Canonical comparison string for a number.
pub fn normalize_number(n: f64) -> String {
    let nearest = n.round();
    if (n - nearest).abs() < INTEGER_TOLERANCE {
        if nearest == 0.0 {
            // Avoid "-0".
            return "0".to_string();
        }
        return format!("{:.0}", nearest);
    }
    format_general(n)
}

/// Format a number with up to ten significant digits, dropping trailing zeros.
///
/// Switches to exponent notation (`1.5e-05`, `1.23456789e+10`) when the
/// decimal exponent is below -4 or at least ten.
pub fn format_general(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // Round to the requested precision first so the exponent reflects any carry.
    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, n)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_empty_is_empty_string() {
        assert_eq!(normalize(&CellValue::Empty), "");
    }

    #[test]
    fn test_integral_floats_match_integers() {
        assert_eq!(normalize(&CellValue::Number(1.0)), "1");
        assert_eq!(normalize(&CellValue::from(1i64)), "1");
        assert_eq!(normalize(&CellValue::Number(-42.0)), "-42");
    }

    #[test]
    fn test_values_within_tolerance_collapse() {
        assert_eq!(
            normalize(&CellValue::Number(2.00000000001)),
            normalize(&CellValue::Number(2.0))
        );
        assert_eq!(normalize(&CellValue::Number(2.99999999999)), "3");
    }

    #[test]
    fn test_values_outside_tolerance_differ() {
        assert_ne!(
            normalize(&CellValue::Number(2.1)),
            normalize(&CellValue::Number(2.0))
        );
        assert_eq!(normalize(&CellValue::Number(2.1)), "2.1");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(normalize(&CellValue::Number(-0.0)), "0");
        assert_eq!(normalize(&CellValue::Number(-1e-12)), "0");
    }

    #[test]
    fn test_large_integers_keep_every_digit() {
        assert_eq!(normalize_number(1e20), "100000000000000000000");
        assert_eq!(normalize_number(12_345_678_901.0), "12345678901");
    }

    #[test]
    fn test_general_format_significant_digits() {
        assert_eq!(format_general(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_general(2.5), "2.5");
        assert_eq!(format_general(-0.125), "-0.125");
        assert_eq!(format_general(123.456), "123.456");
        assert_eq!(format_general(0.0001234), "0.0001234");
    }

    #[test]
    fn test_general_format_exponent_forms() {
        assert_eq!(format_general(1.5e-5), "1.5e-05");
        assert_eq!(format_general(12_345_678_901.5), "1.23456789e+10");
        assert_eq!(format_general(-2.5e-7), "-2.5e-07");
        assert_eq!(format_general(1.25e100), "1.25e+100");
    }

    #[test]
    fn test_general_format_rounding_carry() {
        assert_eq!(format_general(9.99999999999), "10");
        assert_eq!(format_general(0.30000000000000004), "0.3");
    }

    #[test]
    fn test_non_finite_numbers() {
        assert_eq!(normalize_number(f64::NAN), "nan");
        assert_eq!(normalize_number(f64::INFINITY), "inf");
        assert_eq!(normalize_number(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_text_is_trimmed() {
        assert_eq!(normalize(&CellValue::new_text("  Alice \n")), "Alice");
        assert_eq!(normalize(&CellValue::new_text("   ")), "");
    }

    #[test]
    fn test_booleans() {
        assert_eq!(normalize(&CellValue::Boolean(true)), "True");
        assert_eq!(normalize(&CellValue::Boolean(false)), "False");
    }

    #[test]
    fn test_temporal() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        assert_eq!(normalize(&CellValue::Temporal(dt)), "2024-03-09 07:30:00");
    }

    #[test]
    fn test_temporal_fractional_seconds_use_six_digits() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(7, 30, 0, 500)
            .unwrap();
        assert_eq!(
            normalize(&CellValue::Temporal(dt)),
            "2024-03-09 07:30:00.500000"
        );
    }

    #[test]
    fn test_time_of_day() {
        let t = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(normalize(&CellValue::Time(t)), "07:30:00");
        let t = NaiveTime::from_hms_micro_opt(19, 5, 9, 250).unwrap();
        assert_eq!(normalize(&CellValue::from(t)), "19:05:09.000250");
    }

    #[test]
    fn test_normalize_into_replaces_buffer() {
        let mut buf = String::from("stale contents");
        normalize_into(&CellValue::Number(2.5), &mut buf);
        assert_eq!(buf, "2.5");
        normalize_into(&CellValue::Empty, &mut buf);
        assert_eq!(buf, "");
    }

    #[test]
    fn test_normalization_is_idempotent_on_canonical_strings() {
        let samples = [
            CellValue::Empty,
            CellValue::Number(1.0),
            CellValue::Number(2.00000000001),
            CellValue::Number(1.0 / 3.0),
            CellValue::Number(1.5e-5),
            CellValue::new_text(" Night "),
            CellValue::Boolean(true),
            CellValue::Time(NaiveTime::from_hms_opt(7, 30, 0).unwrap()),
        ];
        for value in samples {
            let canonical = normalize(&value);
            let again = normalize(&CellValue::Text(canonical.clone()));
            assert_eq!(again, canonical, "value {:?}", value);
        }
    }
}
