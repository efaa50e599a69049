//! Number and time formatting used in problem descriptions

use chrono::{Local, TimeZone};
use std::fmt::Display;

/// Format with `digits` significant digits, `%g` style
///
/// Fixed notation with trailing zeros removed while the decimal exponent is
/// in `[-4, digits)`, scientific notation (`1.5e+02`) otherwise.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{}", value);
    }

    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// `ctime(3)` rendering of a unix timestamp in the local time zone
pub fn format_ctime(timestamp: i64) -> String {
    format_ctime_in(timestamp, &Local)
}

/// `ctime(3)` rendering of a unix timestamp in `zone`
pub fn format_ctime_in<Tz>(timestamp: i64, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match zone.timestamp_opt(timestamp, 0).earliest() {
        Some(instant) => instant.format("%a %b %e %H:%M:%S %Y").to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_significant_fixed() {
        assert_eq!(format_significant(19.0, 2), "19");
        assert_eq!(format_significant(20.0, 2), "20");
        assert_eq!(format_significant(5.5, 2), "5.5");
        assert_eq!(format_significant(0.123, 2), "0.12");
        assert_eq!(format_significant(9.999999999, 2), "10");
        assert_eq!(format_significant(0.0, 2), "0");
    }

    #[test]
    fn test_format_significant_scientific() {
        assert_eq!(format_significant(150.0, 2), "1.5e+02");
        assert_eq!(format_significant(0.0000123, 2), "1.2e-05");
        assert_eq!(format_significant(300.0, 2), "3e+02");
    }

    #[test]
    fn test_format_ctime_utc() {
        assert_eq!(format_ctime_in(0, &Utc), "Thu Jan  1 00:00:00 1970");
        assert_eq!(format_ctime_in(1_700_000_000, &Utc), "Tue Nov 14 22:13:20 2023");
    }
}
