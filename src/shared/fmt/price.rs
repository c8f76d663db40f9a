//! Price formatting for cursor readouts.
//!
//! Prices arrive as decimal strings (the interpolator has already applied the
//! requested precision). Parsing goes through `rust_decimal::Decimal` so the
//! rounding step never reintroduces binary float noise.

use rust_decimal::prelude::*;

/// Digits kept after the point for prices below one when no precision is given.
const SUB_UNIT_MIN_DECIMALS: u32 = 4;

/// Insert `,` every three digits of an integer string (sign preserved).
pub fn group_thousands(integer: &str) -> String {
    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push_str(sign);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn decimals_in(value: &str) -> u32 {
    value
        .split_once('.')
        .map(|(_, frac)| frac.len() as u32)
        .unwrap_or(0)
}

/// Format a price string for display.
///
/// `precision` fixes the number of decimals; otherwise the input's own decimals
/// are kept, widened to four for sub-unit prices. Returns an empty string for
/// empty or unparseable input so readouts render nothing.
pub fn format_price(value: &str, precision: Option<u32>) -> String {
    let raw = value.trim().replace(',', "");
    if raw.is_empty() {
        return String::new();
    }
    let Ok(parsed) = Decimal::from_str(&raw) else {
        return String::new();
    };

    let decimals = precision.unwrap_or_else(|| {
        let own = decimals_in(&raw);
        if parsed.abs() < Decimal::ONE {
            own.max(SUB_UNIT_MIN_DECIMALS)
        } else {
            own
        }
    });

    let mut rounded = parsed.round_dp(decimals);
    rounded.rescale(decimals);
    let text = rounded.to_string();

    match text.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("-1234"), "-1,234");
        assert_eq!(group_thousands("-123"), "-123");
    }

    #[test]
    fn test_format_price_keeps_input_decimals() {
        assert_eq!(format_price("1234.50", None), "1,234.50");
        assert_eq!(format_price("42", None), "42");
        assert_eq!(format_price("1000000.12", None), "1,000,000.12");
    }

    #[test]
    fn test_format_price_explicit_precision() {
        assert_eq!(format_price("1234.5678", Some(2)), "1,234.57");
        assert_eq!(format_price("3", Some(2)), "3.00");
        assert_eq!(format_price("-2500.1", Some(1)), "-2,500.1");
    }

    #[test]
    fn test_format_price_sub_unit_widens() {
        assert_eq!(format_price("0.5", None), "0.5000");
        assert_eq!(format_price("0.123456", None), "0.123456");
    }

    #[test]
    fn test_format_price_empty_and_invalid() {
        assert_eq!(format_price("", None), "");
        assert_eq!(format_price("   ", Some(2)), "");
        assert_eq!(format_price("abc", Some(2)), "");
    }

    #[test]
    fn test_format_price_accepts_grouped_input() {
        assert_eq!(format_price("1,234.5", Some(2)), "1,234.50");
    }
}
