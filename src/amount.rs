//! Parsing and display of money amounts typed into the weekly ledger.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a free-text amount, falling back to zero.
///
/// Surrounding whitespace, `,` thousands separators and a leading `+` are
/// ignored. Anything that still fails to parse as a decimal (including the
/// empty string) yields `Decimal::ZERO`; this function never errors.
pub fn parse_amount(text: &str) -> Decimal {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .map(|value| value.normalize())
        .unwrap_or(Decimal::ZERO)
}

/// Renders an amount without trailing fractional zeros (`100.50` -> `100.5`).
pub fn format_amount(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_plain_and_signed_numbers() {
        assert_eq!(parse_amount("100"), dec!(100));
        assert_eq!(parse_amount("-50"), dec!(-50));
        assert_eq!(parse_amount("+25.5"), dec!(25.5));
        assert_eq!(parse_amount("  12.75 "), dec!(12.75));
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_amount("280,000"), dec!(280000));
        assert_eq!(parse_amount("1,234.50"), dec!(1234.5));
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
        assert_eq!(parse_amount("+"), Decimal::ZERO);
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(parse_amount("1e3"), dec!(1000));
    }

    #[test]
    fn format_drops_trailing_zeros() {
        assert_eq!(format_amount(dec!(100.50)), "100.5");
        assert_eq!(format_amount(dec!(100)), "100");
        assert_eq!(format_amount(dec!(-50.00)), "-50");
    }
}
