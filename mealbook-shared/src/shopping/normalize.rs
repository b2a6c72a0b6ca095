/// Decimal normalization
///
/// Converts a summed quantity to its shortest exact decimal string:
/// trailing fractional zeros are stripped, exactness is preserved.
/// `2.000` → `"2"`, `2.500` → `"2.5"`, `0.125` → `"0.125"`.
///
/// Quantities are `rust_decimal::Decimal` end to end; binary floating
/// point never enters the pipeline, so normalization is purely a matter
/// of dropping a redundant scale.

use rust_decimal::Decimal;

/// Formats a quantity in its canonical shortest exact form
pub fn normalize_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn normalize(s: &str) -> String {
        normalize_amount(Decimal::from_str(s).expect("valid decimal literal"))
    }

    #[test]
    fn test_strips_trailing_fractional_zeros() {
        assert_eq!(normalize("2.500"), "2.5");
        assert_eq!(normalize("2.000"), "2");
        assert_eq!(normalize("3.100"), "3.1");
    }

    #[test]
    fn test_preserves_significant_fraction() {
        assert_eq!(normalize("0.125"), "0.125");
        assert_eq!(normalize("0.001"), "0.001");
    }

    #[test]
    fn test_integers_stay_integers() {
        assert_eq!(normalize("3"), "3");
        assert_eq!(normalize("40"), "40");
    }

    #[test]
    fn test_zero() {
        assert_eq!(normalize("0.000"), "0");
        assert_eq!(normalize("0"), "0");
    }

    #[test]
    fn test_sum_then_normalize_round_trip() {
        let a = Decimal::from_str("2.000").unwrap();
        let b = Decimal::from_str("1.500").unwrap();
        assert_eq!(normalize_amount(a + b), "3.5");
    }
}
