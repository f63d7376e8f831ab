//! Decimal precision helpers.
//!
//! Every price/quantity write in the engine goes through [`round_dp`] so
//! that fills compare exactly against zero and replicas round identically.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to `dp` decimal places, midpoint away from zero.
#[inline]
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::round_dp;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_dp_truncates_extra_places() {
        assert_eq!(round_dp(dec("1.234567"), 2), dec("1.23"));
        assert_eq!(round_dp(dec("1.239"), 2), dec("1.24"));
    }

    #[test]
    fn test_round_dp_midpoint_away_from_zero() {
        assert_eq!(round_dp(dec("0.125"), 2), dec("0.13"));
        assert_eq!(round_dp(dec("2.5"), 0), dec("3"));
        assert_eq!(round_dp(dec("-0.125"), 2), dec("-0.13"));
    }

    #[test]
    fn test_round_dp_is_stable_on_exact_values() {
        assert_eq!(round_dp(dec("100"), 2), dec("100"));
        assert_eq!(round_dp(dec("0.00000001"), 8), dec("0.00000001"));
    }
}
