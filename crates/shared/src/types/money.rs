//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` in Rupiah.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on computed amounts.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a computed amount to `MONEY_SCALE` places using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Splits `total` into `parts` equal rounded shares and returns the share
/// for the `index`-th part (0-based). The last part absorbs the rounding
/// remainder so that all shares sum to exactly `total`.
///
/// Returns zero when `parts` is zero or `index` is out of range.
#[must_use]
pub fn installment_share(total: Decimal, parts: u32, index: u32) -> Decimal {
    if parts == 0 || index >= parts {
        return Decimal::ZERO;
    }
    let share = round_money(total / Decimal::from(parts));
    if index + 1 == parts {
        total - share * Decimal::from(parts - 1)
    } else {
        share
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(958333.3333)), dec!(958333.33));
        assert_eq!(round_money(dec!(0.125)), dec!(0.12));
        assert_eq!(round_money(dec!(0.135)), dec!(0.14));
    }

    #[test]
    fn test_installment_share_sums_to_total() {
        let total = dec!(10000000);
        let shares: Decimal = (0..12).map(|i| installment_share(total, 12, i)).sum();
        assert_eq!(shares, total);
        assert_eq!(installment_share(total, 12, 0), dec!(833333.33));
        assert_eq!(installment_share(total, 12, 11), dec!(833333.37));
    }

    #[test]
    fn test_installment_share_degenerate() {
        assert_eq!(installment_share(dec!(100), 0, 0), Decimal::ZERO);
        assert_eq!(installment_share(dec!(100), 3, 3), Decimal::ZERO);
        assert_eq!(installment_share(dec!(100), 1, 0), dec!(100));
    }
}
