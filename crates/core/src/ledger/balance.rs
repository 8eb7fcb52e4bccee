//! Account balance calculations.
//!
//! Two views of the same numbers exist:
//! - the persisted balance, which the journal engine keeps on the account's
//!   normal side (`Debit`: debit - credit, `Credit`: credit - debit);
//! - the projected fold, which accumulates every line debit-positive.
//!
//! [`NormalBalance::from_debit_positive`] is the only conversion between them.

use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side on which an account's balance increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Asset and Expense accounts.
    Debit,
    /// Liability, Equity and Revenue accounts.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change caused by one line.
    ///
    /// Debit-normal: `debit - credit`. Credit-normal: `credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }

    /// Converts a debit-positive raw amount into a balance on this side.
    #[must_use]
    pub fn from_debit_positive(self, raw: Decimal) -> Decimal {
        match self {
            Self::Debit => raw,
            Self::Credit => -raw,
        }
    }
}

impl std::fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => f.write_str("Debit"),
            Self::Credit => f.write_str("Credit"),
        }
    }
}

/// Debit and credit totals accumulated for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance for an account.
    #[must_use]
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
        }
    }

    /// Adds one journal line.
    pub fn add_line(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
    }

    /// Debit-positive net amount.
    #[must_use]
    pub fn raw(&self) -> Decimal {
        self.debit_total - self.credit_total
    }

    /// Net amount expressed on the given normal side.
    #[must_use]
    pub fn on_side(&self, side: NormalBalance) -> Decimal {
        side.from_debit_positive(self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn side_strategy() -> impl Strategy<Value = NormalBalance> {
        prop_oneof![Just(NormalBalance::Debit), Just(NormalBalance::Credit)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Applying lines one by one on the normal side gives the same number
        /// as folding them debit-positive and converting once.
        #[test]
        fn prop_incremental_equals_projected(
            side in side_strategy(),
            lines in prop::collection::vec((amount_strategy(), amount_strategy()), 1..30),
        ) {
            let mut persisted = Decimal::ZERO;
            let mut fold = AccountBalance::new(AccountId::new());
            for (debit, credit) in &lines {
                persisted += side.balance_change(*debit, *credit);
                fold.add_line(*debit, *credit);
            }
            prop_assert_eq!(persisted, fold.on_side(side));
        }

        /// Applying then reversing a line leaves the balance unchanged.
        #[test]
        fn prop_reversal_restores_balance(
            side in side_strategy(),
            start in amount_strategy(),
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            let applied = start + side.balance_change(debit, credit);
            let reversed = applied - side.balance_change(debit, credit);
            prop_assert_eq!(reversed, start);
        }

        /// The two sides always see opposite changes.
        #[test]
        fn prop_sides_are_opposite(
            debit in amount_strategy(),
            credit in amount_strategy(),
        ) {
            prop_assert_eq!(
                NormalBalance::Debit.balance_change(debit, credit),
                -NormalBalance::Credit.balance_change(debit, credit)
            );
        }
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let side = NormalBalance::Debit;
        assert_eq!(side.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.balance_change(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let side = NormalBalance::Credit;
        assert_eq!(side.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.balance_change(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_account_balance_totals() {
        let mut balance = AccountBalance::new(AccountId::new());
        balance.add_line(dec!(500), dec!(0));
        balance.add_line(dec!(0), dec!(200));

        assert_eq!(balance.debit_total, dec!(500));
        assert_eq!(balance.credit_total, dec!(200));
        assert_eq!(balance.raw(), dec!(300));
        assert_eq!(balance.on_side(NormalBalance::Credit), dec!(-300));
    }
}
