//! Property-based tests for journal validation rules.

use koperasi_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{JournalLineInput, PostJournalInput};
use super::validation::validate_journal;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a negative amount.
fn negative_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(-cents, 2))
}

/// Splits `total` into `parts` positive pieces that sum back to `total`.
fn split(total: Decimal, parts: usize) -> Vec<Decimal> {
    let parts = parts.max(1);
    let cents = (total * Decimal::ONE_HUNDRED).trunc();
    let count = Decimal::from(parts as u64);
    let each = (cents / count).trunc();
    let mut out = vec![each / Decimal::ONE_HUNDRED; parts - 1];
    let used: Decimal = out.iter().copied().sum();
    out.push(total - used);
    out
}

fn journal(lines: Vec<JournalLineInput>) -> PostJournalInput {
    PostJournalInput {
        description: "Jurnal uji".to_string(),
        lines,
    }
}

/// A balanced journal with `debits` debit lines and `credits` credit lines.
fn balanced_journal(total: Decimal, debits: usize, credits: usize) -> PostJournalInput {
    let mut lines: Vec<JournalLineInput> = split(total, debits)
        .into_iter()
        .map(|a| JournalLineInput::debit(AccountId::new(), a))
        .collect();
    lines.extend(
        split(total, credits)
            .into_iter()
            .map(|a| JournalLineInput::credit(AccountId::new(), a)),
    );
    journal(lines)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any balanced journal whose split pieces are all positive is accepted,
    /// and the reported totals match.
    #[test]
    fn prop_balanced_journal_accepted(
        total in (1_000i64..100_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        debits in 1usize..5,
        credits in 1usize..5,
    ) {
        let input = balanced_journal(total, debits, credits);
        prop_assume!(input.lines.iter().all(|l| l.debit > Decimal::ZERO || l.credit > Decimal::ZERO));

        let totals = validate_journal(&input).unwrap();
        prop_assert_eq!(totals.debit, total);
        prop_assert_eq!(totals.credit, total);
    }

    /// Any journal where debits differ from credits is rejected.
    #[test]
    fn prop_unbalanced_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let input = journal(vec![
            JournalLineInput::debit(AccountId::new(), debit),
            JournalLineInput::credit(AccountId::new(), credit),
        ]);
        let result = validate_journal(&input);
        prop_assert!(
            matches!(result, Err(LedgerError::UnbalancedTransaction { .. })),
            "Unbalanced journal should be rejected, got: {:?}",
            result
        );
    }

    /// Negative amounts are rejected regardless of balance.
    #[test]
    fn prop_negative_amount_rejected(amount in negative_amount()) {
        let input = journal(vec![
            JournalLineInput::debit(AccountId::new(), amount),
            JournalLineInput::credit(AccountId::new(), amount),
        ]);
        prop_assert!(matches!(
            validate_journal(&input),
            Err(LedgerError::NegativeAmount(0))
        ));
    }

    /// An all-zero line is rejected even when the rest balances.
    #[test]
    fn prop_zero_line_rejected(amount in positive_amount()) {
        let input = journal(vec![
            JournalLineInput::debit(AccountId::new(), amount),
            JournalLineInput::debit(AccountId::new(), Decimal::ZERO),
            JournalLineInput::credit(AccountId::new(), amount),
        ]);
        prop_assert!(matches!(
            validate_journal(&input),
            Err(LedgerError::ZeroAmount(1))
        ));
    }

    /// A single line can never form a valid journal.
    #[test]
    fn prop_single_line_rejected(amount in positive_amount()) {
        let input = journal(vec![JournalLineInput::debit(AccountId::new(), amount)]);
        prop_assert!(matches!(
            validate_journal(&input),
            Err(LedgerError::InsufficientEntries)
        ));
    }
}

mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_sums_back() {
        let parts = split(dec!(100.01), 3);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(100.01));
    }
}
