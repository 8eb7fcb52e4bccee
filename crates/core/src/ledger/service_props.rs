//! Property-based tests for LedgerService.
//!
//! Covered properties:
//! - post followed by delete restores every balance
//! - edit is equivalent to delete-then-post
//! - debit-positive balances always sum to zero across the ledger

use chrono::Utc;
use koperasi_shared::types::{AccountId, JournalEntryId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{AccountSnapshot, LedgerService};
use super::types::{JournalLineInput, PostJournalInput};
use crate::coa::{Account, AccountType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop::sample::select(AccountType::ALL.to_vec())
}

fn chart(types: &[AccountType]) -> AccountSnapshot {
    types
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let account = Account {
                id: AccountId::new(),
                code: format!("{}-{i:04}", i % 5 + 1),
                name: format!("Akun {i}"),
                account_type: *t,
                parent_code: None,
                balance: Decimal::ZERO,
            };
            (account.id, account)
        })
        .collect()
}

/// Builds a balanced two-sided journal: each `(debit_idx, credit_idx, amount)`
/// becomes a debit line and a matching credit line.
fn journal(ids: &[AccountId], pairs: &[(usize, usize, Decimal)]) -> PostJournalInput {
    let mut lines = Vec::with_capacity(pairs.len() * 2);
    for (d, c, amount) in pairs {
        lines.push(JournalLineInput::debit(ids[d % ids.len()], *amount));
        lines.push(JournalLineInput::credit(ids[c % ids.len()], *amount));
    }
    PostJournalInput {
        description: "Jurnal acak".to_string(),
        lines,
    }
}

fn merge(mut base: AccountSnapshot, changed: Vec<Account>) -> AccountSnapshot {
    for account in changed {
        base.insert(account.id, account);
    }
    base
}

fn balances(snapshot: &AccountSnapshot) -> Vec<(AccountId, Decimal)> {
    snapshot.values().map(|a| (a.id, a.balance)).collect()
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(usize, usize, Decimal)>> {
    prop::collection::vec((0usize..8, 0usize..8, positive_amount()), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Posting an entry and then deleting it leaves every balance unchanged.
    #[test]
    fn prop_post_then_delete_is_identity(
        types in prop::collection::vec(account_type_strategy(), 2..8),
        pairs in pairs_strategy(),
    ) {
        let start = chart(&types);
        let ids: Vec<AccountId> = start.keys().copied().collect();
        let input = journal(&ids, &pairs);

        let plan = LedgerService::plan_post(&input, None, &start, JournalEntryId::new(), Utc::now()).unwrap();
        let posted = merge(start.clone(), plan.accounts);
        let reverted = LedgerService::plan_delete(&plan.entry, &posted).unwrap();
        let after = merge(posted, reverted);

        prop_assert_eq!(balances(&after), balances(&start));
    }

    /// Editing A into B gives the same balances as deleting A and posting B.
    #[test]
    fn prop_edit_equals_delete_then_post(
        types in prop::collection::vec(account_type_strategy(), 2..8),
        first in pairs_strategy(),
        second in pairs_strategy(),
    ) {
        let start = chart(&types);
        let ids: Vec<AccountId> = start.keys().copied().collect();
        let a = journal(&ids, &first);
        let b = journal(&ids, &second);

        let posted_a = LedgerService::plan_post(&a, None, &start, JournalEntryId::new(), Utc::now()).unwrap();
        let with_a = merge(start.clone(), posted_a.accounts);

        let edited = LedgerService::plan_post(&b, Some(&posted_a.entry), &with_a, JournalEntryId::new(), Utc::now()).unwrap();
        let via_edit = merge(with_a.clone(), edited.accounts);

        let deleted = LedgerService::plan_delete(&posted_a.entry, &with_a).unwrap();
        let without_a = merge(with_a, deleted);
        let posted_b = LedgerService::plan_post(&b, None, &without_a, JournalEntryId::new(), Utc::now()).unwrap();
        let via_delete = merge(without_a, posted_b.accounts);

        prop_assert_eq!(balances(&via_edit), balances(&via_delete));
    }

    /// Converted back to debit-positive, all balances sum to zero.
    #[test]
    fn prop_ledger_stays_balanced(
        types in prop::collection::vec(account_type_strategy(), 2..8),
        entries in prop::collection::vec(pairs_strategy(), 1..5),
    ) {
        let mut ledger = chart(&types);
        let ids: Vec<AccountId> = ledger.keys().copied().collect();

        for pairs in &entries {
            let input = journal(&ids, pairs);
            let plan = LedgerService::plan_post(&input, None, &ledger, JournalEntryId::new(), Utc::now()).unwrap();
            ledger = merge(ledger, plan.accounts);
        }

        let net: Decimal = ledger
            .values()
            .map(|a| a.normal_balance().from_debit_positive(a.balance))
            .sum();
        prop_assert_eq!(net, Decimal::ZERO);
    }
}

mod unit_tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_journal_helper_is_balanced() {
        let ledger = chart(&[AccountType::Asset, AccountType::Liability]);
        let ids: Vec<AccountId> = ledger.keys().copied().collect();
        let input = journal(&ids, &[(0, 1, dec!(10)), (1, 0, dec!(5))]);
        let debit: Decimal = input.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = input.lines.iter().map(|l| l.credit).sum();
        assert_eq!(debit, credit);
        assert_eq!(input.lines.len(), 4);
    }
}
