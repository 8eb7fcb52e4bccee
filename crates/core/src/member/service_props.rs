//! Property-based tests for savings postings.

use chrono::{NaiveDate, Utc};
use koperasi_shared::types::MemberId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::MemberService;
use super::types::{Direction, Member, MemberStatus, SavingsBalances, SavingsKind, SavingsPostingInput};

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..50_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn posting() -> impl Strategy<Value = SavingsPostingInput> {
    (
        prop::sample::select(vec![SavingsKind::Pokok, SavingsKind::Wajib, SavingsKind::Sukarela]),
        prop_oneof![Just(Direction::Deposit), Just(Direction::Withdrawal)],
        amount(),
    )
        .prop_map(|(kind, direction, amount)| SavingsPostingInput {
            kind,
            direction,
            amount,
            description: String::new(),
        })
}

fn fresh_member() -> Member {
    Member {
        id: MemberId::new(),
        name: "Anggota".to_string(),
        member_number: "P-1".to_string(),
        unit: String::new(),
        join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        status: MemberStatus::Active,
        savings: SavingsBalances::default(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No sequence of postings drives any savings balance negative, and
    /// each audit record carries the balance it left behind.
    #[test]
    fn prop_balances_never_negative(postings in prop::collection::vec(posting(), 1..40)) {
        let mut member = fresh_member();
        for input in &postings {
            if let Ok((updated, record)) = MemberService::post_savings(&member, input, Utc::now()) {
                prop_assert_eq!(record.balance_after, updated.savings.get(input.kind));
                member = updated;
            }
            prop_assert!(member.savings.pokok >= Decimal::ZERO);
            prop_assert!(member.savings.wajib >= Decimal::ZERO);
            prop_assert!(member.savings.sukarela >= Decimal::ZERO);
        }
    }

    /// Accepted postings reconcile: deposits minus withdrawals per kind equal
    /// the final balance.
    #[test]
    fn prop_balances_reconcile(postings in prop::collection::vec(posting(), 1..40)) {
        let mut member = fresh_member();
        let mut net = SavingsBalances::default();
        for input in &postings {
            if let Ok((updated, _)) = MemberService::post_savings(&member, input, Utc::now()) {
                let slot = net.get_mut(input.kind);
                match input.direction {
                    Direction::Deposit => *slot += input.amount,
                    Direction::Withdrawal => *slot -= input.amount,
                }
                member = updated;
            }
        }
        prop_assert_eq!(member.savings, net);
    }
}
