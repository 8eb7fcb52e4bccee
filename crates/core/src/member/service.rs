//! Member registry and savings posting rules.

use chrono::{DateTime, Utc};
use koperasi_shared::types::{MemberId, RecordId};
use rust_decimal::Decimal;

use super::error::MemberError;
use super::types::{
    CreateMemberInput, Direction, Member, MemberStatus, SavingsBalances, SavingsKind,
    SavingsPostingInput, SavingsTransaction, UpdateMemberInput,
};
use crate::ledger::EntrySource;

/// Member and savings service.
pub struct MemberService;

impl MemberService {
    /// Validates a registration and builds an active member with zero savings.
    pub fn validate_create(
        input: CreateMemberInput,
        existing: &[Member],
    ) -> Result<Member, MemberError> {
        let name = input.name.trim().to_string();
        let member_number = input.member_number.trim().to_string();
        if name.is_empty() {
            return Err(MemberError::EmptyName);
        }
        if member_number.is_empty() {
            return Err(MemberError::EmptyMemberNumber);
        }
        if existing.iter().any(|m| m.member_number == member_number) {
            return Err(MemberError::DuplicateMemberNumber(member_number));
        }

        Ok(Member {
            id: MemberId::new(),
            name,
            member_number,
            unit: input.unit.trim().to_string(),
            join_date: input.join_date,
            status: MemberStatus::Active,
            savings: SavingsBalances::default(),
        })
    }

    /// Applies a profile update.
    pub fn apply_update(member: &Member, input: UpdateMemberInput) -> Result<Member, MemberError> {
        let mut updated = member.clone();
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(MemberError::EmptyName);
            }
            updated.name = name;
        }
        if let Some(unit) = input.unit {
            updated.unit = unit.trim().to_string();
        }
        if let Some(status) = input.status {
            updated.status = status;
        }
        Ok(updated)
    }

    /// Checks that a member can be removed: no savings left and no open
    /// financing contract.
    pub fn validate_delete(member: &Member, has_open_contracts: bool) -> Result<(), MemberError> {
        if has_open_contracts || member.savings.total() != Decimal::ZERO {
            return Err(MemberError::HasObligations(member.id));
        }
        Ok(())
    }

    /// Applies a manual savings posting.
    ///
    /// Returns the updated member and the audit record to write with it.
    pub fn post_savings(
        member: &Member,
        input: &SavingsPostingInput,
        now: DateTime<Utc>,
    ) -> Result<(Member, SavingsTransaction), MemberError> {
        if !member.is_active() {
            return Err(MemberError::MemberInactive(member.id));
        }
        if input.amount <= Decimal::ZERO {
            return Err(MemberError::InvalidAmount);
        }
        if input.kind == SavingsKind::Pokok && input.direction == Direction::Withdrawal {
            return Err(MemberError::PokokWithdrawal);
        }

        let balance = member.savings.get(input.kind);
        if input.direction == Direction::Withdrawal && input.amount > balance {
            return Err(MemberError::InsufficientSavings {
                kind: input.kind,
                balance,
                requested: input.amount,
            });
        }

        let mut updated = member.clone();
        let slot = updated.savings.get_mut(input.kind);
        match input.direction {
            Direction::Deposit => *slot += input.amount,
            Direction::Withdrawal => *slot -= input.amount,
        }
        let balance_after = *slot;

        let record = SavingsTransaction {
            id: RecordId::new(),
            date: now,
            kind: input.kind,
            direction: input.direction,
            amount: input.amount,
            balance_after,
            description: input.description.trim().to_string(),
            source: EntrySource::Manual,
        };
        Ok((updated, record))
    }

    /// Credits the monthly mandatory savings, as done by the batch.
    ///
    /// The caller has already filtered for active members.
    pub fn collect_mandatory(
        member: &mut Member,
        amount: Decimal,
        period: &str,
        now: DateTime<Utc>,
    ) -> SavingsTransaction {
        member.savings.wajib += amount;
        SavingsTransaction {
            id: RecordId::new(),
            date: now,
            kind: SavingsKind::Wajib,
            direction: Direction::Deposit,
            amount,
            balance_after: member.savings.wajib,
            description: format!("Simpanan wajib periode {period}"),
            source: EntrySource::MonthlyBatch,
        }
    }
}
