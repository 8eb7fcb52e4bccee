//! Ledger service for journal posting, editing and deletion.
//!
//! The service is pure: the caller reads the affected accounts (and the
//! existing entry, for edits) inside a store transaction, hands them in, and
//! writes back whatever plan comes out. Nothing is returned on error, so a
//! failed plan never leaves half-applied balances.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use koperasi_shared::types::{AccountId, JournalEntryId};

use super::entry::{EntrySource, JournalEntry, JournalLine};
use super::error::LedgerError;
use super::types::{PostJournalInput, TransactionTotals};
use super::validation::validate_journal;
use crate::coa::Account;

/// Accounts read for a journal operation, keyed by id.
pub type AccountSnapshot = BTreeMap<AccountId, Account>;

/// Result of planning a post or edit.
#[derive(Debug, Clone)]
pub struct JournalPlan {
    /// The entry to write.
    pub entry: JournalEntry,
    /// Every affected account with its new balance.
    pub accounts: Vec<Account>,
    /// Totals of the new entry.
    pub totals: TransactionTotals,
}

/// Ledger service for journal operations.
///
/// This service contains pure business logic with no store dependencies.
pub struct LedgerService;

impl LedgerService {
    /// Accounts that must be read before planning a post or edit: the union
    /// of the new lines' accounts and the existing entry's accounts.
    #[must_use]
    pub fn affected_accounts(
        input: &PostJournalInput,
        existing: Option<&JournalEntry>,
    ) -> Vec<AccountId> {
        let mut ids: BTreeSet<AccountId> = input.lines.iter().map(|l| l.account_id).collect();
        if let Some(entry) = existing {
            ids.extend(entry.lines.iter().map(|l| l.account_id));
        }
        ids.into_iter().collect()
    }

    /// Plans a new manual entry (`existing = None`) or an edit of `existing`.
    ///
    /// An edit reverses every old line before applying the new ones, keeps
    /// the entry id and original posting date, and replaces the line list.
    ///
    /// # Errors
    ///
    /// Validation errors, `SystemEntryImmutable` for batch entries, or
    /// `AccountNotFound` if any referenced account is missing from `accounts`.
    pub fn plan_post(
        input: &PostJournalInput,
        existing: Option<&JournalEntry>,
        accounts: &AccountSnapshot,
        new_id: JournalEntryId,
        now: DateTime<Utc>,
    ) -> Result<JournalPlan, LedgerError> {
        let totals = validate_journal(input)?;

        let mut working = accounts.clone();
        if let Some(entry) = existing {
            Self::validate_can_modify(entry)?;
            Self::reverse_lines(&mut working, &entry.lines)?;
        }

        let lines = input
            .lines
            .iter()
            .map(|line| {
                let account = working
                    .get(&line.account_id)
                    .ok_or(LedgerError::AccountNotFound(line.account_id))?;
                Ok(JournalLine {
                    account_id: account.id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    debit: line.debit,
                    credit: line.credit,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Self::apply_lines(&mut working, &lines)?;

        let entry = JournalEntry {
            id: existing.map_or(new_id, |e| e.id),
            date: existing.map_or(now, |e| e.date),
            description: input.description.trim().to_string(),
            lines,
            source: EntrySource::Manual,
            period: None,
        };

        let affected = Self::affected_accounts(input, existing);
        let accounts = Self::collect(working, &affected);

        Ok(JournalPlan {
            entry,
            accounts,
            totals,
        })
    }

    /// Plans the deletion of `existing`: every line is reversed.
    ///
    /// Returns the affected accounts with their new balances.
    ///
    /// # Errors
    ///
    /// `SystemEntryImmutable` for batch entries or `AccountNotFound`.
    pub fn plan_delete(
        existing: &JournalEntry,
        accounts: &AccountSnapshot,
    ) -> Result<Vec<Account>, LedgerError> {
        Self::validate_can_modify(existing)?;

        let mut working = accounts.clone();
        Self::reverse_lines(&mut working, &existing.lines)?;

        let affected: Vec<AccountId> = existing
            .lines
            .iter()
            .map(|l| l.account_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Ok(Self::collect(working, &affected))
    }

    /// Applies each line's effect to its account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a line's account is not in the snapshot.
    pub fn apply_lines(
        accounts: &mut AccountSnapshot,
        lines: &[JournalLine],
    ) -> Result<(), LedgerError> {
        for line in lines {
            accounts
                .get_mut(&line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?
                .apply(line.debit, line.credit);
        }
        Ok(())
    }

    /// Undoes each line's effect on its account.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if a line's account is not in the snapshot.
    pub fn reverse_lines(
        accounts: &mut AccountSnapshot,
        lines: &[JournalLine],
    ) -> Result<(), LedgerError> {
        for line in lines {
            accounts
                .get_mut(&line.account_id)
                .ok_or(LedgerError::AccountNotFound(line.account_id))?
                .reverse(line.debit, line.credit);
        }
        Ok(())
    }

    /// Calculate totals from journal lines.
    #[must_use]
    pub fn calculate_totals(lines: &[JournalLine]) -> TransactionTotals {
        let debit = lines.iter().map(|l| l.debit).sum();
        let credit = lines.iter().map(|l| l.credit).sum();
        TransactionTotals::new(debit, credit)
    }

    /// Validate that an entry can be edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the entry was generated by the monthly batch.
    pub fn validate_can_modify(entry: &JournalEntry) -> Result<(), LedgerError> {
        if entry.is_system_generated() {
            return Err(LedgerError::SystemEntryImmutable(entry.id));
        }
        Ok(())
    }

    fn collect(mut working: AccountSnapshot, ids: &[AccountId]) -> Vec<Account> {
        ids.iter().filter_map(|id| working.remove(id)).collect()
    }
}
