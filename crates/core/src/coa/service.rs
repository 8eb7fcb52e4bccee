//! Chart of accounts rules.

use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::CoaError;
use super::tree::AccountTree;
use super::types::{Account, CreateAccountInput, UpdateAccountInput};
use crate::ledger::JournalEntry;

/// Everything a code rename has to write.
#[derive(Debug, Clone)]
pub struct RenamePlan {
    /// The renamed account.
    pub account: Account,
    /// Children re-pointed at the new code.
    pub children: Vec<Account>,
    /// Journal entries whose cached line codes changed.
    pub entries: Vec<JournalEntry>,
}

/// Chart of accounts service.
///
/// Pure functions over a snapshot of the chart (and, where references
/// matter, of the journal).
pub struct CoaService;

impl CoaService {
    /// Validates a new account and builds it with a zero balance.
    ///
    /// The parent code is not required to exist.
    pub fn validate_create(
        input: CreateAccountInput,
        existing: &[Account],
    ) -> Result<Account, CoaError> {
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() {
            return Err(CoaError::EmptyCode);
        }
        if name.is_empty() {
            return Err(CoaError::EmptyName);
        }
        if existing.iter().any(|a| a.code == code) {
            return Err(CoaError::DuplicateCode(code));
        }
        let parent_code = normalize_parent(input.parent_code);
        if parent_code.as_deref() == Some(code.as_str()) {
            return Err(CoaError::ParentCycle {
                parent: code.clone(),
                code,
            });
        }

        Ok(Account {
            id: AccountId::new(),
            code,
            name,
            account_type: input.account_type,
            parent_code,
            balance: Decimal::ZERO,
        })
    }

    /// Applies an update to `account`.
    ///
    /// `referenced` tells whether any journal line uses the account; the type
    /// is frozen once it is.
    pub fn apply_update(
        account: &Account,
        input: UpdateAccountInput,
        chart: &[Account],
        referenced: bool,
    ) -> Result<Account, CoaError> {
        let mut updated = account.clone();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CoaError::EmptyName);
            }
            updated.name = name;
        }

        if let Some(account_type) = input.account_type {
            if account_type != account.account_type && referenced {
                return Err(CoaError::TypeChangeNotAllowed(account.code.clone()));
            }
            updated.account_type = account_type;
        }

        if let Some(parent) = input.parent_code {
            let parent = normalize_parent(parent);
            if let Some(p) = parent.as_deref() {
                if AccountTree::new(chart).would_create_cycle(&account.code, p) {
                    return Err(CoaError::ParentCycle {
                        code: account.code.clone(),
                        parent: p.to_string(),
                    });
                }
            }
            updated.parent_code = parent;
        }

        Ok(updated)
    }

    /// Checks that an account can be deleted.
    pub fn validate_delete(
        account: &Account,
        chart: &[Account],
        entries: &[JournalEntry],
    ) -> Result<(), CoaError> {
        let references = Self::reference_count(account.id, entries);
        if references > 0 {
            return Err(CoaError::AccountInUse {
                code: account.code.clone(),
                references,
            });
        }

        let children = AccountTree::new(chart).children(&account.code).len();
        if children > 0 {
            return Err(CoaError::HasChildren {
                code: account.code.clone(),
                children,
            });
        }
        Ok(())
    }

    /// Plans a code change cascading to children and cached line codes.
    pub fn plan_rename(
        account: &Account,
        new_code: &str,
        chart: &[Account],
        entries: &[JournalEntry],
    ) -> Result<RenamePlan, CoaError> {
        let new_code = new_code.trim();
        if new_code.is_empty() {
            return Err(CoaError::EmptyCode);
        }
        if chart
            .iter()
            .any(|a| a.code == new_code && a.id != account.id)
        {
            return Err(CoaError::DuplicateCode(new_code.to_string()));
        }
        if account.parent_code.as_deref() == Some(new_code) {
            return Err(CoaError::ParentCycle {
                code: new_code.to_string(),
                parent: new_code.to_string(),
            });
        }

        let old_code = account.code.as_str();
        let children = chart
            .iter()
            .filter(|a| a.id != account.id && a.parent_code.as_deref() == Some(old_code))
            .map(|child| Account {
                parent_code: Some(new_code.to_string()),
                ..child.clone()
            })
            .collect();

        let entries = entries
            .iter()
            .filter_map(|entry| {
                let mut entry = entry.clone();
                (entry.relabel_account(account.id, new_code) > 0).then_some(entry)
            })
            .collect();

        Ok(RenamePlan {
            account: Account {
                code: new_code.to_string(),
                ..account.clone()
            },
            children,
            entries,
        })
    }

    /// Number of journal lines referencing the account.
    #[must_use]
    pub fn reference_count(account_id: AccountId, entries: &[JournalEntry]) -> usize {
        entries
            .iter()
            .flat_map(|e| e.lines.iter())
            .filter(|l| l.account_id == account_id)
            .count()
    }
}

fn normalize_parent(parent: Option<String>) -> Option<String> {
    parent
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
