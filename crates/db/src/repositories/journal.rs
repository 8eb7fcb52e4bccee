//! Journal repository: manual posting, editing and deletion.
//!
//! Every operation reads the affected accounts and the entry in one store
//! transaction, lets [`LedgerService`] plan the balance changes, and writes
//! the entry together with every changed account.

use chrono::Utc;
use koperasi_core::coa::Account;
use koperasi_core::ledger::{
    AccountSnapshot, JournalEntry, LedgerError, LedgerService, PostJournalInput, validate_journal,
};
use koperasi_shared::types::{AccountId, JournalEntryId};
use tracing::info;

use crate::store::{StoreClient, StoreError, StoreTransaction, collections};

async fn load_accounts(
    txn: &mut dyn StoreTransaction,
    ids: &[AccountId],
) -> Result<AccountSnapshot, StoreError> {
    let mut snapshot = AccountSnapshot::new();
    for id in ids {
        if let Some(account) = txn.get::<Account>(collections::ACCOUNTS, &id.to_string()).await? {
            snapshot.insert(*id, account);
        }
    }
    Ok(snapshot)
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    store: StoreClient,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Lists entries, newest first.
    pub async fn list(&self) -> Result<Vec<JournalEntry>, LedgerError> {
        let mut txn = self.store.begin().await?;
        let mut entries: Vec<JournalEntry> = txn.query(collections::JOURNAL).await?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(entries)
    }

    /// Fetches one entry.
    pub async fn get(&self, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        let mut txn = self.store.begin().await?;
        txn.get(collections::JOURNAL, &id.to_string())
            .await?
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// Posts a new entry, or replaces the lines of `entry_id`.
    ///
    /// The line set is validated before the store is touched.
    pub async fn post(
        &self,
        input: PostJournalInput,
        entry_id: Option<JournalEntryId>,
    ) -> Result<JournalEntry, LedgerError> {
        validate_journal(&input)?;

        let input = &input;
        let new_id = JournalEntryId::new();
        let plan = self
            .store
            .run("journal.post", move || async move {
                let mut txn = self.store.begin().await?;
                let existing = match entry_id {
                    Some(id) => Some(
                        txn.get::<JournalEntry>(collections::JOURNAL, &id.to_string())
                            .await?
                            .ok_or(LedgerError::EntryNotFound(id))?,
                    ),
                    None => None,
                };

                let ids = LedgerService::affected_accounts(input, existing.as_ref());
                let accounts = load_accounts(txn.as_mut(), &ids).await?;
                let plan =
                    LedgerService::plan_post(input, existing.as_ref(), &accounts, new_id, Utc::now())?;

                for account in &plan.accounts {
                    txn.set(collections::ACCOUNTS, &account.id.to_string(), account)?;
                }
                txn.set(collections::JOURNAL, &plan.entry.id.to_string(), &plan.entry)?;
                txn.commit().await?;
                Ok::<_, LedgerError>(plan)
            })
            .await?;

        info!(
            entry_id = %plan.entry.id,
            edited = entry_id.is_some(),
            lines = plan.entry.lines.len(),
            total = %plan.totals.debit,
            "Journal entry posted"
        );
        Ok(plan.entry)
    }

    /// Deletes an entry after reversing every line.
    pub async fn delete(&self, id: JournalEntryId) -> Result<(), LedgerError> {
        self.store
            .run("journal.delete", move || async move {
                let mut txn = self.store.begin().await?;
                let existing: JournalEntry = txn
                    .get(collections::JOURNAL, &id.to_string())
                    .await?
                    .ok_or(LedgerError::EntryNotFound(id))?;
                LedgerService::validate_can_modify(&existing)?;

                let ids: Vec<AccountId> = existing.lines.iter().map(|l| l.account_id).collect();
                let accounts = load_accounts(txn.as_mut(), &ids).await?;
                let changed = LedgerService::plan_delete(&existing, &accounts)?;

                for account in &changed {
                    txn.set(collections::ACCOUNTS, &account.id.to_string(), account)?;
                }
                txn.delete(collections::JOURNAL, &id.to_string());
                txn.commit().await?;
                Ok::<_, LedgerError>(())
            })
            .await?;

        info!(entry_id = %id, "Journal entry deleted");
        Ok(())
    }
}
