//! Chart of accounts repository.

use koperasi_core::coa::{
    Account, CoaError, CoaService, CreateAccountInput, UpdateAccountInput,
};
use koperasi_core::ledger::JournalEntry;
use koperasi_shared::types::AccountId;
use tracing::info;

use crate::store::{StoreClient, StoreError, StoreTransaction, collections};

/// Reads the whole chart inside a transaction, ordered by code.
pub(crate) async fn load_chart(txn: &mut dyn StoreTransaction) -> Result<Vec<Account>, StoreError> {
    let mut chart: Vec<Account> = txn.query(collections::ACCOUNTS).await?;
    chart.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(chart)
}

/// Reads the whole journal inside a transaction.
pub(crate) async fn load_journal(
    txn: &mut dyn StoreTransaction,
) -> Result<Vec<JournalEntry>, StoreError> {
    txn.query(collections::JOURNAL).await
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    store: StoreClient,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Lists every account ordered by code.
    pub async fn list(&self) -> Result<Vec<Account>, CoaError> {
        let mut txn = self.store.begin().await?;
        Ok(load_chart(txn.as_mut()).await?)
    }

    /// Fetches one account.
    pub async fn get(&self, id: AccountId) -> Result<Account, CoaError> {
        let mut txn = self.store.begin().await?;
        txn.get(collections::ACCOUNTS, &id.to_string())
            .await?
            .ok_or(CoaError::AccountNotFound(id))
    }

    /// Creates an account with a zero balance.
    pub async fn create(&self, input: CreateAccountInput) -> Result<Account, CoaError> {
        let input = &input;
        let account = self
            .store
            .run("account.create", move || async move {
                let mut txn = self.store.begin().await?;
                let chart = load_chart(txn.as_mut()).await?;
                let account = CoaService::validate_create(input.clone(), &chart)?;
                txn.set(collections::ACCOUNTS, &account.id.to_string(), &account)?;
                txn.commit().await?;
                Ok::<_, CoaError>(account)
            })
            .await?;

        info!(account_id = %account.id, code = %account.code, "Account created");
        Ok(account)
    }

    /// Updates name, type or parent. The code changes only through
    /// [`AccountRepository::rename`].
    pub async fn update(
        &self,
        id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<Account, CoaError> {
        let input = &input;
        self.store
            .run("account.update", move || async move {
                let mut txn = self.store.begin().await?;
                let account: Account = txn
                    .get(collections::ACCOUNTS, &id.to_string())
                    .await?
                    .ok_or(CoaError::AccountNotFound(id))?;
                let chart = load_chart(txn.as_mut()).await?;
                let referenced = if input.account_type.is_some() {
                    let entries = load_journal(txn.as_mut()).await?;
                    CoaService::reference_count(id, &entries) > 0
                } else {
                    false
                };

                let updated = CoaService::apply_update(&account, input.clone(), &chart, referenced)?;
                txn.set(collections::ACCOUNTS, &id.to_string(), &updated)?;
                txn.commit().await?;
                Ok::<_, CoaError>(updated)
            })
            .await
    }

    /// Changes an account's code, cascading to children and to the cached
    /// code on every journal line that references it.
    pub async fn rename(&self, id: AccountId, new_code: &str) -> Result<Account, CoaError> {
        let plan = self
            .store
            .run("account.rename", move || async move {
                let mut txn = self.store.begin().await?;
                let account: Account = txn
                    .get(collections::ACCOUNTS, &id.to_string())
                    .await?
                    .ok_or(CoaError::AccountNotFound(id))?;
                let chart = load_chart(txn.as_mut()).await?;
                let entries = load_journal(txn.as_mut()).await?;

                let plan = CoaService::plan_rename(&account, new_code, &chart, &entries)?;
                txn.set(collections::ACCOUNTS, &id.to_string(), &plan.account)?;
                for child in &plan.children {
                    txn.set(collections::ACCOUNTS, &child.id.to_string(), child)?;
                }
                for entry in &plan.entries {
                    txn.set(collections::JOURNAL, &entry.id.to_string(), entry)?;
                }
                txn.commit().await?;
                Ok::<_, CoaError>(plan)
            })
            .await?;

        info!(
            account_id = %id,
            code = %plan.account.code,
            children = plan.children.len(),
            entries = plan.entries.len(),
            "Account code renamed"
        );
        Ok(plan.account)
    }

    /// Deletes an account that no journal line references and no account
    /// has as parent.
    pub async fn delete(&self, id: AccountId) -> Result<(), CoaError> {
        self.store
            .run("account.delete", move || async move {
                let mut txn = self.store.begin().await?;
                let account: Account = txn
                    .get(collections::ACCOUNTS, &id.to_string())
                    .await?
                    .ok_or(CoaError::AccountNotFound(id))?;
                let chart = load_chart(txn.as_mut()).await?;
                let entries = load_journal(txn.as_mut()).await?;

                CoaService::validate_delete(&account, &chart, &entries)?;
                txn.delete(collections::ACCOUNTS, &id.to_string());
                txn.commit().await?;
                Ok::<_, CoaError>(())
            })
            .await?;

        info!(account_id = %id, "Account deleted");
        Ok(())
    }
}
