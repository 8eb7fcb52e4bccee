//! Monthly payroll deduction run.
//!
//! One store transaction reads the period marker, every member, every
//! contract and the chart, then writes member balances, savings records,
//! contracts, payment records, the aggregate journal entry, the four batch
//! account balances, the report archive and the marker. Two overlapping runs
//! for one period cannot both commit: the loser retries, sees the marker and
//! fails with `AlreadyRun`.

use chrono::{NaiveDate, Utc};
use koperasi_core::batch::{BatchError, BatchRun, BatchService};
use koperasi_core::financing::Contract;
use koperasi_core::member::Member;
use tracing::{info, warn};

use super::account::load_chart;
use super::settings::SettingsHandle;
use crate::store::{StoreClient, collections};

/// Batch repository.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    store: StoreClient,
    settings: SettingsHandle,
}

impl BatchRepository {
    /// Creates a new batch repository.
    #[must_use]
    pub const fn new(store: StoreClient, settings: SettingsHandle) -> Self {
        Self { store, settings }
    }

    /// Runs the batch for the month containing `as_of`.
    pub async fn run(&self, as_of: NaiveDate) -> Result<BatchRun, BatchError> {
        let settings = self.settings.current().await;
        let settings = &settings;
        let period = BatchService::period_token(as_of);
        let period = period.as_str();

        let result = self
            .store
            .run("batch.run", move || async move {
                let mut txn = self.store.begin().await?;
                let marker: Option<BatchRun> = txn.get(collections::BATCH_RUNS, period).await?;
                let members: Vec<Member> = txn.query(collections::MEMBERS).await?;
                let contracts: Vec<Contract> = txn.query(collections::CONTRACTS).await?;
                let chart = load_chart(txn.as_mut()).await?;

                let plan = BatchService::plan(
                    as_of,
                    Utc::now(),
                    marker.as_ref(),
                    &members,
                    &contracts,
                    &chart,
                    settings,
                )?;

                for member in &plan.members {
                    txn.set(collections::MEMBERS, &member.id.to_string(), member)?;
                }
                for (member_id, record) in &plan.savings_records {
                    txn.set(
                        &collections::member_transactions(member_id),
                        &record.id.to_string(),
                        record,
                    )?;
                }
                for contract in &plan.contracts {
                    txn.set(collections::CONTRACTS, &contract.id.to_string(), contract)?;
                }
                for (contract_id, payment) in &plan.payments {
                    txn.set(
                        &collections::contract_payments(contract_id),
                        &payment.id.to_string(),
                        payment,
                    )?;
                }
                if let Some(entry) = &plan.entry {
                    txn.set(collections::JOURNAL, &entry.id.to_string(), entry)?;
                    for account in &plan.accounts {
                        txn.set(collections::ACCOUNTS, &account.id.to_string(), account)?;
                    }
                }
                txn.set(collections::ARCHIVES, &plan.archive.id.to_string(), &plan.archive)?;
                txn.set(collections::BATCH_RUNS, period, &plan.marker)?;
                txn.commit().await?;
                Ok::<_, BatchError>(plan.marker)
            })
            .await;

        match result {
            Ok(marker) => {
                info!(
                    period = %marker.period,
                    members = marker.members_processed,
                    contracts = marker.contracts_processed,
                    total = %marker.totals.grand_total(),
                    "Monthly batch committed"
                );
                Ok(marker)
            }
            Err(err) => {
                warn!(period, error = %err, "Monthly batch failed");
                Err(err)
            }
        }
    }

    /// Marker of a past run.
    pub async fn get_run(&self, period: &str) -> Result<Option<BatchRun>, BatchError> {
        let mut txn = self.store.begin().await?;
        Ok(txn.get(collections::BATCH_RUNS, period).await?)
    }

    /// Every past run, newest period first.
    pub async fn list_runs(&self) -> Result<Vec<BatchRun>, BatchError> {
        let mut txn = self.store.begin().await?;
        let mut runs: Vec<BatchRun> = txn.query(collections::BATCH_RUNS).await?;
        runs.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(runs)
    }
}
