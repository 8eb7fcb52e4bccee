//! Report repository.
//!
//! Reads the chart and the full journal in one transaction and hands them
//! to the projector. The read-only transaction is still committed so that
//! both collections come from the same point in time.

use koperasi_core::coa::Account;
use koperasi_core::ledger::JournalEntry;
use koperasi_core::reports::{
    BalanceSheetReport, DriftReport, Projection, ReportService, ShuReport, TrialBalanceReport,
};
use tracing::warn;

use super::account::{load_chart, load_journal};
use super::settings::SettingsHandle;
use crate::store::{StoreClient, StoreError};

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: StoreClient,
    settings: SettingsHandle,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(store: StoreClient, settings: SettingsHandle) -> Self {
        Self { store, settings }
    }

    async fn snapshot(&self) -> Result<(Vec<Account>, Vec<JournalEntry>), StoreError> {
        self.store
            .run("report.snapshot", move || async move {
                let mut txn = self.store.begin().await?;
                let chart = load_chart(txn.as_mut()).await?;
                let entries = load_journal(txn.as_mut()).await?;
                txn.commit().await?;
                Ok::<_, StoreError>((chart, entries))
            })
            .await
    }

    /// Balances recomputed from the journal.
    pub async fn balances(&self) -> Result<Projection, StoreError> {
        let (chart, entries) = self.snapshot().await?;
        let projection = ReportService::project(&chart, &entries);
        if !projection.orphans.is_empty() {
            warn!(orphans = projection.orphans.len(), "Journal lines reference unknown accounts");
        }
        Ok(projection)
    }

    /// Trial balance.
    pub async fn trial_balance(&self) -> Result<TrialBalanceReport, StoreError> {
        Ok(ReportService::trial_balance(&self.balances().await?))
    }

    /// Balance sheet.
    pub async fn balance_sheet(&self) -> Result<BalanceSheetReport, StoreError> {
        Ok(ReportService::balance_sheet(&self.balances().await?))
    }

    /// SHU with allocation by the current settings.
    pub async fn shu(&self) -> Result<ShuReport, StoreError> {
        let projection = self.balances().await?;
        let settings = self.settings.current().await;
        Ok(ReportService::shu(&projection, &settings))
    }

    /// Persisted vs projected balances.
    pub async fn drift(&self) -> Result<DriftReport, StoreError> {
        let (chart, entries) = self.snapshot().await?;
        let projection = ReportService::project(&chart, &entries);
        let report = ReportService::drift(&chart, &projection);
        if !report.is_consistent {
            warn!(
                drifted = report.drifted.len(),
                orphans = report.orphan_lines,
                "Persisted balances drift from the journal"
            );
        }
        Ok(report)
    }
}
