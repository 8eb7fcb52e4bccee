//! Default chart of accounts and settings.
//!
//! Seeding is idempotent: accounts whose code already exists are left alone
//! and stored settings are never overwritten.

use koperasi_core::coa::{AccountType, CoaError, CreateAccountInput};
use tracing::info;

use crate::repositories::{AccountRepository, SettingsHandle, SettingsRepository};
use crate::store::{StoreClient, StoreError};

/// `(code, name, type, parent)`.
const DEFAULT_CHART: &[(&str, &str, AccountType, Option<&str>)] = &[
    ("1", "Aset", AccountType::Asset, None),
    ("1-1000", "Aset Lancar", AccountType::Asset, Some("1")),
    ("1-1100", "Kas", AccountType::Asset, Some("1-1000")),
    ("1-1200", "Piutang Murabahah", AccountType::Asset, Some("1-1000")),
    ("1-1300", "Piutang Potongan Gaji", AccountType::Asset, Some("1-1000")),
    ("2", "Kewajiban", AccountType::Liability, None),
    ("2-1000", "Kewajiban Lancar", AccountType::Liability, Some("2")),
    ("2-1100", "Simpanan Sukarela", AccountType::Liability, Some("2-1000")),
    ("3", "Ekuitas", AccountType::Equity, None),
    ("3-1000", "Modal Anggota", AccountType::Equity, Some("3")),
    ("3-1100", "Simpanan Pokok", AccountType::Equity, Some("3-1000")),
    ("3-1200", "Simpanan Wajib", AccountType::Equity, Some("3-1000")),
    ("3-2000", "Cadangan", AccountType::Equity, Some("3")),
    ("4", "Pendapatan", AccountType::Revenue, None),
    ("4-1000", "Pendapatan Usaha", AccountType::Revenue, Some("4")),
    ("4-1100", "Pendapatan Margin Murabahah", AccountType::Revenue, Some("4-1000")),
    ("5", "Beban", AccountType::Expense, None),
    ("5-1000", "Beban Operasional", AccountType::Expense, Some("5")),
    ("5-1100", "Beban Gaji", AccountType::Expense, Some("5-1000")),
];

/// The default chart as create inputs, parents first.
#[must_use]
pub fn default_chart() -> Vec<CreateAccountInput> {
    DEFAULT_CHART
        .iter()
        .map(|(code, name, account_type, parent)| CreateAccountInput {
            code: (*code).to_string(),
            name: (*name).to_string(),
            account_type: *account_type,
            parent_code: parent.map(str::to_string),
        })
        .collect()
}

/// What a seeding run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Accounts created.
    pub accounts_created: usize,
    /// Whether default settings were written.
    pub settings_written: bool,
}

/// Seeding failures.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Account creation failed.
    #[error(transparent)]
    Account(#[from] CoaError),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Creates missing default accounts and default settings.
pub async fn seed_defaults(store: &StoreClient) -> Result<SeedSummary, SeedError> {
    let accounts = AccountRepository::new(store.clone());
    let existing: Vec<String> = accounts.list().await?.into_iter().map(|a| a.code).collect();

    let mut summary = SeedSummary::default();
    for input in default_chart() {
        if existing.contains(&input.code) {
            continue;
        }
        accounts.create(input).await?;
        summary.accounts_created += 1;
    }

    let settings = SettingsRepository::new(store.clone(), SettingsHandle::default());
    summary.settings_written = settings.seed_defaults().await?;

    info!(
        accounts_created = summary.accounts_created,
        settings_written = summary.settings_written,
        "Default data seeded"
    );
    Ok(summary)
}
