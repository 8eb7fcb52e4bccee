//! Shared setup for store-backed tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use koperasi_core::coa::Account;
use koperasi_core::settings::CooperativeSettings;
use koperasi_db::seed::seed_defaults;
use koperasi_db::{
    AccountRepository, ArchiveRepository, BatchRepository, ContractRepository, JournalRepository,
    MemberRepository, ReportRepository, SettingsHandle, StoreClient,
};

/// Every repository over one seeded memory store.
pub struct Ctx {
    pub store: StoreClient,
    pub settings: SettingsHandle,
    pub accounts: AccountRepository,
    pub journal: JournalRepository,
    pub members: MemberRepository,
    pub contracts: ContractRepository,
    pub batch: BatchRepository,
    pub archives: ArchiveRepository,
    pub reports: ReportRepository,
}

pub async fn setup_with_retries(max_retries: u32) -> Ctx {
    let store = StoreClient::memory(max_retries);
    seed_defaults(&store).await.unwrap();
    let settings = SettingsHandle::new(CooperativeSettings::default());

    Ctx {
        accounts: AccountRepository::new(store.clone()),
        journal: JournalRepository::new(store.clone()),
        members: MemberRepository::new(store.clone()),
        contracts: ContractRepository::new(store.clone(), settings.clone()),
        batch: BatchRepository::new(store.clone(), settings.clone()),
        archives: ArchiveRepository::new(store.clone()),
        reports: ReportRepository::new(store.clone(), settings.clone()),
        settings,
        store,
    }
}

pub async fn setup() -> Ctx {
    setup_with_retries(5).await
}

impl Ctx {
    pub async fn account(&self, code: &str) -> Account {
        self.accounts
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|a| a.code == code)
            .unwrap_or_else(|| panic!("account {code} not seeded"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
