//! Repository layer over the document store.
//!
//! Each repository runs its write paths as retried optimistic transactions
//! and delegates every business rule to `koperasi-core`.

pub mod account;
pub mod archive;
pub mod batch;
pub mod contract;
pub mod journal;
pub mod member;
pub mod report;
pub mod settings;

pub use account::AccountRepository;
pub use archive::ArchiveRepository;
pub use batch::BatchRepository;
pub use contract::ContractRepository;
pub use journal::JournalRepository;
pub use member::MemberRepository;
pub use report::ReportRepository;
pub use settings::{SettingsHandle, SettingsRepoError, SettingsRepository};
