//! Core business logic for Koperasi.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Services here plan changes against snapshots; the storage layer loads the
//! snapshots inside a transaction and writes back what the plans return.
//!
//! # Modules
//!
//! - `ledger` - Double-entry journal posting and balance maintenance
//! - `coa` - Chart of accounts hierarchy
//! - `member` - Member records and savings
//! - `financing` - Murabahah pricing and contract lifecycle
//! - `batch` - Monthly payroll deduction run
//! - `reports` - Trial balance, balance sheet, SHU and drift checks
//! - `settings` - Cooperative-wide configuration

pub mod batch;
pub mod coa;
pub mod financing;
pub mod ledger;
pub mod member;
pub mod reports;
pub mod settings;

pub use settings::{CooperativeSettings, SettingsError};
