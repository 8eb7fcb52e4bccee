//! Reporting projector.
//!
//! Pure business logic deriving reports from the journal:
//! - Projected balances with recursive section rollups
//! - Trial Balance
//! - Balance Sheet
//! - SHU (sisa hasil usaha) with allocation
//! - Drift check between persisted and projected balances

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
