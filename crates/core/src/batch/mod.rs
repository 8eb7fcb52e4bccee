//! Monthly payroll-deduction batch.

pub mod error;
pub mod service;
pub mod types;

pub use error::BatchError;
pub use service::BatchService;
pub use types::{ArchiveRow, BatchPlan, BatchRun, BatchTotals, ReportArchive};
