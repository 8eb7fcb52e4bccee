//! Double-entry bookkeeping logic.
//!
//! This module implements the journal engine:
//! - Journal entries and lines
//! - Normal-side balance rules
//! - Journal validation
//! - Post/edit/delete planning against an account snapshot

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, NormalBalance};
pub use entry::{EntrySource, JournalEntry, JournalLine};
pub use error::LedgerError;
pub use service::{AccountSnapshot, JournalPlan, LedgerService};
pub use types::{JournalLineInput, PostJournalInput, TransactionTotals};
pub use validation::validate_journal;
