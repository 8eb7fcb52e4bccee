//! Journal entry domain types.

use chrono::{DateTime, Utc};
use koperasi_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a journal entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Posted by a user.
    #[default]
    Manual,
    /// Synthesized by the monthly batch. Immutable once written.
    MonthlyBatch,
}

/// A single line of a journal entry.
///
/// The account code and name are cached copies taken when the line is
/// posted; the account id is the authoritative reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Referenced account.
    #[serde(rename = "akunId")]
    pub account_id: AccountId,
    /// Cached account code.
    #[serde(rename = "kodeAkun", default)]
    pub account_code: String,
    /// Cached account name.
    #[serde(rename = "namaAkun", default)]
    pub account_name: String,
    /// Debit amount (>= 0).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (>= 0).
    #[serde(rename = "kredit", default)]
    pub credit: Decimal,
}

impl JournalLine {
    /// Returns the signed amount (debit positive, credit negative).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A balanced journal entry (`jurnal_umum` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// When the entry was posted.
    #[serde(rename = "tanggal")]
    pub date: DateTime<Utc>,
    /// Free-text description.
    #[serde(rename = "deskripsi")]
    pub description: String,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
    /// Origin of the entry.
    #[serde(rename = "sumber", default)]
    pub source: EntrySource,
    /// Period token ("YYYY-MM") for batch entries.
    #[serde(rename = "periode", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl JournalEntry {
    /// Returns true if the entry was generated by the monthly batch.
    #[must_use]
    pub fn is_system_generated(&self) -> bool {
        self.source == EntrySource::MonthlyBatch
    }

    /// Returns true if any line references the account.
    #[must_use]
    pub fn references(&self, account_id: AccountId) -> bool {
        self.lines.iter().any(|l| l.account_id == account_id)
    }

    /// Rewrites the cached code on every line referencing the account.
    ///
    /// Returns the number of lines changed.
    pub fn relabel_account(&mut self, account_id: AccountId, new_code: &str) -> usize {
        let mut changed = 0;
        for line in self.lines.iter_mut().filter(|l| l.account_id == account_id) {
            if line.account_code != new_code {
                new_code.clone_into(&mut line.account_code);
                changed += 1;
            }
        }
        changed
    }
}
