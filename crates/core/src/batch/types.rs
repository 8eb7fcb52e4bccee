//! Monthly batch domain types.

use chrono::{DateTime, Utc};
use koperasi_shared::types::{ArchiveId, ContractId, JournalEntryId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::Account;
use crate::financing::{Contract, ContractPayment};
use crate::ledger::JournalEntry;
use crate::member::{Member, SavingsTransaction};

/// Amounts collected by one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Mandatory savings collected.
    #[serde(rename = "simpananWajib")]
    pub mandatory_savings: Decimal,
    /// Installment principal collected.
    #[serde(rename = "angsuranPokok")]
    pub principal: Decimal,
    /// Installment margin collected.
    #[serde(rename = "angsuranMargin")]
    pub margin: Decimal,
}

impl BatchTotals {
    /// Sum of all three.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.mandatory_savings + self.principal + self.margin
    }
}

/// One member's row in the archived report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRow {
    /// Member.
    #[serde(rename = "anggotaId")]
    pub member_id: MemberId,
    /// Member name.
    #[serde(rename = "nama")]
    pub name: String,
    /// Member number.
    #[serde(rename = "noAnggota")]
    pub member_number: String,
    /// Organizational unit.
    #[serde(rename = "unitKerja")]
    pub unit: String,
    /// Mandatory savings deducted.
    #[serde(rename = "simpananWajib")]
    pub mandatory_savings: Decimal,
    /// Installment principal deducted.
    #[serde(rename = "angsuranPokok")]
    pub principal: Decimal,
    /// Installment margin deducted.
    #[serde(rename = "angsuranMargin")]
    pub margin: Decimal,
    /// Total payroll deduction.
    #[serde(rename = "totalPotongan")]
    pub total: Decimal,
}

/// Immutable snapshot of one batch run (`laporan_arsip` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportArchive {
    /// Identifier.
    pub id: ArchiveId,
    /// Report title.
    #[serde(rename = "namaLaporan")]
    pub name: String,
    /// When it was generated.
    #[serde(rename = "tanggalDibuat")]
    pub created_at: DateTime<Utc>,
    /// Period token "YYYY-MM".
    #[serde(rename = "periode")]
    pub period: String,
    /// One row per active member.
    #[serde(rename = "dataLaporan")]
    pub rows: Vec<ArchiveRow>,
}

/// Marker proving a period has been processed (`batch_runs/{period}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRun {
    /// Period token "YYYY-MM"; also the document id.
    #[serde(rename = "periode")]
    pub period: String,
    /// When the batch committed.
    #[serde(rename = "dijalankanPada")]
    pub run_at: DateTime<Utc>,
    /// Journal entry posted, if any amount was collected.
    #[serde(rename = "jurnalId", default)]
    pub entry_id: Option<JournalEntryId>,
    /// Archive written.
    #[serde(rename = "arsipId")]
    pub archive_id: ArchiveId,
    /// Active members processed.
    #[serde(rename = "jumlahAnggota")]
    pub members_processed: usize,
    /// Running contracts collected.
    #[serde(rename = "jumlahKontrak")]
    pub contracts_processed: usize,
    /// Collected amounts.
    #[serde(rename = "total")]
    pub totals: BatchTotals,
}

/// Everything one batch run writes, in a single transaction.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    /// Updated active members.
    pub members: Vec<Member>,
    /// Savings audit records, per member.
    pub savings_records: Vec<(MemberId, SavingsTransaction)>,
    /// Updated contracts.
    pub contracts: Vec<Contract>,
    /// Payment records, per contract.
    pub payments: Vec<(ContractId, ContractPayment)>,
    /// The aggregate journal entry; absent when nothing was collected.
    pub entry: Option<JournalEntry>,
    /// Batch accounts with their new balances.
    pub accounts: Vec<Account>,
    /// Archived report.
    pub archive: ReportArchive,
    /// Run marker.
    pub marker: BatchRun,
}
