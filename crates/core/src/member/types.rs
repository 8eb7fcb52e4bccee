//! Member and savings domain types.

use chrono::{DateTime, NaiveDate, Utc};
use koperasi_shared::types::{MemberId, RecordId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::EntrySource;

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemberStatus {
    /// Active member: pays mandatory savings and may transact.
    #[default]
    #[serde(rename = "Aktif")]
    Active,
    /// Inactive member: skipped by the monthly batch.
    #[serde(rename = "Nonaktif")]
    Inactive,
}

/// The three savings kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsKind {
    /// Simpanan pokok, paid once on joining. Deposit-only.
    Pokok,
    /// Simpanan wajib, collected monthly by the batch.
    Wajib,
    /// Simpanan sukarela, voluntary.
    Sukarela,
}

impl std::fmt::Display for SavingsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pokok => f.write_str("pokok"),
            Self::Wajib => f.write_str("wajib"),
            Self::Sukarela => f.write_str("sukarela"),
        }
    }
}

/// Direction of a savings posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Money in (setor).
    #[serde(rename = "setor")]
    Deposit,
    /// Money out (tarik).
    #[serde(rename = "tarik")]
    Withdrawal,
}

/// Savings balances held by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavingsBalances {
    /// Simpanan pokok.
    #[serde(rename = "simpananPokok", default)]
    pub pokok: Decimal,
    /// Simpanan wajib.
    #[serde(rename = "simpananWajib", default)]
    pub wajib: Decimal,
    /// Simpanan sukarela.
    #[serde(rename = "simpananSukarela", default)]
    pub sukarela: Decimal,
}

impl SavingsBalances {
    /// Balance of one kind.
    #[must_use]
    pub fn get(&self, kind: SavingsKind) -> Decimal {
        match kind {
            SavingsKind::Pokok => self.pokok,
            SavingsKind::Wajib => self.wajib,
            SavingsKind::Sukarela => self.sukarela,
        }
    }

    /// Mutable balance of one kind.
    pub fn get_mut(&mut self, kind: SavingsKind) -> &mut Decimal {
        match kind {
            SavingsKind::Pokok => &mut self.pokok,
            SavingsKind::Wajib => &mut self.wajib,
            SavingsKind::Sukarela => &mut self.sukarela,
        }
    }

    /// Sum of all three kinds.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.pokok + self.wajib + self.sukarela
    }
}

/// A cooperative member (`anggota` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable identifier.
    pub id: MemberId,
    /// Full name.
    #[serde(rename = "nama")]
    pub name: String,
    /// Unique member number.
    #[serde(rename = "noAnggota")]
    pub member_number: String,
    /// Organizational unit (payroll source).
    #[serde(rename = "unitKerja", default)]
    pub unit: String,
    /// Join date.
    #[serde(rename = "tanggalMasuk")]
    pub join_date: NaiveDate,
    /// Membership status.
    #[serde(default)]
    pub status: MemberStatus,
    /// Savings balances.
    #[serde(flatten)]
    pub savings: SavingsBalances,
}

impl Member {
    /// Returns true if the member is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Audit record for a savings movement (`anggota/{id}/transaksi`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTransaction {
    /// Identifier.
    pub id: RecordId,
    /// When the movement happened.
    #[serde(rename = "tanggal")]
    pub date: DateTime<Utc>,
    /// Savings kind.
    #[serde(rename = "jenis")]
    pub kind: SavingsKind,
    /// Deposit or withdrawal.
    #[serde(rename = "arah")]
    pub direction: Direction,
    /// Amount moved (> 0).
    #[serde(rename = "jumlah")]
    pub amount: Decimal,
    /// Balance of `kind` after the movement.
    #[serde(rename = "saldoSetelah")]
    pub balance_after: Decimal,
    /// Free-text description.
    #[serde(rename = "keterangan", default)]
    pub description: String,
    /// Manual posting or monthly batch.
    #[serde(rename = "sumber", default)]
    pub source: EntrySource,
}

/// Input for registering a member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemberInput {
    /// Full name.
    pub name: String,
    /// Unique member number.
    pub member_number: String,
    /// Organizational unit.
    #[serde(default)]
    pub unit: String,
    /// Join date.
    pub join_date: NaiveDate,
}

/// Input for updating a member's profile.
///
/// Balances are absent: they change only through savings postings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberInput {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New unit.
    #[serde(default)]
    pub unit: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<MemberStatus>,
}

/// Input for a manual savings posting.
#[derive(Debug, Clone, Deserialize)]
pub struct SavingsPostingInput {
    /// Savings kind.
    pub kind: SavingsKind,
    /// Deposit or withdrawal.
    pub direction: Direction,
    /// Amount (> 0).
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}
