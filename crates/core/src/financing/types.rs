//! Financing contract domain types.

use chrono::{DateTime, NaiveDate, Utc};
use koperasi_shared::types::{ContractId, MemberId, RecordId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::EntrySource;

/// Contract status along Review -> Approved -> Akad -> Berjalan -> {Lunas | Macet}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Submitted, awaiting review.
    Review,
    /// Approved by the committee.
    Approved,
    /// Contract signed.
    Akad,
    /// Installments running.
    Berjalan,
    /// Fully paid.
    Lunas,
    /// Defaulted.
    Macet,
}

impl ContractStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Review => 0,
            Self::Approved => 1,
            Self::Akad => 2,
            Self::Berjalan => 3,
            Self::Lunas | Self::Macet => 4,
        }
    }

    /// Lunas and Macet are terminal.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Lunas | Self::Macet)
    }

    /// Whether `next` is the following step in the chain.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.rank() == self.rank() + 1
    }
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Review => "Review",
            Self::Approved => "Approved",
            Self::Akad => "Akad",
            Self::Berjalan => "Berjalan",
            Self::Lunas => "Lunas",
            Self::Macet => "Macet",
        };
        f.write_str(name)
    }
}

/// A Murabahah financing contract (`kontrak_murabahah` collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Identifier.
    pub id: ContractId,
    /// Financed member.
    #[serde(rename = "anggotaId")]
    pub member_id: MemberId,
    /// Item being financed.
    #[serde(rename = "namaBarang")]
    pub item: String,
    /// Cost price (harga pokok).
    #[serde(rename = "hargaPokok")]
    pub cost_price: Decimal,
    /// Total margin.
    pub margin: Decimal,
    /// Sale price = cost price + margin.
    #[serde(rename = "hargaJual")]
    pub sale_price: Decimal,
    /// Down payment.
    #[serde(rename = "uangMuka", default)]
    pub down_payment: Decimal,
    /// Tenor in months.
    pub tenor: u32,
    /// Monthly installment.
    #[serde(rename = "angsuran")]
    pub installment: Decimal,
    /// Contract date.
    #[serde(rename = "tanggalAkad")]
    pub contract_date: NaiveDate,
    /// Lifecycle status.
    pub status: ContractStatus,
    /// Installments paid so far.
    #[serde(rename = "angsuranDibayar", default)]
    pub paid_installments: u32,
    /// Principal still owed.
    #[serde(rename = "sisaPokok")]
    pub outstanding_principal: Decimal,
    /// Margin still owed.
    #[serde(rename = "sisaMargin")]
    pub outstanding_margin: Decimal,
}

impl Contract {
    /// Financed principal (cost price less down payment).
    #[must_use]
    pub fn financed_principal(&self) -> Decimal {
        self.cost_price - self.down_payment
    }

    /// Returns true while installments are being collected.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == ContractStatus::Berjalan
    }
}

/// Payment record for one installment (`kontrak_murabahah/{id}/transaksi`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPayment {
    /// Identifier.
    pub id: RecordId,
    /// When it was collected.
    #[serde(rename = "tanggal")]
    pub date: DateTime<Utc>,
    /// Installment number (1-based).
    #[serde(rename = "angsuranKe")]
    pub installment_number: u32,
    /// Principal portion.
    #[serde(rename = "pokok")]
    pub principal: Decimal,
    /// Margin portion.
    pub margin: Decimal,
    /// Principal + margin.
    pub total: Decimal,
    /// Principal owed after this payment.
    #[serde(rename = "sisaPokok")]
    pub outstanding_principal: Decimal,
    /// Margin owed after this payment.
    #[serde(rename = "sisaMargin")]
    pub outstanding_margin: Decimal,
    /// Batch period token, if collected by the batch.
    #[serde(rename = "periode", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Origin.
    #[serde(rename = "sumber", default)]
    pub source: EntrySource,
}

/// Input for a financing quote.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteInput {
    /// Cost price.
    pub principal: Decimal,
    /// Tenor in months.
    pub tenor: u32,
    /// Down payment.
    #[serde(default)]
    pub down_payment: Decimal,
}

/// Input for creating a contract.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContractInput {
    /// Financed member.
    pub member_id: MemberId,
    /// Item being financed.
    pub item: String,
    /// Cost price.
    pub cost_price: Decimal,
    /// Tenor in months.
    pub tenor: u32,
    /// Down payment.
    #[serde(default)]
    pub down_payment: Decimal,
    /// Contract date; defaults to today.
    #[serde(default)]
    pub contract_date: Option<NaiveDate>,
}

/// Input for a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusInput {
    /// Target status.
    pub status: ContractStatus,
    /// Skip the chain check.
    #[serde(default)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_monotonic() {
        use ContractStatus::*;
        assert!(Review.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Akad));
        assert!(Akad.can_transition_to(Berjalan));
        assert!(Berjalan.can_transition_to(Lunas));
        assert!(Berjalan.can_transition_to(Macet));

        assert!(!Review.can_transition_to(Akad));
        assert!(!Berjalan.can_transition_to(Review));
        assert!(!Lunas.can_transition_to(Macet));
        assert!(!Macet.can_transition_to(Lunas));
        assert!(!Review.can_transition_to(Review));
    }
}
