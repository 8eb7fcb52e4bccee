//! Cooperative settings (`pengaturan/umum`).
//!
//! Loaded once by the host and passed by value into the financing
//! calculator and the batch processor.

use std::collections::BTreeMap;

use koperasi_shared::AppError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tenor-banded margin rates, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginRates {
    /// Tenor up to 6 months.
    #[serde(rename = "marginA")]
    pub a: Decimal,
    /// Tenor up to 12 months.
    #[serde(rename = "marginB")]
    pub b: Decimal,
    /// Tenor up to 18 months.
    #[serde(rename = "marginC")]
    pub c: Decimal,
    /// Longer tenors.
    #[serde(rename = "marginD")]
    pub d: Decimal,
}

impl Default for MarginRates {
    fn default() -> Self {
        Self {
            a: dec!(10),
            b: dec!(15),
            c: dec!(20),
            d: dec!(25),
        }
    }
}

/// Account codes the monthly batch posts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchAccountCodes {
    /// Debited for the grand total (piutang potongan gaji).
    #[serde(rename = "piutangGaji")]
    pub payroll_receivable: String,
    /// Credited with mandatory savings.
    #[serde(rename = "simpananWajib")]
    pub mandatory_savings: String,
    /// Credited with installment principal.
    #[serde(rename = "piutangMurabahah")]
    pub financing_receivable: String,
    /// Credited with installment margin.
    #[serde(rename = "pendapatanMargin")]
    pub margin_income: String,
}

impl Default for BatchAccountCodes {
    fn default() -> Self {
        Self {
            payroll_receivable: "1-1300".to_string(),
            mandatory_savings: "3-1200".to_string(),
            financing_receivable: "1-1200".to_string(),
            margin_income: "4-1100".to_string(),
        }
    }
}

impl BatchAccountCodes {
    /// All four codes in posting order.
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [
            &self.payroll_receivable,
            &self.mandatory_savings,
            &self.financing_receivable,
            &self.margin_income,
        ]
    }
}

/// One SHU (sisa hasil usaha) allocation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuAllocation {
    /// Bucket name, e.g. "Dana Cadangan".
    #[serde(rename = "nama")]
    pub name: String,
    /// Share of net surplus, in percent.
    #[serde(rename = "persen")]
    pub percent: Decimal,
}

/// The cooperative's configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CooperativeSettings {
    /// Margin rates by tenor band.
    #[serde(flatten)]
    pub margin_rates: MarginRates,
    /// Monthly mandatory savings per active member.
    #[serde(rename = "simpananWajib")]
    pub mandatory_savings: Decimal,
    /// Financing ceiling as a multiple of a member's total savings.
    #[serde(rename = "plafonMultiplier")]
    pub ceiling_multiplier: Decimal,
    /// Accounts used by the monthly batch.
    #[serde(rename = "akunBatch")]
    pub batch_accounts: BatchAccountCodes,
    /// SHU distribution buckets.
    #[serde(rename = "alokasiShu")]
    pub shu_allocation: Vec<ShuAllocation>,
    /// Menu access by role.
    #[serde(rename = "menuAkses")]
    pub menu_access: BTreeMap<String, Vec<String>>,
}

impl Default for CooperativeSettings {
    fn default() -> Self {
        let bucket = |name: &str, percent: Decimal| ShuAllocation {
            name: name.to_string(),
            percent,
        };
        let menus = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let mut menu_access = BTreeMap::new();
        menu_access.insert(
            "admin".to_string(),
            menus(&[
                "dashboard",
                "anggota",
                "simpanan",
                "pembiayaan",
                "akuntansi",
                "proses_bulanan",
                "laporan",
                "pengaturan",
            ]),
        );
        menu_access.insert(
            "pengurus".to_string(),
            menus(&["dashboard", "anggota", "pembiayaan", "laporan"]),
        );
        menu_access.insert(
            "anggota".to_string(),
            menus(&["dashboard", "simpanan", "pembiayaan"]),
        );

        Self {
            margin_rates: MarginRates::default(),
            mandatory_savings: dec!(100000),
            ceiling_multiplier: dec!(3),
            batch_accounts: BatchAccountCodes::default(),
            shu_allocation: vec![
                bucket("Dana Cadangan", dec!(25)),
                bucket("Jasa Modal", dec!(30)),
                bucket("Jasa Usaha", dec!(25)),
                bucket("Dana Pengurus", dec!(5)),
                bucket("Dana Karyawan", dec!(5)),
                bucket("Dana Pendidikan", dec!(5)),
                bucket("Dana Sosial", dec!(5)),
            ],
            menu_access,
        }
    }
}

/// Invalid settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// A rate or amount is negative.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// The ceiling multiplier is not positive.
    #[error("Financing ceiling multiplier must be greater than zero")]
    InvalidMultiplier,

    /// A batch account code is blank.
    #[error("Batch account code for {0} must not be empty")]
    EmptyAccountCode(&'static str),

    /// SHU percentages exceed 100.
    #[error("SHU allocation totals {0}%, which exceeds 100%")]
    AllocationExceeds(Decimal),
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl CooperativeSettings {
    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let rates = &self.margin_rates;
        for (label, value) in [
            ("Margin A", rates.a),
            ("Margin B", rates.b),
            ("Margin C", rates.c),
            ("Margin D", rates.d),
            ("Mandatory savings", self.mandatory_savings),
        ] {
            if value < Decimal::ZERO {
                return Err(SettingsError::Negative(label));
            }
        }

        if self.ceiling_multiplier <= Decimal::ZERO {
            return Err(SettingsError::InvalidMultiplier);
        }

        let labels = [
            "payroll receivable",
            "mandatory savings",
            "financing receivable",
            "margin income",
        ];
        for (label, code) in labels.into_iter().zip(self.batch_accounts.all()) {
            if code.trim().is_empty() {
                return Err(SettingsError::EmptyAccountCode(label));
            }
        }

        if self.shu_allocation.iter().any(|b| b.percent < Decimal::ZERO) {
            return Err(SettingsError::Negative("SHU allocation"));
        }
        let total: Decimal = self.shu_allocation.iter().map(|b| b.percent).sum();
        if total > Decimal::ONE_HUNDRED {
            return Err(SettingsError::AllocationExceeds(total));
        }
        Ok(())
    }

    /// Menus visible to a role; unknown roles see nothing.
    #[must_use]
    pub fn menus_for(&self, role: &str) -> &[String] {
        self.menu_access.get(role).map(Vec::as_slice).unwrap_or(&[])
    }
}
