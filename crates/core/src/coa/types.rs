//! Chart of accounts domain types.

use koperasi_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ledger::balance::NormalBalance;

/// Account classification.
///
/// The type alone decides the account's normal balance side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Asset (harta).
    Asset,
    /// Liability (kewajiban).
    Liability,
    /// Equity (ekuitas / modal).
    Equity,
    /// Revenue (pendapatan).
    Revenue,
    /// Expense (beban).
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the normal balance side for this type.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns the canonical name used in documents and the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// A ledger account in the chart of accounts.
///
/// The normal balance side is not stored on the struct: it is always derived
/// from `account_type`. The persisted document carries a `saldo_normal`
/// field for readers, but it is recomputed on write and ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AccountDocument", into = "AccountDocument")]
pub struct Account {
    /// Stable identifier.
    pub id: AccountId,
    /// Unique hierarchical code, e.g. "1-1200".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Code of the parent account, if any. The parent may not exist yet.
    pub parent_code: Option<String>,
    /// Running balance, signed on the account's normal side.
    pub balance: Decimal,
}

impl Account {
    /// Returns the normal balance side derived from the account type.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }

    /// Returns true if this account is a top-level section.
    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent_code.is_none()
    }

    /// Applies a posting to the running balance using the normal side rule.
    pub fn apply(&mut self, debit: Decimal, credit: Decimal) {
        self.balance += self.normal_balance().balance_change(debit, credit);
    }

    /// Undoes a posting previously applied with [`Account::apply`].
    pub fn reverse(&mut self, debit: Decimal, credit: Decimal) {
        self.balance -= self.normal_balance().balance_change(debit, credit);
    }
}

/// Persisted shape of an account (`chart_of_accounts` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountDocument {
    id: AccountId,
    #[serde(rename = "kode")]
    code: String,
    #[serde(rename = "nama")]
    name: String,
    #[serde(rename = "tipe")]
    account_type: AccountType,
    #[serde(rename = "kodeInduk", default)]
    parent_code: Option<String>,
    #[serde(rename = "saldo_normal", default = "default_normal_balance")]
    normal_balance: NormalBalance,
    #[serde(rename = "saldo", default)]
    balance: Decimal,
}

const fn default_normal_balance() -> NormalBalance {
    NormalBalance::Debit
}

impl From<AccountDocument> for Account {
    fn from(doc: AccountDocument) -> Self {
        Self {
            id: doc.id,
            code: doc.code,
            name: doc.name,
            account_type: doc.account_type,
            parent_code: doc.parent_code.filter(|p| !p.trim().is_empty()),
            balance: doc.balance,
        }
    }
}

impl From<Account> for AccountDocument {
    fn from(account: Account) -> Self {
        Self {
            normal_balance: account.normal_balance(),
            id: account.id,
            code: account.code,
            name: account.name,
            account_type: account.account_type,
            parent_code: account.parent_code,
            balance: account.balance,
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account code.
    #[serde(default)]
    pub parent_code: Option<String>,
}

/// Input for updating an account.
///
/// The code is deliberately absent: codes change only through the rename
/// operation, which cascades to children.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountInput {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New account type (only while no journal line references the account).
    #[serde(default)]
    pub account_type: Option<AccountType>,
    /// New parent code; `Some(None)` (an explicit `null`) detaches the account.
    #[serde(default, deserialize_with = "present")]
    pub parent_code: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
