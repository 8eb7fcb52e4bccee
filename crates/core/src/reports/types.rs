//! Report data types.

use koperasi_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::AccountType;
use crate::ledger::NormalBalance;

/// Balance of one account as recomputed from the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Parent code.
    pub parent_code: Option<String>,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Net balance on the normal side.
    pub balance: Decimal,
    /// Balance of the account plus all its descendants.
    pub rollup: Decimal,
}

/// A journal line whose account is not in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanLine {
    /// Entry holding the line.
    pub entry_id: JournalEntryId,
    /// Missing account.
    pub account_id: AccountId,
    /// Cached code on the line.
    pub account_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Output of the projector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projection {
    /// One balance per chart account, ordered by code.
    pub balances: Vec<ProjectedBalance>,
    /// Lines that could not be attributed to any account.
    pub orphans: Vec<OrphanLine>,
}

impl Projection {
    /// Looks up an account's projected balance.
    #[must_use]
    pub fn get(&self, account_id: AccountId) -> Option<&ProjectedBalance> {
        self.balances.iter().find(|b| b.account_id == account_id)
    }
}

/// Trial balance row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Net debit column.
    pub debit: Decimal,
    /// Net credit column.
    pub credit: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Rows with a non-zero balance.
    pub rows: Vec<TrialBalanceRow>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Balance sheet section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<ProjectedBalance>,
}

/// Balance sheet (neraca).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Assets.
    pub assets: BalanceSheetSection,
    /// Liabilities.
    pub liabilities: BalanceSheetSection,
    /// Equity.
    pub equity: BalanceSheetSection,
    /// Revenue minus expense not yet closed to equity.
    pub current_surplus: Decimal,
    /// Liabilities + equity + current surplus.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities and equity.
    pub is_balanced: bool,
}

/// One SHU allocation line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuAllocationLine {
    /// Bucket name.
    pub name: String,
    /// Percent of net surplus.
    pub percent: Decimal,
    /// Allocated amount.
    pub amount: Decimal,
}

/// SHU (sisa hasil usaha) report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShuReport {
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total expense.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_surplus: Decimal,
    /// Allocation by configured buckets (empty when there is no surplus).
    pub allocations: Vec<ShuAllocationLine>,
    /// Surplus left after allocation.
    pub unallocated: Decimal,
}

/// Persisted vs projected balance for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Balance stored on the account.
    pub persisted: Decimal,
    /// Balance recomputed from the journal.
    pub projected: Decimal,
    /// `persisted - projected`.
    pub difference: Decimal,
}

/// Drift check report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Accounts whose persisted balance differs from the projection.
    pub drifted: Vec<DriftLine>,
    /// Number of orphan journal lines.
    pub orphan_lines: usize,
    /// True when nothing drifted and there are no orphans.
    pub is_consistent: bool,
}
