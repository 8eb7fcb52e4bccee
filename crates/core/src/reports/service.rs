//! Report generation service.
//!
//! Everything here is derived from a chart snapshot and the full journal.

use std::collections::HashMap;

use koperasi_shared::types::{AccountId, round_money};
use rust_decimal::Decimal;

use super::types::{
    BalanceSheetReport, BalanceSheetSection, DriftLine, DriftReport, OrphanLine,
    ProjectedBalance, Projection, ShuAllocationLine, ShuReport, TrialBalanceReport,
    TrialBalanceRow, TrialBalanceTotals,
};
use crate::coa::{Account, AccountTree, AccountType};
use crate::ledger::{AccountBalance, JournalEntry};
use crate::settings::CooperativeSettings;

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Recomputes every account's balance by folding all journal lines.
    ///
    /// The fold is debit-positive; each balance is then expressed on the
    /// account's normal side so it matches the persisted balance.
    #[must_use]
    pub fn project(chart: &[Account], entries: &[JournalEntry]) -> Projection {
        let mut folds: HashMap<AccountId, AccountBalance> = chart
            .iter()
            .map(|a| (a.id, AccountBalance::new(a.id)))
            .collect();
        let mut orphans = Vec::new();

        for entry in entries {
            for line in &entry.lines {
                match folds.get_mut(&line.account_id) {
                    Some(fold) => fold.add_line(line.debit, line.credit),
                    None => orphans.push(OrphanLine {
                        entry_id: entry.id,
                        account_id: line.account_id,
                        account_code: line.account_code.clone(),
                        debit: line.debit,
                        credit: line.credit,
                    }),
                }
            }
        }

        let on_side: HashMap<AccountId, Decimal> = chart
            .iter()
            .filter_map(|a| folds.get(&a.id).map(|f| (a.id, f.on_side(a.normal_balance()))))
            .collect();
        let tree = AccountTree::new(chart);

        let mut balances: Vec<ProjectedBalance> = chart
            .iter()
            .filter_map(|account| {
                let fold = folds.get(&account.id)?;
                Some(ProjectedBalance {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    parent_code: account.parent_code.clone(),
                    account_type: account.account_type,
                    normal_balance: account.normal_balance(),
                    total_debit: fold.debit_total,
                    total_credit: fold.credit_total,
                    balance: fold.on_side(account.normal_balance()),
                    rollup: tree.rollup(&account.code, &on_side),
                })
            })
            .collect();
        balances.sort_by(|a, b| a.code.cmp(&b.code));

        Projection { balances, orphans }
    }

    /// Generates a trial balance from a projection.
    ///
    /// Each account lands in the debit or credit column by the sign of its
    /// debit-positive net; zero accounts are left out.
    #[must_use]
    pub fn trial_balance(projection: &Projection) -> TrialBalanceReport {
        let rows: Vec<TrialBalanceRow> = projection
            .balances
            .iter()
            .filter_map(|b| {
                let raw = b.total_debit - b.total_credit;
                if raw.is_zero() {
                    return None;
                }
                Some(TrialBalanceRow {
                    account_id: b.account_id,
                    code: b.code.clone(),
                    name: b.name.clone(),
                    account_type: b.account_type,
                    debit: raw.max(Decimal::ZERO),
                    credit: (-raw).max(Decimal::ZERO),
                })
            })
            .collect();

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        TrialBalanceReport {
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates a balance sheet. Revenue and expense are folded into the
    /// current surplus line.
    #[must_use]
    pub fn balance_sheet(projection: &Projection) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut current_surplus = Decimal::ZERO;

        for balance in &projection.balances {
            match balance.account_type {
                AccountType::Asset => Self::add_to_section(&mut assets, balance),
                AccountType::Liability => Self::add_to_section(&mut liabilities, balance),
                AccountType::Equity => Self::add_to_section(&mut equity, balance),
                AccountType::Revenue => current_surplus += balance.balance,
                AccountType::Expense => current_surplus -= balance.balance,
            }
        }

        let liabilities_and_equity = liabilities.total + equity.total + current_surplus;
        BalanceSheetReport {
            is_balanced: assets.total == liabilities_and_equity,
            assets,
            liabilities,
            equity,
            current_surplus,
            liabilities_and_equity,
        }
    }

    /// Computes SHU (revenue minus expense) and splits a positive surplus
    /// over the configured buckets.
    #[must_use]
    pub fn shu(projection: &Projection, settings: &CooperativeSettings) -> ShuReport {
        let sum_of = |t: AccountType| -> Decimal {
            projection
                .balances
                .iter()
                .filter(|b| b.account_type == t)
                .map(|b| b.balance)
                .sum()
        };
        let total_revenue = sum_of(AccountType::Revenue);
        let total_expense = sum_of(AccountType::Expense);
        let net_surplus = total_revenue - total_expense;

        let allocations: Vec<ShuAllocationLine> = if net_surplus > Decimal::ZERO {
            settings
                .shu_allocation
                .iter()
                .map(|bucket| ShuAllocationLine {
                    name: bucket.name.clone(),
                    percent: bucket.percent,
                    amount: round_money(net_surplus * bucket.percent / Decimal::ONE_HUNDRED),
                })
                .collect()
        } else {
            Vec::new()
        };
        let allocated: Decimal = allocations.iter().map(|a| a.amount).sum();

        ShuReport {
            total_revenue,
            total_expense,
            net_surplus,
            allocations,
            unallocated: net_surplus - allocated,
        }
    }

    /// Compares each account's persisted balance with the projection.
    #[must_use]
    pub fn drift(chart: &[Account], projection: &Projection) -> DriftReport {
        let mut drifted: Vec<DriftLine> = chart
            .iter()
            .filter_map(|account| {
                let projected = projection.get(account.id).map_or(Decimal::ZERO, |b| b.balance);
                let difference = account.balance - projected;
                (!difference.is_zero()).then(|| DriftLine {
                    account_id: account.id,
                    code: account.code.clone(),
                    persisted: account.balance,
                    projected,
                    difference,
                })
            })
            .collect();
        drifted.sort_by(|a, b| a.code.cmp(&b.code));

        let orphan_lines = projection.orphans.len();
        DriftReport {
            is_consistent: drifted.is_empty() && orphan_lines == 0,
            drifted,
            orphan_lines,
        }
    }

    fn add_to_section(section: &mut BalanceSheetSection, balance: &ProjectedBalance) {
        section.total += balance.balance;
        section.accounts.push(balance.clone());
    }
}
