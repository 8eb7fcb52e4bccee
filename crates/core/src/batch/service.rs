//! Monthly batch processing.
//!
//! One run per period: every active member pays the mandatory savings amount
//! and one installment on each running contract, all by payroll deduction.
//! The plan produced here is written by the caller in one transaction.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use koperasi_shared::types::{ArchiveId, JournalEntryId};
use rust_decimal::Decimal;

use super::error::BatchError;
use super::types::{ArchiveRow, BatchPlan, BatchRun, BatchTotals, ReportArchive};
use crate::coa::Account;
use crate::financing::{Contract, ContractService};
use crate::ledger::{AccountSnapshot, EntrySource, JournalEntry, JournalLine, LedgerService};
use crate::member::{Member, MemberService};
use crate::settings::{BatchAccountCodes, CooperativeSettings};

/// Monthly batch service.
pub struct BatchService;

impl BatchService {
    /// Period token "YYYY-MM" for a date.
    #[must_use]
    pub fn period_token(as_of: NaiveDate) -> String {
        format!("{:04}-{:02}", as_of.year(), as_of.month())
    }

    /// Plans a batch run.
    ///
    /// `marker` is the existing run marker for the period, if any.
    /// `members` and `contracts` may contain inactive members and
    /// non-running contracts; they are filtered here.
    pub fn plan(
        as_of: NaiveDate,
        now: DateTime<Utc>,
        marker: Option<&BatchRun>,
        members: &[Member],
        contracts: &[Contract],
        chart: &[Account],
        settings: &CooperativeSettings,
    ) -> Result<BatchPlan, BatchError> {
        let period = Self::period_token(as_of);
        if marker.is_some() {
            return Err(BatchError::AlreadyRun(period));
        }

        let codes = &settings.batch_accounts;
        let batch_accounts = Self::resolve_accounts(codes, chart)?;

        let mut active: Vec<Member> = members.iter().filter(|m| m.is_active()).cloned().collect();
        active.sort_by(|a, b| a.member_number.cmp(&b.member_number));

        let mut by_member: BTreeMap<_, Vec<&Contract>> = BTreeMap::new();
        for contract in contracts.iter().filter(|c| c.is_running()) {
            by_member.entry(contract.member_id).or_default().push(contract);
        }

        let mut totals = BatchTotals::default();
        let mut rows = Vec::with_capacity(active.len());
        let mut savings_records = Vec::with_capacity(active.len());
        let mut updated_contracts = Vec::new();
        let mut payments = Vec::new();

        for member in &mut active {
            let wajib = settings.mandatory_savings;
            if wajib > Decimal::ZERO {
                let record = MemberService::collect_mandatory(member, wajib, &period, now);
                savings_records.push((member.id, record));
            }

            let mut principal = Decimal::ZERO;
            let mut margin = Decimal::ZERO;
            for contract in by_member.get(&member.id).into_iter().flatten() {
                if let Some((updated, payment, split)) =
                    ContractService::collect_installment(contract, Some(&period), now)
                {
                    principal += split.principal;
                    margin += split.margin;
                    payments.push((updated.id, payment));
                    updated_contracts.push(updated);
                }
            }

            let mandatory = wajib.max(Decimal::ZERO);
            totals.mandatory_savings += mandatory;
            totals.principal += principal;
            totals.margin += margin;

            rows.push(ArchiveRow {
                member_id: member.id,
                name: member.name.clone(),
                member_number: member.member_number.clone(),
                unit: member.unit.clone(),
                mandatory_savings: mandatory,
                principal,
                margin,
                total: mandatory + principal + margin,
            });
        }

        let mut snapshot: AccountSnapshot =
            batch_accounts.iter().map(|a| (a.id, (*a).clone())).collect();
        let entry = Self::build_entry(&period, now, &totals, &batch_accounts);
        if let Some(entry) = &entry {
            LedgerService::apply_lines(&mut snapshot, &entry.lines)?;
        }

        let archive = ReportArchive {
            id: ArchiveId::new(),
            name: format!("Laporan Potongan Gaji {period}"),
            created_at: now,
            period: period.clone(),
            rows,
        };

        let marker = BatchRun {
            period,
            run_at: now,
            entry_id: entry.as_ref().map(|e| e.id),
            archive_id: archive.id,
            members_processed: active.len(),
            contracts_processed: updated_contracts.len(),
            totals,
        };

        Ok(BatchPlan {
            members: active,
            savings_records,
            contracts: updated_contracts,
            payments,
            entry,
            accounts: snapshot.into_values().collect(),
            archive,
            marker,
        })
    }

    /// Looks up the four batch accounts in posting order.
    fn resolve_accounts<'a>(
        codes: &BatchAccountCodes,
        chart: &'a [Account],
    ) -> Result<[&'a Account; 4], BatchError> {
        let find = |code: &str| {
            chart
                .iter()
                .find(|a| a.code == code)
                .ok_or_else(|| BatchError::MissingAccount(code.to_string()))
        };
        let [payroll, savings, receivable, income] = codes.all();
        Ok([find(payroll)?, find(savings)?, find(receivable)?, find(income)?])
    }

    /// Debit payroll receivable for the grand total; credit each bucket.
    /// Zero credits are omitted and a zero batch posts nothing.
    fn build_entry(
        period: &str,
        now: DateTime<Utc>,
        totals: &BatchTotals,
        accounts: &[&Account; 4],
    ) -> Option<JournalEntry> {
        let grand_total = totals.grand_total();
        if grand_total.is_zero() {
            return None;
        }

        let line = |account: &Account, debit: Decimal, credit: Decimal| JournalLine {
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit,
            credit,
        };

        let [payroll, savings, receivable, income] = *accounts;
        let mut lines = vec![line(payroll, grand_total, Decimal::ZERO)];
        for (account, amount) in [
            (savings, totals.mandatory_savings),
            (receivable, totals.principal),
            (income, totals.margin),
        ] {
            if !amount.is_zero() {
                lines.push(line(account, Decimal::ZERO, amount));
            }
        }

        Some(JournalEntry {
            id: JournalEntryId::new(),
            date: now,
            description: format!("Potongan gaji bulanan periode {period}"),
            lines,
            source: EntrySource::MonthlyBatch,
            period: Some(period.to_string()),
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
