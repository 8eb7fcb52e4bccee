//! Business rule validation for journal entries.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{PostJournalInput, TransactionTotals};

/// Validates a journal entry before anything is read or written.
///
/// Rules, checked in order: non-empty description, at least two lines, no
/// negative amounts, no line with both sides zero, debits equal credits, and
/// a total greater than zero.
///
/// # Errors
///
/// Returns the first rule that fails.
pub fn validate_journal(input: &PostJournalInput) -> Result<TransactionTotals, LedgerError> {
    if input.description.trim().is_empty() {
        return Err(LedgerError::EmptyDescription);
    }

    if input.lines.len() < 2 {
        return Err(LedgerError::InsufficientEntries);
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for (index, line) in input.lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount(index));
        }
        if line.debit.is_zero() && line.credit.is_zero() {
            return Err(LedgerError::ZeroAmount(index));
        }
        debit += line.debit;
        credit += line.credit;
    }

    let totals = TransactionTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedTransaction { debit, credit });
    }
    if totals.debit.is_zero() {
        return Err(LedgerError::ZeroTotal);
    }

    Ok(totals)
}
