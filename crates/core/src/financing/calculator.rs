//! Murabahah financing calculator.

use koperasi_shared::types::round_money;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::settings::MarginRates;

/// Result of a financing calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinancingQuote {
    /// Margin rate applied, in percent.
    pub rate: Decimal,
    /// Total margin.
    pub margin: Decimal,
    /// Sale price (principal + margin).
    pub sale_price: Decimal,
    /// Monthly installment.
    pub installment: Decimal,
}

/// Picks the margin rate for a tenor (inclusive upper bounds 6/12/18).
#[must_use]
pub fn rate_for_tenor(tenor_months: u32, rates: &MarginRates) -> Decimal {
    match tenor_months {
        0..=6 => rates.a,
        7..=12 => rates.b,
        13..=18 => rates.c,
        _ => rates.d,
    }
}

/// Computes margin, sale price and installment.
///
/// Does not validate its inputs. A tenor of zero yields a zero installment.
#[must_use]
pub fn compute_financing(
    principal: Decimal,
    tenor_months: u32,
    down_payment: Decimal,
    rates: &MarginRates,
) -> FinancingQuote {
    let rate = rate_for_tenor(tenor_months, rates);
    let margin = round_money(principal * rate / Decimal::ONE_HUNDRED);
    let sale_price = principal + margin;
    let installment = if tenor_months == 0 {
        Decimal::ZERO
    } else {
        round_money((sale_price - down_payment) / Decimal::from(tenor_months))
    };

    FinancingQuote {
        rate,
        margin,
        sale_price,
        installment,
    }
}
