//! Contract lifecycle and installment collection.

use chrono::{DateTime, NaiveDate, Utc};
use koperasi_shared::types::{ContractId, RecordId, installment_share};
use rust_decimal::Decimal;

use super::calculator::compute_financing;
use super::error::FinancingError;
use super::types::{ChangeStatusInput, Contract, ContractPayment, ContractStatus, CreateContractInput};
use crate::ledger::EntrySource;
use crate::member::Member;
use crate::settings::CooperativeSettings;

/// Principal and margin collected for one installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentSplit {
    /// Principal portion.
    pub principal: Decimal,
    /// Margin portion.
    pub margin: Decimal,
}

impl InstallmentSplit {
    /// Principal + margin.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.principal + self.margin
    }
}

/// Contract service.
pub struct ContractService;

impl ContractService {
    /// Validates and prices a new contract for `member`.
    ///
    /// The contract starts in `Review` with nothing paid.
    pub fn create(
        input: CreateContractInput,
        member: &Member,
        settings: &CooperativeSettings,
        today: NaiveDate,
    ) -> Result<Contract, FinancingError> {
        let item = input.item.trim().to_string();
        if item.is_empty() {
            return Err(FinancingError::EmptyItem);
        }
        if input.cost_price <= Decimal::ZERO {
            return Err(FinancingError::InvalidPrincipal);
        }
        if input.tenor == 0 {
            return Err(FinancingError::InvalidTenor);
        }
        if !member.is_active() {
            return Err(FinancingError::MemberInactive(member.id));
        }

        // The down payment settles cost only; margin is always collected.
        if input.down_payment < Decimal::ZERO || input.down_payment > input.cost_price {
            return Err(FinancingError::InvalidDownPayment {
                down_payment: input.down_payment,
                cost_price: input.cost_price,
            });
        }

        let quote = compute_financing(
            input.cost_price,
            input.tenor,
            input.down_payment,
            &settings.margin_rates,
        );

        let requested = input.cost_price - input.down_payment;
        let ceiling = settings.ceiling_multiplier * member.savings.total();
        if requested > ceiling {
            return Err(FinancingError::CeilingExceeded { requested, ceiling });
        }

        Ok(Contract {
            id: ContractId::new(),
            member_id: member.id,
            item,
            cost_price: input.cost_price,
            margin: quote.margin,
            sale_price: quote.sale_price,
            down_payment: input.down_payment,
            tenor: input.tenor,
            installment: quote.installment,
            contract_date: input.contract_date.unwrap_or(today),
            status: ContractStatus::Review,
            paid_installments: 0,
            outstanding_principal: requested,
            outstanding_margin: quote.margin,
        })
    }

    /// Moves a contract along its status chain.
    ///
    /// `force` allows any change, including leaving a terminal status.
    pub fn change_status(
        contract: &Contract,
        input: &ChangeStatusInput,
    ) -> Result<Contract, FinancingError> {
        if !input.force && !contract.status.can_transition_to(input.status) {
            return Err(FinancingError::InvalidTransition {
                from: contract.status,
                to: input.status,
            });
        }
        Ok(Contract {
            status: input.status,
            ..contract.clone()
        })
    }

    /// Split of the next installment, or `None` if nothing is due.
    ///
    /// Every installment but the last is `total / tenor` rounded to cents;
    /// the last one takes whatever is still outstanding.
    #[must_use]
    pub fn next_installment(contract: &Contract) -> Option<InstallmentSplit> {
        if !contract.is_running() || contract.paid_installments >= contract.tenor {
            return None;
        }

        let index = contract.paid_installments;
        if index + 1 == contract.tenor {
            return Some(InstallmentSplit {
                principal: contract.outstanding_principal.max(Decimal::ZERO),
                margin: contract.outstanding_margin.max(Decimal::ZERO),
            });
        }

        let share = |total: Decimal, outstanding: Decimal| {
            installment_share(total, contract.tenor, index)
                .min(outstanding)
                .max(Decimal::ZERO)
        };
        let principal = share(contract.financed_principal(), contract.outstanding_principal);
        let margin = share(contract.margin, contract.outstanding_margin);
        Some(InstallmentSplit { principal, margin })
    }

    /// Collects the next installment.
    ///
    /// Returns the updated contract, the payment record, and the split; or
    /// `None` if the contract has nothing due. Flips the contract to `Lunas`
    /// when the last installment is paid.
    #[must_use]
    pub fn collect_installment(
        contract: &Contract,
        period: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<(Contract, ContractPayment, InstallmentSplit)> {
        let split = Self::next_installment(contract)?;

        let mut updated = contract.clone();
        updated.paid_installments += 1;
        updated.outstanding_principal -= split.principal;
        updated.outstanding_margin -= split.margin;
        if updated.paid_installments >= updated.tenor {
            updated.status = ContractStatus::Lunas;
        }

        let payment = ContractPayment {
            id: RecordId::new(),
            date: now,
            installment_number: updated.paid_installments,
            principal: split.principal,
            margin: split.margin,
            total: split.total(),
            outstanding_principal: updated.outstanding_principal,
            outstanding_margin: updated.outstanding_margin,
            period: period.map(str::to_string),
            source: if period.is_some() {
                EntrySource::MonthlyBatch
            } else {
                EntrySource::Manual
            },
        };
        Some((updated, payment, split))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
