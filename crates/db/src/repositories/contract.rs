//! Murabahah contract repository.

use chrono::Utc;
use koperasi_core::financing::{
    ChangeStatusInput, Contract, ContractPayment, ContractService, CreateContractInput,
    FinancingError, FinancingQuote, QuoteInput, compute_financing,
};
use koperasi_core::member::Member;
use koperasi_shared::types::{ContractId, MemberId};
use rust_decimal::Decimal;
use tracing::info;

use super::settings::SettingsHandle;
use crate::store::{StoreClient, collections};

/// Contract repository.
#[derive(Debug, Clone)]
pub struct ContractRepository {
    store: StoreClient,
    settings: SettingsHandle,
}

impl ContractRepository {
    /// Creates a new contract repository.
    #[must_use]
    pub const fn new(store: StoreClient, settings: SettingsHandle) -> Self {
        Self { store, settings }
    }

    /// Prices a financing request with the current margin table.
    pub async fn quote(&self, input: &QuoteInput) -> Result<FinancingQuote, FinancingError> {
        if input.principal <= Decimal::ZERO {
            return Err(FinancingError::InvalidPrincipal);
        }
        if input.tenor == 0 {
            return Err(FinancingError::InvalidTenor);
        }
        let settings = self.settings.current().await;
        Ok(compute_financing(
            input.principal,
            input.tenor,
            input.down_payment,
            &settings.margin_rates,
        ))
    }

    /// Lists contracts, optionally for one member, newest first.
    pub async fn list(&self, member_id: Option<MemberId>) -> Result<Vec<Contract>, FinancingError> {
        let mut txn = self.store.begin().await?;
        let mut contracts: Vec<Contract> = txn.query(collections::CONTRACTS).await?;
        contracts.retain(|c| member_id.is_none_or(|m| c.member_id == m));
        contracts.sort_by(|a, b| {
            b.contract_date
                .cmp(&a.contract_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(contracts)
    }

    /// Fetches one contract.
    pub async fn get(&self, id: ContractId) -> Result<Contract, FinancingError> {
        let mut txn = self.store.begin().await?;
        txn.get(collections::CONTRACTS, &id.to_string())
            .await?
            .ok_or(FinancingError::ContractNotFound(id))
    }

    /// Opens a contract in `Review`, checking the member's financing ceiling.
    pub async fn create(&self, input: CreateContractInput) -> Result<Contract, FinancingError> {
        let settings = self.settings.current().await;
        let (input, settings) = (&input, &settings);
        let contract = self
            .store
            .run("contract.create", move || async move {
                let mut txn = self.store.begin().await?;
                let member: Member = txn
                    .get(collections::MEMBERS, &input.member_id.to_string())
                    .await?
                    .ok_or(FinancingError::MemberNotFound(input.member_id))?;
                let contract = ContractService::create(
                    input.clone(),
                    &member,
                    settings,
                    Utc::now().date_naive(),
                )?;
                txn.set(collections::CONTRACTS, &contract.id.to_string(), &contract)?;
                txn.commit().await?;
                Ok::<_, FinancingError>(contract)
            })
            .await?;

        info!(
            contract_id = %contract.id,
            member_id = %contract.member_id,
            sale_price = %contract.sale_price,
            tenor = contract.tenor,
            "Contract created"
        );
        Ok(contract)
    }

    /// Moves a contract to a new status.
    pub async fn change_status(
        &self,
        id: ContractId,
        input: ChangeStatusInput,
    ) -> Result<Contract, FinancingError> {
        let input = &input;
        let contract = self
            .store
            .run("contract.status", move || async move {
                let mut txn = self.store.begin().await?;
                let contract: Contract = txn
                    .get(collections::CONTRACTS, &id.to_string())
                    .await?
                    .ok_or(FinancingError::ContractNotFound(id))?;
                let updated = ContractService::change_status(&contract, input)?;
                txn.set(collections::CONTRACTS, &id.to_string(), &updated)?;
                txn.commit().await?;
                Ok::<_, FinancingError>(updated)
            })
            .await?;

        info!(contract_id = %id, status = %contract.status, forced = input.force, "Contract status changed");
        Ok(contract)
    }

    /// Payment history, in installment order.
    pub async fn payments(&self, id: ContractId) -> Result<Vec<ContractPayment>, FinancingError> {
        let mut txn = self.store.begin().await?;
        if txn.get_raw(collections::CONTRACTS, &id.to_string()).await?.is_none() {
            return Err(FinancingError::ContractNotFound(id));
        }
        let mut payments: Vec<ContractPayment> =
            txn.query(&collections::contract_payments(id)).await?;
        payments.sort_by_key(|p| p.installment_number);
        Ok(payments)
    }
}
