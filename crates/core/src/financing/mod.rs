//! Murabahah financing: pricing, contracts and installments.

pub mod calculator;
pub mod error;
pub mod service;
pub mod types;

pub use calculator::{FinancingQuote, compute_financing, rate_for_tenor};
pub use error::FinancingError;
pub use service::{ContractService, InstallmentSplit};
pub use types::{
    ChangeStatusInput, Contract, ContractPayment, ContractStatus, CreateContractInput, QuoteInput,
};
