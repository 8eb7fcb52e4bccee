//! Chart of accounts: hierarchical account records and their rules.

pub mod error;
pub mod service;
pub mod tree;
pub mod types;

pub use error::CoaError;
pub use service::{CoaService, RenamePlan};
pub use tree::AccountTree;
pub use types::{Account, AccountType, CreateAccountInput, UpdateAccountInput};
