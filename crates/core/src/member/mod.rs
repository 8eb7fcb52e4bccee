//! Member registry and savings accounts.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::MemberError;
pub use service::MemberService;
pub use types::{
    CreateMemberInput, Direction, Member, MemberStatus, SavingsBalances, SavingsKind,
    SavingsPostingInput, SavingsTransaction, UpdateMemberInput,
};
