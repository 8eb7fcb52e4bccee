//! Store failures expressed in each domain's error type.
//!
//! Conflicts become the domain's `ConcurrentModification` so the retry
//! helper picks them up; everything else is carried as text.

use koperasi_core::batch::BatchError;
use koperasi_core::coa::CoaError;
use koperasi_core::financing::FinancingError;
use koperasi_core::ledger::LedgerError;
use koperasi_core::member::MemberError;

use crate::store::StoreError;

macro_rules! from_store_error {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<StoreError> for $ty {
                fn from(err: StoreError) -> Self {
                    match err {
                        StoreError::Conflict(_) => Self::ConcurrentModification,
                        other => Self::Store(other.to_string()),
                    }
                }
            }
        )*
    };
}

from_store_error!(LedgerError, CoaError, MemberError, FinancingError, BatchError);
