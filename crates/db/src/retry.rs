//! Client-side retry of conflicting transactions.
//!
//! Every write path is "read, plan, commit". When the commit loses a race
//! the whole attempt is rerun against fresh reads.

use std::fmt::Display;

use tracing::warn;

use koperasi_core::batch::BatchError;
use koperasi_core::coa::CoaError;
use koperasi_core::financing::FinancingError;
use koperasi_core::ledger::LedgerError;
use koperasi_core::member::MemberError;

/// Errors that may clear up by rerunning the transaction.
pub trait Retryable {
    /// True for optimistic-concurrency conflicts.
    fn is_retryable(&self) -> bool;
}

macro_rules! retryable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Retryable for $ty {
                fn is_retryable(&self) -> bool {
                    <$ty>::is_retryable(self)
                }
            }
        )*
    };
}

retryable!(LedgerError, CoaError, MemberError, FinancingError, BatchError);

/// Runs `attempt` up to `1 + max_retries` times.
///
/// Only retryable errors trigger another attempt; the last error is
/// returned as-is once the budget is spent.
pub async fn with_retry<T, E, F, Fut>(
    max_retries: u32,
    operation: &'static str,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if err.is_retryable() && retries < max_retries => {
                retries += 1;
                warn!(operation, retries, error = %err, "Transaction conflict, retrying");
                tokio::task::yield_now().await;
            }
            Err(err) if err.is_retryable() => {
                warn!(operation, retries, "Giving up after repeated conflicts");
                return Err(err);
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("conflict")]
        Conflict,
        #[error("fatal")]
        Fatal,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            matches!(self, Self::Conflict)
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<u32, TestError> = with_retry(5, "test", move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 { Err(TestError::Conflict) } else { Ok(n) }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), TestError> = with_retry(3, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Conflict)
        })
        .await;
        assert!(matches!(result, Err(TestError::Conflict)));
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_fatal_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), TestError> = with_retry(3, "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TestError::Fatal)
        })
        .await;
        assert!(matches!(result, Err(TestError::Fatal)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_domain_errors_delegate() {
        assert!(Retryable::is_retryable(&LedgerError::ConcurrentModification));
        assert!(!Retryable::is_retryable(&LedgerError::ZeroTotal));
    }
}
