//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap primary calls with a deadline
//! - Keep timeouts distinct from the operation's own errors

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::errors::{Classify, Failure, NetworkKind};

/// Failure of a deadline-bounded operation.
#[derive(Debug, Error)]
pub enum OperationError<E> {
    #[error("operation timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    #[error("{0}")]
    Failed(E),
}

impl<E: Classify> Classify for OperationError<E> {
    fn failure(&self) -> Failure {
        match self {
            OperationError::TimedOut(_) => Failure::Network(NetworkKind::Timeout),
            OperationError::Failed(e) => e.failure(),
        }
    }
}

/// Run `operation`, giving up after `limit`.
pub async fn with_timeout<T, E, Fut>(limit: Duration, operation: Fut) -> Result<T, OperationError<E>>
where
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(OperationError::Failed),
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Operation timed out");
            Err(OperationError::TimedOut(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_slow_operation_times_out() {
        let result: Result<(), OperationError<Failure>> = with_timeout(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, OperationError::TimedOut(_)));
        assert_eq!(err.failure(), Failure::Network(NetworkKind::Timeout));
    }

    #[tokio::test]
    async fn test_inner_error_is_preserved() {
        let result: Result<(), _> =
            with_timeout(Duration::from_secs(1), async { Err(Failure::api("server_error")) }).await;
        match result {
            Err(OperationError::Failed(f)) => assert_eq!(f, Failure::api("server_error")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
