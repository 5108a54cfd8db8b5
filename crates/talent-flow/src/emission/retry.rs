//! Bounded exponential backoff for persistence calls.

use std::thread;
use std::time::Duration;

use talent_flow_core::config::RetryConfig;
use talent_flow_core::errors::{RecoveryAction, StorageError};

/// Run `op`, retrying only errors classified `RecoveryAction::Retry`.
///
/// Non-retryable errors return immediately. When every attempt fails with a
/// retryable error the result is `StorageError::RetriesExhausted`.
pub fn with_retry<T>(
    operation: &'static str,
    config: &RetryConfig,
    mut op: impl FnMut() -> Result<T, StorageError>,
) -> Result<T, StorageError> {
    let max_attempts = config.effective_max_attempts().max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if RecoveryAction::for_storage(&e) != RecoveryAction::Retry => return Err(e),
            Err(e) if attempt >= max_attempts => {
                return Err(StorageError::RetriesExhausted {
                    operation,
                    attempts: attempt,
                    last_error: e.to_string(),
                });
            }
            Err(e) => {
                let backoff = config.backoff_ms(attempt);
                tracing::debug!(operation, attempt, backoff_ms = backoff, error = %e, "retrying");
                thread::sleep(Duration::from_millis(backoff));
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: Some(3),
            initial_backoff_ms: Some(0),
            max_backoff_ms: Some(0),
        }
    }

    #[test]
    fn test_transient_then_success() {
        let mut calls = 0;
        let result = with_retry("op", &fast(), || {
            calls += 1;
            if calls < 3 {
                Err(StorageError::DbBusy)
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_exhaustion_is_a_hard_error() {
        let mut calls = 0;
        let err = with_retry::<()>("save_movement", &fast(), || {
            calls += 1;
            Err(StorageError::DbBusy)
        })
        .unwrap_err();
        assert_eq!(calls, 3);
        assert!(matches!(
            err,
            StorageError::RetriesExhausted { operation: "save_movement", attempts: 3, .. }
        ));
    }

    #[test]
    fn test_non_transient_not_retried() {
        let mut calls = 0;
        let err = with_retry::<()>("op", &fast(), || {
            calls += 1;
            Err(StorageError::Constraint {
                message: "dup".into(),
            })
        })
        .unwrap_err();
        assert_eq!(calls, 1);
        assert!(matches!(err, StorageError::Constraint { .. }));
    }
}
