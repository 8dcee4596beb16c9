//! Exponential backoff for booking store calls.

use futures::future::BoxFuture;
use std::time::Duration;

use crate::error::{Error, ErrorKind};

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            ..Default::default()
        }
    }

    /// Backoff before the retry following attempt `attempt` (0-indexed).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = (self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32)) as u64;

        Duration::from_millis(backoff_ms).min(self.max_backoff)
    }

    /// Only failures that may go away on their own are worth another attempt.
    pub fn is_transient(err: &Error) -> bool {
        matches!(
            err.kind(),
            ErrorKind::PersistenceFailed | ErrorKind::LookupFailed | ErrorKind::Internal
        )
    }

    pub async fn execute<F, T>(&self, operation: &'static str, mut call: F) -> Result<T, Error>
    where
        F: FnMut() -> BoxFuture<'static, Result<T, Error>>,
    {
        let mut attempt = 0;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt + 1 < self.max_attempts && Self::is_transient(&err) => {
                    let backoff = self.backoff_for_attempt(attempt);

                    tracing::warn!(
                        operation,
                        attempt,
                        "store call failed ({:?}), retrying in {:?}",
                        err,
                        backoff
                    );

                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(operation, attempt, "store call failed: {:?}", err);
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{invalid_input_error, persistence_failed_error};
    use futures::FutureExt;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    #[test]
    fn backoff_doubles_and_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for_attempt(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_for_attempt(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_millis(400));
        assert_eq!(policy.backoff_for_attempt(10), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_the_store_recovers() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = RetryPolicy::default()
            .execute("create", move || {
                let counter = counter.clone();
                async move {
                    match counter.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err(persistence_failed_error("unavailable")),
                        _ => Ok("id"),
                    }
                }
                .boxed()
            })
            .await;

        assert_eq!(result.unwrap(), "id");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_the_last_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), Error> = RetryPolicy::new(2, Duration::from_millis(10))
            .execute("delete", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(persistence_failed_error("unavailable")) }.boxed()
            })
            .await;

        assert_eq!(result.unwrap_err().code, 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_invalid_input() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: Result<(), Error> = RetryPolicy::default()
            .execute("create", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(invalid_input_error()) }.boxed()
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
