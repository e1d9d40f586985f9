// src/pipeline/polling.rs
//! Shared create-task -> poll -> download loop used by every vendor stage.

use std::future::Future;
use std::time::Duration;

use crate::error::VendorError;

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
        }
    }
}

/// Result of checking a vendor task once
#[derive(Debug, PartialEq)]
pub enum PollOutcome<T> {
    Pending,
    Done(T),
    Failed(String),
}

/// Sleeps `interval`, checks the task, and repeats until it reaches a terminal status
/// or `max_attempts` checks have been made. Transient check errors are logged and retried
/// on the next tick; anything else ends the loop.
pub async fn poll_until_terminal<T, F, Fut>(
    service: &'static str,
    settings: &PollSettings,
    mut check: F,
) -> Result<T, VendorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>, VendorError>>,
{
    for attempt in 0..settings.max_attempts {
        tokio::time::sleep(settings.interval).await;

        match check().await {
            Ok(PollOutcome::Done(value)) => {
                tracing::info!(
                    service,
                    attempt = attempt + 1,
                    "✅ {} task finished",
                    service
                );
                return Ok(value);
            }
            Ok(PollOutcome::Failed(message)) => {
                tracing::error!(service, "❌ {} task failed: {}", service, message);
                return Err(VendorError::TaskFailed { service, message });
            }
            Ok(PollOutcome::Pending) => {
                tracing::debug!(
                    "{} task in progress... (attempt {}/{})",
                    service,
                    attempt + 1,
                    settings.max_attempts
                );
            }
            Err(e) if e.is_transient() => {
                tracing::warn!("Failed to check {} status: {}", service, e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(VendorError::Timeout {
        service,
        attempts: settings.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast(max_attempts: u32) -> PollSettings {
        PollSettings {
            max_attempts,
            interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_returns_value_once_done() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = poll_until_terminal("test", &fast(10), move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Ok(PollOutcome::Pending)
                } else {
                    Ok(PollOutcome::Done("https://cdn.example.com/out.mp4".to_string()))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "https://cdn.example.com/out.mp4");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_vendor_failure_stops_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = poll_until_terminal::<String, _, _>("D-ID", &fast(10), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(PollOutcome::Failed("face not detected".to_string()))
            }
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "D-ID error: face not detected");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_times_out_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = poll_until_terminal::<String, _, _>("Shotstack", &fast(4), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(PollOutcome::Pending)
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, VendorError::Timeout { attempts: 4, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_transient_errors_keep_polling() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = poll_until_terminal("RunwayML", &fast(5), move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(VendorError::Decode {
                        service: "RunwayML",
                        message: "unexpected EOF".to_string(),
                    })
                } else {
                    Ok(PollOutcome::Done(42u32))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fatal_errors_abort() {
        let err = poll_until_terminal::<String, _, _>("D-ID", &fast(5), || async {
            Err(VendorError::MissingField {
                service: "D-ID",
                field: "result_url",
            })
        })
        .await
        .unwrap_err();

        assert!(matches!(err, VendorError::MissingField { field: "result_url", .. }));
    }
}
