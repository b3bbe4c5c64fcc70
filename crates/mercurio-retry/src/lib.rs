//! Mercurio Retry - Retry policy with exponential backoff
//!
//! Provides the shared retry primitive used by the completion client and the
//! bulk product importer: a configurable policy (attempts, delay curve,
//! jitter), a signature-based error classifier, and an async retry driver
//! that distinguishes fatal from transient failures.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Postgres SQLSTATE for unique constraint violations.
pub const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// How an error should be treated by the retry driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying after a backoff delay.
    Retryable,
    /// Retrying cannot help; fail immediately.
    Fatal,
}

/// Classify an error by its message signature and optional SQLSTATE code.
///
/// Duplicate-key and validation failures are permanent, so they are fatal.
/// Timeouts and connection drops are transient. Anything unrecognized is
/// treated as retryable.
#[must_use]
pub fn classify(message: &str, sqlstate: Option<&str>) -> ErrorClass {
    if sqlstate == Some(SQLSTATE_UNIQUE_VIOLATION) {
        return ErrorClass::Fatal;
    }

    let lower = message.to_lowercase();

    if lower.contains("duplicate") || lower.contains("unique") || lower.contains("violat") {
        return ErrorClass::Fatal;
    }
    if lower.contains("validation") || lower.contains("invalid") {
        return ErrorClass::Fatal;
    }
    if lower.contains("timeout") || lower.contains("connection") {
        return ErrorClass::Retryable;
    }

    ErrorClass::Retryable
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Ceiling on the computed delay, applied before jitter.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_factor: f64,
    /// Upper bound for the random jitter added to each delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the initial delay.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the backoff multiplier.
    #[must_use]
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Set the jitter bound. `Duration::ZERO` disables jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the attempt following `attempt` (1-based):
    /// `initial_delay * backoff_factor^(attempt-1)`, capped at `max_delay`,
    /// plus uniform jitter in `[0, jitter)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt.saturating_sub(1) as i32);
        let capped = base.min(self.max_delay.as_millis() as f64) as u64;

        Duration::from_millis(capped + rand_jitter(self.jitter.as_millis() as u64))
    }
}

/// Simple pseudo-random jitter (avoid adding rand crate dependency)
fn rand_jitter(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % max
}

/// Terminal failure of a retried operation.
#[derive(Debug)]
pub struct RetryError<E> {
    /// The last error encountered.
    pub last_error: E,
    /// Total number of attempts made.
    pub attempts: u32,
    /// Whether the operation stopped on a fatal (non-retryable) error.
    pub fatal: bool,
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.fatal {
            write!(f, "Non-retryable error: {}", self.last_error)
        } else {
            write!(
                f,
                "Retry failed after {} attempts: {}",
                self.attempts, self.last_error
            )
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for RetryError<E> {}

/// Execute an async operation under a retry policy.
///
/// `is_retryable` decides per error whether another attempt is allowed.
/// Fatal errors propagate immediately; retryable ones sleep `delay_for`
/// between attempts until the policy is exhausted.
///
/// # Example
/// ```ignore
/// let policy = RetryPolicy::default();
/// let result = retry(
///     &policy,
///     || async { repository.create(&record).await },
///     |e| classify(&e.to_string(), e.sqlstate()) == ErrorClass::Retryable,
/// ).await;
/// ```
pub async fn retry<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: R,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    for attempt in 1..=policy.max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt = attempt, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if !is_retryable(&e) {
                    debug!(attempt = attempt, error = %e, "fatal error, not retrying");
                    return Err(RetryError {
                        last_error: e,
                        attempts: attempt,
                        fatal: true,
                    });
                }

                if attempt >= policy.max_attempts {
                    debug!(attempt = attempt, error = %e, "retry budget exhausted");
                    return Err(RetryError {
                        last_error: e,
                        attempts: attempt,
                        fatal: false,
                    });
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "operation failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }

    unreachable!("retry loop always returns from the error branch")
}
