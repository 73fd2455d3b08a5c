use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

/// Error fragments that mark a failure as transient.
///
/// Matching is a case-sensitive substring test against the rendered error
/// message, so transport errors must be phrased with these fragments.
pub const RETRYABLE_ERROR_PATTERNS: &[&str] = &[
    TIMESTAMP_ERROR_PATTERN,
    "Connection timed out",
    "Could not resolve host",
    "Failed to connect",
    "Operation timed out",
    "Server returned nothing",
    "Empty reply from server",
];

/// Rejection Binance returns when the signed timestamp drifts outside `recvWindow`.
pub const TIMESTAMP_ERROR_PATTERN: &str = "Timestamp for this request is outside of the recvWindow";

/// Whether a failure with this message should be retried.
pub fn is_retryable(message: &str) -> bool {
    RETRYABLE_ERROR_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

pub fn is_timestamp_error(message: &str) -> bool {
    message.contains(TIMESTAMP_ERROR_PATTERN)
}

/// How many times, and how patiently, the transport retries a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled on every retry
    pub base_delay_ms: u64,
    /// Upper bound for a single backoff delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn with_base_delay(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    pub fn with_max_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Delays to sleep between attempts: `base`, `2 * base`, `4 * base`, ...
    pub fn backoff(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms / 2)
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .take(self.max_retries as usize)
    }
}
