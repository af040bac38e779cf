//! Retry policy configuration.

use std::num::NonZeroU32;

use serde::Deserialize;

/// Number of attempts the polling workflows make by default.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 5;

/// How many times an attempt function may be invoked.
///
/// Policies are pure data. There is no backoff, no jitter and no delay
/// between attempts: the remote request itself is the throttle.
///
/// `max_attempts` counts every invocation, including the first one, and is
/// always at least 1.
///
/// # Examples
///
/// ```rust
/// use deploynow_action::RetryPolicy;
///
/// let policy = RetryPolicy::new(3).unwrap();
/// assert_eq!(policy.max_attempts(), 3);
///
/// assert!(RetryPolicy::new(0).is_err());
/// assert_eq!(RetryPolicy::default().max_attempts(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
}

/// Error returned when a policy would allow zero attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPolicy;

impl std::fmt::Display for InvalidPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "retry policy must allow at least one attempt")
    }
}

impl std::error::Error for InvalidPolicy {}

impl RetryPolicy {
    /// Create a policy allowing up to `max_attempts` invocations.
    ///
    /// Returns [`InvalidPolicy`] when `max_attempts` is zero.
    pub fn new(max_attempts: u32) -> Result<Self, InvalidPolicy> {
        NonZeroU32::new(max_attempts)
            .map(Self::attempts)
            .ok_or(InvalidPolicy)
    }

    /// Create a policy from an already validated attempt count.
    pub const fn attempts(max_attempts: NonZeroU32) -> Self {
        Self { max_attempts }
    }

    /// A policy that makes exactly one attempt and never retries.
    pub const fn once() -> Self {
        Self::attempts(NonZeroU32::MIN)
    }

    /// Get the maximum number of attempts.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        match NonZeroU32::new(DEFAULT_POLL_ATTEMPTS) {
            Some(n) => Self::attempts(n),
            None => Self::once(),
        }
    }
}

impl TryFrom<u32> for RetryPolicy {
    type Error = InvalidPolicy;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
