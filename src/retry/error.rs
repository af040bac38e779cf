//! Error types for retry operations.

/// Error produced when an attempt asks for a retry but has no attempts left.
///
/// Attempt functions are expected to check [`Attempt::is_last`] and return a
/// final value or error instead of [`Outcome::Retry`]. When one does not, the
/// engine stops anyway and reports this error rather than running an extra
/// attempt.
///
/// [`Attempt::is_last`]: crate::retry::Attempt::is_last
/// [`Outcome::Retry`]: crate::retry::Outcome::Retry
///
/// # Examples
///
/// ```rust
/// use deploynow_action::retry::{Outcome, RetryExhausted, RetryPolicy, Retryable};
///
/// # tokio_test::block_on(async {
/// let policy = RetryPolicy::new(2).unwrap();
/// let result = Retryable::new(
///     |_attempt| async { Ok::<Outcome<()>, RetryExhausted>(Outcome::Retry) },
///     policy,
/// )
/// .run()
/// .await;
///
/// assert_eq!(result, Err(RetryExhausted::new(2)));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryExhausted {
    /// Total number of attempts made.
    pub attempts: u32,
}

impl RetryExhausted {
    /// Create a new RetryExhausted error.
    pub const fn new(attempts: u32) -> Self {
        Self { attempts }
    }
}

impl std::fmt::Display for RetryExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "retry requested on the last of {} attempts",
            self.attempts
        )
    }
}

impl std::error::Error for RetryExhausted {}
