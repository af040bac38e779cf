//! The retry loop.

use std::future::Future;

use crate::retry::{Attempt, Outcome, RetryExhausted, RetryPolicy};

/// Runs an attempt function until it finishes or the policy runs out.
///
/// The attempt function is called with an [`Attempt`] and returns a future
/// resolving to `Result<Outcome<T>, E>`:
///
/// - `Ok(Outcome::Done(value))` ends the run with `Ok(value)`.
/// - `Ok(Outcome::Retry)` starts the next attempt immediately.
/// - `Err(error)` ends the run with `Err(error)`. Errors are never retried.
///
/// Attempts run strictly one after another and the function is never called
/// more than [`RetryPolicy::max_attempts`] times. A `Retry` on the last
/// attempt ends the run with [`RetryExhausted`], converted into `E`.
///
/// # Examples
///
/// ```rust
/// use deploynow_action::retry::{Outcome, RetryExhausted, RetryPolicy, Retryable};
///
/// # tokio_test::block_on(async {
/// let mut responses = vec![true, false, false];
///
/// let value = Retryable::new(
///     |attempt| {
///         let ready = responses.pop().unwrap_or(false);
///         async move {
///             if ready {
///                 Ok::<_, RetryExhausted>(Outcome::Done(attempt.number()))
///             } else {
///                 Ok(Outcome::Retry)
///             }
///         }
///     },
///     RetryPolicy::default(),
/// )
/// .run()
/// .await;
///
/// assert_eq!(value, Ok(3));
/// # });
/// ```
#[derive(Debug)]
pub struct Retryable<F> {
    attempt_fn: F,
    policy: RetryPolicy,
}

impl<F> Retryable<F> {
    /// Create a retry run from an attempt function and a policy.
    pub fn new<T, E, Fut>(attempt_fn: F, policy: RetryPolicy) -> Self
    where
        F: FnMut(Attempt) -> Fut,
        Fut: Future<Output = Result<Outcome<T>, E>>,
    {
        Self { attempt_fn, policy }
    }

    /// The policy this run was created with.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run attempts until one finishes, fails, or the policy is used up.
    pub async fn run<T, E, Fut>(mut self) -> Result<T, E>
    where
        F: FnMut(Attempt) -> Fut,
        Fut: Future<Output = Result<Outcome<T>, E>>,
        E: From<RetryExhausted>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut number = 1u32;

        loop {
            let attempt = Attempt::new(number, max_attempts);
            match (self.attempt_fn)(attempt).await? {
                Outcome::Done(value) => return Ok(value),
                Outcome::Retry if attempt.is_last() => {
                    tracing::debug!(
                        attempt = number,
                        max_attempts,
                        "retry requested on last attempt"
                    );
                    return Err(RetryExhausted::new(number).into());
                }
                Outcome::Retry => {
                    tracing::debug!(attempt = number, max_attempts, "not ready, retrying");
                    number += 1;
                }
            }
        }
    }
}

/// Shorthand for `Retryable::new(attempt_fn, policy).run()`.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, attempt_fn: F) -> Result<T, E>
where
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = Result<Outcome<T>, E>>,
    E: From<RetryExhausted>,
{
    Retryable::new(attempt_fn, policy).run().await
}
