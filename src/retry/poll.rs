//! Polling an eventually-consistent source until a readiness check passes.
//!
//! [`poll`] owns the loop; a [`Readiness`] strategy owns the policy. Each
//! attempt performs exactly one fetch:
//!
//! - ready → the response is returned
//! - not ready, attempts left → fetch again
//! - not ready, last attempt → [`Readiness::on_exhausted`] decides between a
//!   fallback value and an error
//!
//! Fetch errors are never retried.

use std::future::Future;

use crate::retry::{retry, Outcome, RetryExhausted, RetryPolicy};

/// Decides when a polled response is usable and what to do when it never is.
pub trait Readiness<R> {
    /// Error produced when polling gives up.
    type Error;

    /// Returns true when `response` can be handed to the caller.
    fn is_ready(&self, response: &R) -> bool;

    /// Called with the last response when no attempt was ready.
    fn on_exhausted(&self, response: R) -> Result<R, Self::Error>;
}

/// A [`Readiness`] strategy built from two closures.
///
/// Created by [`ready_when`].
#[derive(Debug, Clone, Copy)]
pub struct ReadyWhen<P, X> {
    predicate: P,
    fallback: X,
}

/// Build a [`Readiness`] strategy from a predicate and an exhaustion fallback.
///
/// # Examples
///
/// ```rust
/// use deploynow_action::retry::{poll, ready_when, RetryExhausted, RetryPolicy};
///
/// # tokio_test::block_on(async {
/// let mut totals = vec![3u64, 0, 0];
///
/// let total = poll(
///     &RetryPolicy::default(),
///     || {
///         let total = totals.pop().unwrap_or(0);
///         async move { Ok::<_, RetryExhausted>(total) }
///     },
///     &ready_when(|total: &u64| *total > 0, |_| Ok::<_, RetryExhausted>(0)),
/// )
/// .await;
///
/// assert_eq!(total, Ok(3));
/// # });
/// ```
pub fn ready_when<R, E, P, X>(predicate: P, fallback: X) -> ReadyWhen<P, X>
where
    P: Fn(&R) -> bool,
    X: Fn(R) -> Result<R, E>,
{
    ReadyWhen {
        predicate,
        fallback,
    }
}

impl<R, E, P, X> Readiness<R> for ReadyWhen<P, X>
where
    P: Fn(&R) -> bool,
    X: Fn(R) -> Result<R, E>,
{
    type Error = E;

    fn is_ready(&self, response: &R) -> bool {
        (self.predicate)(response)
    }

    fn on_exhausted(&self, response: R) -> Result<R, E> {
        (self.fallback)(response)
    }
}

/// Fetch until `readiness` accepts a response or the policy is used up.
///
/// The fetch error type must absorb both the strategy's exhaustion error and
/// [`RetryExhausted`].
pub async fn poll<R, E, F, Fut, S>(
    policy: &RetryPolicy,
    mut fetch: F,
    readiness: &S,
) -> Result<R, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, E>>,
    S: Readiness<R>,
    E: From<S::Error> + From<RetryExhausted>,
{
    retry(*policy, move |attempt| {
        let response = fetch();
        async move {
            let response = response.await?;
            if readiness.is_ready(&response) {
                Ok(Outcome::Done(response))
            } else if attempt.is_last() {
                tracing::debug!(attempts = attempt.number(), "polling exhausted");
                readiness
                    .on_exhausted(response)
                    .map(Outcome::Done)
                    .map_err(<E as From<S::Error>>::from)
            } else {
                Ok(Outcome::Retry)
            }
        }
    })
    .await
}
