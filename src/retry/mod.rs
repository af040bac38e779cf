//! Bounded retry-until-ready for eventually-consistent reads.
//!
//! - **Pure policy**: [`RetryPolicy`] is just an attempt budget, no delays
//! - **Explicit outcomes**: an attempt returns [`Outcome::Retry`] or
//!   [`Outcome::Done`] instead of calling back into the engine
//! - **Last-attempt awareness**: every attempt receives an [`Attempt`] so it
//!   can pick a final value or error when no attempts remain
//!
//! # Quick Start
//!
//! ```rust
//! use deploynow_action::retry::{Outcome, RetryExhausted, RetryPolicy, Retryable};
//!
//! # tokio_test::block_on(async {
//! let value = Retryable::new(
//!     |attempt| async move {
//!         if attempt.number() < 3 {
//!             Ok::<_, RetryExhausted>(Outcome::Retry)
//!         } else {
//!             Ok(Outcome::Done("ready"))
//!         }
//!     },
//!     RetryPolicy::new(5).unwrap(),
//! )
//! .run()
//! .await;
//!
//! assert_eq!(value, Ok("ready"));
//! # });
//! ```
//!
//! Errors returned by an attempt abort the run immediately. Only a
//! "not ready" answer is retried.
//!
//! For the common "fetch, check, maybe fall back" shape use [`poll`] with a
//! [`Readiness`] strategy.

mod attempt;
mod engine;
mod error;
mod policy;
mod poll;

pub use attempt::{Attempt, Outcome};
pub use engine::{retry, Retryable};
pub use error::RetryExhausted;
pub use policy::{InvalidPolicy, RetryPolicy, DEFAULT_POLL_ATTEMPTS};
pub use poll::{poll, ready_when, Readiness, ReadyWhen};
