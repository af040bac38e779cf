//! # deploynow-action
//!
//! Control logic of a CI step that talks to the Deploy Now deployment
//! service: it triggers deployments, waits for freshly created projects to
//! finish provisioning, and reports results.
//!
//! The service is eventually consistent. Right after a project is created,
//! reads can see a branch that is not listed yet, a deployment count of zero,
//! or a webspace still in creation. The crate handles this with bounded,
//! back-to-back polling:
//!
//! - [`retry`]: the retry engine. An attempt returns [`Outcome::Retry`] or
//!   [`Outcome::Done`] and is told when it is the last one.
//! - [`workflow`]: the three polled reads, each with its own readiness check
//!   and exhaustion fallback.
//! - [`action`]: maps an action name and inputs onto workflows and writes.
//!
//! ## Quick Example
//!
//! ```rust
//! use deploynow_action::prelude::*;
//! use deploynow_action::api::Page;
//! use deploynow_action::testing::{fixtures, ScriptedApi};
//!
//! # tokio_test::block_on(async {
//! // The branch exists, but its deployments are never indexed.
//! let api = ScriptedApi::new()
//!     .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])))
//!     .deployments(Ok(Page::empty()));
//!
//! let policy = RetryPolicy::default();
//! let branch = resolve_branch(&api, &policy, "p-1", "main").await.unwrap();
//! let count = count_deployments(&api, &policy, "p-1", &branch).await.unwrap();
//!
//! assert_eq!(count, 0);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod action;
pub mod api;
pub mod error;
pub mod retry;
pub mod testing;
pub mod workflow;

// Re-exports
pub use action::{handle_action, ActionRunner, Outputs, Parameter};
pub use api::{ApiError, DeployApi};
pub use error::{ActionError, RemoteError};
pub use retry::{Attempt, Outcome, RetryExhausted, RetryPolicy, Retryable};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{handle_action, ActionRunner, Outputs, Parameter};
    pub use crate::api::{ApiError, DeployApi};
    pub use crate::error::{ActionError, RemoteError};
    pub use crate::retry::{
        poll, ready_when, retry, Attempt, Outcome, Readiness, RetryExhausted, RetryPolicy,
        Retryable,
    };
    pub use crate::workflow::{count_deployments, fetch_deployment, resolve_branch};
}
