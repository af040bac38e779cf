//! Errors surfaced by the action.
//!
//! Remote failures carry the operation that failed as a prefix, so the
//! message alone tells the CI log reader what went wrong:
//!
//! ```text
//! Failed to fetch information about branch "main": The setup of this DeployNow project is not fully completed yet
//! ```

use crate::api::ApiError;
use crate::retry::RetryExhausted;

/// Message used when provisioning did not finish within the polling budget.
pub const SETUP_INCOMPLETE: &str = "The setup of this DeployNow project is not fully completed yet";

/// Why a single remote operation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The API call itself failed. Never retried.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Polling ran out of attempts before the project was ready.
    #[error("{}", SETUP_INCOMPLETE)]
    SetupIncomplete,
    /// An attempt asked for a retry with no attempts left.
    #[error(transparent)]
    Exhausted(#[from] RetryExhausted),
}

/// Error returned by workflows and the action dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// A remote operation failed.
    #[error("{operation}: {source}")]
    Remote {
        /// Human readable description of the failed operation.
        operation: String,
        /// The underlying failure.
        #[source]
        source: RemoteError,
    },
    /// The status input does not map onto a deployment state.
    #[error("Could not retrieve deployment state from action status: {0}")]
    UnknownStatus(String),
    /// An input the action needs was not supplied.
    #[error("Missing required input: {0}")]
    MissingParameter(&'static str),
    /// Retrieved information could not be turned into outputs.
    #[error("Failed to serialize action outputs: {0}")]
    Output(String),
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::Output(err.to_string())
    }
}

impl ActionError {
    /// Wrap a remote failure with the operation it belongs to.
    pub fn remote(operation: impl Into<String>, source: impl Into<RemoteError>) -> Self {
        ActionError::Remote {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Returns true if polling gave up because provisioning never finished.
    pub fn is_setup_incomplete(&self) -> bool {
        matches!(
            self,
            ActionError::Remote {
                source: RemoteError::SetupIncomplete,
                ..
            }
        )
    }

    /// The API error behind this failure, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ActionError::Remote {
                source: RemoteError::Api(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}
