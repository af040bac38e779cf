//! The remote Deploy Now API as seen by the action.
//!
//! [`DeployApi`] is the seam to the HTTP client. The client itself lives
//! outside this crate; tests use [`crate::testing::ScriptedApi`].
//!
//! Every operation is scoped to the authenticated user and returns a boxed
//! future so the trait stays object safe:
//!
//! ```rust
//! use deploynow_action::api::DeployApi;
//!
//! fn takes_any_client(_client: &dyn DeployApi) {}
//! ```

mod model;

use futures::future::BoxFuture;

pub use model::{
    BranchOverview, Deployment, DeploymentOverview, DeploymentState, DeploymentStatus, Domain,
    Page, Quota, StateUpdate, TriggerRequest, Webspace, WebspaceDetails, WebspaceState,
};

/// Error returned by a [`DeployApi`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("request failed with status code {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the response body.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type of [`DeployApi`] operations.
pub type ApiResult<'a, T> = BoxFuture<'a, Result<T, ApiError>>;

/// Operations of the Deploy Now API used by the action.
pub trait DeployApi: Send + Sync {
    /// List branches of a project, filtered by branch name.
    fn get_branches<'a>(&'a self, project_id: &'a str, name: &'a str)
        -> ApiResult<'a, Page<BranchOverview>>;

    /// List deployments of a branch.
    fn get_deployments<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
    ) -> ApiResult<'a, Page<DeploymentOverview>>;

    /// Fetch one deployment with its webspace and domain.
    fn get_deployment<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        deployment_id: &'a str,
    ) -> ApiResult<'a, Deployment>;

    /// Start deployments of a branch for a commit.
    fn trigger_deployments<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        request: TriggerRequest,
    ) -> ApiResult<'a, ()>;

    /// Report the state of a deployment run.
    fn update_deployment_state<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        deployment_id: &'a str,
        update: StateUpdate,
    ) -> ApiResult<'a, ()>;

    /// Tell the service all deployments of a branch have finished.
    fn finish_deployments<'a>(&'a self, project_id: &'a str, branch_id: &'a str)
        -> ApiResult<'a, ()>;
}
