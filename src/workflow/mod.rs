//! Polling workflows over the Deploy Now API.
//!
//! Newly created projects are provisioned asynchronously, so reads made
//! right after creation can see a half-initialized project. Each workflow
//! polls one read with [`crate::retry::poll`] and its own readiness strategy:
//!
//! | Workflow | Ready when | Last attempt still not ready |
//! |---|---|---|
//! | [`resolve_branch`] | the branch is listed | "not fully completed" error |
//! | [`count_deployments`] | total > 0 | count 0 |
//! | [`fetch_deployment`] | webspace, quota and domain provisioned | "not fully completed" error |
//!
//! API errors are never retried. Every error is prefixed with the operation
//! that failed.

mod polling;
mod readiness;

pub use polling::{count_deployments, fetch_deployment, resolve_branch};
pub use readiness::{BranchListed, DeploymentProvisioned, DeploymentsListed};
