//! Polled reads against a freshly created project.

use futures::TryFutureExt;

use crate::api::{BranchOverview, DeployApi, Deployment};
use crate::error::{ActionError, RemoteError};
use crate::retry::{poll, RetryPolicy};
use crate::workflow::readiness::{BranchListed, DeploymentProvisioned, DeploymentsListed};

/// Find a branch of `project_id` by its git name.
///
/// Fails with a "not fully completed" error when the branch never shows up.
#[tracing::instrument(level = "debug", skip(client, policy))]
pub async fn resolve_branch<C>(
    client: &C,
    policy: &RetryPolicy,
    project_id: &str,
    branch_name: &str,
) -> Result<BranchOverview, ActionError>
where
    C: DeployApi + ?Sized,
{
    let operation = || format!("Failed to fetch information about branch \"{branch_name}\"");

    let page = poll(
        policy,
        || {
            client
                .get_branches(project_id, branch_name)
                .map_err(RemoteError::from)
        },
        &BranchListed,
    )
    .await
    .map_err(|err| ActionError::remote(operation(), err))?;

    page.values
        .into_iter()
        .next()
        .ok_or_else(|| ActionError::remote(operation(), RemoteError::SetupIncomplete))
}

/// Count the deployments of `branch`.
///
/// A count of 0 is only reported after every attempt saw 0; newly created
/// branches index their deployments with a delay.
#[tracing::instrument(
    level = "debug",
    skip(client, policy, branch),
    fields(branch_id = %branch.id)
)]
pub async fn count_deployments<C>(
    client: &C,
    policy: &RetryPolicy,
    project_id: &str,
    branch: &BranchOverview,
) -> Result<u64, ActionError>
where
    C: DeployApi + ?Sized,
{
    let page = poll(
        policy,
        || {
            client
                .get_deployments(project_id, &branch.id)
                .map_err(RemoteError::from)
        },
        &DeploymentsListed,
    )
    .await
    .map_err(|err| {
        ActionError::remote(
            format!("Failed to get deployments for branch \"{}\"", branch.name),
            err,
        )
    })?;

    Ok(page.total)
}

/// Fetch a deployment once its webspace and domain are provisioned.
#[tracing::instrument(level = "debug", skip(client, policy))]
pub async fn fetch_deployment<C>(
    client: &C,
    policy: &RetryPolicy,
    project_id: &str,
    branch_id: &str,
    deployment_id: &str,
) -> Result<Deployment, ActionError>
where
    C: DeployApi + ?Sized,
{
    poll(
        policy,
        || {
            client
                .get_deployment(project_id, branch_id, deployment_id)
                .map_err(RemoteError::from)
        },
        &DeploymentProvisioned,
    )
    .await
    .map_err(|err| ActionError::remote("Failed to fetch information about deployment", err))
}
