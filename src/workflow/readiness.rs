//! Readiness strategies for the three polled reads.
//!
//! These are pure: they only look at a response and never touch the network.

use crate::api::{BranchOverview, Deployment, DeploymentOverview, Page};
use crate::error::RemoteError;
use crate::retry::Readiness;

/// Ready once the branch listing contains the branch.
///
/// Exhaustion is fatal: a project without its branch is not set up.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchListed;

impl Readiness<Page<BranchOverview>> for BranchListed {
    type Error = RemoteError;

    fn is_ready(&self, page: &Page<BranchOverview>) -> bool {
        !page.values.is_empty()
    }

    fn on_exhausted(
        &self,
        _page: Page<BranchOverview>,
    ) -> Result<Page<BranchOverview>, RemoteError> {
        Err(RemoteError::SetupIncomplete)
    }
}

/// Ready once the branch reports at least one deployment.
///
/// Exhaustion is not an error: a branch still showing zero deployments after
/// the last attempt is taken to have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeploymentsListed;

impl Readiness<Page<DeploymentOverview>> for DeploymentsListed {
    type Error = RemoteError;

    fn is_ready(&self, page: &Page<DeploymentOverview>) -> bool {
        page.total > 0
    }

    fn on_exhausted(
        &self,
        page: Page<DeploymentOverview>,
    ) -> Result<Page<DeploymentOverview>, RemoteError> {
        Ok(page)
    }
}

/// Ready once webspace, storage quota and domain are provisioned.
///
/// Exhaustion is fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeploymentProvisioned;

impl Readiness<Deployment> for DeploymentProvisioned {
    type Error = RemoteError;

    fn is_ready(&self, deployment: &Deployment) -> bool {
        deployment.is_provisioned()
    }

    fn on_exhausted(&self, _deployment: Deployment) -> Result<Deployment, RemoteError> {
        Err(RemoteError::SetupIncomplete)
    }
}
