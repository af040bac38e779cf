//! The action dispatcher.
//!
//! [`ActionRunner`] turns one set of [`Parameter`]s into remote calls and a
//! flat [`Outputs`] map:
//!
//! | Action | Does |
//! |---|---|
//! | `retrieve-info` | project info (no branch/deployment id) or deployment info |
//! | `update-status` | reports a deployment run's state |
//! | `set-deployments-finished` | marks a branch's deployments finished |
//! | `dispatch-deployments` | triggers deployments for a commit |
//!
//! Unknown action names are logged and produce empty outputs.

mod input;
mod output;

use crate::api::{DeployApi, StateUpdate, TriggerRequest};
use crate::error::{ActionError, RemoteError};
use crate::retry::RetryPolicy;
use crate::workflow::{count_deployments, fetch_deployment, resolve_branch};

pub use input::{deployment_state, ActionKind, Parameter, UnsupportedAction};
pub use output::{
    deployment_outputs, project_outputs, site_url, DeploymentInfo, Outputs, ProjectInfo, INFO,
    TEMPLATE_VARIABLES,
};

/// Runs actions against a [`DeployApi`].
///
/// # Examples
///
/// ```rust
/// use deploynow_action::action::{ActionRunner, Parameter, INFO};
/// use deploynow_action::api::Page;
/// use deploynow_action::testing::{fixtures, ScriptedApi};
///
/// # tokio_test::block_on(async {
/// let api = ScriptedApi::new()
///     .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])))
///     .deployments(Ok(fixtures::deployments(1)));
///
/// let parameter: Parameter = serde_json::from_value(serde_json::json!({
///     "action": "retrieve-info",
///     "service-host": "api.example.com",
///     "api-key": "secret",
///     "project-id": "p-1",
///     "branch-name": "main",
///     "run-id": "17",
///     "commit-id": "abc123",
/// }))
/// .unwrap();
///
/// let outputs = ActionRunner::new(&api).run(&parameter).await.unwrap();
/// assert_eq!(outputs[INFO]["branch-id"], "b-1");
/// # });
/// ```
#[derive(Debug)]
pub struct ActionRunner<'a, C: ?Sized> {
    client: &'a C,
    policy: RetryPolicy,
}

impl<'a, C> ActionRunner<'a, C>
where
    C: DeployApi + ?Sized,
{
    /// Create a runner using the default polling policy.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
        }
    }

    /// Use `policy` for every polled read.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the action named in `parameter`.
    #[tracing::instrument(level = "debug", skip_all, fields(action = %parameter.action))]
    pub async fn run(&self, parameter: &Parameter) -> Result<Outputs, ActionError> {
        let kind = match parameter.action.parse::<ActionKind>() {
            Ok(kind) => kind,
            Err(unsupported) => {
                tracing::error!("{}", unsupported);
                return Ok(Outputs::new());
            }
        };

        match kind {
            ActionKind::RetrieveInfo => self.retrieve_info(parameter).await,
            ActionKind::UpdateStatus => {
                self.update_status(parameter).await?;
                Ok(Outputs::new())
            }
            ActionKind::SetDeploymentsFinished => {
                self.set_deployments_finished(parameter).await?;
                Ok(Outputs::new())
            }
            ActionKind::DispatchDeployments => {
                self.dispatch_deployments(parameter).await?;
                Ok(Outputs::new())
            }
        }
    }

    /// Project info when neither branch nor deployment id is known, deployment
    /// info otherwise.
    pub async fn retrieve_info(&self, parameter: &Parameter) -> Result<Outputs, ActionError> {
        if parameter.branch_id.is_none() && parameter.deployment_id.is_none() {
            let info = self
                .project_info(&parameter.project_id, &parameter.branch_name)
                .await?;
            project_outputs(&info)
        } else {
            let info = self
                .deployment_info(
                    &parameter.project_id,
                    parameter.require_branch_id()?,
                    parameter.require_deployment_id()?,
                )
                .await?;
            deployment_outputs(&info)
        }
    }

    /// Whether deployments are enabled for `branch_name`.
    pub async fn project_info(
        &self,
        project_id: &str,
        branch_name: &str,
    ) -> Result<ProjectInfo, ActionError> {
        let branch = resolve_branch(self.client, &self.policy, project_id, branch_name).await?;
        let count = count_deployments(self.client, &self.policy, project_id, &branch).await?;

        if count < 1 {
            tracing::warn!("The deployment is disabled for this branch");
            return Ok(ProjectInfo::disabled());
        }
        Ok(ProjectInfo::enabled(&branch))
    }

    /// Details of a provisioned deployment.
    pub async fn deployment_info(
        &self,
        project_id: &str,
        branch_id: &str,
        deployment_id: &str,
    ) -> Result<DeploymentInfo, ActionError> {
        let deployment = fetch_deployment(
            self.client,
            &self.policy,
            project_id,
            branch_id,
            deployment_id,
        )
        .await?;

        DeploymentInfo::from_deployment(&deployment).ok_or_else(|| {
            ActionError::remote(
                "Failed to fetch information about deployment",
                RemoteError::SetupIncomplete,
            )
        })
    }

    /// Report the state of a deployment run.
    ///
    /// The status is validated before any request is made.
    pub async fn update_status(&self, parameter: &Parameter) -> Result<(), ActionError> {
        let state = deployment_state(parameter.require_status()?)?;
        let branch_id = parameter.require_branch_id()?;
        let deployment_id = parameter.require_deployment_id()?;

        let update = StateUpdate {
            state,
            external_id: parameter.run_id.clone(),
        };
        self.client
            .update_deployment_state(&parameter.project_id, branch_id, deployment_id, update)
            .await
            .map_err(|err| {
                ActionError::remote(
                    format!("Failed to set state \"{state}\" for deployment"),
                    err,
                )
            })
    }

    /// Tell the service the branch's deployments have finished.
    pub async fn set_deployments_finished(&self, parameter: &Parameter) -> Result<(), ActionError> {
        let branch_id = parameter.require_branch_id()?;
        self.client
            .finish_deployments(&parameter.project_id, branch_id)
            .await
            .map_err(|err| {
                ActionError::remote(
                    "Failed to inform Deploy Now that deployments have finished",
                    err,
                )
            })
    }

    /// Trigger deployments of the branch for the current commit.
    pub async fn dispatch_deployments(&self, parameter: &Parameter) -> Result<(), ActionError> {
        let branch_id = parameter.require_branch_id()?;
        let request = TriggerRequest {
            version: parameter.commit_id.clone(),
            only_failed: false,
        };
        self.client
            .trigger_deployments(&parameter.project_id, branch_id, request)
            .await
            .map_err(|err| ActionError::remote("Failed to trigger deployments", err))
    }
}

/// Run the action named in `parameter` with the default polling policy.
pub async fn handle_action<C>(client: &C, parameter: &Parameter) -> Result<Outputs, ActionError>
where
    C: DeployApi + ?Sized,
{
    ActionRunner::new(client).run(parameter).await
}
