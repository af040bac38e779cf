//! Action inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::api::DeploymentState;
use crate::error::ActionError;

/// The operations the action can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Report project or deployment information.
    RetrieveInfo,
    /// Report the state of one deployment run.
    UpdateStatus,
    /// Mark all deployments of a branch as finished.
    SetDeploymentsFinished,
    /// Trigger deployments of a branch.
    DispatchDeployments,
}

impl ActionKind {
    /// The input value selecting this action.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionKind::RetrieveInfo => "retrieve-info",
            ActionKind::UpdateStatus => "update-status",
            ActionKind::SetDeploymentsFinished => "set-deployments-finished",
            ActionKind::DispatchDeployments => "dispatch-deployments",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when the action name is not one of [`ActionKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Action {0} is not supported")]
pub struct UnsupportedAction(pub String);

impl FromStr for ActionKind {
    type Err = UnsupportedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "retrieve-info" => Ok(ActionKind::RetrieveInfo),
            "update-status" => Ok(ActionKind::UpdateStatus),
            "set-deployments-finished" => Ok(ActionKind::SetDeploymentsFinished),
            "dispatch-deployments" => Ok(ActionKind::DispatchDeployments),
            other => Err(UnsupportedAction(other.to_string())),
        }
    }
}

/// Inputs of one action run.
///
/// Keys are kebab-case, matching the action's input names. Optional inputs
/// left empty (`""`) count as unset:
///
/// ```rust
/// use deploynow_action::action::Parameter;
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
/// assert_eq!(parameter.branch_id, None);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Parameter {
    /// Name of the action to run.
    pub action: String,
    /// Host of the Deploy Now API.
    pub service_host: String,
    /// API key used by the client.
    pub api_key: String,
    /// Project id.
    pub project_id: String,
    /// Branch id, once known.
    #[serde(default, deserialize_with = "non_empty")]
    pub branch_id: Option<String>,
    /// Deployment id, once known.
    #[serde(default, deserialize_with = "non_empty")]
    pub deployment_id: Option<String>,
    /// CI job status for `update-status`.
    #[serde(default, deserialize_with = "non_empty")]
    pub status: Option<String>,
    /// Git branch name.
    pub branch_name: String,
    /// CI run id.
    pub run_id: String,
    /// Commit being deployed.
    pub commit_id: String,
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("action", &self.action)
            .field("service_host", &self.service_host)
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("branch_id", &self.branch_id)
            .field("deployment_id", &self.deployment_id)
            .field("status", &self.status)
            .field("branch_name", &self.branch_name)
            .field("run_id", &self.run_id)
            .field("commit_id", &self.commit_id)
            .finish()
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.is_empty()))
}

impl Parameter {
    /// Branch name from a git ref such as `refs/heads/main`.
    pub fn branch_from_ref(git_ref: &str) -> String {
        git_ref.replace("refs/heads/", "")
    }

    /// The branch id, or an error naming the missing input.
    pub fn require_branch_id(&self) -> Result<&str, ActionError> {
        self.branch_id
            .as_deref()
            .ok_or(ActionError::MissingParameter("branch-id"))
    }

    /// The deployment id, or an error naming the missing input.
    pub fn require_deployment_id(&self) -> Result<&str, ActionError> {
        self.deployment_id
            .as_deref()
            .ok_or(ActionError::MissingParameter("deployment-id"))
    }

    /// The job status, or an error naming the missing input.
    pub fn require_status(&self) -> Result<&str, ActionError> {
        self.status
            .as_deref()
            .ok_or(ActionError::MissingParameter("status"))
    }
}

/// Map a CI job status onto the deployment state reported to the service.
pub fn deployment_state(status: &str) -> Result<DeploymentState, ActionError> {
    match status {
        "success" => Ok(DeploymentState::Success),
        "failure" | "cancelled" => Ok(DeploymentState::Failed),
        "in_progress" => Ok(DeploymentState::Running),
        other => Err(ActionError::UnknownStatus(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_round_trips_names() {
        for kind in [
            ActionKind::RetrieveInfo,
            ActionKind::UpdateStatus,
            ActionKind::SetDeploymentsFinished,
            ActionKind::DispatchDeployments,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_unsupported_action() {
        let err = "deploy-everything".parse::<ActionKind>().unwrap_err();
        assert_eq!(err.to_string(), "Action deploy-everything is not supported");
    }

    #[test]
    fn test_branch_from_ref() {
        assert_eq!(Parameter::branch_from_ref("refs/heads/main"), "main");
        assert_eq!(
            Parameter::branch_from_ref("refs/heads/feature/x"),
            "feature/x"
        );
        assert_eq!(Parameter::branch_from_ref("main"), "main");
    }

    #[test]
    fn test_empty_optional_inputs_are_unset() {
        let parameter: Parameter = serde_json::from_value(serde_json::json!({
            "action": "retrieve-info",
            "service-host": "api.example.com",
            "api-key": "secret",
            "project-id": "p-1",
            "branch-id": "",
            "deployment-id": "",
            "status": "",
            "branch-name": "main",
            "run-id": "17",
            "commit-id": "abc123",
        }))
        .unwrap();

        assert_eq!(parameter.branch_id, None);
        assert_eq!(parameter.deployment_id, None);
        assert_eq!(parameter.status, None);
        assert_eq!(
            parameter.require_branch_id(),
            Err(ActionError::MissingParameter("branch-id"))
        );
    }

    #[test]
    fn test_deployment_state_mapping() {
        assert_eq!(deployment_state("success"), Ok(DeploymentState::Success));
        assert_eq!(deployment_state("failure"), Ok(DeploymentState::Failed));
        assert_eq!(deployment_state("cancelled"), Ok(DeploymentState::Failed));
        assert_eq!(deployment_state("in_progress"), Ok(DeploymentState::Running));
        assert_eq!(
            deployment_state("skipped"),
            Err(ActionError::UnknownStatus("skipped".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let parameter: Parameter = serde_json::from_value(serde_json::json!({
            "action": "update-status",
            "service-host": "api.example.com",
            "api-key": "top-secret",
            "project-id": "p-1",
            "branch-id": "b-1",
            "branch-name": "main",
            "run-id": "1",
            "commit-id": "abc",
        }))
        .unwrap();

        let debug = format!("{:?}", parameter);
        assert!(!debug.contains("top-secret"));
        assert_eq!(parameter.require_branch_id(), Ok("b-1"));
        assert_eq!(
            parameter.require_status(),
            Err(ActionError::MissingParameter("status"))
        );
    }
}
