//! Wire types of the Deploy Now API.
//!
//! Field names follow the service's camelCase JSON. Optional fields are the
//! ones a freshly created project may not have populated yet.

use serde::{Deserialize, Serialize};

/// One page of a listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items on the server.
    pub total: u64,
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub values: Vec<T>,
}

impl<T> Page<T> {
    /// A page with no items.
    pub fn empty() -> Self {
        Self {
            total: 0,
            values: Vec::new(),
        }
    }

    /// A page holding all of `values`.
    pub fn of(values: Vec<T>) -> Self {
        Self {
            total: values.len() as u64,
            values,
        }
    }

    /// Returns true when the server reported no matching items.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Summary of a project branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchOverview {
    /// Branch id.
    pub id: String,
    /// Git branch name.
    pub name: String,
}

/// Summary of a deployment inside a branch listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOverview {
    /// Deployment id.
    pub id: String,
    /// Deployment name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Full details of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Deployment id.
    pub id: String,
    /// Webspace the deployment is served from.
    pub webspace: WebspaceDetails,
    /// Domain assigned to the deployment, once provisioned.
    #[serde(default)]
    pub domain: Option<Domain>,
    /// Deployment run state.
    #[serde(default)]
    pub state: DeploymentStatus,
}

impl Deployment {
    /// Returns true once webspace, quota and domain are all provisioned.
    pub fn is_provisioned(&self) -> bool {
        self.webspace.state != WebspaceState::InCreation
            && self.webspace.webspace.quota.is_some()
            && self.domain.is_some()
    }
}

/// Webspace plus its provisioning state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebspaceDetails {
    /// Provisioning state.
    pub state: WebspaceState,
    /// The webspace itself.
    pub webspace: Webspace,
}

/// Provisioning state of a webspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebspaceState {
    /// Still being created.
    InCreation,
    /// Created and usable.
    Created,
    /// Being updated.
    InUpdate,
    /// Being deleted.
    InDeletion,
    /// Provisioning failed.
    Failed,
}

/// Hosting details of a webspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webspace {
    /// Webspace id.
    pub id: String,
    /// SSH host used to upload files.
    pub ssh_host: String,
    /// PHP version, if the webspace runs PHP.
    #[serde(default)]
    pub php_version: Option<String>,
    /// Storage quota, populated once provisioning finished.
    #[serde(default)]
    pub quota: Option<Quota>,
}

/// Storage limits of a webspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    /// Storage quota in bytes.
    pub storage_quota: u64,
}

/// A domain assigned to a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Host name, without scheme.
    pub name: String,
}

/// Run state of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatus {
    /// When the deployment last finished successfully.
    #[serde(default)]
    pub last_deployed_date: Option<String>,
}

/// State reported back to the service for a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentState {
    /// The run finished successfully.
    Success,
    /// The run failed or was cancelled.
    Failed,
    /// The run is in progress.
    Running,
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeploymentState::Success => "SUCCESS",
            DeploymentState::Failed => "FAILED",
            DeploymentState::Running => "RUNNING",
        };
        f.write_str(name)
    }
}

/// Body of a deployment state update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    /// New state.
    pub state: DeploymentState,
    /// Id of the CI run that produced the state.
    pub external_id: String,
}

/// Body of a deployment trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    /// Commit to deploy.
    pub version: String,
    /// Only redeploy deployments whose last run failed.
    pub only_failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment_json(state: &str, quota: &str, domain: &str) -> String {
        format!(
            r#"{{
                "id": "dep-1",
                "webspace": {{
                    "state": "{state}",
                    "webspace": {{
                        "id": "ws-1",
                        "sshHost": "ssh.example.com",
                        "phpVersion": "8.2"
                        {quota}
                    }}
                }}
                {domain}
            }}"#
        )
    }

    #[test]
    fn test_deployment_deserializes_partial_provisioning() {
        let json = deployment_json("IN_CREATION", "", "");
        let deployment: Deployment = serde_json::from_str(&json).unwrap();

        assert_eq!(deployment.webspace.state, WebspaceState::InCreation);
        assert_eq!(deployment.webspace.webspace.quota, None);
        assert_eq!(deployment.domain, None);
        assert_eq!(deployment.state.last_deployed_date, None);
        assert!(!deployment.is_provisioned());
    }

    #[test]
    fn test_deployment_provisioned() {
        let json = deployment_json(
            "CREATED",
            r#", "quota": {"storageQuota": 1024}"#,
            r#", "domain": {"name": "site.example.com"}"#,
        );
        let deployment: Deployment = serde_json::from_str(&json).unwrap();

        assert_eq!(
            deployment.webspace.webspace.quota,
            Some(Quota { storage_quota: 1024 })
        );
        assert!(deployment.is_provisioned());
    }

    #[test]
    fn test_deployment_missing_domain_is_not_provisioned() {
        let json = deployment_json("CREATED", r#", "quota": {"storageQuota": 1}"#, "");
        let deployment: Deployment = serde_json::from_str(&json).unwrap();
        assert!(!deployment.is_provisioned());
    }

    #[test]
    fn test_state_update_serializes_camel_case() {
        let update = StateUpdate {
            state: DeploymentState::Running,
            external_id: "42".to_string(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"state": "RUNNING", "externalId": "42"})
        );
    }

    #[test]
    fn test_trigger_request_serializes_camel_case() {
        let request = TriggerRequest {
            version: "abc123".to_string(),
            only_failed: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"version": "abc123", "onlyFailed": false})
        );
    }

    #[test]
    fn test_page_helpers() {
        let page: Page<u8> = Page::empty();
        assert!(page.is_empty());

        let page = Page::of(vec![1, 2]);
        assert_eq!(page.total, 2);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_branch_page_deserializes() {
        let page: Page<BranchOverview> =
            serde_json::from_str(r#"{"total":1,"values":[{"id":"b","name":"main"}]}"#).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.values[0].id, "b");
        assert_eq!(page.values[0].name, "main");
    }

    #[test]
    fn test_deployment_page_without_values() {
        let page: Page<DeploymentOverview> = serde_json::from_str(r#"{"total":0}"#).unwrap();
        assert!(page.is_empty());
        assert!(page.values.is_empty());
    }

    #[test]
    fn test_deployment_state_display() {
        assert_eq!(DeploymentState::Success.to_string(), "SUCCESS");
        assert_eq!(DeploymentState::Failed.to_string(), "FAILED");
        assert_eq!(DeploymentState::Running.to_string(), "RUNNING");
    }
}
