//! Action outputs.
//!
//! The action produces a flat map from output name to JSON value. Retrieved
//! information goes under `info`, values for site templates under
//! `template-variables`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::api::{BranchOverview, Deployment};
use crate::error::ActionError;

/// Output name holding retrieved information.
pub const INFO: &str = "info";
/// Output name holding template variables.
pub const TEMPLATE_VARIABLES: &str = "template-variables";

/// Flat key-value result of an action run.
pub type Outputs = BTreeMap<String, Value>;

/// Whether a branch has deployments to serve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProjectInfo {
    /// The branch has at least one deployment.
    Enabled {
        /// Always true.
        #[serde(rename = "deployment-enabled")]
        deployment_enabled: bool,
        /// Id of the branch.
        #[serde(rename = "branch-id")]
        branch_id: String,
    },
    /// The branch has no deployments.
    Disabled {
        /// Always false.
        #[serde(rename = "deployment-enabled")]
        deployment_enabled: bool,
    },
}

impl ProjectInfo {
    /// Info for a branch with deployments.
    pub fn enabled(branch: &BranchOverview) -> Self {
        ProjectInfo::Enabled {
            deployment_enabled: true,
            branch_id: branch.id.clone(),
        }
    }

    /// Info for a branch without deployments.
    pub fn disabled() -> Self {
        ProjectInfo::Disabled {
            deployment_enabled: false,
        }
    }
}

/// Details of a provisioned deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentInfo {
    /// SSH host to upload to.
    pub remote_host: String,
    /// Last successful deployment, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_deployment_date: Option<String>,
    /// Public URL of the site.
    pub site_url: String,
    /// Storage quota in bytes.
    pub storage_quota: u64,
    /// Webspace id.
    pub webspace_id: String,
    /// PHP version of the webspace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
}

impl DeploymentInfo {
    /// Extract the reported details from a deployment.
    ///
    /// Returns `None` when the deployment is not fully provisioned.
    pub fn from_deployment(deployment: &Deployment) -> Option<Self> {
        let webspace = &deployment.webspace.webspace;
        let quota = webspace.quota?;
        let domain = deployment.domain.as_ref()?;
        Some(Self {
            remote_host: webspace.ssh_host.clone(),
            last_deployment_date: deployment.state.last_deployed_date.clone(),
            site_url: site_url(&domain.name),
            storage_quota: quota.storage_quota,
            webspace_id: webspace.id.clone(),
            php_version: webspace.php_version.clone(),
        })
    }

    /// Template variables derived from the deployment.
    pub fn template_variables(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("IONOS_APP_URL", self.site_url.clone())])
    }
}

/// Public URL of a domain.
pub fn site_url(domain: &str) -> String {
    format!("https://{domain}")
}

/// Outputs for a project info lookup.
pub fn project_outputs(info: &ProjectInfo) -> Result<Outputs, ActionError> {
    Ok(Outputs::from([(INFO.to_string(), to_value(info)?)]))
}

/// Outputs for a deployment info lookup.
pub fn deployment_outputs(info: &DeploymentInfo) -> Result<Outputs, ActionError> {
    Ok(Outputs::from([
        (INFO.to_string(), to_value(info)?),
        (
            TEMPLATE_VARIABLES.to_string(),
            to_value(&info.template_variables())?,
        ),
    ]))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ActionError> {
    Ok(serde_json::to_value(value)?)
}
