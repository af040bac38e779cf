//! Testing utilities for code that talks to the Deploy Now API.
//!
//! [`ScriptedApi`] is an in-memory [`DeployApi`] whose answers are queued per
//! operation. The last queued answer repeats forever, which makes "the
//! service keeps answering X" a one-liner. Every call is recorded.
//!
//! # Examples
//!
//! ```rust
//! use deploynow_action::api::Page;
//! use deploynow_action::testing::{fixtures, Call, ScriptedApi};
//! use deploynow_action::workflow::resolve_branch;
//! use deploynow_action::RetryPolicy;
//!
//! # tokio_test::block_on(async {
//! let api = ScriptedApi::new()
//!     .branches(Ok(Page::empty()))
//!     .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])));
//!
//! let branch = resolve_branch(&api, &RetryPolicy::default(), "p-1", "main")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(branch.id, "b-1");
//! assert_eq!(api.count(Call::is_get_branches), 2);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use futures::future::{self, FutureExt};

use crate::api::{
    ApiError, ApiResult, BranchOverview, DeployApi, Deployment, DeploymentOverview, Page,
    StateUpdate, TriggerRequest,
};

/// A call received by [`ScriptedApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `get_branches`
    GetBranches {
        /// Project id.
        project_id: String,
        /// Branch name filter.
        name: String,
    },
    /// `get_deployments`
    GetDeployments {
        /// Project id.
        project_id: String,
        /// Branch id.
        branch_id: String,
    },
    /// `get_deployment`
    GetDeployment {
        /// Project id.
        project_id: String,
        /// Branch id.
        branch_id: String,
        /// Deployment id.
        deployment_id: String,
    },
    /// `trigger_deployments`
    TriggerDeployments {
        /// Project id.
        project_id: String,
        /// Branch id.
        branch_id: String,
        /// Request body.
        request: TriggerRequest,
    },
    /// `update_deployment_state`
    UpdateDeploymentState {
        /// Project id.
        project_id: String,
        /// Branch id.
        branch_id: String,
        /// Deployment id.
        deployment_id: String,
        /// Request body.
        update: StateUpdate,
    },
    /// `finish_deployments`
    FinishDeployments {
        /// Project id.
        project_id: String,
        /// Branch id.
        branch_id: String,
    },
}

impl Call {
    /// Returns true for `get_branches` calls.
    pub fn is_get_branches(&self) -> bool {
        matches!(self, Call::GetBranches { .. })
    }

    /// Returns true for `get_deployments` calls.
    pub fn is_get_deployments(&self) -> bool {
        matches!(self, Call::GetDeployments { .. })
    }

    /// Returns true for `get_deployment` calls.
    pub fn is_get_deployment(&self) -> bool {
        matches!(self, Call::GetDeployment { .. })
    }
}

#[derive(Debug)]
struct Script<T> {
    name: &'static str,
    responses: VecDeque<Result<T, ApiError>>,
}

impl<T: Clone> Script<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            responses: VecDeque::new(),
        }
    }

    fn next(&mut self) -> Result<T, ApiError> {
        if self.responses.len() > 1 {
            if let Some(response) = self.responses.pop_front() {
                return response;
            }
        }
        self.responses.front().cloned().unwrap_or_else(|| {
            Err(ApiError::Transport(format!(
                "no scripted response for {}",
                self.name
            )))
        })
    }
}

#[derive(Debug)]
struct State {
    branches: Script<Page<BranchOverview>>,
    deployments: Script<Page<DeploymentOverview>>,
    deployment: Script<Deployment>,
    trigger: Script<()>,
    update_state: Script<()>,
    finish: Script<()>,
    calls: Vec<Call>,
}

/// In-memory [`DeployApi`] answering from per-operation scripts.
///
/// Write operations answer `Ok(())` unless scripted otherwise. Read
/// operations without a script fail with a transport error.
#[derive(Debug)]
pub struct ScriptedApi {
    state: Mutex<State>,
}

impl Default for ScriptedApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedApi {
    /// Create an API with empty read scripts and succeeding writes.
    pub fn new() -> Self {
        let mut state = State {
            branches: Script::new("get_branches"),
            deployments: Script::new("get_deployments"),
            deployment: Script::new("get_deployment"),
            trigger: Script::new("trigger_deployments"),
            update_state: Script::new("update_deployment_state"),
            finish: Script::new("finish_deployments"),
            calls: Vec::new(),
        };
        state.trigger.responses.push_back(Ok(()));
        state.update_state.responses.push_back(Ok(()));
        state.finish.responses.push_back(Ok(()));
        Self {
            state: Mutex::new(state),
        }
    }

    /// Queue an answer for `get_branches`.
    pub fn branches(self, response: Result<Page<BranchOverview>, ApiError>) -> Self {
        self.with_state(|state| state.branches.responses.push_back(response))
    }

    /// Queue an answer for `get_deployments`.
    pub fn deployments(self, response: Result<Page<DeploymentOverview>, ApiError>) -> Self {
        self.with_state(|state| state.deployments.responses.push_back(response))
    }

    /// Queue an answer for `get_deployment`.
    pub fn deployment(self, response: Result<Deployment, ApiError>) -> Self {
        self.with_state(|state| state.deployment.responses.push_back(response))
    }

    /// Make every `trigger_deployments` call fail with `error`.
    pub fn fail_trigger(self, error: ApiError) -> Self {
        self.with_state(|state| state.trigger.responses = VecDeque::from([Err(error)]))
    }

    /// Make every `update_deployment_state` call fail with `error`.
    pub fn fail_update_state(self, error: ApiError) -> Self {
        self.with_state(|state| state.update_state.responses = VecDeque::from([Err(error)]))
    }

    /// Make every `finish_deployments` call fail with `error`.
    pub fn fail_finish(self, error: ApiError) -> Self {
        self.with_state(|state| state.finish.responses = VecDeque::from([Err(error)]))
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Number of received calls matching `filter`.
    pub fn count(&self, filter: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|call| filter(call)).count()
    }

    fn with_state(self, f: impl FnOnce(&mut State)) -> Self {
        f(&mut self.lock());
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer<'a, T>(
        &'a self,
        call: Call,
        script: impl FnOnce(&mut State) -> &mut Script<T>,
    ) -> ApiResult<'a, T>
    where
        T: Clone + Send + 'a,
    {
        let mut state = self.lock();
        state.calls.push(call);
        let response = script(&mut state).next();
        future::ready(response).boxed()
    }
}

impl DeployApi for ScriptedApi {
    fn get_branches<'a>(
        &'a self,
        project_id: &'a str,
        name: &'a str,
    ) -> ApiResult<'a, Page<BranchOverview>> {
        let call = Call::GetBranches {
            project_id: project_id.to_string(),
            name: name.to_string(),
        };
        self.answer(call, |state| &mut state.branches)
    }

    fn get_deployments<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
    ) -> ApiResult<'a, Page<DeploymentOverview>> {
        let call = Call::GetDeployments {
            project_id: project_id.to_string(),
            branch_id: branch_id.to_string(),
        };
        self.answer(call, |state| &mut state.deployments)
    }

    fn get_deployment<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        deployment_id: &'a str,
    ) -> ApiResult<'a, Deployment> {
        let call = Call::GetDeployment {
            project_id: project_id.to_string(),
            branch_id: branch_id.to_string(),
            deployment_id: deployment_id.to_string(),
        };
        self.answer(call, |state| &mut state.deployment)
    }

    fn trigger_deployments<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        request: TriggerRequest,
    ) -> ApiResult<'a, ()> {
        let call = Call::TriggerDeployments {
            project_id: project_id.to_string(),
            branch_id: branch_id.to_string(),
            request,
        };
        self.answer(call, |state| &mut state.trigger)
    }

    fn update_deployment_state<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
        deployment_id: &'a str,
        update: StateUpdate,
    ) -> ApiResult<'a, ()> {
        let call = Call::UpdateDeploymentState {
            project_id: project_id.to_string(),
            branch_id: branch_id.to_string(),
            deployment_id: deployment_id.to_string(),
            update,
        };
        self.answer(call, |state| &mut state.update_state)
    }

    fn finish_deployments<'a>(
        &'a self,
        project_id: &'a str,
        branch_id: &'a str,
    ) -> ApiResult<'a, ()> {
        let call = Call::FinishDeployments {
            project_id: project_id.to_string(),
            branch_id: branch_id.to_string(),
        };
        self.answer(call, |state| &mut state.finish)
    }
}

/// Ready-made API responses.
pub mod fixtures {
    use crate::api::{
        BranchOverview, Deployment, DeploymentOverview, DeploymentStatus, Domain, Page, Quota,
        Webspace, WebspaceDetails, WebspaceState,
    };

    /// A branch summary.
    pub fn branch(id: &str, name: &str) -> BranchOverview {
        BranchOverview {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// A deployment listing with `count` entries.
    pub fn deployments(count: u64) -> Page<DeploymentOverview> {
        Page::of(
            (0..count)
                .map(|n| DeploymentOverview {
                    id: format!("d-{n}"),
                    name: None,
                })
                .collect(),
        )
    }

    /// A fully provisioned deployment served from `site.example.com`.
    pub fn provisioned_deployment(id: &str) -> Deployment {
        Deployment {
            id: id.to_string(),
            webspace: WebspaceDetails {
                state: WebspaceState::Created,
                webspace: Webspace {
                    id: "ws-1".to_string(),
                    ssh_host: "ssh.example.com".to_string(),
                    php_version: Some("8.2".to_string()),
                    quota: Some(Quota {
                        storage_quota: 2048,
                    }),
                },
            },
            domain: Some(Domain {
                name: "site.example.com".to_string(),
            }),
            state: DeploymentStatus {
                last_deployed_date: Some("2024-05-01T12:00:00Z".to_string()),
            },
        }
    }

    /// A deployment whose webspace is still being created.
    pub fn deployment_in_creation(id: &str) -> Deployment {
        let mut deployment = provisioned_deployment(id);
        deployment.webspace.state = WebspaceState::InCreation;
        deployment.webspace.webspace.quota = None;
        deployment.domain = None;
        deployment.state = DeploymentStatus::default();
        deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_api_repeats_last_response() {
        let api = ScriptedApi::new()
            .branches(Ok(Page::empty()))
            .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])));

        assert_eq!(api.get_branches("p", "main").await, Ok(Page::empty()));
        for _ in 0..3 {
            let page = api.get_branches("p", "main").await.unwrap();
            assert_eq!(page.total, 1);
        }
        assert_eq!(api.count(Call::is_get_branches), 4);
    }

    #[tokio::test]
    async fn scripted_api_without_script_fails() {
        let api = ScriptedApi::new();
        let err = api.get_deployment("p", "b", "d").await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Transport("no scripted response for get_deployment".to_string())
        );
    }

    #[tokio::test]
    async fn scripted_api_writes_succeed_by_default() {
        let api = ScriptedApi::new();
        assert_eq!(api.finish_deployments("p", "b").await, Ok(()));
        assert_eq!(
            api.calls(),
            vec![Call::FinishDeployments {
                project_id: "p".to_string(),
                branch_id: "b".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn scripted_api_failing_writes() {
        let api = ScriptedApi::new().fail_trigger(ApiError::Transport("down".to_string()));
        let request = TriggerRequest {
            version: "abc".to_string(),
            only_failed: false,
        };
        assert!(api.trigger_deployments("p", "b", request).await.is_err());
    }

    #[test]
    fn fixtures_are_consistent() {
        assert!(fixtures::provisioned_deployment("d").is_provisioned());
        assert!(!fixtures::deployment_in_creation("d").is_provisioned());
        assert_eq!(fixtures::deployments(3).total, 3);
    }
}
