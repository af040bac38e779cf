//! Integration tests for the polled Deploy Now reads.

use deploynow_action::api::{ApiError, Page};
use deploynow_action::error::SETUP_INCOMPLETE;
use deploynow_action::prelude::*;
use deploynow_action::testing::{fixtures, Call, ScriptedApi};

fn policy() -> RetryPolicy {
    RetryPolicy::default()
}

#[tokio::test]
async fn branch_found_on_first_attempt() {
    let api = ScriptedApi::new().branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])));

    let branch = resolve_branch(&api, &policy(), "p-1", "main").await.unwrap();

    assert_eq!(branch, fixtures::branch("b-1", "main"));
    assert_eq!(
        api.calls(),
        vec![Call::GetBranches {
            project_id: "p-1".to_string(),
            name: "main".to_string(),
        }]
    );
}

#[tokio::test]
async fn branch_found_after_project_setup_catches_up() {
    let api = ScriptedApi::new()
        .branches(Ok(Page::empty()))
        .branches(Ok(Page::empty()))
        .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])));

    let branch = resolve_branch(&api, &policy(), "p-1", "main").await.unwrap();

    assert_eq!(branch.id, "b-1");
    assert_eq!(api.count(Call::is_get_branches), 3);
}

#[tokio::test]
async fn branch_never_listed_fails_after_five_attempts() {
    let api = ScriptedApi::new().branches(Ok(Page::empty()));

    let err = resolve_branch(&api, &policy(), "p-1", "main")
        .await
        .unwrap_err();

    assert!(err.is_setup_incomplete());
    assert_eq!(
        err.to_string(),
        format!("Failed to fetch information about branch \"main\": {SETUP_INCOMPLETE}")
    );
    assert_eq!(api.count(Call::is_get_branches), 5);
}

#[tokio::test]
async fn branch_lookup_transport_error_is_not_retried() {
    let api = ScriptedApi::new()
        .branches(Err(ApiError::Transport("connection refused".to_string())));

    let err = resolve_branch(&api, &policy(), "p-1", "main")
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to fetch information about branch \"main\": connection refused"
    );
    assert_eq!(
        err.api_error(),
        Some(&ApiError::Transport("connection refused".to_string()))
    );
    assert_eq!(api.count(Call::is_get_branches), 1);
}

#[tokio::test]
async fn branch_lookup_error_after_not_ready_stops_polling() {
    let api = ScriptedApi::new()
        .branches(Ok(Page::empty()))
        .branches(Err(ApiError::Status {
            status: 500,
            message: "internal error".to_string(),
        }))
        .branches(Ok(Page::of(vec![fixtures::branch("b-1", "main")])));

    let err = resolve_branch(&api, &policy(), "p-1", "main")
        .await
        .unwrap_err();

    assert!(err.to_string().contains("status code 500"));
    assert_eq!(api.count(Call::is_get_branches), 2);
}

#[tokio::test]
async fn deployment_count_zero_is_accepted_after_exhaustion() {
    let api = ScriptedApi::new().deployments(Ok(Page::empty()));
    let branch = fixtures::branch("b-1", "main");

    let count = count_deployments(&api, &policy(), "p-1", &branch)
        .await
        .unwrap();

    assert_eq!(count, 0);
    assert_eq!(api.count(Call::is_get_deployments), 5);
}

#[tokio::test]
async fn deployment_count_waits_for_index() {
    let api = ScriptedApi::new()
        .deployments(Ok(Page::empty()))
        .deployments(Ok(fixtures::deployments(2)));
    let branch = fixtures::branch("b-1", "main");

    let count = count_deployments(&api, &policy(), "p-1", &branch)
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(api.count(Call::is_get_deployments), 2);
}

#[tokio::test]
async fn deployment_count_error_names_branch() {
    let api = ScriptedApi::new().deployments(Err(ApiError::Status {
        status: 403,
        message: "forbidden".to_string(),
    }));
    let branch = fixtures::branch("b-1", "main");

    let err = count_deployments(&api, &policy(), "p-1", &branch)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to get deployments for branch \"main\": request failed with status code 403: forbidden"
    );
    assert_eq!(api.count(Call::is_get_deployments), 1);
}

#[tokio::test]
async fn deployment_fetched_once_provisioned() {
    let api = ScriptedApi::new()
        .deployment(Ok(fixtures::deployment_in_creation("d-1")))
        .deployment(Ok(fixtures::deployment_in_creation("d-1")))
        .deployment(Ok(fixtures::provisioned_deployment("d-1")));

    let deployment = fetch_deployment(&api, &policy(), "p-1", "b-1", "d-1")
        .await
        .unwrap();

    assert!(deployment.is_provisioned());
    assert_eq!(api.count(Call::is_get_deployment), 3);
}

#[tokio::test]
async fn deployment_waits_for_domain() {
    let mut without_domain = fixtures::provisioned_deployment("d-1");
    without_domain.domain = None;
    let api = ScriptedApi::new()
        .deployment(Ok(without_domain))
        .deployment(Ok(fixtures::provisioned_deployment("d-1")));

    let deployment = fetch_deployment(&api, &policy(), "p-1", "b-1", "d-1")
        .await
        .unwrap();

    assert!(deployment.domain.is_some());
    assert_eq!(api.count(Call::is_get_deployment), 2);
}

#[tokio::test]
async fn deployment_never_provisioned_fails() {
    let api = ScriptedApi::new().deployment(Ok(fixtures::deployment_in_creation("d-1")));

    let err = fetch_deployment(&api, &policy(), "p-1", "b-1", "d-1")
        .await
        .unwrap_err();

    assert!(err.is_setup_incomplete());
    assert_eq!(
        err.to_string(),
        format!("Failed to fetch information about deployment: {SETUP_INCOMPLETE}")
    );
    assert_eq!(api.count(Call::is_get_deployment), 5);
}

#[tokio::test]
async fn deployment_transport_error_is_not_retried() {
    let api = ScriptedApi::new().deployment(Err(ApiError::Transport("down".to_string())));

    let err = fetch_deployment(&api, &policy(), "p-1", "b-1", "d-1")
        .await
        .unwrap_err();

    assert!(!err.is_setup_incomplete());
    assert_eq!(
        err.to_string(),
        "Failed to fetch information about deployment: down"
    );
    assert_eq!(api.count(Call::is_get_deployment), 1);
}

#[tokio::test]
async fn custom_policy_bounds_attempts() {
    let api = ScriptedApi::new().deployment(Ok(fixtures::deployment_in_creation("d-1")));

    let err = fetch_deployment(&api, &RetryPolicy::new(2).unwrap(), "p-1", "b-1", "d-1")
        .await
        .unwrap_err();

    assert!(err.is_setup_incomplete());
    assert_eq!(api.count(Call::is_get_deployment), 2);
}

#[tokio::test]
async fn workflows_accept_trait_objects() {
    let api = ScriptedApi::new().deployments(Ok(fixtures::deployments(1)));
    let client: &dyn DeployApi = &api;

    let count = count_deployments(client, &policy(), "p-1", &fixtures::branch("b-1", "main"))
        .await
        .unwrap();

    assert_eq!(count, 1);
}
