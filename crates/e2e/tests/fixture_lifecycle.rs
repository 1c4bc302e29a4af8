//! Fixture setup/teardown lifecycle against a mock portal

use docspace_e2e::{init_tracing, MockPortal};
use docspace_harness::{HarnessConfig, HarnessError, Role, TestFixture};

const DELETE_PATH: &str = "/api/2.0/portal/deleteportalimmediately";

#[tokio::test]
async fn run_tears_down_after_a_passing_body() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;

    let domain = TestFixture::run(mock.config(), |fixture| async move {
        assert_eq!(fixture.portal().domain, fixture.store().portal_domain()?);
        Ok(fixture.portal().domain.clone())
    })
    .await
    .unwrap();

    assert_eq!(domain, mock.domain());

    let deletes = mock.requests_to("DELETE", DELETE_PATH).await;
    assert_eq!(deletes.len(), 1, "portal must be deleted exactly once");
    assert_eq!(
        MockPortal::authorization(&deletes[0]).as_deref(),
        Some(&*format!("Bearer {}", MockPortal::OWNER_TOKEN))
    );
}

#[tokio::test]
async fn run_tears_down_when_the_body_fails() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;

    let result: Result<(), _> = TestFixture::run(mock.config(), |_fixture| async move {
        Err(HarnessError::InvalidArgument("simulated test failure".to_string()))
    })
    .await;

    // The body's error wins, and teardown still ran exactly once.
    assert!(matches!(result, Err(HarnessError::InvalidArgument(_))));
    assert_eq!(mock.requests_to("DELETE", DELETE_PATH).await.len(), 1);
}

#[tokio::test]
async fn teardown_is_idempotent() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;

    let fixture = TestFixture::setup(mock.config()).await.unwrap();
    fixture.teardown().await.unwrap();
    fixture.teardown().await.unwrap();

    assert_eq!(mock.requests_to("DELETE", DELETE_PATH).await.len(), 1);
}

#[tokio::test]
async fn registration_failure_aborts_without_teardown() {
    init_tracing();
    let mock = MockPortal::start_with_broken_registration(500, "region at capacity").await;

    let err = TestFixture::setup(mock.config()).await.unwrap_err();
    match err {
        HarnessError::ProvisioningFailed { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "region at capacity");
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(mock.requests_to("DELETE", DELETE_PATH).await.is_empty());
}

#[tokio::test]
async fn owner_auth_failure_aborts_setup() {
    init_tracing();
    let mock = MockPortal::start().await;
    mock.mount_auth_failure(401, "invalid credentials").await;

    let err = TestFixture::setup(mock.config()).await.unwrap_err();
    assert!(matches!(
        err,
        HarnessError::AuthenticationFailed { status: 401, .. }
    ));

    // Portal exists but the fixture never reached Ready; deletion is not
    // attempted without an owner token.
    assert!(mock.requests_to("DELETE", DELETE_PATH).await.is_empty());
}

#[tokio::test]
async fn standalone_deployment_skips_owner_activation() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;
    let config = HarnessConfig {
        standalone: true,
        ..mock.config()
    };

    TestFixture::run(config, |_fixture| async move { Ok(()) })
        .await
        .unwrap();

    // Standalone servers pre-activate the owner; no activation call goes out.
    assert!(mock
        .requests_to("PUT", "/api/2.0/people/activationstatus/Activated")
        .await
        .is_empty());
    assert_eq!(mock.requests_to("DELETE", DELETE_PATH).await.len(), 1);
}

#[tokio::test]
async fn teardown_reauthenticates_as_owner_after_role_switching() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;

    TestFixture::run(mock.config(), |fixture| async move {
        // Simulate a test that clobbered the owner slot mid-run.
        fixture.store().set_token(Role::Owner, "stale-token");
        Ok(())
    })
    .await
    .unwrap();

    let deletes = mock.requests_to("DELETE", DELETE_PATH).await;
    assert_eq!(deletes.len(), 1);
    // Teardown re-authenticated first, so the delete used a fresh token.
    assert_eq!(
        MockPortal::authorization(&deletes[0]).as_deref(),
        Some(&*format!("Bearer {}", MockPortal::OWNER_TOKEN))
    );
}
