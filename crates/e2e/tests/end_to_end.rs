//! Full portal lifecycle scenario: register, authenticate, provision a
//! role-holding account, tear down.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use docspace_e2e::{init_tracing, MockPortal};
use docspace_harness::{AccountType, Role, TestFixture};

#[tokio::test]
async fn portal_lifecycle_with_room_admin_provisioning() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;
    Mock::given(method("POST"))
        .and(path("/api/2.0/people"))
        .and(body_partial_json(json!({ "type": "RoomAdmin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "ra-123", "isRoomAdmin": true, "isAdmin": false }
        })))
        .mount(mock.server())
        .await;

    let mock_ref = &mock;
    TestFixture::run(mock.config(), |fixture| async move {
        // Portal name carries the configured prefix; domain is a hostname.
        assert!(fixture
            .portal()
            .name
            .starts_with("integration-test-portal-"));
        assert!(!fixture.portal().domain.is_empty());
        assert_eq!(fixture.portal().owner_id, MockPortal::OWNER_ID);

        // Owner ended setup authenticated with a non-empty bearer token.
        let owner_token = fixture.store().bearer(Role::Owner)?;
        assert_eq!(owner_token, MockPortal::OWNER_TOKEN);

        let (response, user) = fixture
            .people()
            .add_member(Role::Owner, AccountType::RoomAdmin)
            .await?;
        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["response"]["isRoomAdmin"], true);

        // The generated credentials were registered for later role auth.
        let stored = fixture.store().credentials(Role::RoomAdmin)?;
        assert_eq!(stored.email, user.email);
        assert_eq!(stored.password, user.password);

        // The create call went out with the owner's bearer token.
        let creates = mock_ref.requests_to("POST", "/api/2.0/people").await;
        assert_eq!(creates.len(), 1);
        assert_eq!(
            MockPortal::authorization(&creates[0]).as_deref(),
            Some(&*format!("Bearer {}", MockPortal::OWNER_TOKEN))
        );
        Ok(())
    })
    .await
    .unwrap();

    // Deletion went to the portal's own domain with owner authorization.
    let deletes = mock
        .requests_to("DELETE", "/api/2.0/portal/deleteportalimmediately")
        .await;
    assert_eq!(deletes.len(), 1);
    assert_eq!(
        MockPortal::authorization(&deletes[0]).as_deref(),
        Some(&*format!("Bearer {}", MockPortal::OWNER_TOKEN))
    );
    let delete_body: serde_json::Value = serde_json::from_slice(&deletes[0].body).unwrap();
    assert!(delete_body["reference"].is_string());
}

#[tokio::test]
async fn files_and_payment_requests_carry_the_actor_bearer() {
    init_tracing();
    let mock = MockPortal::with_defaults().await;
    Mock::given(method("GET"))
        .and(path("/api/2.0/files/@my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "files": [], "folders": [] }
        })))
        .mount(mock.server())
        .await;
    Mock::given(method("GET"))
        .and(path("/api/2.0/portal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "tenantId": 1042, "status": "Active" }
        })))
        .mount(mock.server())
        .await;

    TestFixture::run(mock.config(), |fixture| async move {
        let documents = fixture.files().my_documents(Role::Owner).await?;
        assert_eq!(documents.status().as_u16(), 200);

        let info = fixture.payment().portal_info(Role::Owner).await?;
        let body: serde_json::Value = info.json().await?;
        assert_eq!(body["response"]["tenantId"], 1042);
        Ok(())
    })
    .await
    .unwrap();

    for (http_method, url_path) in [("GET", "/api/2.0/files/@my"), ("GET", "/api/2.0/portal")] {
        let requests = mock.requests_to(http_method, url_path).await;
        assert_eq!(requests.len(), 1, "{url_path}");
        assert_eq!(
            MockPortal::authorization(&requests[0]).as_deref(),
            Some(&*format!("Bearer {}", MockPortal::OWNER_TOKEN))
        );
    }
}
