//! wiremock double of the registration host and the portal API
//!
//! One server plays both parts: `POST /register` answers with a tenant
//! domain pointing back at the server itself, so every subsequent portal
//! call (authentication, people, rooms, fileops, deletion) lands on the same
//! instance. Knobs cover the failure modes the harness must surface.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use docspace_harness::{HarnessConfig, PollSchedule};

pub struct MockPortal {
    server: MockServer,
}

impl MockPortal {
    pub const ADMIN_EMAIL: &'static str = "admin-zero@docspace.example";
    pub const ADMIN_PASSWORD: &'static str = "admin-zero-password";
    pub const OWNER_TOKEN: &'static str = "owner-session-token";
    pub const OWNER_ID: &'static str = "owner-0000";

    /// Bare server with only the registration endpoint mounted
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let portal = Self { server };
        portal.mount_registration().await;
        portal
    }

    /// Server with the full happy-path surface: registration, owner
    /// authentication, owner activation and portal deletion.
    pub async fn with_defaults() -> Self {
        let portal = Self::start().await;
        portal.mount_owner_auth().await;
        portal.mount_activation().await;
        portal.mount_delete().await;
        portal
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Tenant domain reported by `/register`: this server's own host:port
    pub fn domain(&self) -> String {
        self.server
            .uri()
            .trim_start_matches("http://")
            .to_string()
    }

    /// Harness config pointed at this mock, with a fast poll schedule so
    /// timeout tests stay in the tens of milliseconds.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig {
            registration_url: self.server.uri(),
            admin_email: Self::ADMIN_EMAIL.to_string(),
            admin_password: Self::ADMIN_PASSWORD.to_string(),
            portal_prefix: "integration-test-portal".to_string(),
            local: true,
            poll: PollSchedule {
                intervals: vec![
                    Duration::from_millis(10),
                    Duration::from_millis(20),
                    Duration::from_millis(50),
                ],
                timeout: Duration::from_millis(500),
            },
            ..Default::default()
        }
    }

    async fn mount_registration(&self) {
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tenant": { "domain": self.domain(), "ownerId": Self::OWNER_ID }
            })))
            .mount(&self.server)
            .await;
    }

    /// Registration host that rejects portal creation
    pub async fn start_with_broken_registration(status: u16, message: &str) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({ "error": message })),
            )
            .mount(&server)
            .await;
        Self { server }
    }

    pub async fn mount_owner_auth(&self) {
        self.mount_auth_for(Self::ADMIN_EMAIL, Self::OWNER_TOKEN).await;
    }

    /// Successful authentication for one specific email
    pub async fn mount_auth_for(&self, email: &str, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/2.0/authentication"))
            .and(body_partial_json(json!({ "userName": email })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "response": { "token": token } })),
            )
            .mount(&self.server)
            .await;
    }

    /// All credential exchanges fail with the given status
    pub async fn mount_auth_failure(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/api/2.0/authentication"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({ "error": message })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mount_activation(&self) {
        Mock::given(method("PUT"))
            .and(path("/api/2.0/people/activationstatus/Activated"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [] })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_delete(&self) {
        Mock::given(method("DELETE"))
            .and(path("/api/2.0/portal/deleteportalimmediately"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&self.server)
            .await;
    }

    /// Fileops feed reporting `finished: false` for the first `pending`
    /// polls and a terminal operation thereafter. Mount order matters: the
    /// expiring pending mock shadows the terminal one until exhausted.
    pub async fn mount_fileops(&self, pending: u64) {
        if pending > 0 {
            Mock::given(method("GET"))
                .and(path("/api/2.0/files/fileops"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "response": [
                        { "id": "op-1", "finished": false, "progress": 40, "error": "" }
                    ]
                })))
                .up_to_n_times(pending)
                .mount(&self.server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/2.0/files/fileops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [
                    { "id": "op-1", "finished": true, "progress": 100, "error": "" }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Fileops feed that has not registered the job yet, for the first
    /// `times` polls. Mount before the feed that should answer afterwards.
    pub async fn mount_fileops_empty(&self, times: u64) {
        Mock::given(method("GET"))
            .and(path("/api/2.0/files/fileops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [] })))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Template generation status: in progress for the first `pending`
    /// polls, then completed with the given template id.
    pub async fn mount_template_status(&self, pending: u64, template_id: i64) {
        if pending > 0 {
            Mock::given(method("GET"))
                .and(path("/api/2.0/files/roomtemplate/status"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "response": { "isCompleted": false, "progress": 50 }
                })))
                .up_to_n_times(pending)
                .mount(&self.server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/api/2.0/files/roomtemplate/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": {
                    "isCompleted": true,
                    "progress": 100,
                    "templateId": template_id
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Fileops feed that never reaches terminal state
    pub async fn mount_fileops_never_finishing(&self) {
        Mock::given(method("GET"))
            .and(path("/api/2.0/files/fileops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": [
                    { "id": "op-stuck", "finished": false, "progress": 60, "error": "" }
                ]
            })))
            .mount(&self.server)
            .await;
    }

    /// Recorded requests matching an HTTP method and path
    pub async fn requests_to(&self, http_method: &str, url_path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == url_path)
            .collect()
    }

    /// Authorization header of a recorded request, if any
    pub fn authorization(request: &Request) -> Option<String> {
        request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}
