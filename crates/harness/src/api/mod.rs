//! Typed, authenticated HTTP wrappers over portal resource areas
//!
//! Every operation takes the acting [`Role`](crate::Role) and returns the
//! raw [`reqwest::Response`] so tests can assert on status codes and bodies
//! directly; the same client serves happy-path tests and permission tests
//! expecting 401/403/404.

mod files;
mod payment;
mod people;
mod rooms;

pub use files::FilesClient;
pub use payment::PaymentClient;
pub use people::{AccountType, PeopleClient};
pub use rooms::{FileOperation, RoomType, RoomsClient};

use reqwest::Method;

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::role::Role;
use crate::store::SharedTokenStore;

/// Shared plumbing behind every domain API client: the HTTP client, the
/// harness config and the run's token store.
#[derive(Debug, Clone)]
pub(crate) struct ApiContext {
    pub http: reqwest::Client,
    pub config: HarnessConfig,
    pub store: SharedTokenStore,
}

impl ApiContext {
    pub fn new(http: reqwest::Client, config: HarnessConfig, store: SharedTokenStore) -> Self {
        Self {
            http,
            config,
            store,
        }
    }

    /// Absolute URL on the provisioned portal for an API path
    pub fn portal_url(&self, path: &str) -> Result<String> {
        let domain = self.store.portal_domain()?;
        Ok(format!("{}{path}", self.config.portal_base_url(&domain)))
    }

    /// Issue a request against the portal as `role`, with bearer auth and an
    /// optional JSON body. Fails before any I/O when the role holds no token.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        role: Role,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.portal_url(path)?;
        let token = self.store.bearer(role)?;

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }

    pub async fn get(&self, path: &str, role: Role) -> Result<reqwest::Response> {
        self.request(Method::GET, path, role, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        role: Role,
        body: serde_json::Value,
    ) -> Result<reqwest::Response> {
        self.request(Method::POST, path, role, Some(body)).await
    }

    pub async fn put(
        &self,
        path: &str,
        role: Role,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        self.request(Method::PUT, path, role, body).await
    }

    pub async fn delete(
        &self,
        path: &str,
        role: Role,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response> {
        self.request(Method::DELETE, path, role, body).await
    }
}

/// Server-reported error text from a failed response body.
///
/// The product reports failures in either an `error` or a `message` field;
/// anything else is surfaced verbatim for diagnosis.
pub(crate) async fn server_message(response: reqwest::Response) -> String {
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => String::new(),
    }
}
