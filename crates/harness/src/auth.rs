//! Credential exchange against the portal's authentication endpoint

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::api::server_message;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::role::{Credentials, Role};
use crate::store::SharedTokenStore;

#[derive(Debug, Deserialize)]
struct AuthBody {
    response: AuthToken,
}

#[derive(Debug, Deserialize)]
struct AuthToken {
    token: String,
}

/// Exchanges role credentials for a session token and keeps the token store
/// current. Failed exchanges are never retried here: silently retrying a
/// credential exchange could mask real product bugs.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: HarnessConfig,
    store: SharedTokenStore,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, config: HarnessConfig, store: SharedTokenStore) -> Self {
        Self {
            http,
            config,
            store,
        }
    }

    /// Authenticate the fixed owner identity from configuration and store
    /// the token under [`Role::Owner`].
    pub async fn authenticate_owner(&self) -> Result<String> {
        let credentials = Credentials::new(
            self.config.admin_email.clone(),
            self.config.admin_password.clone(),
        );
        self.exchange(Role::Owner, &credentials).await
    }

    /// Authenticate a provisioned role using the credentials registered at
    /// account-creation time, failing fast when none exist.
    pub async fn authenticate(&self, role: Role) -> Result<String> {
        let credentials = self.store.credentials(role)?;
        self.exchange(role, &credentials).await
    }

    async fn exchange(&self, role: Role, credentials: &Credentials) -> Result<String> {
        let domain = self.store.portal_domain()?;
        let url = format!(
            "{}/api/2.0/authentication",
            self.config.portal_base_url(&domain)
        );

        debug!(%role, email = %credentials.email, "authenticating");
        let response = self
            .http
            .post(&url)
            .json(&json!({
                "userName": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The role's previous token, if any, stays untouched.
            return Err(HarnessError::AuthenticationFailed {
                status: status.as_u16(),
                message: server_message(response).await,
            });
        }

        let body: AuthBody = response
            .json()
            .await
            .map_err(|e| HarnessError::InvalidResponse(format!("authentication body: {e}")))?;

        self.store.set_token(role, body.response.token.clone());
        info!(%role, "authenticated");
        Ok(body.response.token)
    }
}
