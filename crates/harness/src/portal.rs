//! Portal provisioning: create and destroy the tenant that scopes a test run

use chrono::SecondsFormat;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::api::server_message;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::role::Role;
use crate::store::SharedTokenStore;

/// The tenant under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portal {
    pub name: String,
    pub domain: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    tenant: Tenant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tenant {
    domain: String,
    owner_id: String,
}

/// Client for the registration host and the portal's own deletion endpoint
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    config: HarnessConfig,
    store: SharedTokenStore,
}

impl PortalClient {
    pub fn new(http: reqwest::Client, config: HarnessConfig, store: SharedTokenStore) -> Self {
        Self {
            http,
            config,
            store,
        }
    }

    /// Register a fresh portal under a unique name and record its domain in
    /// the token store.
    pub async fn create_portal(&self, name_prefix: &str) -> Result<Portal> {
        let name = portal_name(name_prefix);
        let url = format!("{}/register", self.config.registration_url);
        info!(portal = %name, "creating portal");

        let mut request = self.http.post(&url).json(&json!({
            "portalName": name,
            "firstName": "admin-zero",
            "lastName": "admin-zero",
            "email": self.config.admin_email,
            "password": self.config.admin_password,
            "language": "en",
        }));
        // Local deployments gate registration behind a fixed token.
        if let Some(token) = &self.config.local_auth_token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HarnessError::ProvisioningFailed {
                status: status.as_u16(),
                message: server_message(response).await,
            });
        }

        let body: RegisterBody = response
            .json()
            .await
            .map_err(|e| HarnessError::InvalidResponse(format!("register body: {e}")))?;

        self.store.set_portal_domain(body.tenant.domain.clone());
        info!(portal = %name, domain = %body.tenant.domain, "portal created");

        Ok(Portal {
            name,
            domain: body.tenant.domain,
            owner_id: body.tenant.owner_id,
        })
    }

    /// Delete the portal. Requires an owner token to already be present;
    /// deleting without authorization is explicitly disallowed.
    pub async fn delete_portal(&self, portal: &Portal) -> Result<()> {
        let token = self.store.bearer(Role::Owner).map_err(|_| {
            HarnessError::MissingAuthorization(
                "portal deletion requires an authenticated owner".to_string(),
            )
        })?;

        let url = format!(
            "{}/api/2.0/portal/deleteportalimmediately",
            self.config.portal_base_url(&portal.domain)
        );
        let reference = deletion_reference(&portal.name, &portal.domain);
        debug!(portal = %portal.name, %reference, "deleting portal");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .json(&json!({ "reference": reference }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarnessError::ProvisioningFailed {
                status: status.as_u16(),
                message: server_message(response).await,
            });
        }

        info!(portal = %portal.name, "portal deleted");
        Ok(())
    }
}

/// Globally-distinguishing portal name: prefix, random short token, UTC
/// timestamp. The random component is what keeps same-millisecond CI runs
/// from colliding; the timestamp keeps names legible and reapable by age.
pub fn portal_name(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..6)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            CHARSET[rng.gen_range(0..CHARSET.len())] as char
        })
        .collect();
    let stamp = chrono::Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{prefix}-{token}-{stamp}")
}

/// Deletion reference: the portal name plus the domain suffix shared by all
/// tenants, e.g. `my-portal` on `my-portal.docspace.example` references
/// `my-portal.docspace.example`.
fn deletion_reference(name: &str, domain: &str) -> String {
    match domain.find('.') {
        Some(dot) => format!("{name}{}", &domain[dot..]),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn portal_names_keep_the_prefix() {
        let name = portal_name("integration-test-portal");
        assert!(name.starts_with("integration-test-portal-"));
        assert!(!name.contains(':'));
        assert!(!name.contains('.'));
    }

    #[test]
    fn burst_of_names_in_one_tick_stays_unique() {
        // Same-millisecond collisions are prevented by the random token
        // alone; 200 names in a tight loop must all differ.
        let names: HashSet<String> = (0..200).map(|_| portal_name("ci")).collect();
        assert_eq!(names.len(), 200);
    }

    #[test]
    fn deletion_reference_swaps_the_first_label() {
        assert_eq!(
            deletion_reference("my-portal", "my-portal.docspace.example"),
            "my-portal.docspace.example"
        );
        assert_eq!(deletion_reference("solo", "localhost"), "solo");
    }
}
