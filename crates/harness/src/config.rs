//! Harness configuration

use std::time::Duration;

use crate::poll::PollSchedule;

/// Configuration surface consumed by the harness.
///
/// Everything here is overridable from `DOCSPACE_*` environment variables;
/// product-specific integrations (SMTP, LDAP, cloud storage) are out of
/// scope and have no knobs here.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Host the `/register` call is issued against
    pub registration_url: String,

    /// Fixed administrator identity used for portal registration and owner
    /// authentication
    pub admin_email: String,
    pub admin_password: String,

    /// Prefix for generated portal names
    pub portal_prefix: String,

    /// Standalone deployment (single pre-provisioned server)
    pub standalone: bool,

    /// Local deployment: portal URLs use `http` instead of `https`, and the
    /// registration call carries the fixed auth token below
    pub local: bool,

    /// Registration auth token for local deployments
    pub local_auth_token: Option<String>,

    /// Per-request timeout applied to the shared HTTP client
    pub request_timeout: Duration,

    /// Backoff schedule for asynchronous operation polling
    pub poll: PollSchedule,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            registration_url: "https://signup.docspace.example".to_string(),
            admin_email: "admin-zero@docspace.example".to_string(),
            admin_password: "admin-zero-password".to_string(),
            portal_prefix: "autotest-portal".to_string(),
            standalone: false,
            local: false,
            local_auth_token: None,
            request_timeout: Duration::from_secs(30),
            poll: PollSchedule::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from `DOCSPACE_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            registration_url: std::env::var("DOCSPACE_REGISTRATION_URL")
                .unwrap_or(defaults.registration_url),
            admin_email: std::env::var("DOCSPACE_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: std::env::var("DOCSPACE_ADMIN_PASSWORD")
                .unwrap_or(defaults.admin_password),
            portal_prefix: std::env::var("DOCSPACE_PORTAL_PREFIX")
                .unwrap_or(defaults.portal_prefix),
            standalone: env_flag("DOCSPACE_STANDALONE"),
            local: env_flag("DOCSPACE_LOCAL"),
            local_auth_token: std::env::var("DOCSPACE_AUTH_TOKEN").ok(),
            request_timeout: defaults.request_timeout,
            poll: defaults.poll,
        }
    }

    /// Scheme used for URLs built against the provisioned portal domain
    pub fn scheme(&self) -> &'static str {
        if self.local {
            "http"
        } else {
            "https"
        }
    }

    /// Base URL for a provisioned portal domain, e.g.
    /// `https://tenant.docspace.example`
    pub fn portal_base_url(&self, domain: &str) -> String {
        format!("{}://{}", self.scheme(), domain)
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
