//! In-memory credential and token store
//!
//! Central source of truth for "who can currently act as whom" within one
//! test run. Process-local, torn down with the test process; the only
//! concurrency is tokio task interleaving within a single test, so a plain
//! mutex is sufficient.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{HarnessError, Result};
use crate::role::{Credentials, Role};

/// Mutable mapping `Role -> token` and `Role -> Credentials`, plus the
/// provisioned portal domain every API client builds request URLs from.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: HashMap<Role, String>,
    credentials: HashMap<Role, Credentials>,
    portal_domain: Option<String>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently stored token for `role`, `None` if never authenticated.
    pub fn token(&self, role: Role) -> Option<&str> {
        self.tokens.get(&role).map(String::as_str)
    }

    /// Overwrites any previous token for `role`; latest issuance wins.
    pub fn set_token(&mut self, role: Role, token: impl Into<String>) {
        self.tokens.insert(role, token.into());
    }

    /// Fails fast if the role was never provisioned via `set_credentials`.
    pub fn credentials(&self, role: Role) -> Result<&Credentials> {
        self.credentials
            .get(&role)
            .ok_or(HarnessError::MissingCredentials { role })
    }

    /// Registers credentials for a role; called once per role per run, at
    /// account-creation time.
    pub fn set_credentials(
        &mut self,
        role: Role,
        email: impl Into<String>,
        password: impl Into<String>,
    ) {
        self.credentials
            .insert(role, Credentials::new(email, password));
    }

    pub fn portal_domain(&self) -> Result<&str> {
        self.portal_domain
            .as_deref()
            .ok_or(HarnessError::MissingPortal)
    }

    pub fn set_portal_domain(&mut self, domain: impl Into<String>) {
        self.portal_domain = Some(domain.into());
    }
}

/// Cloneable handle to the run's [`TokenStore`], shared by every client.
#[derive(Debug, Clone, Default)]
pub struct SharedTokenStore(Arc<Mutex<TokenStore>>);

impl SharedTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, role: Role) -> Option<String> {
        self.0.lock().token(role).map(str::to_string)
    }

    /// Token for `role`, or `MissingAuthorization` when absent or empty.
    ///
    /// An empty token means "unauthenticated"; callers must fail the HTTP
    /// call explicitly rather than send a blank Authorization header.
    pub fn bearer(&self, role: Role) -> Result<String> {
        match self.token(role) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(HarnessError::MissingAuthorization(format!(
                "no token stored for role \"{role}\""
            ))),
        }
    }

    pub fn set_token(&self, role: Role, token: impl Into<String>) {
        self.0.lock().set_token(role, token);
    }

    pub fn credentials(&self, role: Role) -> Result<Credentials> {
        self.0.lock().credentials(role).cloned()
    }

    pub fn set_credentials(
        &self,
        role: Role,
        email: impl Into<String>,
        password: impl Into<String>,
    ) {
        self.0.lock().set_credentials(role, email, password);
    }

    pub fn portal_domain(&self) -> Result<String> {
        self.0.lock().portal_domain().map(str::to_string)
    }

    pub fn set_portal_domain(&self, domain: impl Into<String>) {
        self.0.lock().set_portal_domain(domain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Role::Owner, Role::User)]
    #[test_case(Role::DocSpaceAdmin, Role::RoomAdmin)]
    #[test_case(Role::Guest, Role::Owner)]
    fn tokens_are_isolated_between_roles(written: Role, other: Role) {
        let store = SharedTokenStore::new();
        store.set_token(other, "pre-existing");
        store.set_token(written, "fresh");

        assert_eq!(store.token(written).as_deref(), Some("fresh"));
        assert_eq!(store.token(other).as_deref(), Some("pre-existing"));
    }

    #[test]
    fn latest_token_wins() {
        let store = SharedTokenStore::new();
        store.set_token(Role::User, "first");
        store.set_token(Role::User, "second");
        assert_eq!(store.token(Role::User).as_deref(), Some("second"));
    }

    #[test]
    fn missing_credentials_names_the_role() {
        let store = SharedTokenStore::new();
        let err = store.credentials(Role::RoomAdmin).unwrap_err();
        match &err {
            HarnessError::MissingCredentials { role } => assert_eq!(*role, Role::RoomAdmin),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("roomAdmin"));
    }

    #[test]
    fn credentials_round_trip() {
        let store = SharedTokenStore::new();
        store.set_credentials(Role::User, "u@test.com", "secret12");
        let creds = store.credentials(Role::User).unwrap();
        assert_eq!(creds.email, "u@test.com");
        assert_eq!(creds.password, "secret12");
    }

    #[test]
    fn bearer_rejects_missing_and_empty_tokens() {
        let store = SharedTokenStore::new();
        assert!(matches!(
            store.bearer(Role::Owner),
            Err(HarnessError::MissingAuthorization(_))
        ));

        store.set_token(Role::Owner, "");
        assert!(matches!(
            store.bearer(Role::Owner),
            Err(HarnessError::MissingAuthorization(_))
        ));

        store.set_token(Role::Owner, "abc");
        assert_eq!(store.bearer(Role::Owner).unwrap(), "abc");
    }

    #[test]
    fn portal_domain_is_absent_until_set() {
        let store = SharedTokenStore::new();
        assert!(matches!(
            store.portal_domain(),
            Err(HarnessError::MissingPortal)
        ));
        store.set_portal_domain("tenant.docspace.example");
        assert_eq!(store.portal_domain().unwrap(), "tenant.docspace.example");
    }
}
