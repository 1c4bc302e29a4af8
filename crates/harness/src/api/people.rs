//! People/Profiles API client

use serde_json::json;
use tracing::debug;

use super::ApiContext;
use crate::error::Result;
use crate::faker::{FakeUser, Faker};
use crate::role::Role;

/// Account type requested when creating a profile via the People API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    DocSpaceAdmin,
    RoomAdmin,
    User,
    Guest,
}

impl AccountType {
    /// Wire spelling of the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::DocSpaceAdmin => "DocSpaceAdmin",
            AccountType::RoomAdmin => "RoomAdmin",
            AccountType::User => "User",
            AccountType::Guest => "Guest",
        }
    }

    /// The role an account of this type acts as
    pub fn role(&self) -> Role {
        match self {
            AccountType::DocSpaceAdmin => Role::DocSpaceAdmin,
            AccountType::RoomAdmin => Role::RoomAdmin,
            AccountType::User => Role::User,
            AccountType::Guest => Role::Guest,
        }
    }
}

/// Client for `/api/2.0/people`
#[derive(Debug, Clone)]
pub struct PeopleClient {
    ctx: ApiContext,
    faker: Faker,
}

impl PeopleClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self {
            ctx,
            faker: Faker::new(),
        }
    }

    /// Create an account of the given type with a generated profile, acting
    /// as `actor`. On success the new account's credentials are registered
    /// in the token store under the matching role, ready for
    /// `authenticate(role)`.
    pub async fn add_member(
        &self,
        actor: Role,
        kind: AccountType,
    ) -> Result<(reqwest::Response, FakeUser)> {
        let user = self.faker.generate_user();
        debug!(%actor, account_type = kind.as_str(), email = %user.email, "creating account");

        let response = self
            .ctx
            .post(
                "/api/2.0/people",
                actor,
                json!({
                    "email": user.email,
                    "password": user.password,
                    "firstName": user.first_name,
                    "lastName": user.last_name,
                    "type": kind.as_str(),
                }),
            )
            .await?;

        if response.status().is_success() {
            self.ctx
                .store
                .set_credentials(kind.role(), &user.email, &user.password);
        }
        Ok((response, user))
    }

    /// Create an account with an explicit profile, e.g. the over-length
    /// name/email probes against server-side validation. Credentials are not
    /// registered; validation-probe accounts are never authenticated.
    pub async fn add_member_with_profile(
        &self,
        actor: Role,
        profile: &FakeUser,
        kind: AccountType,
    ) -> Result<reqwest::Response> {
        self.ctx
            .post(
                "/api/2.0/people",
                actor,
                json!({
                    "email": profile.email,
                    "password": profile.password,
                    "firstName": profile.first_name,
                    "lastName": profile.last_name,
                    "type": kind.as_str(),
                }),
            )
            .await
    }

    /// Flip an account to `Activated`; used on the portal owner right after
    /// registration.
    pub async fn activate_user(&self, actor: Role, user_id: &str) -> Result<reqwest::Response> {
        self.ctx
            .put(
                "/api/2.0/people/activationstatus/Activated",
                actor,
                Some(json!({ "userIds": [user_id] })),
            )
            .await
    }

    pub async fn get_profile(&self, actor: Role, user_id: &str) -> Result<reqwest::Response> {
        self.ctx
            .get(&format!("/api/2.0/people/{user_id}"), actor)
            .await
    }

    pub async fn delete_profile(&self, actor: Role, user_id: &str) -> Result<reqwest::Response> {
        self.ctx
            .delete(&format!("/api/2.0/people/{user_id}"), actor, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_types_map_to_roles() {
        assert_eq!(AccountType::DocSpaceAdmin.role(), Role::DocSpaceAdmin);
        assert_eq!(AccountType::RoomAdmin.role(), Role::RoomAdmin);
        assert_eq!(AccountType::User.role(), Role::User);
        assert_eq!(AccountType::Guest.role(), Role::Guest);
    }
}
