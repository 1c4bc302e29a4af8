//! Logical actors a test can act as

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical actor within one test run.
///
/// Exactly one credential set and at most one live token exist per role per
/// run. `Guest` is part of the canonical set: the permission matrices
/// exercise guest accounts, so dispatch over roles is exhaustive at compile
/// time rather than failing at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    DocSpaceAdmin,
    RoomAdmin,
    User,
    Guest,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Owner,
        Role::DocSpaceAdmin,
        Role::RoomAdmin,
        Role::User,
        Role::Guest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::DocSpaceAdmin => "docSpaceAdmin",
            Role::RoomAdmin => "roomAdmin",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email/password pair for one role.
///
/// Generated once when the role's account is provisioned, immutable
/// afterwards, never persisted outside the run's memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_match_api_spelling() {
        assert_eq!(Role::Owner.as_str(), "owner");
        assert_eq!(Role::DocSpaceAdmin.as_str(), "docSpaceAdmin");
        assert_eq!(Role::RoomAdmin.as_str(), "roomAdmin");
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Guest.as_str(), "guest");
    }

    #[test]
    fn display_uses_api_spelling() {
        assert_eq!(format!("{}", Role::RoomAdmin), "roomAdmin");
    }
}
