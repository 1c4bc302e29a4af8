//! Error types for the DocSpace test harness

use std::time::Duration;

use thiserror::Error;

use crate::role::Role;

/// Result type alias using the harness error
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Harness error types
///
/// Only harness-level setup and teardown calls (portal create/delete,
/// authentication) surface as errors. Domain API clients return raw
/// responses so permission tests can assert on 401/403/404 directly.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Portal provisioning failed: {status} - {message}")]
    ProvisioningFailed { status: u16, message: String },

    #[error("Authentication failed: {status} - {message}")]
    AuthenticationFailed { status: u16, message: String },

    #[error("No credentials stored for role \"{role}\". Was add_member() called for this role?")]
    MissingCredentials { role: Role },

    #[error("Missing authorization: {0}")]
    MissingAuthorization(String),

    #[error("No portal domain set. Was the portal created?")]
    MissingPortal,

    #[error("Operation did not reach terminal state within {elapsed:?}; last status: {last}")]
    OperationTimeout {
        elapsed: Duration,
        last: serde_json::Value,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
