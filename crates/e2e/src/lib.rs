//! Shared helpers for harness integration tests
//!
//! The real product is replaced by [`MockPortal`], a wiremock double of the
//! registration host and the provisioned portal's API, so the full fixture
//! lifecycle runs against localhost.

pub mod mock_portal;

pub use mock_portal::MockPortal;

use tracing_subscriber::EnvFilter;

/// Initialize tracing once per test binary; repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
