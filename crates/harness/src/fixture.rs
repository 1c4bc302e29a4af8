//! Test fixture orchestrator
//!
//! Composition root for one test run: provisions a portal, authenticates the
//! owner, wires the domain API clients over one shared token store, and
//! guarantees symmetric teardown. Leaked portals accumulate as billable
//! tenants in CI, so teardown runs whether the test body passes or fails.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::api::{ApiContext, FilesClient, PaymentClient, PeopleClient, RoomsClient};
use crate::auth::AuthClient;
use crate::config::HarnessConfig;
use crate::error::Result;
use crate::faker::Faker;
use crate::portal::{Portal, PortalClient};
use crate::role::Role;
use crate::store::SharedTokenStore;

/// Lifecycle of one orchestrated test context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixtureState {
    Uninitialized,
    PortalCreated,
    OwnerAuthenticated,
    Ready,
    TornDown,
}

/// Ready-to-use test context around one provisioned portal.
///
/// Constructed via [`TestFixture::setup`] or driven end to end by
/// [`TestFixture::run`]. Each fixture owns its portal and token store
/// exclusively; parallel test processes never share either.
#[derive(Debug)]
pub struct TestFixture {
    config: HarnessConfig,
    store: SharedTokenStore,
    portal: Portal,
    auth: AuthClient,
    portal_client: PortalClient,
    people: PeopleClient,
    rooms: RoomsClient,
    files: FilesClient,
    payment: PaymentClient,
    faker: Faker,
    state: Mutex<FixtureState>,
}

impl TestFixture {
    /// Provision a portal, authenticate its owner and wire the API clients.
    ///
    /// A failure at any step aborts before the fixture exists; no teardown
    /// of a half-provisioned portal is attempted. The error names the portal
    /// when one was already registered, so CI can reap it.
    pub async fn setup(config: HarnessConfig) -> Result<Self> {
        let mut state = FixtureState::Uninitialized;
        debug!(?state, "fixture setup starting");

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        let store = SharedTokenStore::new();

        let portal_client = PortalClient::new(http.clone(), config.clone(), store.clone());
        let portal = portal_client.create_portal(&config.portal_prefix).await?;
        state = FixtureState::PortalCreated;
        debug!(?state, portal = %portal.name, "fixture state");

        let auth = AuthClient::new(http.clone(), config.clone(), store.clone());
        if let Err(e) = auth.authenticate_owner().await {
            warn!(portal = %portal.name, error = %e, "owner authentication failed; portal left for CI reaping");
            return Err(e);
        }
        state = FixtureState::OwnerAuthenticated;
        debug!(?state, "fixture state");

        let ctx = ApiContext::new(http, config.clone(), store.clone());
        let people = PeopleClient::new(ctx.clone());
        let rooms = RoomsClient::new(ctx.clone());
        let files = FilesClient::new(ctx.clone());
        let payment = PaymentClient::new(ctx);

        // Freshly registered owners start pending on the hosted service;
        // standalone deployments pre-activate the account.
        if config.standalone {
            debug!(portal = %portal.name, "standalone deployment, skipping owner activation");
        } else {
            let activation = people.activate_user(Role::Owner, &portal.owner_id).await?;
            if !activation.status().is_success() {
                warn!(
                    portal = %portal.name,
                    status = activation.status().as_u16(),
                    "owner activation not confirmed"
                );
            }
        }

        state = FixtureState::Ready;
        info!(?state, portal = %portal.name, domain = %portal.domain, "fixture ready");

        Ok(Self {
            config,
            store,
            portal,
            auth,
            portal_client,
            people,
            rooms,
            files,
            payment,
            faker: Faker::new(),
            state: Mutex::new(state),
        })
    }

    /// Run `body` against a fresh fixture with guaranteed teardown.
    ///
    /// Teardown executes exactly once whether the body succeeds or fails. A
    /// teardown failure after a passing body is returned (it is a CI signal
    /// of a leaked portal); after a failing body it is logged and the body's
    /// error wins.
    pub async fn run<T, F, Fut>(config: HarnessConfig, body: F) -> Result<T>
    where
        F: FnOnce(Arc<TestFixture>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let fixture = Arc::new(TestFixture::setup(config).await?);
        let outcome = body(fixture.clone()).await;
        let teardown = fixture.teardown().await;

        match (outcome, teardown) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(teardown_err)) => Err(teardown_err),
            (Err(body_err), Ok(())) => Err(body_err),
            (Err(body_err), Err(teardown_err)) => {
                warn!(error = %teardown_err, "teardown failed after test failure");
                Err(body_err)
            }
        }
    }

    /// Re-authenticate as owner and delete the portal.
    ///
    /// Idempotent: the fixture flips to `TornDown` before any network call,
    /// so the deletion request is issued at most once per portal even if a
    /// first attempt errored partway.
    pub async fn teardown(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if *state == FixtureState::TornDown {
                debug!(portal = %self.portal.name, "teardown already ran");
                return Ok(());
            }
            *state = FixtureState::TornDown;
        }

        // Role switching during the test may have replaced the owner token;
        // the deletion call must act as the owner.
        self.auth.authenticate_owner().await?;
        self.portal_client.delete_portal(&self.portal).await?;
        info!(portal = %self.portal.name, "fixture torn down");
        Ok(())
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedTokenStore {
        &self.store
    }

    pub fn portal(&self) -> &Portal {
        &self.portal
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn people(&self) -> &PeopleClient {
        &self.people
    }

    pub fn rooms(&self) -> &RoomsClient {
        &self.rooms
    }

    pub fn files(&self) -> &FilesClient {
        &self.files
    }

    pub fn payment(&self) -> &PaymentClient {
        &self.payment
    }

    pub fn faker(&self) -> &Faker {
        &self.faker
    }
}
