//! DocSpace API test harness
//!
//! Provisions an isolated tenant ("portal") per test run, authenticates
//! multiple role-based identities against it, exposes typed API clients
//! acting as any of those roles, and guarantees teardown afterwards.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TestFixture (orchestrator)                                  │
//! │    ├── PortalClient   create/delete the tenant               │
//! │    ├── AuthClient     credentials -> token, per role         │
//! │    ├── SharedTokenStore   Role -> token / credentials        │
//! │    └── domain clients (People, Rooms, Files, Payment)        │
//! │          └── poll_until(...)  async-operation completion     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Setup: register portal -> store domain -> authenticate owner -> wire
//! clients. Teardown (always, including on test failure): re-authenticate
//! owner -> delete portal.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod faker;
pub mod fixture;
pub mod poll;
pub mod portal;
pub mod role;
pub mod store;

pub use api::{AccountType, FileOperation, FilesClient, PaymentClient, PeopleClient, RoomType, RoomsClient};
pub use auth::AuthClient;
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use faker::{FakeUser, Faker};
pub use fixture::TestFixture;
pub use poll::{poll_until, PollOutcome, PollSchedule};
pub use portal::{Portal, PortalClient};
pub use role::{Credentials, Role};
pub use store::{SharedTokenStore, TokenStore};
