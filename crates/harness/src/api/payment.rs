//! Payment/portal-info API client

use super::ApiContext;
use crate::error::Result;
use crate::role::Role;

/// Client for `/api/2.0/portal` tariff and quota endpoints
#[derive(Debug, Clone)]
pub struct PaymentClient {
    ctx: ApiContext,
}

impl PaymentClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Portal metadata, including the `tenantId` payment calls key on
    pub async fn portal_info(&self, actor: Role) -> Result<reqwest::Response> {
        self.ctx.get("/api/2.0/portal", actor).await
    }

    /// Current tariff, refreshed server-side
    pub async fn tariff(&self, actor: Role) -> Result<reqwest::Response> {
        self.ctx
            .get("/api/2.0/portal/tariff?refresh=true", actor)
            .await
    }

    /// Current payment quota, refreshed server-side
    pub async fn payment_quota(&self, actor: Role) -> Result<reqwest::Response> {
        self.ctx
            .get("/api/2.0/portal/payment/quota?refresh=true", actor)
            .await
    }
}
