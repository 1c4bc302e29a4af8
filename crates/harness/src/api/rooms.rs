//! Rooms API client
//!
//! Archive, unarchive and template generation are asynchronous on the
//! server: the mutating call starts a job and `GET /files/fileops` (or the
//! template status endpoint) is polled until the job reports terminal state.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::ApiContext;
use crate::error::{HarnessError, Result};
use crate::poll::{poll_until, PollOutcome};
use crate::role::Role;

/// Room flavors the product supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Custom,
    Editing,
    FillingForms,
    Public,
    VirtualData,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Custom => "CustomRoom",
            RoomType::Editing => "EditingRoom",
            RoomType::FillingForms => "FillingFormsRoom",
            RoomType::Public => "PublicRoom",
            RoomType::VirtualData => "VirtualDataRoom",
        }
    }
}

/// Terminal payload of a polled file operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileOperation {
    pub id: String,
    pub finished: bool,
    pub progress: i64,
    pub error: String,
}

/// Client for `/api/2.0/files/rooms` and the operation-status endpoints
#[derive(Debug, Clone)]
pub struct RoomsClient {
    ctx: ApiContext,
}

impl RoomsClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub async fn create_room(
        &self,
        actor: Role,
        title: &str,
        room_type: RoomType,
    ) -> Result<reqwest::Response> {
        self.ctx
            .post(
                "/api/2.0/files/rooms",
                actor,
                json!({ "title": title, "roomType": room_type.as_str() }),
            )
            .await
    }

    pub async fn rename_room(
        &self,
        actor: Role,
        room_id: i64,
        title: &str,
    ) -> Result<reqwest::Response> {
        self.ctx
            .put(
                &format!("/api/2.0/files/rooms/{room_id}"),
                actor,
                Some(json!({ "title": title })),
            )
            .await
    }

    pub async fn pin_room(&self, actor: Role, room_id: i64) -> Result<reqwest::Response> {
        self.ctx
            .put(&format!("/api/2.0/files/rooms/{room_id}/pin"), actor, None)
            .await
    }

    pub async fn unpin_room(&self, actor: Role, room_id: i64) -> Result<reqwest::Response> {
        self.ctx
            .put(&format!("/api/2.0/files/rooms/{room_id}/unpin"), actor, None)
            .await
    }

    /// Start archiving and wait for the server-side job to finish
    pub async fn archive_room(
        &self,
        actor: Role,
        room_id: i64,
    ) -> Result<(reqwest::Response, FileOperation)> {
        let response = self
            .ctx
            .put(
                &format!("/api/2.0/files/rooms/{room_id}/archive"),
                actor,
                Some(json!({ "deleteAfter": false })),
            )
            .await?;
        let operation = self.wait_for_operation(actor).await?;
        Ok((response, operation))
    }

    /// Start unarchiving and wait for the server-side job to finish
    pub async fn unarchive_room(
        &self,
        actor: Role,
        room_id: i64,
    ) -> Result<(reqwest::Response, FileOperation)> {
        let response = self
            .ctx
            .put(
                &format!("/api/2.0/files/rooms/{room_id}/unarchive"),
                actor,
                Some(json!({ "deleteAfter": false })),
            )
            .await?;
        let operation = self.wait_for_operation(actor).await?;
        Ok((response, operation))
    }

    /// Start room deletion; callers that need completion follow up with
    /// [`wait_for_operation`](Self::wait_for_operation).
    pub async fn delete_room(&self, actor: Role, room_id: i64) -> Result<reqwest::Response> {
        self.ctx
            .delete(
                &format!("/api/2.0/files/rooms/{room_id}"),
                actor,
                Some(json!({ "deleteAfter": false })),
            )
            .await
    }

    pub async fn create_template(
        &self,
        actor: Role,
        room_id: i64,
        title: &str,
    ) -> Result<reqwest::Response> {
        self.ctx
            .post(
                "/api/2.0/files/roomtemplate",
                actor,
                json!({ "roomId": room_id, "title": title }),
            )
            .await
    }

    pub async fn template_status(&self, actor: Role) -> Result<reqwest::Response> {
        self.ctx
            .get("/api/2.0/files/roomtemplate/status", actor)
            .await
    }

    /// Poll the most recent entry of `GET /files/fileops` until it reports
    /// `finished: true`, on the configured backoff schedule.
    pub async fn wait_for_operation(&self, actor: Role) -> Result<FileOperation> {
        debug!(%actor, "waiting for file operation to finish");
        poll_until(&self.ctx.config.poll, || async move {
            let response = self.ctx.get("/api/2.0/files/fileops", actor).await?;
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| HarnessError::InvalidResponse(format!("fileops body: {e}")))?;

            let ops = body
                .get("response")
                .and_then(|v| v.as_array())
                .ok_or_else(|| {
                    HarnessError::InvalidResponse("fileops response is not an array".to_string())
                })?;
            // Right after the mutating call the feed may not list the job
            // yet; an empty list is pending, not malformed.
            let last = match ops.last() {
                Some(entry) => entry,
                None => return Ok(PollOutcome::Pending(serde_json::Value::Null)),
            };

            if last.get("finished").and_then(|v| v.as_bool()).unwrap_or(false) {
                let operation: FileOperation = serde_json::from_value(last.clone())
                    .map_err(|e| HarnessError::InvalidResponse(format!("fileops entry: {e}")))?;
                Ok(PollOutcome::Ready(operation))
            } else {
                Ok(PollOutcome::Pending(last.clone()))
            }
        })
        .await
    }

    /// Poll template generation until `isCompleted`, returning the new
    /// template id.
    pub async fn wait_for_template(&self, actor: Role) -> Result<i64> {
        debug!(%actor, "waiting for room template generation");
        poll_until(&self.ctx.config.poll, || async move {
            let response = self.template_status(actor).await?;
            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| HarnessError::InvalidResponse(format!("template status: {e}")))?;

            let status = body.get("response").cloned().unwrap_or_default();
            let completed = status
                .get("isCompleted")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if completed {
                let template_id = status
                    .get("templateId")
                    .and_then(|v| v.as_i64())
                    .ok_or_else(|| {
                        HarnessError::InvalidResponse(
                            "completed template status without templateId".to_string(),
                        )
                    })?;
                Ok(PollOutcome::Ready(template_id))
            } else {
                Ok(PollOutcome::Pending(status))
            }
        })
        .await
    }
}
