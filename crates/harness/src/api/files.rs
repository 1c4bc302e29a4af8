//! Files API client for the "My Documents" section

use serde_json::json;

use super::ApiContext;
use crate::error::Result;
use crate::role::Role;

/// Client for `/api/2.0/files`
#[derive(Debug, Clone)]
pub struct FilesClient {
    ctx: ApiContext,
}

impl FilesClient {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Contents of the acting role's My Documents section
    pub async fn my_documents(&self, actor: Role) -> Result<reqwest::Response> {
        self.ctx.get("/api/2.0/files/@my", actor).await
    }

    /// Create an empty file in My Documents
    pub async fn create_file(
        &self,
        actor: Role,
        title: &str,
    ) -> Result<reqwest::Response> {
        self.ctx
            .post("/api/2.0/files/@my/file", actor, json!({ "title": title }))
            .await
    }

    /// Create a folder under the given parent
    pub async fn create_folder(
        &self,
        actor: Role,
        parent_id: i64,
        title: &str,
    ) -> Result<reqwest::Response> {
        self.ctx
            .post(
                &format!("/api/2.0/files/folder/{parent_id}"),
                actor,
                json!({ "title": title }),
            )
            .await
    }

    /// Start deletion of a file; completion is observed via the rooms
    /// client's `wait_for_operation`, which reads the same fileops feed.
    pub async fn delete_file(&self, actor: Role, file_id: i64) -> Result<reqwest::Response> {
        self.ctx
            .delete(
                &format!("/api/2.0/files/file/{file_id}"),
                actor,
                Some(json!({ "deleteAfter": true, "immediately": true })),
            )
            .await
    }

    /// Start deletion of a folder
    pub async fn delete_folder(&self, actor: Role, folder_id: i64) -> Result<reqwest::Response> {
        self.ctx
            .delete(
                &format!("/api/2.0/files/folder/{folder_id}"),
                actor,
                Some(json!({ "deleteAfter": true, "immediately": true })),
            )
            .await
    }
}
