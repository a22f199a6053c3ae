use qaboard_sdk::ProjectDocument;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

/// Trimmed record the upload endpoint answers with
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUpload {
    pub document_id: String,
    pub filename: String,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub is_current: bool,
}

#[derive(Debug, Clone)]
pub struct DocumentService {
    client: ApiClient,
}

impl DocumentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, project_id: &str) -> Result<Vec<ProjectDocument>, ApiError> {
        let envelope: Envelope<Vec<ProjectDocument>> = self
            .client
            .get("/api/project/document/list", &[("project_id", project_id)])
            .await?;
        Ok(envelope.into_list())
    }

    /// Upload one document; multipart fields are `file`, `project_id` and an
    /// optional `metadata` JSON blob.
    pub async fn upload(
        &self,
        project_id: &str,
        filename: &str,
        bytes: Vec<u8>,
        metadata: Option<serde_json::Value>,
    ) -> Result<DocumentUpload, ApiError> {
        let mut form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("project_id", project_id.to_string());
        if let Some(metadata) = metadata {
            form = form.text("metadata", metadata.to_string());
        }

        let envelope: Envelope<DocumentUpload> = self
            .client
            .post_multipart("/api/project/document/upload", form)
            .await?;
        envelope.into_result()
    }

    pub async fn get(&self, document_id: &str) -> Result<ProjectDocument, ApiError> {
        let envelope: Envelope<ProjectDocument> = self
            .client
            .get(
                "/api/project/document/detail",
                &[("document_id", document_id)],
            )
            .await?;
        envelope.into_result()
    }

    /// Fetch the raw document body; callers decide where to save it
    pub async fn download(&self, document_id: &str) -> Result<Vec<u8>, ApiError> {
        self.client
            .get_bytes(
                "/api/project/document/download",
                &[("document_id", document_id)],
            )
            .await
    }

    pub async fn delete(&self, document_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(
                "/api/project/document/delete",
                &[("document_id", document_id)],
            )
            .await
    }

    /// Mark one document as the project's current reference; the server
    /// clears the flag on every other document of the project.
    pub async fn set_current(&self, document_id: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            document_id: &'a str,
        }

        let _: serde_json::Value = self
            .client
            .put(
                "/api/project/document/set_current",
                &Payload { document_id },
            )
            .await?;
        Ok(())
    }
}
