use qaboard_sdk::Project;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::warn;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_current: Option<bool>,
}

/// Partial update; absent fields are left untouched by the server
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A file attached to a multipart project create
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ProjectService {
    client: ApiClient,
}

impl ProjectService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        let envelope: Envelope<Vec<Project>> = self.client.get("/api/projects", &[]).await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, id: &str) -> Result<Project, ApiError> {
        let envelope: Envelope<Project> =
            self.client.get("/api/project/get", &[("id", id)]).await?;
        envelope.into_result()
    }

    pub async fn create(&self, data: &CreateProject) -> Result<Project, ApiError> {
        let envelope: Envelope<Project> = self
            .client
            .post("/api/project/create", data)
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to create project");
                e
            })?;
        envelope.into_result()
    }

    /// Create a project and upload reference documents in one multipart call
    pub async fn create_with_documents(
        &self,
        data: &CreateProject,
        files: Vec<UploadFile>,
    ) -> Result<Project, ApiError> {
        let mut form = Form::new().text("name", data.name.clone());
        if let Some(description) = &data.description {
            form = form.text("description", description.clone());
        }
        if let Some(owner) = &data.owner {
            form = form.text("owner", owner.clone());
        }
        if let Some(is_current) = data.is_current {
            form = form.text("is_current", is_current.to_string());
        }
        for file in files {
            form = form.part("file", Part::bytes(file.bytes).file_name(file.filename));
        }

        let envelope: Envelope<Project> =
            self.client.post_multipart("/api/project/create", form).await?;
        envelope.into_result()
    }

    pub async fn update(&self, id: &str, data: &ProjectUpdate) -> Result<Project, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            id: &'a str,
            #[serde(flatten)]
            data: &'a ProjectUpdate,
        }

        let envelope: Envelope<Project> = self
            .client
            .put("/api/project/update", &Payload { id, data })
            .await?;
        envelope.into_result()
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete("/api/project/delete", &[("id", id)]).await
    }
}
