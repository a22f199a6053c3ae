use qaboard_sdk::{WorkflowConfig, WorkflowExecution, WorkflowVariable};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

/// A reusable variable preset offered by the server
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowTemplate {
    pub name: String,
    #[serde(default)]
    pub variables: Vec<WorkflowVariable>,
}

#[derive(Debug, Clone)]
pub struct WorkflowService {
    client: ApiClient,
}

impl WorkflowService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_config(&self, project_id: &str) -> Result<WorkflowConfig, ApiError> {
        let envelope: Envelope<WorkflowConfig> = self
            .client
            .get("/api/workflow/config", &[("project_id", project_id)])
            .await?;
        envelope.into_result()
    }

    pub async fn save_config(&self, config: &WorkflowConfig) -> Result<WorkflowConfig, ApiError> {
        let envelope: Envelope<WorkflowConfig> =
            self.client.post("/api/workflow/config", config).await?;
        envelope.into_result()
    }

    /// Kick off a server-side workflow execution; returns the handle to poll
    pub async fn execute(
        &self,
        project_id: &str,
        variables: &[WorkflowVariable],
    ) -> Result<WorkflowExecution, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            variables: &'a [WorkflowVariable],
        }

        let envelope: Envelope<WorkflowExecution> = self
            .client
            .post(
                "/api/workflow/execute",
                &Payload {
                    project_id,
                    variables,
                },
            )
            .await
            .map_err(|e| {
                warn!(error = %e, project_id, "failed to execute workflow");
                e
            })?;
        envelope.into_result()
    }

    pub async fn execution_status(
        &self,
        execution_id: &str,
    ) -> Result<WorkflowExecution, ApiError> {
        let envelope: Envelope<WorkflowExecution> = self
            .client
            .get(&format!("/api/workflow/execution/{}", execution_id), &[])
            .await?;
        envelope.into_result()
    }

    pub async fn execution_history(
        &self,
        project_id: &str,
    ) -> Result<Vec<WorkflowExecution>, ApiError> {
        let envelope: Envelope<Vec<WorkflowExecution>> = self
            .client
            .get("/api/workflow/executions", &[("project_id", project_id)])
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn cancel_execution(&self, execution_id: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post(
                &format!("/api/workflow/execution/{}/cancel", execution_id),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn templates(&self) -> Result<Vec<WorkflowTemplate>, ApiError> {
        let envelope: Envelope<Vec<WorkflowTemplate>> =
            self.client.get("/api/workflow/templates", &[]).await?;
        Ok(envelope.into_list())
    }

    /// Ask the server to re-sync workflow definitions with its upstream
    pub async fn sync(&self, project_id: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
        }

        let _: serde_json::Value = self
            .client
            .post("/api/workflow/sync_workflow", &Payload { project_id })
            .await?;
        Ok(())
    }
}
