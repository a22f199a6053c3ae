use qaboard_sdk::{Priority, Scenario};
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct CreateScenario {
    pub name: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Structured output handed back by a scenario-generation workflow run.
/// `text` may be absent while the execution is still materializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub structured_output: WorkflowScenarios,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowScenarios {
    pub project_id: String,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone)]
pub struct ScenarioService {
    client: ApiClient,
}

impl ScenarioService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, project_id: &str) -> Result<Vec<Scenario>, ApiError> {
        let envelope: Envelope<Vec<Scenario>> = self
            .client
            .get("/api/scenario/list", &[("project_id", project_id)])
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, project_id: &str, scenario_id: &str) -> Result<Scenario, ApiError> {
        let envelope: Envelope<Scenario> = self
            .client
            .get(
                "/api/scenario/get",
                &[("project_id", project_id), ("scenario_id", scenario_id)],
            )
            .await?;
        envelope.into_result()
    }

    pub async fn create(
        &self,
        project_id: &str,
        data: &CreateScenario,
    ) -> Result<Scenario, ApiError> {
        #[derive(Serialize)]
        struct ScenarioData<'a> {
            #[serde(flatten)]
            data: &'a CreateScenario,
            version: &'static str,
        }

        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenario_data: ScenarioData<'a>,
        }

        let envelope: Envelope<Scenario> = self
            .client
            .post(
                "/api/scenario/create",
                &Payload {
                    project_id,
                    scenario_data: ScenarioData {
                        data,
                        version: "1.0",
                    },
                },
            )
            .await?;
        envelope.into_result()
    }

    pub async fn update(
        &self,
        project_id: &str,
        scenario_id: &str,
        data: &ScenarioUpdate,
    ) -> Result<Scenario, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenario_id: &'a str,
            scenario_data: &'a ScenarioUpdate,
        }

        let envelope: Envelope<Scenario> = self
            .client
            .put(
                "/api/scenario/update",
                &Payload {
                    project_id,
                    scenario_id,
                    scenario_data: data,
                },
            )
            .await?;
        envelope.into_result()
    }

    pub async fn delete(&self, project_id: &str, scenario_id: &str) -> Result<(), ApiError> {
        self.client
            .delete(
                "/api/scenario/delete",
                &[("project_id", project_id), ("scenario_id", scenario_id)],
            )
            .await
    }

    /// Bulk save a project's whole scenario list
    pub async fn save_all(&self, project_id: &str, scenarios: &[Scenario]) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenarios: &'a [Scenario],
        }

        let _: serde_json::Value = self
            .client
            .post(
                "/api/scenario/save",
                &Payload {
                    project_id,
                    scenarios,
                },
            )
            .await?;
        Ok(())
    }

    /// Import scenarios produced by a workflow execution
    pub async fn save_from_workflow(
        &self,
        project_id: &str,
        output: &WorkflowOutput,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            workflow_output: &'a WorkflowOutput,
        }

        let _: serde_json::Value = self
            .client
            .post(
                "/api/scenario/save_from_workflow",
                &Payload {
                    project_id,
                    workflow_output: output,
                },
            )
            .await?;
        Ok(())
    }
}
