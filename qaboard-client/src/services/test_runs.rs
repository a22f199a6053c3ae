use qaboard_sdk::{RunStatus, TestRun};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct RecordTestRun {
    pub project_id: String,
    pub scenario_id: String,
    pub test_case_id: String,
    pub executed_by: String,
    pub status: RunStatus,
    pub logs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestRunUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TestRunService {
    client: ApiClient,
}

impl TestRunService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn record(&self, data: &RecordTestRun) -> Result<TestRun, ApiError> {
        let envelope: Envelope<TestRun> = self.client.post("/api/test_run/record", data).await?;
        envelope.into_result()
    }

    pub async fn list_by_case(
        &self,
        project_id: &str,
        test_case_id: &str,
    ) -> Result<Vec<TestRun>, ApiError> {
        let envelope: Envelope<Vec<TestRun>> = self
            .client
            .get(
                "/api/test_run/list_by_case",
                &[("project_id", project_id), ("test_case_id", test_case_id)],
            )
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn list_by_scenario(
        &self,
        project_id: &str,
        scenario_id: &str,
    ) -> Result<Vec<TestRun>, ApiError> {
        let envelope: Envelope<Vec<TestRun>> = self
            .client
            .get(
                "/api/test_run/list_by_scenario",
                &[("project_id", project_id), ("scenario_id", scenario_id)],
            )
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn list_by_project(
        &self,
        project_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TestRun>, ApiError> {
        let limit_str;
        let mut query = vec![("project_id", project_id)];
        if let Some(limit) = limit {
            limit_str = limit.to_string();
            query.push(("limit", &limit_str));
        }

        let envelope: Envelope<Vec<TestRun>> = self
            .client
            .get("/api/test_run/list_by_project", &query)
            .await?;
        Ok(envelope.into_list())
    }

    /// Latest run for a test case; a 404 means the case has never run and is
    /// not an error.
    pub async fn latest(
        &self,
        project_id: &str,
        test_case_id: &str,
    ) -> Result<Option<TestRun>, ApiError> {
        let result: Result<Envelope<TestRun>, ApiError> = self
            .client
            .get(
                "/api/test_run/latest",
                &[("project_id", project_id), ("test_case_id", test_case_id)],
            )
            .await;

        match result {
            Ok(envelope) => envelope.into_result().map(Some),
            Err(ApiError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, run_id: &str) -> Result<TestRun, ApiError> {
        let envelope: Envelope<TestRun> = self
            .client
            .get("/api/test_run/get", &[("run_id", run_id)])
            .await?;
        envelope.into_result()
    }

    pub async fn update(&self, run_id: &str, data: &TestRunUpdate) -> Result<TestRun, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            run_id: &'a str,
            update_data: &'a TestRunUpdate,
        }

        let envelope: Envelope<TestRun> = self
            .client
            .put(
                "/api/test_run/update",
                &Payload {
                    run_id,
                    update_data: data,
                },
            )
            .await?;
        envelope.into_result()
    }

    pub async fn delete(&self, run_id: &str) -> Result<(), ApiError> {
        self.client
            .delete("/api/test_run/delete", &[("run_id", run_id)])
            .await
    }
}
