use qaboard_sdk::{CaseStatus, TestCase};
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct CreateTestCase {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub status: CaseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestCaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
}

#[derive(Debug, Clone)]
pub struct TestCaseService {
    client: ApiClient,
}

impl TestCaseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        project_id: &str,
        scenario_id: &str,
    ) -> Result<Vec<TestCase>, ApiError> {
        let envelope: Envelope<Vec<TestCase>> = self
            .client
            .get(
                "/api/test_case/list",
                &[("project_id", project_id), ("scenario_id", scenario_id)],
            )
            .await?;
        Ok(envelope.into_list())
    }

    pub async fn get(
        &self,
        project_id: &str,
        scenario_id: &str,
        test_case_id: &str,
    ) -> Result<TestCase, ApiError> {
        let envelope: Envelope<TestCase> = self
            .client
            .get(
                "/api/test_case/get",
                &[
                    ("project_id", project_id),
                    ("scenario_id", scenario_id),
                    ("test_case_id", test_case_id),
                ],
            )
            .await?;
        envelope.into_result()
    }

    pub async fn create(
        &self,
        project_id: &str,
        scenario_id: &str,
        data: &CreateTestCase,
    ) -> Result<TestCase, ApiError> {
        #[derive(Serialize)]
        struct CaseData<'a> {
            #[serde(flatten)]
            data: &'a CreateTestCase,
            version: &'a str,
        }

        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenario_id: &'a str,
            test_case_data: CaseData<'a>,
        }

        let envelope: Envelope<TestCase> = self
            .client
            .post(
                "/api/test_case/create",
                &Payload {
                    project_id,
                    scenario_id,
                    test_case_data: CaseData {
                        data,
                        version: data.version.as_deref().unwrap_or("1.0"),
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
        test_case_id: &str,
        data: &TestCaseUpdate,
    ) -> Result<TestCase, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenario_id: &'a str,
            test_case_id: &'a str,
            update_data: &'a TestCaseUpdate,
        }

        let envelope: Envelope<TestCase> = self
            .client
            .put(
                "/api/test_case/update",
                &Payload {
                    project_id,
                    scenario_id,
                    test_case_id,
                    update_data: data,
                },
            )
            .await?;
        envelope.into_result()
    }

    pub async fn delete(
        &self,
        project_id: &str,
        scenario_id: &str,
        test_case_id: &str,
    ) -> Result<(), ApiError> {
        self.client
            .delete(
                "/api/test_case/delete",
                &[
                    ("project_id", project_id),
                    ("scenario_id", scenario_id),
                    ("test_case_id", test_case_id),
                ],
            )
            .await
    }

    /// Bulk save a scenario's test cases
    pub async fn save_all(
        &self,
        project_id: &str,
        scenario_id: &str,
        test_cases: &[CreateTestCase],
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            project_id: &'a str,
            scenario_id: &'a str,
            test_cases: &'a [CreateTestCase],
        }

        let _: serde_json::Value = self
            .client
            .post(
                "/api/test_case/save",
                &Payload {
                    project_id,
                    scenario_id,
                    test_cases,
                },
            )
            .await?;
        Ok(())
    }
}
