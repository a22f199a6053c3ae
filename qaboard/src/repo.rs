//! Test-artifact sources for the Test Cases, Test Data and Run History tabs
//!
//! Two implementations of [`TestArtifactRepository`]: one backed by the HTTP
//! API, and an in-memory fake seeded with demo fixtures for offline use.
//! Which one the app talks to is a startup configuration choice
//! (`--offline`), never a per-call decision.

use std::collections::HashMap;
use std::sync::Mutex;

use qaboard_client::{ApiClient, ApiError, Services};
use qaboard_sdk::{
    async_trait, CaseStatus, RunStatus, SdkResult, TestArtifactRepository, TestCase,
    TestDataRecord, TestRun,
};

/// Serves artifacts from the backend
pub struct HttpArtifactRepository {
    services: Services,
    client: ApiClient,
}

impl HttpArtifactRepository {
    pub fn new(client: ApiClient) -> Self {
        Self {
            services: Services::new(client.clone()),
            client,
        }
    }
}

#[async_trait]
impl TestArtifactRepository for HttpArtifactRepository {
    async fn list_test_cases(
        &self,
        project_id: &str,
        scenario_id: &str,
    ) -> SdkResult<Vec<TestCase>> {
        let cases = self.services.test_cases.list(project_id, scenario_id).await?;
        Ok(cases)
    }

    async fn list_test_data(&self, project_id: &str) -> SdkResult<Vec<TestDataRecord>> {
        // The test-data endpoint is newer than the rest of the API; a 404
        // from an older backend means "none yet", not a failure.
        let result: Result<qaboard_client::Envelope<Vec<TestDataRecord>>, ApiError> = self
            .client
            .get("/api/test_data/list", &[("project_id", project_id)])
            .await;
        match result {
            Ok(envelope) => Ok(envelope.into_list()),
            Err(ApiError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn run_history(
        &self,
        project_id: &str,
        limit: Option<usize>,
    ) -> SdkResult<Vec<TestRun>> {
        let runs = self
            .services
            .test_runs
            .list_by_project(project_id, limit)
            .await?;
        Ok(runs)
    }
}

/// In-memory fake seeded with demo fixtures. Mutations only touch the
/// process-local state; nothing persists.
pub struct MemoryArtifactRepository {
    cases: Mutex<HashMap<String, Vec<TestCase>>>,
    data: Mutex<Vec<TestDataRecord>>,
    runs: Mutex<Vec<TestRun>>,
}

impl MemoryArtifactRepository {
    pub fn empty() -> Self {
        Self {
            cases: Mutex::new(HashMap::new()),
            data: Mutex::new(Vec::new()),
            runs: Mutex::new(Vec::new()),
        }
    }

    /// The demo dataset: a registration scenario and a payment scenario with
    /// a couple of cases, data rows and runs each.
    pub fn seeded() -> Self {
        let repo = Self::empty();

        {
            let mut cases = repo.cases.lock().unwrap();
            cases.insert(
                "scn-registration".to_string(),
                vec![
                    demo_case(
                        "tc-1",
                        "scn-registration",
                        "Register with valid email",
                        &[
                            "Navigate to registration page",
                            "Enter valid email address",
                            "Enter strong password",
                            "Confirm password",
                            "Click Register",
                        ],
                        "User registered and verification email sent",
                        CaseStatus::Passed,
                    ),
                    demo_case(
                        "tc-2",
                        "scn-registration",
                        "Register with invalid email format",
                        &[
                            "Navigate to registration page",
                            "Enter malformed email address",
                            "Submit the form",
                        ],
                        "Email validation error shown",
                        CaseStatus::Failed,
                    ),
                ],
            );
            cases.insert(
                "scn-payment".to_string(),
                vec![demo_case(
                    "tc-3",
                    "scn-payment",
                    "Process credit card payment",
                    &[
                        "Add item to cart",
                        "Proceed to checkout",
                        "Enter card details",
                        "Confirm payment",
                    ],
                    "Payment processed and receipt shown",
                    CaseStatus::Untested,
                )],
            );
        }

        {
            let mut data = repo.data.lock().unwrap();
            data.push(demo_data(
                "td-1",
                "tc-1",
                "Valid registration",
                &[
                    ("email", "user@example.com"),
                    ("password", "StrongPass123!"),
                ],
            ));
            data.push(demo_data(
                "td-2",
                "tc-2",
                "Malformed email",
                &[("email", "invalid@"), ("password", "password123")],
            ));
            data.push(demo_data(
                "td-3",
                "tc-3",
                "Test card",
                &[
                    ("card_number", "4111111111111111"),
                    ("expiry", "12/25"),
                    ("cvv", "123"),
                ],
            ));
        }

        {
            let mut runs = repo.runs.lock().unwrap();
            runs.push(demo_run("run-1", "tc-1", RunStatus::Pass, "All steps green"));
            runs.push(demo_run(
                "run-2",
                "tc-2",
                RunStatus::Fail,
                "Validation message missing on step 3",
            ));
            runs.push(demo_run("run-3", "tc-3", RunStatus::Skipped, "Blocked on sandbox"));
        }

        repo
    }
}

#[async_trait]
impl TestArtifactRepository for MemoryArtifactRepository {
    async fn list_test_cases(
        &self,
        _project_id: &str,
        scenario_id: &str,
    ) -> SdkResult<Vec<TestCase>> {
        Ok(self
            .cases
            .lock()
            .unwrap()
            .get(scenario_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_test_data(&self, _project_id: &str) -> SdkResult<Vec<TestDataRecord>> {
        Ok(self.data.lock().unwrap().clone())
    }

    async fn run_history(
        &self,
        _project_id: &str,
        limit: Option<usize>,
    ) -> SdkResult<Vec<TestRun>> {
        let runs = self.runs.lock().unwrap();
        let limit = limit.unwrap_or(runs.len());
        Ok(runs.iter().take(limit).cloned().collect())
    }
}

fn demo_case(
    id: &str,
    scenario_id: &str,
    title: &str,
    steps: &[&str],
    expected: &str,
    status: CaseStatus,
) -> TestCase {
    TestCase {
        id: id.to_string(),
        scenario_id: scenario_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        expected_result: expected.to_string(),
        status,
        version: "1.0".to_string(),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn demo_data(id: &str, case_id: &str, name: &str, values: &[(&str, &str)]) -> TestDataRecord {
    TestDataRecord {
        id: id.to_string(),
        project_id: "demo".to_string(),
        scenario_id: None,
        name: format!("{} ({})", name, case_id),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        updated_at: "2025-01-15".to_string(),
    }
}

fn demo_run(id: &str, case_id: &str, status: RunStatus, logs: &str) -> TestRun {
    TestRun {
        run_id: id.to_string(),
        project_id: "demo".to_string(),
        scenario_id: String::new(),
        test_case_id: case_id.to_string(),
        executed_by: "demo".to_string(),
        executed_at: "2025-01-15T14:30:22".to_string(),
        status,
        logs: logs.to_string(),
        attachment_url: None,
        version: "1.0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_repo_serves_fixtures() {
        let repo = MemoryArtifactRepository::seeded();

        let cases = repo.list_test_cases("demo", "scn-registration").await.unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].title, "Register with valid email");

        let data = repo.list_test_data("demo").await.unwrap();
        assert_eq!(data.len(), 3);

        let runs = repo.run_history("demo", Some(2)).await.unwrap();
        assert_eq!(runs.len(), 2);
    }

    #[tokio::test]
    async fn unknown_scenario_yields_empty_list() {
        let repo = MemoryArtifactRepository::seeded();
        let cases = repo.list_test_cases("demo", "scn-missing").await.unwrap();
        assert!(cases.is_empty());
    }
}
