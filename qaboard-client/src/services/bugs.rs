use qaboard_sdk::{Bug, BugFix};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

#[derive(Debug, Clone, Serialize)]
pub struct CreateBug {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    pub summary: String,
    pub description: String,
    pub severity: String,
    pub status: String,
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BugUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BugFilters {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub scenario_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBugFix {
    pub bug_id: String,
    pub fix_description: String,
    pub fixed_by: String,
    pub fix_status: String,
}

/// One entry of a batch import; `status` and `created_by` fall back to
/// server defaults when absent.
#[derive(Debug, Clone, Serialize)]
pub struct BatchBugEntry {
    pub summary: String,
    pub description: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBugsBatch {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    pub bugs: Vec<BatchBugEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BugsBatchResult {
    pub project_id: String,
    #[serde(default)]
    pub scenario_id: Option<String>,
    pub bugs: Vec<Bug>,
    pub total_created: usize,
}

#[derive(Debug, Clone)]
pub struct BugService {
    client: ApiClient,
}

impl BugService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, data: &CreateBug) -> Result<Bug, ApiError> {
        let envelope: Envelope<Bug> =
            self.client.post("/api/bug/create", data).await.map_err(|e| {
                warn!(error = %e, "failed to create bug");
                e
            })?;
        envelope.into_result()
    }

    pub async fn list(
        &self,
        project_id: &str,
        filters: &BugFilters,
    ) -> Result<Vec<Bug>, ApiError> {
        let mut query = vec![("project_id", project_id)];
        if let Some(status) = &filters.status {
            query.push(("status", status));
        }
        if let Some(severity) = &filters.severity {
            query.push(("severity", severity));
        }
        if let Some(scenario_id) = &filters.scenario_id {
            query.push(("scenario_id", scenario_id));
        }

        let envelope: Envelope<Vec<Bug>> = self.client.get("/api/bug/list", &query).await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, bug_id: &str) -> Result<Bug, ApiError> {
        let envelope: Envelope<Bug> =
            self.client.get("/api/bug/get", &[("bug_id", bug_id)]).await?;
        envelope.into_result()
    }

    pub async fn update(&self, bug_id: &str, data: &BugUpdate) -> Result<Bug, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            bug_id: &'a str,
            #[serde(flatten)]
            data: &'a BugUpdate,
        }

        let envelope: Envelope<Bug> = self
            .client
            .put("/api/bug/update", &Payload { bug_id, data })
            .await?;
        envelope.into_result()
    }

    pub async fn delete(&self, bug_id: &str) -> Result<(), ApiError> {
        self.client.delete("/api/bug/delete", &[("bug_id", bug_id)]).await
    }

    pub async fn create_fix(&self, data: &CreateBugFix) -> Result<BugFix, ApiError> {
        let envelope: Envelope<BugFix> = self.client.post("/api/bug/fix/create", data).await?;
        envelope.into_result()
    }

    pub async fn verify_fix(
        &self,
        fix_id: &str,
        verification_status: &str,
    ) -> Result<BugFix, ApiError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            fix_id: &'a str,
            verification_status: &'a str,
        }

        let envelope: Envelope<BugFix> = self
            .client
            .put(
                "/api/bug/fix/verify",
                &Payload {
                    fix_id,
                    verification_status,
                },
            )
            .await?;
        envelope.into_result()
    }

    pub async fn list_fixes(&self, bug_id: &str) -> Result<Vec<BugFix>, ApiError> {
        let envelope: Envelope<Vec<BugFix>> = self
            .client
            .get("/api/bug/fix/list", &[("bug_id", bug_id)])
            .await?;
        Ok(envelope.into_list())
    }

    /// Batch import. The whole batch is validated client-side first; any
    /// entry missing a required field rejects the entire batch before a
    /// request is made.
    pub async fn create_batch(&self, data: &CreateBugsBatch) -> Result<BugsBatchResult, ApiError> {
        validate_batch(data)?;

        let envelope: Envelope<BugsBatchResult> =
            self.client.post("/api/bug/create_batch", data).await?;
        envelope.into_result()
    }
}

/// Required-field check for batch imports: every entry needs a non-empty
/// summary, description and severity.
pub fn validate_batch(data: &CreateBugsBatch) -> Result<(), ApiError> {
    if data.project_id.trim().is_empty() {
        return Err(ApiError::Validation {
            detail: Some("project_id is required".to_string()),
        });
    }
    if data.bugs.is_empty() {
        return Err(ApiError::Validation {
            detail: Some("batch contains no bugs".to_string()),
        });
    }

    for (index, bug) in data.bugs.iter().enumerate() {
        for (field, value) in [
            ("summary", &bug.summary),
            ("description", &bug.description),
            ("severity", &bug.severity),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::Validation {
                    detail: Some(format!("bug #{}: {} is required", index + 1, field)),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(summary: &str, description: &str) -> BatchBugEntry {
        BatchBugEntry {
            summary: summary.to_string(),
            description: description.to_string(),
            severity: "high".to_string(),
            status: None,
            created_by: None,
            environment: None,
        }
    }

    #[test]
    fn batch_with_missing_description_is_rejected_before_any_request() {
        let batch = CreateBugsBatch {
            project_id: "proj-1".to_string(),
            scenario_id: None,
            bugs: vec![
                entry("valid one", "steps to reproduce"),
                entry("valid two", "other steps"),
                entry("invalid", ""),
            ],
        };

        let err = validate_batch(&batch).unwrap_err();
        assert_eq!(err.status(), 422);
        assert_eq!(
            err.to_string(),
            "Validation Error: bug #3: description is required"
        );
    }

    #[test]
    fn valid_batch_passes_validation() {
        let batch = CreateBugsBatch {
            project_id: "proj-1".to_string(),
            scenario_id: Some("scn-2".to_string()),
            bugs: vec![entry("a", "b"), entry("c", "d")],
        };
        assert!(validate_batch(&batch).is_ok());
    }

    #[test]
    fn empty_batch_is_rejected() {
        let batch = CreateBugsBatch {
            project_id: "proj-1".to_string(),
            scenario_id: None,
            bugs: vec![],
        };
        assert!(validate_batch(&batch).is_err());
    }
}
