// Re-export the derive macro
pub use qaboard_macros::InputForm;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Re-export async trait for convenience
pub use async_trait::async_trait;

/// Form metadata (id, name, description)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Field schema definition for schema-driven input forms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub description: String,
    pub required: bool,
    pub default: Option<String>,
}

/// Field widget type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextArea,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Select {
        options: Vec<String>,
    },
    /// References an uploaded project document by id
    DocumentRef,
}

/// Trait that input forms implement (auto-implemented by derive macro)
pub trait InputForm {
    fn metadata() -> FormMetadata;
    fn fields() -> Vec<FieldSchema>;
}

/// Validate a set of field values against a schema.
///
/// Returns the names of required fields that are missing or empty.
pub fn missing_required_fields(
    fields: &[FieldSchema],
    values: &HashMap<String, String>,
) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| values.get(&f.name).map_or(true, |v| v.trim().is_empty()))
        .map(|f| f.name.clone())
        .collect()
}

/// Entities addressable by a stable string key.
///
/// The store's merge policy (replace-by-key, retain-by-key) is written
/// against this trait rather than per entity type.
pub trait Keyed {
    fn key(&self) -> &str;
}

// ============================================================================
// Status enums
// ============================================================================

/// Scenario priority as the server encodes it (capitalized)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Test case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Untested,
    Passed,
    Failed,
}

impl Default for CaseStatus {
    fn default() -> Self {
        CaseStatus::Untested
    }
}

/// Test run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pass,
    Fail,
    Skipped,
}

/// Lifecycle status shared by workflow executions and scan tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionStatus::Completed | ExecutionStatus::Failed)
    }
}

// ============================================================================
// Domain entities
// ============================================================================
// Wire records are flat and server-assigned; timestamps stay strings because
// the server is authoritative about their format. Snake_case server ids
// (bug_id, fix_id, ...) normalize onto `id` via serde aliases.

/// A managed test project.
///
/// The server emits both `id` and `project_id` on project payloads, so the
/// two stay separate fields; `key()` prefers `id` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub uploaded_documents: Vec<ProjectDocument>,
}

/// Reference document uploaded to a project.
///
/// At most one document per project has `is_current` set; the server
/// enforces that, the client only displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub document_id: String,
    pub project_id: String,
    pub filename: String,
    #[serde(default)]
    pub filepath: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// A test scenario grouping test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(alias = "scenario_id")]
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(alias = "scenario_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// A test case within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(alias = "test_case_id")]
    pub id: String,
    #[serde(default)]
    pub scenario_id: String,
    #[serde(alias = "test_case_name")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One recorded execution of a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    pub run_id: String,
    pub project_id: String,
    #[serde(default)]
    pub scenario_id: String,
    pub test_case_id: String,
    #[serde(default)]
    pub executed_by: String,
    #[serde(default)]
    pub executed_at: String,
    pub status: RunStatus,
    #[serde(default)]
    pub logs: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
    #[serde(default)]
    pub version: String,
}

/// A tracked bug, optionally linked to a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    #[serde(alias = "bug_id")]
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub scenario_id: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub severity: String,
    pub status: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub environment: Option<serde_json::Value>,
}

/// An attempted fix recorded against a bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugFix {
    #[serde(alias = "fix_id")]
    pub id: String,
    pub bug_id: String,
    #[serde(default)]
    pub fix_description: String,
    #[serde(default)]
    pub fixed_by: String,
    pub fix_status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Kind of a workflow variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    SshHost,
    SshPort,
    Document,
    Custom,
}

/// One configured variable fed into a workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowVariable {
    pub id: String,
    pub variable_name: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: VariableKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-project workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub project_id: String,
    #[serde(default)]
    pub variables: Vec<WorkflowVariable>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One server-side workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub execution_id: String,
    pub project_id: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub variables: Vec<WorkflowVariable>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// External AI scan job reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodexTask {
    pub task_id: String,
    #[serde(default)]
    pub prompt: String,
    pub repo_label: String,
    #[serde(default)]
    pub environment_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Selectable repository target for scan submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoOption {
    pub label: String,
    pub value: String,
}

/// A named row of test data used when exercising test cases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDataRecord {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub scenario_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub values: HashMap<String, String>,
    #[serde(default)]
    pub updated_at: String,
}

// Keyed impls: store merge logic addresses every entity by these keys

impl Keyed for Project {
    fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.project_id
        } else {
            &self.id
        }
    }
}

impl Keyed for ProjectDocument {
    fn key(&self) -> &str {
        &self.document_id
    }
}

impl Keyed for Scenario {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TestCase {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TestRun {
    fn key(&self) -> &str {
        &self.run_id
    }
}

impl Keyed for Bug {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for BugFix {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for WorkflowExecution {
    fn key(&self) -> &str {
        &self.execution_id
    }
}

impl Keyed for CodexTask {
    fn key(&self) -> &str {
        &self.task_id
    }
}

impl Keyed for TestDataRecord {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Result type for repository operations
pub type SdkResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Source of the test artifacts shown in the Test Cases, Test Data and
/// Run History tabs.
///
/// Two implementations exist: one backed by the HTTP API and an in-memory
/// fake seeded with demo fixtures, selected by configuration.
#[async_trait]
pub trait TestArtifactRepository: Send + Sync {
    async fn list_test_cases(&self, project_id: &str, scenario_id: &str)
        -> SdkResult<Vec<TestCase>>;

    async fn list_test_data(&self, project_id: &str) -> SdkResult<Vec<TestDataRecord>>;

    async fn run_history(&self, project_id: &str, limit: Option<usize>)
        -> SdkResult<Vec<TestRun>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_fields_flags_empty_values() {
        let fields = vec![
            FieldSchema {
                name: "summary".to_string(),
                field_type: FieldType::Text,
                label: "Summary".to_string(),
                description: String::new(),
                required: true,
                default: None,
            },
            FieldSchema {
                name: "notes".to_string(),
                field_type: FieldType::TextArea,
                label: "Notes".to_string(),
                description: String::new(),
                required: false,
                default: None,
            },
        ];

        let mut values = HashMap::new();
        values.insert("summary".to_string(), "   ".to_string());

        assert_eq!(
            missing_required_fields(&fields, &values),
            vec!["summary".to_string()]
        );

        values.insert("summary".to_string(), "login broken".to_string());
        assert!(missing_required_fields(&fields, &values).is_empty());
    }

    #[test]
    fn bug_id_alias_normalizes_to_id() {
        let bug: Bug = serde_json::from_value(serde_json::json!({
            "bug_id": "bug-7",
            "project_id": "proj-1",
            "summary": "crash on save",
            "severity": "high",
            "status": "open"
        }))
        .unwrap();

        assert_eq!(bug.id, "bug-7");
        assert_eq!(bug.key(), "bug-7");
    }

    #[test]
    fn execution_status_terminal() {
        assert!(!ExecutionStatus::Pending.is_terminal());
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
    }

    #[test]
    fn run_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Skipped).unwrap(),
            "\"skipped\""
        );
        let status: RunStatus = serde_json::from_str("\"pass\"").unwrap();
        assert_eq!(status, RunStatus::Pass);
    }
}
