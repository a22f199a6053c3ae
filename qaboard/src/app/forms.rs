//! Schema-driven input forms
//!
//! Every create/edit modal is a plain struct deriving [`InputForm`]; the
//! derive turns it into a field schema the generic form editor renders and
//! validates. Submission parses the collected values into the matching
//! service DTO and dispatches the store operation.

use std::collections::HashMap;

use qaboard_client::services::bugs::{CreateBug, CreateBugFix};
use qaboard_client::services::codex::CodexRunRequest;
use qaboard_client::services::projects::CreateProject;
use qaboard_client::services::scenarios::CreateScenario;
use qaboard_client::services::test_cases::CreateTestCase;
use qaboard_client::services::test_runs::RecordTestRun;
use qaboard_sdk::{
    missing_required_fields, CaseStatus, FieldSchema, FieldType, FormMetadata, InputForm,
    Priority, RunStatus, VariableKind, WorkflowConfig, WorkflowVariable,
};

use super::App;

// ---------------------------------------------------------------------------
// Form definitions
// ---------------------------------------------------------------------------

#[derive(InputForm)]
#[form(id = "new_project", name = "New Project", description = "Create a test project")]
struct NewProjectForm {
    #[field(label = "Name")]
    name: String,
    #[field(label = "Description", widget = "textarea")]
    description: Option<String>,
    #[field(label = "Owner")]
    owner: Option<String>,
}

#[derive(InputForm)]
#[form(id = "new_scenario", name = "New Scenario", description = "Add a test scenario")]
struct NewScenarioForm {
    #[field(label = "Name")]
    name: String,
    #[field(label = "Description", widget = "textarea")]
    description: String,
    #[field(label = "Priority", widget = "select", options = "High,Medium,Low", default = "Medium")]
    priority: String,
}

#[derive(InputForm)]
#[form(id = "new_test_case", name = "New Test Case", description = "Add a test case")]
struct NewTestCaseForm {
    #[field(label = "Title")]
    title: String,
    #[field(label = "Description", widget = "textarea")]
    description: String,
    #[field(label = "Steps", description = "One step per line", widget = "textarea")]
    steps: String,
    #[field(label = "Expected Result", widget = "textarea")]
    expected_result: String,
}

#[derive(InputForm)]
#[form(id = "new_bug", name = "Report Bug", description = "Track a new bug")]
struct NewBugForm {
    #[field(label = "Summary")]
    summary: String,
    #[field(label = "Description", widget = "textarea")]
    description: String,
    #[field(label = "Severity", widget = "select", options = "critical,high,medium,low", default = "medium")]
    severity: String,
    #[field(label = "Status", widget = "select", options = "open,in_progress,resolved,closed", default = "open")]
    status: String,
    #[field(label = "Reported By")]
    created_by: String,
}

#[derive(InputForm)]
#[form(id = "new_bug_fix", name = "Record Fix", description = "Record a fix attempt for a bug")]
struct NewBugFixForm {
    #[field(label = "Fix Description", widget = "textarea")]
    fix_description: String,
    #[field(label = "Fixed By")]
    fixed_by: String,
    #[field(label = "Fix Status", widget = "select", options = "proposed,applied,verified", default = "proposed")]
    fix_status: String,
}

#[derive(InputForm)]
#[form(id = "record_run", name = "Record Run", description = "Record a test case execution")]
struct RecordRunForm {
    #[field(label = "Status", widget = "select", options = "pass,fail,skipped", default = "pass")]
    status: String,
    #[field(label = "Logs", widget = "textarea")]
    logs: Option<String>,
    #[field(label = "Executed By")]
    executed_by: String,
}

#[derive(InputForm)]
#[form(id = "scan_setup", name = "Scan Setup", description = "Submit an AI scan for a repository")]
struct ScanSetupForm {
    #[field(label = "Prompt", widget = "textarea")]
    prompt: String,
    #[field(label = "Repository", widget = "select")]
    repo_label: String,
    #[field(label = "Environment")]
    environment_id: Option<String>,
}

#[derive(InputForm)]
#[form(id = "workflow_variable", name = "Workflow Variable", description = "Add a workflow input variable")]
struct WorkflowVariableForm {
    #[field(label = "Variable Name")]
    variable_name: String,
    #[field(label = "Key")]
    key: String,
    #[field(label = "Value", description = "Literal value, or pick a document for document variables")]
    value: Option<String>,
    #[field(label = "Type", widget = "select", options = "ssh_host,ssh_port,document,custom", default = "custom")]
    kind: String,
    #[field(label = "Document", widget = "document")]
    document_id: Option<String>,
    #[field(label = "Description")]
    description: Option<String>,
}

#[derive(InputForm)]
#[form(id = "upload_document", name = "Upload Document", description = "Attach a reference document to the project")]
struct UploadDocumentForm {
    #[field(label = "File Path", description = "Absolute path of the file to upload")]
    path: String,
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Which operation a form submission feeds
#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    NewProject,
    NewScenario {
        project_id: String,
    },
    NewTestCase {
        project_id: String,
        scenario_id: String,
    },
    NewBug {
        project_id: String,
        scenario_id: Option<String>,
    },
    NewBugFix {
        bug_id: String,
    },
    RecordRun {
        project_id: String,
        scenario_id: String,
        test_case_id: String,
    },
    ScanSetup,
    WorkflowVariable {
        project_id: String,
    },
    UploadDocument {
        project_id: String,
    },
}

/// Live state of the open form modal
pub struct FormState {
    pub kind: FormKind,
    pub metadata: FormMetadata,
    pub fields: Vec<FieldSchema>,
    pub values: HashMap<String, String>,
    pub field_index: usize,
    pub edit_buffer: String,
    pub is_editing: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        let (metadata, fields) = match &kind {
            FormKind::NewProject => (NewProjectForm::metadata(), NewProjectForm::fields()),
            FormKind::NewScenario { .. } => {
                (NewScenarioForm::metadata(), NewScenarioForm::fields())
            }
            FormKind::NewTestCase { .. } => {
                (NewTestCaseForm::metadata(), NewTestCaseForm::fields())
            }
            FormKind::NewBug { .. } => (NewBugForm::metadata(), NewBugForm::fields()),
            FormKind::NewBugFix { .. } => (NewBugFixForm::metadata(), NewBugFixForm::fields()),
            FormKind::RecordRun { .. } => (RecordRunForm::metadata(), RecordRunForm::fields()),
            FormKind::ScanSetup => (ScanSetupForm::metadata(), ScanSetupForm::fields()),
            FormKind::WorkflowVariable { .. } => (
                WorkflowVariableForm::metadata(),
                WorkflowVariableForm::fields(),
            ),
            FormKind::UploadDocument { .. } => (
                UploadDocumentForm::metadata(),
                UploadDocumentForm::fields(),
            ),
        };

        // Seed defaults from the schema
        let mut values = HashMap::new();
        for field in &fields {
            if let Some(default) = &field.default {
                values.insert(field.name.clone(), default.clone());
            }
        }

        Self {
            kind,
            metadata,
            fields,
            values,
            field_index: 0,
            edit_buffer: String::new(),
            is_editing: false,
            error: None,
        }
    }

    pub fn current_field(&self) -> Option<&FieldSchema> {
        self.fields.get(self.field_index)
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(|s| s.as_str()).unwrap_or("")
    }

    fn required_value(&self, field: &str) -> String {
        self.value(field).trim().to_string()
    }

    fn optional_value(&self, field: &str) -> Option<String> {
        let value = self.value(field).trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Validate against the schema; stores and returns the error on failure
    pub fn validate(&mut self) -> bool {
        let missing = missing_required_fields(&self.fields, &self.values);
        if missing.is_empty() {
            self.error = None;
            true
        } else {
            self.error = Some(format!("Required: {}", missing.join(", ")));
            false
        }
    }
}

fn parse_priority(value: &str) -> Priority {
    match value {
        "High" => Priority::High,
        "Low" => Priority::Low,
        _ => Priority::Medium,
    }
}

fn parse_run_status(value: &str) -> RunStatus {
    match value {
        "fail" => RunStatus::Fail,
        "skipped" => RunStatus::Skipped,
        _ => RunStatus::Pass,
    }
}

fn parse_variable_kind(value: &str) -> VariableKind {
    match value {
        "ssh_host" => VariableKind::SshHost,
        "ssh_port" => VariableKind::SshPort,
        "document" => VariableKind::Document,
        _ => VariableKind::Custom,
    }
}

// ---------------------------------------------------------------------------
// App integration
// ---------------------------------------------------------------------------

impl App {
    pub fn open_form(&mut self, kind: FormKind) {
        let mut form = FormState::new(kind);

        // Prefill from input history (most recent submission wins over
        // schema defaults)
        for field in &form.fields {
            if let Some(latest) = self.history.latest(&form.metadata.id, &field.name) {
                form.values.insert(field.name.clone(), latest.to_string());
            }
        }

        // The scan form needs the repository options loaded
        if form.kind == FormKind::ScanSetup && self.store.repos.is_empty() {
            self.store.fetch_repos();
        }

        self.form = Some(form);
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.dropdown = None;
    }

    /// Validate, dispatch the matching store operation, remember the values
    /// in input history, and close the modal.
    pub fn submit_form(&mut self) {
        let Some(mut form) = self.form.take() else {
            return;
        };

        if !form.validate() {
            self.form = Some(form);
            return;
        }

        match form.kind.clone() {
            FormKind::NewProject => {
                let data = CreateProject {
                    name: form.required_value("name"),
                    description: form.optional_value("description"),
                    owner: form.optional_value("owner"),
                    is_current: None,
                };
                self.store.create_project(data, Vec::new());
            }
            FormKind::NewScenario { project_id } => {
                let data = CreateScenario {
                    name: form.required_value("name"),
                    description: form.required_value("description"),
                    priority: parse_priority(form.value("priority")),
                };
                self.store.create_scenario(project_id, data);
            }
            FormKind::NewTestCase {
                project_id,
                scenario_id,
            } => {
                let steps = form
                    .value("steps")
                    .lines()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty())
                    .collect();
                let data = CreateTestCase {
                    title: form.required_value("title"),
                    description: form.required_value("description"),
                    steps,
                    expected_result: form.required_value("expected_result"),
                    status: CaseStatus::Untested,
                    version: None,
                };
                self.store.create_test_case(project_id, scenario_id, data);
            }
            FormKind::NewBug {
                project_id,
                scenario_id,
            } => {
                let data = CreateBug {
                    project_id,
                    scenario_id,
                    summary: form.required_value("summary"),
                    description: form.required_value("description"),
                    severity: form.required_value("severity"),
                    status: form.required_value("status"),
                    created_by: form.required_value("created_by"),
                    environment: None,
                };
                self.store.create_bug(data);
            }
            FormKind::NewBugFix { bug_id } => {
                let data = CreateBugFix {
                    bug_id,
                    fix_description: form.required_value("fix_description"),
                    fixed_by: form.required_value("fixed_by"),
                    fix_status: form.required_value("fix_status"),
                };
                self.store.create_bug_fix(data);
            }
            FormKind::RecordRun {
                project_id,
                scenario_id,
                test_case_id,
            } => {
                let data = RecordTestRun {
                    project_id,
                    scenario_id,
                    test_case_id,
                    executed_by: form.required_value("executed_by"),
                    status: parse_run_status(form.value("status")),
                    logs: form.value("logs").to_string(),
                    attachment_url: None,
                    version: "1.0".to_string(),
                };
                self.store.record_run(data);
            }
            FormKind::ScanSetup => {
                let request = CodexRunRequest {
                    prompt: form.required_value("prompt"),
                    repo_label: form.required_value("repo_label"),
                    environment_id: form.optional_value("environment_id"),
                };
                if let Some(tab) = self.open_tabs.get_mut(self.active_tab_idx) {
                    tab.selected_repo = Some(request.repo_label.clone());
                }
                self.store.run_codex_scan(request);
            }
            FormKind::WorkflowVariable { project_id } => {
                let kind = parse_variable_kind(form.value("kind"));
                // Document variables carry the picked document id as value
                let value = match kind {
                    VariableKind::Document => form
                        .optional_value("document_id")
                        .or_else(|| form.optional_value("value")),
                    _ => form.optional_value("value"),
                };
                let Some(value) = value else {
                    form.error = Some("Required: value".to_string());
                    self.form = Some(form);
                    return;
                };
                let variable = WorkflowVariable {
                    id: uuid::Uuid::new_v4().to_string(),
                    variable_name: form.required_value("variable_name"),
                    key: form.required_value("key"),
                    value,
                    kind,
                    description: form.optional_value("description"),
                };
                let mut config = self
                    .store
                    .workflow_config
                    .clone()
                    .unwrap_or(WorkflowConfig {
                        project_id: project_id.clone(),
                        variables: Vec::new(),
                        created_at: None,
                        updated_at: None,
                    });
                config.variables.push(variable);
                self.store.save_workflow_config(config);
            }
            FormKind::UploadDocument { project_id } => {
                let path = std::path::PathBuf::from(form.required_value("path"));
                self.store.upload_document(project_id, path);
            }
        }

        // Remember the submitted values for next time
        for field in &form.fields {
            self.history
                .remember(&form.metadata.id, &field.name, form.value(&field.name));
        }
        let _ = crate::utils::save_history(&self.config, &self.history);

        self.dropdown = None;
    }

    // Form field editing, adapted from the field-edit flow of the workflow
    // edit view

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            if form.field_index + 1 < form.fields.len() {
                form.field_index += 1;
            }
        }
    }

    pub fn form_previous_field(&mut self) {
        if let Some(form) = &mut self.form {
            if form.field_index > 0 {
                form.field_index -= 1;
            }
        }
    }

    pub fn form_start_editing(&mut self) {
        // Select and document fields open a dropdown instead of free text
        if self.form_open_dropdown() {
            return;
        }
        if let Some(form) = &mut self.form {
            if let Some(field) = form.fields.get(form.field_index) {
                form.edit_buffer = form.values.get(&field.name).cloned().unwrap_or_default();
                form.is_editing = true;
            }
        }
    }

    pub fn form_save_field(&mut self) {
        if let Some(form) = &mut self.form {
            if let Some(field) = form.fields.get(form.field_index) {
                form.values
                    .insert(field.name.clone(), form.edit_buffer.clone());
            }
            form.is_editing = false;
            form.edit_buffer.clear();
        }
    }

    pub fn form_cancel_editing(&mut self) {
        if let Some(form) = &mut self.form {
            form.is_editing = false;
            form.edit_buffer.clear();
        }
    }

    /// Open the dropdown appropriate for the focused field. Returns whether
    /// one was opened.
    pub fn form_open_dropdown(&mut self) -> bool {
        use super::{Dropdown, DropdownKind};

        let Some(form) = &self.form else {
            return false;
        };
        let Some(field) = form.current_field() else {
            return false;
        };

        let (kind, items) = match &field.field_type {
            FieldType::Select { options } => {
                // The repository picker is populated at runtime
                let items = if field.name == "repo_label" {
                    self.store
                        .repos
                        .iter()
                        .map(|r| r.label.clone())
                        .collect::<Vec<_>>()
                } else {
                    options.clone()
                };
                (
                    DropdownKind::FieldOption {
                        field: field.name.clone(),
                    },
                    items,
                )
            }
            FieldType::DocumentRef => {
                let items = self
                    .store
                    .documents
                    .items
                    .iter()
                    .map(|d| d.document_id.clone())
                    .collect::<Vec<_>>();
                (
                    DropdownKind::DocumentRef {
                        field: field.name.clone(),
                    },
                    items,
                )
            }
            _ => return false,
        };

        if items.is_empty() {
            return false;
        }

        self.dropdown = Some(Dropdown {
            kind,
            items,
            selected: 0,
        });
        true
    }

    /// Show previous submissions for the focused free-text field
    pub fn form_show_history(&mut self) {
        use super::{Dropdown, DropdownKind};

        let Some(form) = &self.form else { return };
        let Some(field) = form.current_field() else {
            return;
        };
        let items = self
            .history
            .values(&form.metadata.id, &field.name)
            .to_vec();
        if items.is_empty() {
            return;
        }
        self.dropdown = Some(Dropdown {
            kind: DropdownKind::History {
                field: field.name.clone(),
            },
            items,
            selected: 0,
        });
    }

    /// Commit the highlighted dropdown entry into the form
    pub fn dropdown_select(&mut self) {
        use super::DropdownKind;

        let Some(dropdown) = self.dropdown.take() else {
            return;
        };
        let Some(value) = dropdown.current().map(|s| s.to_string()) else {
            return;
        };

        let field = match dropdown.kind {
            DropdownKind::FieldOption { field }
            | DropdownKind::DocumentRef { field }
            | DropdownKind::History { field } => field,
        };

        if let Some(form) = &mut self.form {
            form.values.insert(field, value);
            form.is_editing = false;
            form.edit_buffer.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_schema_marks_options_not_required() {
        let fields = NewProjectForm::fields();
        let name = fields.iter().find(|f| f.name == "name").unwrap();
        let owner = fields.iter().find(|f| f.name == "owner").unwrap();
        assert!(name.required);
        assert!(!owner.required);
        assert_eq!(name.label, "Name");
    }

    #[test]
    fn derived_schema_carries_select_options_and_default() {
        let fields = NewScenarioForm::fields();
        let priority = fields.iter().find(|f| f.name == "priority").unwrap();
        match &priority.field_type {
            FieldType::Select { options } => {
                assert_eq!(options, &["High", "Medium", "Low"]);
            }
            other => panic!("expected select, got {:?}", other),
        }
        assert_eq!(priority.default.as_deref(), Some("Medium"));
    }

    #[test]
    fn form_state_seeds_defaults_and_validates() {
        let mut form = FormState::new(FormKind::NewBug {
            project_id: "proj-1".to_string(),
            scenario_id: None,
        });
        // Defaults landed
        assert_eq!(form.value("severity"), "medium");
        assert_eq!(form.value("status"), "open");

        // Missing summary/description/created_by blocks submission
        assert!(!form.validate());
        let error = form.error.clone().unwrap();
        assert!(error.contains("summary"));
        assert!(error.contains("description"));

        form.values.insert("summary".to_string(), "crash".to_string());
        form.values
            .insert("description".to_string(), "steps".to_string());
        form.values
            .insert("created_by".to_string(), "qa-1".to_string());
        assert!(form.validate());
        assert!(form.error.is_none());
    }

    #[test]
    fn priority_and_status_parsers_fall_back_sanely() {
        assert_eq!(parse_priority("High"), Priority::High);
        assert_eq!(parse_priority("bogus"), Priority::Medium);
        assert_eq!(parse_run_status("fail"), RunStatus::Fail);
        assert_eq!(parse_run_status("bogus"), RunStatus::Pass);
        assert_eq!(parse_variable_kind("ssh_host"), VariableKind::SshHost);
        assert_eq!(parse_variable_kind("anything"), VariableKind::Custom);
    }
}
