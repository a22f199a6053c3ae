//! Store dispatchers
//!
//! Each dispatcher is the pending phase of one three-phase operation: flag
//! the slice, clone the service, spawn the call on the runtime, and let the
//! completion travel back over the channel. Nothing here blocks the UI
//! thread, and nothing here retries.

use std::path::PathBuf;

use qaboard_client::services::bugs::{BugFilters, CreateBug, CreateBugFix, CreateBugsBatch};
use qaboard_client::services::codex::CodexRunRequest;
use qaboard_client::services::projects::{CreateProject, ProjectUpdate, UploadFile};
use qaboard_client::services::scenarios::{CreateScenario, ScenarioUpdate, WorkflowOutput};
use qaboard_client::services::test_cases::{CreateTestCase, TestCaseUpdate};
use qaboard_client::services::test_runs::RecordTestRun;
use qaboard_sdk::{WorkflowConfig, WorkflowVariable};

use super::{ResourceEvent, Store, StoreMsg};

impl Store {
    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    pub fn fetch_projects(&mut self) {
        let token = self.projects.begin_fetch();
        let svc = self.services.projects.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.list().await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Project(ResourceEvent::Listed { token, result }));
        });
    }

    pub fn fetch_project(&mut self, id: String) {
        let token = self.projects.begin_fetch();
        let svc = self.services.projects.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.get(&id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Project(ResourceEvent::FetchedOne { token, result }));
        });
    }

    pub fn create_project(&mut self, data: CreateProject, files: Vec<UploadFile>) {
        self.projects.begin_mutation();
        let svc = self.services.projects.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = if files.is_empty() {
                svc.create(&data).await
            } else {
                svc.create_with_documents(&data, files).await
            }
            .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Project(ResourceEvent::Created(result)));
        });
    }

    pub fn update_project(&mut self, id: String, data: ProjectUpdate) {
        self.projects.begin_mutation();
        let svc = self.services.projects.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.update(&id, &data).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Project(ResourceEvent::Updated(result)));
        });
    }

    pub fn delete_project(&mut self, id: String) {
        self.projects.begin_mutation();
        let svc = self.services.projects.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.delete(&id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Project(ResourceEvent::Deleted { id, result }));
        });
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    pub fn fetch_documents(&mut self, project_id: String) {
        let token = self.documents.begin_fetch();
        let svc = self.services.documents.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.list(&project_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Document(ResourceEvent::Listed { token, result }));
        });
    }

    /// Read the file off disk and upload it; the refreshed document list is
    /// fetched separately by the caller on success.
    pub fn upload_document(&mut self, project_id: String, path: PathBuf) {
        self.documents.begin_mutation();
        let svc = self.services.documents.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "upload.bin".to_string());

            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => svc
                    .upload(&project_id, &filename, bytes, None)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(format!("Failed to read {}: {}", path.display(), e)),
            };

            match result {
                Ok(uploaded) => {
                    let _ = tx.send(StoreMsg::Notice(format!(
                        "Uploaded {}",
                        uploaded.filename
                    )));
                    // Refresh the list so is_current flags come from the server
                    let listed = svc.list(&project_id).await.map_err(|e| e.to_string());
                    let _ = tx.send(StoreMsg::DocumentsRefreshed(listed));
                }
                Err(message) => {
                    let _ = tx.send(StoreMsg::Document(ResourceEvent::Created(Err(message))));
                }
            }
        });
    }

    pub fn delete_document(&mut self, document_id: String) {
        self.documents.begin_mutation();
        let svc = self.services.documents.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.delete(&document_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Document(ResourceEvent::Deleted {
                id: document_id,
                result,
            }));
        });
    }

    pub fn set_current_document(&mut self, document_id: String, project_id: String) {
        let svc = self.services.documents.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            match svc.set_current(&document_id).await {
                Ok(()) => {
                    let listed = svc.list(&project_id).await.map_err(|e| e.to_string());
                    let _ = tx.send(StoreMsg::DocumentsRefreshed(listed));
                }
                Err(e) => {
                    let _ = tx.send(StoreMsg::Notice(e.to_string()));
                }
            }
        });
    }

    /// Download a document body and save it next to the data dir
    pub fn download_document(&mut self, document_id: String, filename: String, dest: PathBuf) {
        let svc = self.services.documents.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match svc.download(&document_id).await {
                Ok(bytes) => {
                    let target = dest.join(&filename);
                    match tokio::fs::write(&target, bytes).await {
                        Ok(()) => format!("Saved {}", target.display()),
                        Err(e) => format!("Failed to save {}: {}", target.display(), e),
                    }
                }
                Err(e) => e.to_string(),
            };
            let _ = tx.send(StoreMsg::Notice(message));
        });
    }

    // ------------------------------------------------------------------
    // Scenarios and test cases
    // ------------------------------------------------------------------

    pub fn fetch_scenarios(&mut self, project_id: String) {
        let token = self.scenarios.begin_fetch();
        let svc = self.services.scenarios.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.list(&project_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Listed { token, result }));
        });
    }

    pub fn create_scenario(&mut self, project_id: String, data: CreateScenario) {
        self.scenarios.begin_mutation();
        let svc = self.services.scenarios.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .create(&project_id, &data)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Created(result)));
        });
    }

    pub fn update_scenario(&mut self, project_id: String, scenario_id: String, data: ScenarioUpdate) {
        self.scenarios.begin_mutation();
        let svc = self.services.scenarios.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .update(&project_id, &scenario_id, &data)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Updated(result)));
        });
    }

    pub fn delete_scenario(&mut self, project_id: String, scenario_id: String) {
        self.scenarios.begin_mutation();
        let svc = self.services.scenarios.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .delete(&project_id, &scenario_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Deleted {
                id: scenario_id,
                result,
            }));
        });
    }

    /// Import scenarios generated by a workflow execution, then refetch the
    /// scenario list (the import happens server-side).
    pub fn import_workflow_scenarios(&mut self, project_id: String, output: WorkflowOutput) {
        let svc = self.services.scenarios.clone();
        let tx = self.tx.clone();
        let token = self.scenarios.begin_fetch();
        self.runtime.spawn(async move {
            match svc.save_from_workflow(&project_id, &output).await {
                Ok(()) => {
                    let _ = tx.send(StoreMsg::Notice("Imported workflow scenarios".to_string()));
                    let result = svc.list(&project_id).await.map_err(|e| e.to_string());
                    let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Listed { token, result }));
                }
                Err(e) => {
                    let _ = tx.send(StoreMsg::Scenario(ResourceEvent::Listed {
                        token,
                        result: Err(e.to_string()),
                    }));
                }
            }
        });
    }

    /// The Test Cases tab reads through the pluggable repository so the
    /// offline fake can stand in for the backend.
    pub fn fetch_test_cases(&mut self, project_id: String, scenario_id: String) {
        let token = self.test_cases.begin_fetch();
        let repo = self.repo.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = repo
                .list_test_cases(&project_id, &scenario_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestCase(ResourceEvent::Listed { token, result }));
        });
    }

    pub fn create_test_case(
        &mut self,
        project_id: String,
        scenario_id: String,
        data: CreateTestCase,
    ) {
        self.test_cases.begin_mutation();
        let svc = self.services.test_cases.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .create(&project_id, &scenario_id, &data)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestCase(ResourceEvent::Created(result)));
        });
    }

    pub fn update_test_case(
        &mut self,
        project_id: String,
        scenario_id: String,
        test_case_id: String,
        data: TestCaseUpdate,
    ) {
        self.test_cases.begin_mutation();
        let svc = self.services.test_cases.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .update(&project_id, &scenario_id, &test_case_id, &data)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestCase(ResourceEvent::Updated(result)));
        });
    }

    pub fn delete_test_case(
        &mut self,
        project_id: String,
        scenario_id: String,
        test_case_id: String,
    ) {
        self.test_cases.begin_mutation();
        let svc = self.services.test_cases.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .delete(&project_id, &scenario_id, &test_case_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestCase(ResourceEvent::Deleted {
                id: test_case_id,
                result,
            }));
        });
    }

    // ------------------------------------------------------------------
    // Runs and test data
    // ------------------------------------------------------------------

    pub fn fetch_run_history(&mut self, project_id: String, limit: Option<usize>) {
        let token = self.test_runs.begin_fetch();
        let repo = self.repo.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = repo
                .run_history(&project_id, limit)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestRun(ResourceEvent::Listed { token, result }));
        });
    }

    pub fn record_run(&mut self, data: RecordTestRun) {
        self.test_runs.begin_mutation();
        let svc = self.services.test_runs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.record(&data).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestRun(ResourceEvent::Created(result)));
        });
    }

    pub fn delete_test_run(&mut self, run_id: String) {
        self.test_runs.begin_mutation();
        let svc = self.services.test_runs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.delete(&run_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestRun(ResourceEvent::Deleted { id: run_id, result }));
        });
    }

    /// Lazily fetch the runs of one test case; cached per case id after the
    /// first expansion. Returns whether a request was actually dispatched.
    pub fn fetch_case_runs(&mut self, project_id: String, test_case_id: String) -> bool {
        if self.case_runs.contains_key(&test_case_id)
            || self.pending_case_runs.contains(&test_case_id)
        {
            return false;
        }
        self.pending_case_runs.insert(test_case_id.clone());
        let svc = self.services.test_runs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .list_by_case(&project_id, &test_case_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::CaseRuns {
                test_case_id,
                result,
            });
        });
        true
    }

    pub fn fetch_test_data(&mut self, project_id: String) {
        self.test_data_loading = true;
        self.test_data_error = None;
        let repo = self.repo.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = repo
                .list_test_data(&project_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::TestData(result));
        });
    }

    // ------------------------------------------------------------------
    // Bugs
    // ------------------------------------------------------------------

    pub fn fetch_bugs(&mut self, project_id: String, filters: BugFilters) {
        let token = self.bugs.begin_fetch();
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .list(&project_id, &filters)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Bug(ResourceEvent::Listed { token, result }));
        });
    }

    pub fn create_bug(&mut self, data: CreateBug) {
        self.bugs.begin_mutation();
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.create(&data).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Bug(ResourceEvent::Created(result)));
        });
    }

    pub fn update_bug(&mut self, bug_id: String, data: qaboard_client::services::bugs::BugUpdate) {
        self.bugs.begin_mutation();
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.update(&bug_id, &data).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Bug(ResourceEvent::Updated(result)));
        });
    }

    pub fn delete_bug(&mut self, bug_id: String) {
        self.bugs.begin_mutation();
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.delete(&bug_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Bug(ResourceEvent::Deleted { id: bug_id, result }));
        });
    }

    /// Batch import; the service rejects invalid batches before any network
    /// traffic, and the rejection lands in the slice error like any other.
    pub fn create_bugs_batch(&mut self, data: CreateBugsBatch) {
        self.bugs.begin_mutation();
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            match svc.create_batch(&data).await {
                Ok(created) => {
                    let _ = tx.send(StoreMsg::Notice(format!(
                        "Imported {} bugs",
                        created.total_created
                    )));
                    for bug in created.bugs {
                        let _ = tx.send(StoreMsg::Bug(ResourceEvent::Created(Ok(bug))));
                    }
                }
                Err(e) => {
                    let _ = tx.send(StoreMsg::Bug(ResourceEvent::Created(Err(e.to_string()))));
                }
            }
        });
    }

    /// Lazily fetch fixes on first expansion; cached per bug id thereafter.
    /// Returns whether a request was actually dispatched.
    pub fn fetch_bug_fixes(&mut self, bug_id: String) -> bool {
        if self.bug_fixes.contains_key(&bug_id) || self.pending_fixes.contains(&bug_id) {
            return false;
        }
        self.pending_fixes.insert(bug_id.clone());
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.list_fixes(&bug_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::BugFixes { bug_id, result });
        });
        true
    }

    pub fn create_bug_fix(&mut self, data: CreateBugFix) {
        let svc = self.services.bugs.clone();
        let tx = self.tx.clone();
        let bug_id = data.bug_id.clone();
        // Invalidate the cached fixes so the next expansion refetches
        self.bug_fixes.remove(&bug_id);
        self.runtime.spawn(async move {
            match svc.create_fix(&data).await {
                Ok(fix) => {
                    let result = svc.list_fixes(&fix.bug_id).await.map_err(|e| e.to_string());
                    let _ = tx.send(StoreMsg::BugFixes {
                        bug_id: fix.bug_id.clone(),
                        result,
                    });
                }
                Err(e) => {
                    let _ = tx.send(StoreMsg::BugFixes {
                        bug_id,
                        result: Err(e.to_string()),
                    });
                }
            }
        });
    }

    // ------------------------------------------------------------------
    // Workflows
    // ------------------------------------------------------------------

    pub fn fetch_workflow_config(&mut self, project_id: String) {
        self.config_loading = true;
        self.config_error = None;
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.get_config(&project_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::WorkflowConfig(result));
        });
    }

    pub fn save_workflow_config(&mut self, config: WorkflowConfig) {
        self.config_loading = true;
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.save_config(&config).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::WorkflowConfig(result));
        });
    }

    pub fn execute_workflow(&mut self, project_id: String, variables: Vec<WorkflowVariable>) {
        self.executions.begin_mutation();
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .execute(&project_id, &variables)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Execution(ResourceEvent::Created(result)));
        });
    }

    pub fn fetch_executions(&mut self, project_id: String) {
        let token = self.executions.begin_fetch();
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .execution_history(&project_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Execution(ResourceEvent::Listed { token, result }));
        });
    }

    /// Explicit refresh of one execution; there is no polling loop
    pub fn refresh_execution(&mut self, execution_id: String) {
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .execution_status(&execution_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Execution(ResourceEvent::Updated(result)));
        });
    }

    pub fn cancel_execution(&mut self, execution_id: String) {
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match svc.cancel_execution(&execution_id).await {
                Ok(()) => format!("Cancelled execution {}", execution_id),
                Err(e) => e.to_string(),
            };
            let _ = tx.send(StoreMsg::Notice(message));
        });
    }

    pub fn sync_workflows(&mut self, project_id: String) {
        let svc = self.services.workflows.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let message = match svc.sync(&project_id).await {
                Ok(()) => "Workflow definitions synced".to_string(),
                Err(e) => e.to_string(),
            };
            let _ = tx.send(StoreMsg::Notice(message));
        });
    }

    // ------------------------------------------------------------------
    // Codex scans
    // ------------------------------------------------------------------

    pub fn fetch_repos(&mut self) {
        self.repos_loading = true;
        let svc = self.services.codex.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.repos().await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::Repos(result));
        });
    }

    pub fn run_codex_scan(&mut self, request: CodexRunRequest) {
        self.codex_tasks.begin_mutation();
        let svc = self.services.codex.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.run(&request).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::CodexTask(ResourceEvent::Created(result)));
        });
    }

    pub fn fetch_codex_task(&mut self, task_id: String) {
        let token = self.codex_tasks.begin_fetch();
        let svc = self.services.codex.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc.task(&task_id).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::CodexTask(ResourceEvent::FetchedOne { token, result }));
        });
    }

    pub fn fetch_submitted_tasks(&mut self, repo_label: String) {
        let token = self.codex_tasks.begin_fetch();
        let svc = self.services.codex.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let result = svc
                .submitted_tasks(&repo_label)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMsg::CodexTask(ResourceEvent::Listed { token, result }));
        });
    }
}
