//! Project tab management and per-section operations

use qaboard_client::services::codex::prompt_handoff_url;
use qaboard_sdk::Keyed;

use crate::store::StoreMsg;
use crate::utils::{save_session, SavedTab};

use super::{App, FormKind, ProjectTab, Section, View};

impl App {
    // ------------------------------------------------------------------
    // Tab lifecycle
    // ------------------------------------------------------------------

    /// Open (or focus) a tab for the selected project and load its data
    pub fn open_selected_project(&mut self) {
        let Some(project) = self.filtered_projects().get(self.selected).copied() else {
            return;
        };
        let project_id = project.key().to_string();
        let project_name = project.name.clone();
        self.open_project(project_id, project_name);
    }

    pub fn open_project(&mut self, project_id: String, project_name: String) {
        if let Some(idx) = self
            .open_tabs
            .iter()
            .position(|t| t.project_id == project_id)
        {
            self.active_tab_idx = idx;
        } else {
            self.open_tabs
                .push(ProjectTab::new(project_id, project_name));
            self.active_tab_idx = self.open_tabs.len() - 1;
        }
        self.current_view = View::ProjectDetail;
        self.refresh_section();
    }

    pub fn next_tab(&mut self) {
        if !self.open_tabs.is_empty() {
            self.active_tab_idx = (self.active_tab_idx + 1) % self.open_tabs.len();
            self.refresh_section();
        }
    }

    pub fn previous_tab(&mut self) {
        if !self.open_tabs.is_empty() {
            self.active_tab_idx = if self.active_tab_idx == 0 {
                self.open_tabs.len() - 1
            } else {
                self.active_tab_idx - 1
            };
            self.refresh_section();
        }
    }

    pub fn close_current_tab(&mut self) {
        if self.open_tabs.is_empty() {
            return;
        }
        self.show_close_confirmation = true;
    }

    pub fn close_tab_confirmed(&mut self) {
        if self.open_tabs.is_empty() {
            return;
        }

        self.open_tabs.remove(self.active_tab_idx);

        if self.open_tabs.is_empty() {
            self.active_tab_idx = 0;
            self.current_view = View::ProjectList;
        } else if self.active_tab_idx >= self.open_tabs.len() {
            self.active_tab_idx = self.open_tabs.len() - 1;
        }

        self.show_close_confirmation = false;
    }

    pub fn back_to_list(&mut self) {
        self.current_view = View::ProjectList;
    }

    // ------------------------------------------------------------------
    // Sections
    // ------------------------------------------------------------------

    pub fn next_section(&mut self) {
        if let Some(tab) = self.current_tab_mut() {
            tab.section = tab.section.next();
            tab.selected = 0;
            tab.selected_case = None;
            tab.filter.clear();
        }
        self.refresh_section();
    }

    pub fn previous_section(&mut self) {
        if let Some(tab) = self.current_tab_mut() {
            tab.section = tab.section.previous();
            tab.selected = 0;
            tab.selected_case = None;
            tab.filter.clear();
        }
        self.refresh_section();
    }

    /// Re-fetch whatever the active section shows. Also the handler of the
    /// explicit refresh key - status only ever updates on demand.
    pub fn refresh_section(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        let project_id = tab.project_id.clone();
        let section = tab.section;
        let selected_repo = tab.selected_repo.clone();
        let bug_filters = tab.bug_filters.clone();

        match section {
            Section::Scenarios => self.store.fetch_scenarios(project_id),
            Section::TestCases => {
                // The flat cases tab reads through the artifact repository
                // for the scenario currently selected in the tree
                if let Some(scenario_id) = self.selected_scenario_id() {
                    self.store.fetch_test_cases(project_id, scenario_id);
                } else {
                    self.store.fetch_scenarios(project_id);
                }
            }
            Section::TestData => self.store.fetch_test_data(project_id),
            Section::Bugs => self.store.fetch_bugs(project_id, bug_filters),
            Section::Runs => self.store.fetch_run_history(project_id, Some(100)),
            Section::Workflow => {
                self.store.fetch_workflow_config(project_id.clone());
                self.store.fetch_executions(project_id);
            }
            Section::Scans => {
                if self.config.offline {
                    // Serve previously submitted tasks from the local cache
                    if let (Some(cache), Some(repo_label)) = (&self.cache, &selected_repo) {
                        if let Ok(tasks) = cache.list_scan_tasks(repo_label) {
                            self.store.codex_tasks.items = tasks;
                        }
                    }
                    return;
                }
                if self.store.repos.is_empty() {
                    self.store.fetch_repos();
                }
                if let Some(repo_label) = selected_repo {
                    self.store.fetch_submitted_tasks(repo_label);
                }
            }
            Section::Documents => self.store.fetch_documents(project_id),
        }
    }

    fn selected_scenario_id(&self) -> Option<String> {
        let tab = self.current_tab()?;
        self.filtered_scenarios()
            .get(tab.selected)
            .map(|s| s.id.clone())
    }

    // ------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------

    /// Toggle the selected row's expansion. A pure set-membership flip;
    /// the only side effect is the store's lazy first-expansion fetch of
    /// child data (bug fixes, case runs).
    pub fn toggle_selected(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        let project_id = tab.project_id.clone();
        let section = tab.section;
        let selected = tab.selected;
        let selected_case = tab.selected_case.clone();

        match section {
            Section::Scenarios => {
                if let Some(case_id) = selected_case {
                    let newly_expanded = {
                        let tab = self.current_tab_mut().unwrap();
                        toggle(&mut tab.expanded_cases, &case_id)
                    };
                    if newly_expanded {
                        self.store.fetch_case_runs(project_id, case_id);
                    }
                } else if let Some(scenario_id) =
                    self.filtered_scenarios().get(selected).map(|s| s.id.clone())
                {
                    let tab = self.current_tab_mut().unwrap();
                    toggle(&mut tab.expanded_scenarios, &scenario_id);
                }
            }
            Section::Bugs => {
                if let Some(bug_id) = self.filtered_bugs().get(selected).map(|b| b.id.clone()) {
                    let newly_expanded = {
                        let tab = self.current_tab_mut().unwrap();
                        toggle(&mut tab.expanded_bugs, &bug_id)
                    };
                    if newly_expanded {
                        self.store.fetch_bug_fixes(bug_id);
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Per-section actions
    // ------------------------------------------------------------------

    /// Open the create form fitting the active section
    pub fn new_item(&mut self) {
        let Some(tab) = self.current_tab() else {
            if self.current_view == View::ProjectList {
                self.open_form(FormKind::NewProject);
            }
            return;
        };
        let project_id = tab.project_id.clone();

        match tab.section {
            Section::Scenarios => {
                if let Some(case_scenario) = self.selected_scenario_id() {
                    if tab.selected_case.is_some() {
                        // A case is focused: record a run for it
                        let test_case_id = tab.selected_case.clone().unwrap();
                        self.open_form(FormKind::RecordRun {
                            project_id,
                            scenario_id: case_scenario,
                            test_case_id,
                        });
                        return;
                    }
                }
                self.open_form(FormKind::NewScenario { project_id });
            }
            Section::TestCases => {
                if let Some(scenario_id) = self.selected_scenario_id() {
                    self.open_form(FormKind::NewTestCase {
                        project_id,
                        scenario_id,
                    });
                }
            }
            Section::Bugs => {
                self.open_form(FormKind::NewBug {
                    project_id,
                    scenario_id: None,
                });
            }
            Section::Workflow => {
                self.open_form(FormKind::WorkflowVariable { project_id });
            }
            Section::Scans => {
                self.open_form(FormKind::ScanSetup);
            }
            _ => {}
        }
    }

    /// Open the fix form for the selected bug
    pub fn new_bug_fix(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Bugs {
            return;
        }
        if let Some(bug_id) = self.filtered_bugs().get(tab.selected).map(|b| b.id.clone()) {
            self.open_form(FormKind::NewBugFix { bug_id });
        }
    }

    /// Delete the selected entity in the active section
    pub fn delete_selected(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        let project_id = tab.project_id.clone();
        let selected = tab.selected;

        match tab.section {
            Section::Scenarios => {
                if let Some(scenario_id) =
                    self.filtered_scenarios().get(selected).map(|s| s.id.clone())
                {
                    self.store.delete_scenario(project_id, scenario_id);
                }
            }
            Section::Bugs => {
                if let Some(bug_id) = self.filtered_bugs().get(selected).map(|b| b.id.clone()) {
                    self.store.delete_bug(bug_id);
                }
            }
            Section::Documents => {
                if let Some(document_id) = self
                    .store
                    .documents
                    .items
                    .get(selected)
                    .map(|d| d.document_id.clone())
                {
                    self.store.delete_document(document_id);
                }
            }
            Section::Runs => {
                if let Some(run) = self.store.test_runs.items.get(selected) {
                    let run_id = run.run_id.clone();
                    self.store.delete_test_run(run_id);
                }
            }
            _ => {}
        }
    }

    /// Mark the selected document as the project's current reference
    pub fn set_selected_document_current(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Documents {
            return;
        }
        let project_id = tab.project_id.clone();
        if let Some(document_id) = self
            .store
            .documents
            .items
            .get(tab.selected)
            .map(|d| d.document_id.clone())
        {
            self.store.set_current_document(document_id, project_id);
        }
    }

    /// Download the selected document into the data directory
    pub fn download_selected_document(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Documents {
            return;
        }
        if let Some(doc) = self.store.documents.items.get(tab.selected) {
            let document_id = doc.document_id.clone();
            let filename = doc.filename.clone();
            let dest = self.config.data_dir().join("downloads");
            let _ = std::fs::create_dir_all(&dest);
            self.store.download_document(document_id, filename, dest);
        }
    }

    /// Build the external hand-off URL for the selected scan task's prompt
    /// and surface it in the footer for copying.
    pub fn handoff_selected_scan(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Scans {
            return;
        }
        if let Some(task) = self.store.codex_tasks.items.get(tab.selected) {
            match prompt_handoff_url(&task.prompt) {
                Ok(url) => {
                    self.store
                        .sender()
                        .send(StoreMsg::Notice(format!("Open externally: {}", url)))
                        .ok();
                }
                Err(e) => {
                    self.store
                        .sender()
                        .send(StoreMsg::Notice(e.to_string()))
                        .ok();
                }
            }
        }
    }

    /// Export the project's scenario tree to a YAML file under the data dir
    pub fn export_scenarios(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Scenarios {
            return;
        }
        let path = self
            .config
            .data_dir()
            .join(format!("{}_scenarios.yaml", tab.project_id));
        let scenarios = &self.store.scenarios.items;

        let message = match serde_yaml::to_string(scenarios) {
            Ok(yaml) => match std::fs::write(&path, yaml) {
                Ok(()) => format!(
                    "Exported {} scenarios to {}",
                    scenarios.len(),
                    path.display()
                ),
                Err(e) => format!("Failed to write {}: {}", path.display(), e),
            },
            Err(e) => format!("Failed to serialize scenarios: {}", e),
        };
        self.store.sender().send(StoreMsg::Notice(message)).ok();
    }

    /// Import the scenarios a completed execution produced into the project
    /// (structured output → scenario list, saved server-side).
    pub fn import_selected_execution(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        if tab.section != Section::Workflow {
            return;
        }
        let project_id = tab.project_id.clone();

        let Some(execution) = self.store.executions.items.get(tab.selected) else {
            return;
        };
        let Some(result) = execution.result.clone() else {
            self.store
                .sender()
                .send(StoreMsg::Notice("Execution output not yet available".to_string()))
                .ok();
            return;
        };

        match serde_json::from_value(result) {
            Ok(output) => self.store.import_workflow_scenarios(project_id, output),
            Err(e) => {
                self.store
                    .sender()
                    .send(StoreMsg::Notice(format!(
                        "Execution output is not a scenario set: {}",
                        e
                    )))
                    .ok();
            }
        }
    }

    /// Re-fetch the status of the selected execution or scan task
    pub fn sync_selected(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        match tab.section {
            Section::Workflow => {
                if let Some(execution) = self.store.executions.items.get(tab.selected) {
                    let id = execution.execution_id.clone();
                    self.store.refresh_execution(id);
                }
            }
            Section::Scans => {
                if let Some(task) = self.store.codex_tasks.items.get(tab.selected) {
                    let id = task.task_id.clone();
                    self.store.fetch_codex_task(id);
                }
            }
            _ => self.refresh_section(),
        }
    }

    // ------------------------------------------------------------------
    // Session persistence
    // ------------------------------------------------------------------

    pub fn save_session(&self) {
        let tabs: Vec<SavedTab> = self
            .open_tabs
            .iter()
            .map(|t| SavedTab {
                project_id: t.project_id.clone(),
                project_name: t.project_name.clone(),
                section: t.section.title().to_string(),
                expanded_scenarios: t.expanded_scenarios.iter().cloned().collect(),
                expanded_bugs: t.expanded_bugs.iter().cloned().collect(),
            })
            .collect();

        let _ = save_session(&self.config, &tabs);
    }

    pub fn restore_session(&mut self) {
        for saved in crate::utils::load_session(&self.config) {
            let mut tab = ProjectTab::new(saved.project_id, saved.project_name);
            if let Some(section) = Section::from_title(&saved.section) {
                tab.section = section;
            }
            tab.expanded_scenarios = saved.expanded_scenarios.into_iter().collect();
            tab.expanded_bugs = saved.expanded_bugs.into_iter().collect();
            self.open_tabs.push(tab);
        }
    }
}

/// Flip membership; returns true when the id was inserted (expanded)
fn toggle(set: &mut std::collections::HashSet<String>, id: &str) -> bool {
    if set.contains(id) {
        set.remove(id);
        false
    } else {
        set.insert(id.to_string());
        true
    }
}
