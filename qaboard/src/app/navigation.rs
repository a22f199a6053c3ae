//! Selection movement
//!
//! The scenario section is a two-level tree (scenario → test cases); moving
//! down from an expanded scenario dives into its cases, moving past the
//! last case surfaces at the next scenario. Every other section is a flat
//! list.

use super::{App, Section, View};

impl App {
    pub fn navigate_down(&mut self) {
        match self.current_view {
            View::ProjectList => {
                let len = self.filtered_projects().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            View::ProjectDetail => self.detail_down(),
        }
    }

    pub fn navigate_up(&mut self) {
        match self.current_view {
            View::ProjectList => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            View::ProjectDetail => self.detail_up(),
        }
    }

    fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Scenarios => self.filtered_scenarios().len(),
            Section::TestCases => self.store.test_cases.items.len(),
            Section::TestData => self.store.test_data.len(),
            Section::Bugs => self.filtered_bugs().len(),
            Section::Runs => self.store.test_runs.items.len(),
            Section::Workflow => self.store.executions.items.len(),
            Section::Scans => self.store.codex_tasks.items.len(),
            Section::Documents => self.store.documents.items.len(),
        }
    }

    fn detail_down(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        let section = tab.section;

        if section != Section::Scenarios {
            let len = self.section_len(section);
            if let Some(tab) = self.current_tab_mut() {
                if tab.selected + 1 < len {
                    tab.selected += 1;
                }
            }
            return;
        }

        // Scenario tree walk
        let scenarios: Vec<(String, Vec<String>)> = self
            .filtered_scenarios()
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    s.test_cases.iter().map(|c| c.id.clone()).collect(),
                )
            })
            .collect();
        let Some(tab) = self.current_tab_mut() else {
            return;
        };
        let Some((scenario_id, case_ids)) = scenarios.get(tab.selected) else {
            return;
        };

        if let Some(case_id) = tab.selected_case.clone() {
            // Move to the next case, or surface at the next scenario
            if let Some(idx) = case_ids.iter().position(|c| c == &case_id) {
                if idx + 1 < case_ids.len() {
                    tab.selected_case = Some(case_ids[idx + 1].clone());
                    return;
                }
            }
            tab.selected_case = None;
            if tab.selected + 1 < scenarios.len() {
                tab.selected += 1;
            }
            return;
        }

        // Dive into an expanded scenario's first case
        if tab.expanded_scenarios.contains(scenario_id) && !case_ids.is_empty() {
            tab.selected_case = Some(case_ids[0].clone());
            return;
        }

        if tab.selected + 1 < scenarios.len() {
            tab.selected += 1;
        }
    }

    fn detail_up(&mut self) {
        let Some(tab) = self.current_tab() else {
            return;
        };
        let section = tab.section;

        if section != Section::Scenarios {
            if let Some(tab) = self.current_tab_mut() {
                if tab.selected > 0 {
                    tab.selected -= 1;
                }
            }
            return;
        }

        let scenarios: Vec<(String, Vec<String>)> = self
            .filtered_scenarios()
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    s.test_cases.iter().map(|c| c.id.clone()).collect(),
                )
            })
            .collect();
        let Some(tab) = self.current_tab_mut() else {
            return;
        };

        if let Some(case_id) = tab.selected_case.clone() {
            if let Some((_, case_ids)) = scenarios.get(tab.selected) {
                if let Some(idx) = case_ids.iter().position(|c| c == &case_id) {
                    if idx > 0 {
                        tab.selected_case = Some(case_ids[idx - 1].clone());
                    } else {
                        // Back up to the scenario header
                        tab.selected_case = None;
                    }
                    return;
                }
            }
            tab.selected_case = None;
            return;
        }

        if tab.selected > 0 {
            tab.selected -= 1;
            // Landing on an expanded scenario selects its last case
            if let Some((scenario_id, case_ids)) = scenarios.get(tab.selected) {
                if tab.expanded_scenarios.contains(scenario_id) && !case_ids.is_empty() {
                    tab.selected_case = Some(case_ids[case_ids.len() - 1].clone());
                }
            }
        }
    }
}
