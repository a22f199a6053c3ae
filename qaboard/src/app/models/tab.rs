//! Per-project tab state

use std::collections::HashSet;

use qaboard_client::services::bugs::BugFilters;

/// Sections of the project detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Scenarios,
    TestCases,
    TestData,
    Bugs,
    Runs,
    Workflow,
    Scans,
    Documents,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Scenarios,
        Section::TestCases,
        Section::TestData,
        Section::Bugs,
        Section::Runs,
        Section::Workflow,
        Section::Scans,
        Section::Documents,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Scenarios => "Scenarios",
            Section::TestCases => "Test Cases",
            Section::TestData => "Test Data",
            Section::Bugs => "Bugs",
            Section::Runs => "Run History",
            Section::Workflow => "Workflow",
            Section::Scans => "Scans",
            Section::Documents => "Documents",
        }
    }

    pub fn from_title(title: &str) -> Option<Section> {
        Section::ALL.iter().copied().find(|s| s.title() == title)
    }

    pub fn next(&self) -> Section {
        let idx = Section::ALL.iter().position(|s| s == self).unwrap_or(0);
        Section::ALL[(idx + 1) % Section::ALL.len()]
    }

    pub fn previous(&self) -> Section {
        let idx = Section::ALL.iter().position(|s| s == self).unwrap_or(0);
        Section::ALL[(idx + Section::ALL.len() - 1) % Section::ALL.len()]
    }
}

/// Per-tab state container for the tabbed project view.
///
/// All expansion state is client-local and ephemeral; toggling never talks
/// to the network (child data is fetched lazily by the store on first
/// expansion and cached there).
#[derive(Debug)]
pub struct ProjectTab {
    // Identity
    pub project_id: String,
    pub project_name: String,

    pub section: Section,

    // Selection per section (row index into the visible list)
    pub selected: usize,

    // Scenario tree state
    pub expanded_scenarios: HashSet<String>,
    pub expanded_cases: HashSet<String>,
    pub selected_case: Option<String>,

    // Bug list state
    pub expanded_bugs: HashSet<String>,
    pub bug_filters: BugFilters,

    // Scan state
    pub selected_repo: Option<String>,

    // Client-side filter over the current section's list
    pub filter: String,

    pub scroll_offset: usize,
}

impl ProjectTab {
    pub fn new(project_id: String, project_name: String) -> Self {
        Self {
            project_id,
            project_name,
            section: Section::Scenarios,
            selected: 0,
            expanded_scenarios: HashSet::new(),
            expanded_cases: HashSet::new(),
            selected_case: None,
            expanded_bugs: HashSet::new(),
            bug_filters: BugFilters::default(),
            selected_repo: None,
            filter: String::new(),
            scroll_offset: 0,
        }
    }
}
