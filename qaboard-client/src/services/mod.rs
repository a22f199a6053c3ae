//! Per-resource API services
//!
//! One module per backend resource; each service holds a clone of the shared
//! [`ApiClient`](crate::ApiClient) and translates that resource's CRUD
//! operations into HTTP calls, normalizing the response envelope and error
//! shape. Services never swallow failures - every error is classified and
//! returned to the caller.

pub mod bugs;
pub mod codex;
pub mod documents;
pub mod projects;
pub mod scenarios;
pub mod test_cases;
pub mod test_runs;
pub mod workflows;

pub use bugs::BugService;
pub use codex::CodexService;
pub use documents::DocumentService;
pub use projects::ProjectService;
pub use scenarios::ScenarioService;
pub use test_cases::TestCaseService;
pub use test_runs::TestRunService;
pub use workflows::WorkflowService;

use crate::ApiClient;

/// Bundle of all resource services sharing one underlying client
#[derive(Debug, Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub documents: DocumentService,
    pub scenarios: ScenarioService,
    pub test_cases: TestCaseService,
    pub test_runs: TestRunService,
    pub bugs: BugService,
    pub workflows: WorkflowService,
    pub codex: CodexService,
}

impl Services {
    pub fn new(client: ApiClient) -> Self {
        Self {
            projects: ProjectService::new(client.clone()),
            documents: DocumentService::new(client.clone()),
            scenarios: ScenarioService::new(client.clone()),
            test_cases: TestCaseService::new(client.clone()),
            test_runs: TestRunService::new(client.clone()),
            bugs: BugService::new(client.clone()),
            workflows: WorkflowService::new(client.clone()),
            codex: CodexService::new(client),
        }
    }
}
