//! Resource stores
//!
//! One [`ResourceState`] per entity type, all owned by a single [`Store`]
//! constructed at startup and passed explicitly through the app - there is
//! no ambient global. Every asynchronous operation is three-phase: dispatch
//! marks the slice loading and spawns the service future; completion comes
//! back as a [`StoreMsg`] on an unbounded channel; [`Store::drain`] applies
//! it through the synchronous reducer.
//!
//! Fetches carry a monotonically increasing request token issued at
//! dispatch. The reducer only accepts the response matching the latest
//! issued token, so two overlapping fetches of the same slice can never
//! apply out of order. Mutations are not sequenced - last write wins, as
//! the backend is authoritative.

mod dispatch;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use qaboard_client::Services;
use qaboard_sdk::{
    Bug, BugFix, CodexTask, Keyed, Project, ProjectDocument, RepoOption, Scenario,
    TestArtifactRepository, TestCase, TestDataRecord, TestRun, WorkflowConfig, WorkflowExecution,
};

/// Completion message for one slice operation
#[derive(Debug, Clone)]
pub enum ResourceEvent<T> {
    Listed {
        token: u64,
        result: Result<Vec<T>, String>,
    },
    FetchedOne {
        token: u64,
        result: Result<T, String>,
    },
    Created(Result<T, String>),
    Updated(Result<T, String>),
    Deleted {
        id: String,
        result: Result<(), String>,
    },
}

/// All messages the background tasks can deliver
#[derive(Debug, Clone)]
pub enum StoreMsg {
    Project(ResourceEvent<Project>),
    Document(ResourceEvent<ProjectDocument>),
    Scenario(ResourceEvent<Scenario>),
    TestCase(ResourceEvent<TestCase>),
    TestRun(ResourceEvent<TestRun>),
    Bug(ResourceEvent<Bug>),
    Execution(ResourceEvent<WorkflowExecution>),
    CodexTask(ResourceEvent<CodexTask>),

    // Parent-keyed lazy caches
    BugFixes {
        bug_id: String,
        result: Result<Vec<BugFix>, String>,
    },
    CaseRuns {
        test_case_id: String,
        result: Result<Vec<TestRun>, String>,
    },

    /// Server-confirmed document list after a mutation (upload,
    /// set-current). Unsequenced: the mutation just succeeded, so this is
    /// the freshest state we can hold.
    DocumentsRefreshed(Result<Vec<ProjectDocument>, String>),

    TestData(Result<Vec<TestDataRecord>, String>),
    WorkflowConfig(Result<WorkflowConfig, String>),
    Repos(Result<Vec<RepoOption>, String>),

    /// One-line outcome of a fire-and-forget operation (sync, bulk save,
    /// download, cancel)
    Notice(String),
}

/// State for one resource type: the cached list, the focused entity, and
/// the loading/error flags the views render from.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub current: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    latest_token: u64,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            loading: false,
            error: None,
            latest_token: 0,
        }
    }
}

impl<T: Keyed + Clone> ResourceState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch: flag loading, clear the stale error, and issue the
    /// token the response must echo to be accepted.
    pub fn begin_fetch(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.latest_token += 1;
        self.latest_token
    }

    /// Start a mutation: loading + error reset, no sequencing
    pub fn begin_mutation(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Synchronous reducer for one completion event
    pub fn apply(&mut self, event: ResourceEvent<T>) {
        match event {
            ResourceEvent::Listed { token, result } => {
                if token != self.latest_token {
                    // A newer fetch is in flight (or already landed);
                    // this response lost the race and must not clobber it.
                    return;
                }
                self.loading = false;
                match result {
                    Ok(items) => self.items = items,
                    Err(message) => self.error = Some(message),
                }
            }
            ResourceEvent::FetchedOne { token, result } => {
                if token != self.latest_token {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(item) => self.current = Some(item),
                    Err(message) => self.error = Some(message),
                }
            }
            ResourceEvent::Created(result) => {
                self.loading = false;
                match result {
                    Ok(item) => {
                        // The entity must appear exactly once, under the
                        // server-assigned id.
                        if let Some(existing) =
                            self.items.iter_mut().find(|i| i.key() == item.key())
                        {
                            *existing = item;
                        } else {
                            self.items.push(item);
                        }
                    }
                    Err(message) => self.error = Some(message),
                }
            }
            ResourceEvent::Updated(result) => {
                self.loading = false;
                match result {
                    Ok(item) => {
                        if self
                            .current
                            .as_ref()
                            .map(|c| c.key() == item.key())
                            .unwrap_or(false)
                        {
                            self.current = Some(item.clone());
                        }
                        if let Some(existing) =
                            self.items.iter_mut().find(|i| i.key() == item.key())
                        {
                            *existing = item;
                        }
                    }
                    Err(message) => self.error = Some(message),
                }
            }
            ResourceEvent::Deleted { id, result } => {
                self.loading = false;
                match result {
                    Ok(()) => {
                        self.items.retain(|i| i.key() != id);
                        if self.current.as_ref().map(|c| c.key() == id).unwrap_or(false) {
                            self.current = None;
                        }
                    }
                    Err(message) => {
                        // A failed delete (404 on an already-gone entity)
                        // surfaces as an error string but never corrupts
                        // the cached list.
                        self.error = Some(message);
                    }
                }
            }
        }
    }
}

/// The application store: every slice plus the completion channel
pub struct Store {
    pub projects: ResourceState<Project>,
    pub documents: ResourceState<ProjectDocument>,
    pub scenarios: ResourceState<Scenario>,
    pub test_cases: ResourceState<TestCase>,
    pub test_runs: ResourceState<TestRun>,
    pub bugs: ResourceState<Bug>,
    pub executions: ResourceState<WorkflowExecution>,
    pub codex_tasks: ResourceState<CodexTask>,

    /// Bug fixes fetched lazily on first expansion, cached per bug id and
    /// never invalidated automatically
    pub bug_fixes: HashMap<String, Vec<BugFix>>,
    pub pending_fixes: HashSet<String>,

    /// Runs fetched lazily per test case
    pub case_runs: HashMap<String, Vec<TestRun>>,
    pub pending_case_runs: HashSet<String>,

    pub test_data: Vec<TestDataRecord>,
    pub test_data_loading: bool,
    pub test_data_error: Option<String>,

    pub workflow_config: Option<WorkflowConfig>,
    pub config_loading: bool,
    pub config_error: Option<String>,

    pub repos: Vec<RepoOption>,
    pub repos_loading: bool,

    /// Latest one-line notice for the footer
    pub notice: Option<String>,

    services: Services,
    repo: Arc<dyn TestArtifactRepository>,
    runtime: tokio::runtime::Handle,
    tx: UnboundedSender<StoreMsg>,
    rx: UnboundedReceiver<StoreMsg>,
}

impl Store {
    pub fn new(
        services: Services,
        repo: Arc<dyn TestArtifactRepository>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            projects: ResourceState::new(),
            documents: ResourceState::new(),
            scenarios: ResourceState::new(),
            test_cases: ResourceState::new(),
            test_runs: ResourceState::new(),
            bugs: ResourceState::new(),
            executions: ResourceState::new(),
            codex_tasks: ResourceState::new(),
            bug_fixes: HashMap::new(),
            pending_fixes: HashSet::new(),
            case_runs: HashMap::new(),
            pending_case_runs: HashSet::new(),
            test_data: Vec::new(),
            test_data_loading: false,
            test_data_error: None,
            workflow_config: None,
            config_loading: false,
            config_error: None,
            repos: Vec::new(),
            repos_loading: false,
            notice: None,
            services,
            repo,
            runtime,
            tx,
            rx,
        }
    }

    /// Apply every completion that has arrived since the last tick.
    /// `observer` sees each message before it is reduced (the app uses it
    /// to mirror runs and scan tasks into the local cache).
    pub fn drain(&mut self, mut observer: impl FnMut(&StoreMsg)) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.rx.try_recv() {
            observer(&msg);
            self.apply(msg);
            applied += 1;
        }
        applied
    }

    /// Reduce one message into the matching slice
    pub fn apply(&mut self, msg: StoreMsg) {
        match msg {
            StoreMsg::Project(event) => self.projects.apply(event),
            StoreMsg::Document(event) => self.documents.apply(event),
            StoreMsg::Scenario(event) => self.scenarios.apply(event),
            StoreMsg::TestCase(event) => self.test_cases.apply(event),
            StoreMsg::TestRun(event) => self.test_runs.apply(event),
            StoreMsg::Bug(event) => self.bugs.apply(event),
            StoreMsg::Execution(event) => self.executions.apply(event),
            StoreMsg::CodexTask(event) => self.codex_tasks.apply(event),
            StoreMsg::BugFixes { bug_id, result } => {
                self.pending_fixes.remove(&bug_id);
                match result {
                    Ok(fixes) => {
                        self.bug_fixes.insert(bug_id, fixes);
                    }
                    Err(message) => self.bugs.error = Some(message),
                }
            }
            StoreMsg::CaseRuns {
                test_case_id,
                result,
            } => {
                self.pending_case_runs.remove(&test_case_id);
                match result {
                    Ok(runs) => {
                        self.case_runs.insert(test_case_id, runs);
                    }
                    Err(message) => self.test_runs.error = Some(message),
                }
            }
            StoreMsg::DocumentsRefreshed(result) => {
                self.documents.loading = false;
                match result {
                    Ok(items) => self.documents.items = items,
                    Err(message) => self.documents.error = Some(message),
                }
            }
            StoreMsg::TestData(result) => {
                self.test_data_loading = false;
                match result {
                    Ok(data) => self.test_data = data,
                    Err(message) => self.test_data_error = Some(message),
                }
            }
            StoreMsg::WorkflowConfig(result) => {
                self.config_loading = false;
                match result {
                    Ok(config) => self.workflow_config = Some(config),
                    Err(message) => self.config_error = Some(message),
                }
            }
            StoreMsg::Repos(result) => {
                self.repos_loading = false;
                match result {
                    Ok(repos) => self.repos = repos,
                    Err(message) => self.notice = Some(message),
                }
            }
            StoreMsg::Notice(message) => self.notice = Some(message),
        }
    }

    /// Sender half, for tests and for tasks that report out of band
    pub fn sender(&self) -> UnboundedSender<StoreMsg> {
        self.tx.clone()
    }
}
