//! Application state and module organization

use std::sync::Arc;

use anyhow::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::warn;

use qaboard_client::{ApiClient, Services};
use qaboard_sdk::{Bug, Project, Scenario, TestArtifactRepository};

use crate::cache::Cache;
use crate::repo::{HttpArtifactRepository, MemoryArtifactRepository};
use crate::store::{ResourceEvent, Store, StoreMsg};
use crate::utils::{load_history, Config};

mod models;
pub use models::*;

pub mod forms;
mod navigation;
mod tabs;

pub use forms::{FormKind, FormState};

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let tokio_runtime = tokio::runtime::Runtime::new()?;

        let client = ApiClient::new(&config.api_base)
            .map_err(|e| anyhow::anyhow!("invalid --api-base: {}", e))?;
        let services = Services::new(client.clone());

        let repo: Arc<dyn TestArtifactRepository> = if config.offline {
            Arc::new(MemoryArtifactRepository::seeded())
        } else {
            Arc::new(HttpArtifactRepository::new(client))
        };

        let store = Store::new(services, repo, tokio_runtime.handle().clone());

        let cache = match Cache::new(config.cache_db_path()) {
            Ok(cache) => match cache.initialize_schema() {
                Ok(()) => Some(cache),
                Err(e) => {
                    warn!(error = %e, "cache schema init failed, continuing without cache");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, "cache unavailable, continuing without it");
                None
            }
        };

        let history = load_history(&config);

        let mut app = Self {
            config,
            store,
            cache,
            history,
            open_tabs: Vec::new(),
            active_tab_idx: 0,
            show_close_confirmation: false,
            selected: 0,
            filter_query: String::new(),
            filter_active: false,
            current_view: View::ProjectList,
            should_quit: false,
            form: None,
            dropdown: None,
            tokio_runtime,
        };

        app.restore_session();

        Ok(app)
    }

    /// One event-loop tick: apply every completion that has arrived,
    /// mirroring runs and scan submissions into the local cache on the way.
    pub fn tick(&mut self) -> usize {
        let cache = self.cache.as_mut();
        self.store.drain(|msg| {
            let Some(cache) = cache.as_deref() else {
                return;
            };
            match msg {
                StoreMsg::TestRun(ResourceEvent::Listed {
                    result: Ok(runs), ..
                }) => {
                    for run in runs {
                        if let Err(e) = cache.record_run(run) {
                            warn!(error = %e, "failed to cache run");
                        }
                    }
                }
                StoreMsg::TestRun(ResourceEvent::Created(Ok(run))) => {
                    if let Err(e) = cache.record_run(run) {
                        warn!(error = %e, "failed to cache run");
                    }
                }
                StoreMsg::CodexTask(ResourceEvent::Created(Ok(task))) => {
                    if let Err(e) = cache.record_scan_task(task) {
                        warn!(error = %e, "failed to cache scan task");
                    }
                }
                _ => {}
            }
        })
    }

    pub fn current_tab(&self) -> Option<&ProjectTab> {
        self.open_tabs.get(self.active_tab_idx)
    }

    pub fn current_tab_mut(&mut self) -> Option<&mut ProjectTab> {
        self.open_tabs.get_mut(self.active_tab_idx)
    }

    // ------------------------------------------------------------------
    // Client-side filtered views over the store lists
    // ------------------------------------------------------------------

    /// Projects matching the list filter, best match first
    pub fn filtered_projects(&self) -> Vec<&Project> {
        filter_by(
            &self.store.projects.items,
            &self.filter_query,
            |p: &Project| format!("{} {}", p.name, p.owner),
        )
    }

    pub fn filtered_scenarios(&self) -> Vec<&Scenario> {
        let filter = self
            .current_tab()
            .map(|t| t.filter.as_str())
            .unwrap_or("");
        filter_by(&self.store.scenarios.items, filter, |s: &Scenario| {
            s.name.clone()
        })
    }

    pub fn filtered_bugs(&self) -> Vec<&Bug> {
        let filter = self
            .current_tab()
            .map(|t| t.filter.as_str())
            .unwrap_or("");
        filter_by(&self.store.bugs.items, filter, |b: &Bug| b.summary.clone())
    }
}

/// Fuzzy filter preserving best-match-first order; an empty query keeps the
/// original order.
fn filter_by<'a, T>(items: &'a [T], query: &str, key: impl Fn(&T) -> String) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, &T)> = items
        .iter()
        .filter_map(|item| {
            matcher
                .fuzzy_match(&key(item), query)
                .map(|score| (score, item))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, owner: &str) -> Project {
        Project {
            id: name.to_string(),
            project_id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            owner: owner.to_string(),
            status: "active".to_string(),
            version: "1.0".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
            uploaded_documents: Vec::new(),
        }
    }

    #[test]
    fn filter_matches_fuzzily_and_ranks() {
        let items = vec![
            project("payments", "alice"),
            project("checkout", "bob"),
            project("payroll", "carol"),
        ];

        let hits = filter_by(&items, "pay", |p| format!("{} {}", p.name, p.owner));
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.name.starts_with("pay")));

        let all = filter_by(&items, "", |p| p.name.clone());
        assert_eq!(all.len(), 3);
    }
}
