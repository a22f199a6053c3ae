use qaboard_sdk::{CodexTask, RepoOption};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::ApiClient;

/// Base URL of the external AI tool prompts can be handed off to
pub const CODEX_HANDOFF_BASE: &str = "https://chatgpt.com/codex/";

#[derive(Debug, Clone, Serialize)]
pub struct CodexRunRequest {
    pub prompt: String,
    pub repo_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RepoList {
    #[serde(default)]
    repos: Vec<RepoOption>,
}

#[derive(Debug, Clone, Deserialize)]
struct SubmittedTasks {
    #[serde(default)]
    submitted_tasks: Vec<CodexTask>,
}

#[derive(Debug, Clone)]
pub struct CodexService {
    client: ApiClient,
}

impl CodexService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Repositories the scan service can target
    pub async fn repos(&self) -> Result<Vec<RepoOption>, ApiError> {
        let envelope: Envelope<RepoList> = self.client.get("/api/codex/repos", &[]).await?;
        // A wrapper without a result means "none", not a failure
        Ok(match envelope {
            Envelope::Bare(list) => list.repos,
            Envelope::Wrapped { result, .. } => result.map(|l| l.repos).unwrap_or_default(),
        })
    }

    /// Submit a prompt against a repository; returns the opaque task handle.
    /// Status is refreshed only by explicit re-fetch, never by polling.
    pub async fn run(&self, request: &CodexRunRequest) -> Result<CodexTask, ApiError> {
        let envelope: Envelope<CodexTask> =
            self.client.post("/api/codex/run", request).await.map_err(|e| {
                warn!(error = %e, repo = %request.repo_label, "failed to submit scan");
                e
            })?;
        envelope.into_result()
    }

    pub async fn task(&self, task_id: &str) -> Result<CodexTask, ApiError> {
        let envelope: Envelope<CodexTask> = self
            .client
            .get(&format!("/api/codex/task/{}", task_id), &[])
            .await?;
        envelope.into_result()
    }

    pub async fn submitted_tasks(&self, repo_label: &str) -> Result<Vec<CodexTask>, ApiError> {
        let envelope: Envelope<SubmittedTasks> = self
            .client
            .get("/api/codex/task/submitted", &[("repo_label", repo_label)])
            .await?;
        Ok(match envelope {
            Envelope::Bare(list) => list.submitted_tasks,
            Envelope::Wrapped { result, .. } => {
                result.map(|l| l.submitted_tasks).unwrap_or_default()
            }
        })
    }
}

/// Build the external hand-off URL that opens a free-text prompt in the AI
/// tool, URL-encoding the prompt.
pub fn prompt_handoff_url(prompt: &str) -> Result<Url, ApiError> {
    Url::parse_with_params(CODEX_HANDOFF_BASE, &[("prompt", prompt)]).map_err(|e| {
        ApiError::Unknown {
            detail: format!("Failed to build hand-off URL: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handoff_url_encodes_prompt() {
        let url = prompt_handoff_url("scan repo for auth bugs & report").unwrap();
        assert!(url.as_str().starts_with("https://chatgpt.com/codex/?prompt="));
        // Raw specials must not survive encoding
        assert!(!url.as_str().contains(' '));
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn handoff_url_roundtrips_through_query() {
        let prompt = "find race conditions in src/store";
        let url = prompt_handoff_url(prompt).unwrap();
        let decoded: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(decoded, vec![("prompt".to_string(), prompt.to_string())]);
    }
}
