//! Configuration, paths, and session/history persistence

use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Terminal dashboard for managing software test projects
#[derive(Debug, Clone, Parser)]
#[command(name = "qaboard", version, about)]
pub struct Config {
    /// Base URL of the qaboard backend
    #[arg(long, env = "QABOARD_API_BASE", default_value = "http://localhost:5000")]
    pub api_base: String,

    /// Serve the Test Cases / Test Data / Run History tabs from the bundled
    /// demo fixtures instead of the backend
    #[arg(long, env = "QABOARD_OFFLINE")]
    pub offline: bool,

    /// Override the data directory (session, input history, cache database)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Resolved data directory, created on demand
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "qaboard", "qaboard") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".qaboard")
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir().join("history.json")
    }

    pub fn cache_db_path(&self) -> PathBuf {
        self.data_dir().join("cache.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("qaboard.log")
    }
}

/// Route tracing output to a file; stdout belongs to the terminal UI.
/// Returns the guard that flushes the writer on drop.
pub fn init_tracing(config: &Config) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = config.data_dir();
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "qaboard.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

// Input history: per-form, per-field lists of previously submitted values,
// most recent first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputHistory {
    pub forms: HashMap<String, HashMap<String, Vec<String>>>,
}

const HISTORY_LIMIT: usize = 10;

impl InputHistory {
    /// Remember a submitted value, moving repeats to the front
    pub fn remember(&mut self, form_id: &str, field: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let form_history = self.forms.entry(form_id.to_string()).or_default();
        let field_history = form_history.entry(field.to_string()).or_default();

        if let Some(pos) = field_history.iter().position(|v| v == value) {
            let existing = field_history.remove(pos);
            field_history.insert(0, existing);
        } else {
            field_history.insert(0, value.to_string());
            field_history.truncate(HISTORY_LIMIT);
        }
    }

    pub fn latest(&self, form_id: &str, field: &str) -> Option<&str> {
        self.forms
            .get(form_id)?
            .get(field)?
            .first()
            .map(|s| s.as_str())
    }

    pub fn values(&self, form_id: &str, field: &str) -> &[String] {
        self.forms
            .get(form_id)
            .and_then(|f| f.get(field))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

pub fn load_history(config: &Config) -> InputHistory {
    if let Ok(content) = std::fs::read_to_string(config.history_path()) {
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        InputHistory::default()
    }
}

pub fn save_history(config: &Config, history: &InputHistory) -> Result<()> {
    let path = config.history_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(history)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// One open project tab, as persisted across sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTab {
    pub project_id: String,
    pub project_name: String,
    pub section: String,
    #[serde(default)]
    pub expanded_scenarios: Vec<String>,
    #[serde(default)]
    pub expanded_bugs: Vec<String>,
}

pub fn load_session(config: &Config) -> Vec<SavedTab> {
    if let Ok(content) = std::fs::read_to_string(config.session_path()) {
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Vec::new()
    }
}

pub fn save_session(config: &Config, tabs: &[SavedTab]) -> Result<()> {
    let path = config.session_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(tabs)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_keeps_most_recent_first_and_dedupes() {
        let mut history = InputHistory::default();
        history.remember("new_bug", "severity", "high");
        history.remember("new_bug", "severity", "medium");
        history.remember("new_bug", "severity", "high");

        assert_eq!(history.latest("new_bug", "severity"), Some("high"));
        assert_eq!(history.values("new_bug", "severity"), &["high", "medium"]);
    }

    #[test]
    fn history_is_capped() {
        let mut history = InputHistory::default();
        for i in 0..20 {
            history.remember("form", "field", &format!("value-{}", i));
        }
        assert_eq!(history.values("form", "field").len(), 10);
        assert_eq!(history.latest("form", "field"), Some("value-19"));
    }

    #[test]
    fn empty_values_are_not_remembered() {
        let mut history = InputHistory::default();
        history.remember("form", "field", "");
        assert!(history.values("form", "field").is_empty());
    }
}
