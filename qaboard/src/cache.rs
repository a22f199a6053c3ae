//! SQLite cache of observed run history and submitted scan tasks
//!
//! Everything the client sees from the backend is a transient in-memory
//! list; this cache keeps a persistent local record of test runs and scan
//! submissions so the Run History tab has data offline and scan handles
//! survive restarts.
//!
//! # Database Schema
//!
//! 1. **runs** - test runs observed from the backend or recorded locally
//! 2. **scan_tasks** - scan tasks submitted through the dashboard
//! 3. **schema_version** - schema version for migrations

use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

use qaboard_sdk::{CodexTask, RunStatus, TestRun};

/// Aggregate pass/fail counts for one project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Database wrapper for the local cache
pub struct Cache {
    conn: Connection,
}

impl Cache {
    /// Open (or create) the cache at the specified path
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent access
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self { conn })
    }

    /// Create an in-memory cache (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Initialize schema with all tables and indexes
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                run_id TEXT PRIMARY KEY,
                project_id TEXT NOT NULL,
                scenario_id TEXT,
                test_case_id TEXT NOT NULL,
                executed_by TEXT,
                executed_at TEXT,
                status TEXT NOT NULL,
                logs TEXT,
                version TEXT,
                recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_runs_project_id ON runs(project_id);
            CREATE INDEX IF NOT EXISTS idx_runs_test_case_id ON runs(test_case_id);
            CREATE INDEX IF NOT EXISTS idx_runs_executed_at ON runs(executed_at DESC);

            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            INSERT OR IGNORE INTO schema_version (version) VALUES (1);
            "#,
        )?;

        self.migrate_to_v2()?;

        Ok(())
    }

    /// Migrate schema to version 2 (scan task tracking)
    fn migrate_to_v2(&self) -> Result<()> {
        let current = self.schema_version()?;

        if current < 2 {
            self.conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS scan_tasks (
                    task_id TEXT PRIMARY KEY,
                    repo_label TEXT NOT NULL,
                    prompt TEXT,
                    status TEXT NOT NULL,
                    created_at TEXT,
                    recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
                );

                CREATE INDEX IF NOT EXISTS idx_scan_tasks_repo ON scan_tasks(repo_label);

                UPDATE schema_version SET version = 2;
                "#,
            )?;
        }

        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version: i32 =
            self.conn
                .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                    row.get(0)
                })?;
        Ok(version)
    }

    /// Insert or refresh one run record
    pub fn record_run(&self, run: &TestRun) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO runs (run_id, project_id, scenario_id, test_case_id,
                              executed_by, executed_at, status, logs, version)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(run_id) DO UPDATE SET
                status = excluded.status,
                logs = excluded.logs,
                executed_at = excluded.executed_at
            "#,
            params![
                run.run_id,
                run.project_id,
                run.scenario_id,
                run.test_case_id,
                run.executed_by,
                run.executed_at,
                status_to_string(run.status),
                run.logs,
                run.version,
            ],
        )?;
        Ok(())
    }

    /// Batch insert inside one transaction; use for list refreshes
    pub fn record_runs(&mut self, runs: &[TestRun]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO runs (run_id, project_id, scenario_id, test_case_id,
                                  executed_by, executed_at, status, logs, version)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(run_id) DO UPDATE SET
                    status = excluded.status,
                    logs = excluded.logs,
                    executed_at = excluded.executed_at
                "#,
            )?;
            for run in runs {
                stmt.execute(params![
                    run.run_id,
                    run.project_id,
                    run.scenario_id,
                    run.test_case_id,
                    run.executed_by,
                    run.executed_at,
                    status_to_string(run.status),
                    run.logs,
                    run.version,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Most recent runs for a project
    pub fn list_runs(&self, project_id: &str, limit: usize) -> Result<Vec<TestRun>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT run_id, project_id, scenario_id, test_case_id,
                   executed_by, executed_at, status, logs, version
            FROM runs
            WHERE project_id = ?1
            ORDER BY executed_at DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![project_id, limit as i64], |row| {
            Ok(TestRun {
                run_id: row.get(0)?,
                project_id: row.get(1)?,
                scenario_id: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                test_case_id: row.get(3)?,
                executed_by: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                executed_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                status: status_from_string(&row.get::<_, String>(6)?),
                logs: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                attachment_url: None,
                version: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            })
        })?;

        let mut runs = Vec::new();
        for row in rows {
            runs.push(row?);
        }
        Ok(runs)
    }

    /// Pass/fail counts per project
    pub fn project_stats(&self, project_id: &str) -> Result<RunStats> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM runs WHERE project_id = ?1 GROUP BY status",
        )?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut stats = RunStats::default();
        for row in rows {
            let (status, count) = row?;
            let count = count as usize;
            stats.total += count;
            match status.as_str() {
                "pass" => stats.passed += count,
                "fail" => stats.failed += count,
                "skipped" => stats.skipped += count,
                _ => {}
            }
        }
        Ok(stats)
    }

    /// Delete runs executed before the cutoff; returns how many were removed
    pub fn delete_runs_before(&self, cutoff: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM runs WHERE executed_at < ?1",
            params![cutoff],
        )?;
        Ok(deleted)
    }

    /// Insert or refresh a submitted scan task
    pub fn record_scan_task(&self, task: &CodexTask) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO scan_tasks (task_id, repo_label, prompt, status, created_at, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(task_id) DO UPDATE SET status = excluded.status
            "#,
            params![
                task.task_id,
                task.repo_label,
                task.prompt,
                task.status,
                task.created_at,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Scan tasks previously submitted for a repository
    pub fn list_scan_tasks(&self, repo_label: &str) -> Result<Vec<CodexTask>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT task_id, repo_label, prompt, status, created_at
            FROM scan_tasks
            WHERE repo_label = ?1
            ORDER BY recorded_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![repo_label], |row| {
            Ok(CodexTask {
                task_id: row.get(0)?,
                repo_label: row.get(1)?,
                prompt: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                status: row.get(3)?,
                created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                environment_id: None,
                message: None,
            })
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Look up one scan task by id
    pub fn get_scan_task(&self, task_id: &str) -> Result<Option<CodexTask>> {
        let task = self
            .conn
            .query_row(
                r#"
                SELECT task_id, repo_label, prompt, status, created_at
                FROM scan_tasks WHERE task_id = ?1
                "#,
                params![task_id],
                |row| {
                    Ok(CodexTask {
                        task_id: row.get(0)?,
                        repo_label: row.get(1)?,
                        prompt: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                        status: row.get(3)?,
                        created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                        environment_id: None,
                        message: None,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }
}

fn status_to_string(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Pass => "pass",
        RunStatus::Fail => "fail",
        RunStatus::Skipped => "skipped",
    }
}

fn status_from_string(status: &str) -> RunStatus {
    match status {
        "pass" => RunStatus::Pass,
        "fail" => RunStatus::Fail,
        _ => RunStatus::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run(run_id: &str, status: RunStatus) -> TestRun {
        TestRun {
            run_id: run_id.to_string(),
            project_id: "proj-1".to_string(),
            scenario_id: "scn-1".to_string(),
            test_case_id: "tc-1".to_string(),
            executed_by: "qa-1".to_string(),
            executed_at: format!("2025-06-0{}T10:00:00", run_id.len() % 9 + 1),
            status,
            logs: String::new(),
            attachment_url: None,
            version: "1.0".to_string(),
        }
    }

    fn cache() -> Cache {
        let cache = Cache::new_in_memory().unwrap();
        cache.initialize_schema().unwrap();
        cache
    }

    #[test]
    fn schema_initializes_to_latest_version() {
        let cache = cache();
        assert_eq!(cache.schema_version().unwrap(), 2);
    }

    #[test]
    fn runs_roundtrip_and_upsert() {
        let cache = cache();
        cache.record_run(&sample_run("run-1", RunStatus::Fail)).unwrap();
        // Re-recording the same run updates status instead of duplicating
        cache.record_run(&sample_run("run-1", RunStatus::Pass)).unwrap();

        let runs = cache.list_runs("proj-1", 10).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, RunStatus::Pass);
    }

    #[test]
    fn stats_count_by_status() {
        let mut cache = cache();
        cache
            .record_runs(&[
                sample_run("run-1", RunStatus::Pass),
                sample_run("run-2", RunStatus::Pass),
                sample_run("run-3", RunStatus::Fail),
                sample_run("run-4", RunStatus::Skipped),
            ])
            .unwrap();

        let stats = cache.project_stats("proj-1").unwrap();
        assert_eq!(
            stats,
            RunStats {
                total: 4,
                passed: 2,
                failed: 1,
                skipped: 1
            }
        );
        assert_eq!(cache.project_stats("other").unwrap(), RunStats::default());
    }

    #[test]
    fn scan_tasks_roundtrip() {
        let cache = cache();
        let task = CodexTask {
            task_id: "task-9".to_string(),
            prompt: "scan for injection issues".to_string(),
            repo_label: "acme/storefront".to_string(),
            environment_id: None,
            status: "pending".to_string(),
            created_at: "2025-06-10T08:00:00".to_string(),
            message: None,
        };
        cache.record_scan_task(&task).unwrap();

        let tasks = cache.list_scan_tasks("acme/storefront").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_id, "task-9");

        let fetched = cache.get_scan_task("task-9").unwrap().unwrap();
        assert_eq!(fetched.status, "pending");
        assert!(cache.get_scan_task("missing").unwrap().is_none());
    }
}
