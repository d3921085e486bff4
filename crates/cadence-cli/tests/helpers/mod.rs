#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test harness for running CLI commands against temporary data files
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
    templates_path: PathBuf,
    ledger_path: PathBuf,
    backend: &'static str,
}

impl CliTestHarness {
    /// Create a new test harness using the sqlite ledger
    pub fn new() -> Self {
        Self::with_backend("sqlite")
    }

    /// Create a new test harness using the given ledger back end
    pub fn with_backend(backend: &'static str) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let templates_path = temp_dir.path().join("templates.json");
        let ledger_path = temp_dir.path().join("completions.json");

        Self {
            temp_dir,
            db_path,
            templates_path,
            ledger_path,
            backend,
        }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");

        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env("CADENCE_DATABASE_PATH", &self.db_path)
            .env("CADENCE_TEMPLATES_PATH", &self.templates_path)
            .env("CADENCE_LEDGER_PATH", &self.ledger_path)
            .env("CADENCE_LEDGER_BACKEND", self.backend);

        cmd
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Helper to run a command and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    /// Helper to run a command and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Adds a task and returns its full ID, read back from the templates file
    pub fn add_task(&self, args: &[&str]) -> String {
        let mut full_args = vec!["add"];
        full_args.extend_from_slice(args);
        self.run_success(&full_args);

        self.template_ids()
            .pop()
            .expect("No template was written")
    }

    /// IDs of all stored templates, in insertion order
    pub fn template_ids(&self) -> Vec<String> {
        let raw = std::fs::read_to_string(&self.templates_path).expect("Failed to read templates");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("Invalid templates JSON");
        json.as_array()
            .expect("Templates file is not an array")
            .iter()
            .map(|t| t["id"].as_str().expect("Template without id").to_string())
            .collect()
    }

    /// Writes the templates file directly
    pub fn write_templates(&self, json: &str) {
        std::fs::write(&self.templates_path, json).expect("Failed to write templates");
    }
}

/// Common test fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Weekday standup anchored on Monday 2024-01-01
    pub fn standup_args() -> Vec<&'static str> {
        vec![
            "Standup",
            "--due",
            "2024-01-01",
            "--every",
            "daily",
            "--exclude-weekends",
            "--priority",
            "high",
            "--tag",
            "work",
        ]
    }

    /// Two templates whose IDs share the prefix `0190a1b2`
    pub fn ambiguous_templates_json() -> &'static str {
        r#"[
            {
                "id": "0190a1b2-0000-7000-8000-000000000001",
                "name": "Water plants",
                "dueDate": "2024-01-01",
                "recurrence": { "frequency": "daily" }
            },
            {
                "id": "0190a1b2-0000-7000-8000-000000000002",
                "name": "Feed cat",
                "dueDate": "2024-01-01",
                "recurrence": { "frequency": "daily" }
            }
        ]"#
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use predicates::prelude::*;

    /// Predicate to check if output contains instance table headers
    pub fn has_instance_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Name"))
            .and(predicate::str::contains("Status"))
    }

    /// Predicate to check if output indicates successful task creation
    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓").and(predicate::str::contains("Created"))
    }

    /// Predicate to check for empty result set
    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    /// Predicate to check for error messages
    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
