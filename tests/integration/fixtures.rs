//! Shared test fixtures for integration tests.
//!
//! Every context owns a temp directory holding the config, the mock GitHub
//! state and the JSON trace file the binary writes to.

use std::{
	fs,
	path::PathBuf,
	process::{Command, Output},
};

use rstest::fixture;
use tempfile::TempDir;

use crate::tracing_utils::TraceLog;

fn get_binary_path() -> PathBuf {
	crate::ensure_binary_compiled();

	let mut path = std::env::current_exe().unwrap();
	path.pop(); // Remove test binary name
	path.pop(); // Remove 'deps'
	path.push(env!("CARGO_PKG_NAME"));
	path
}

/// Board with Status/Priority/Estimate fields, two repositories, one epic with a sub-issue tree.
///
/// ```text
/// acme/api#1 Epic            (on board)
///   acme/api#2 Backend
///     acme/api#4 Schema      (on board)
///   acme/web#3 Frontend
/// acme/api#5 Crash on start  (bug)
/// acme/web#6 Typo            (bug, tracked)
/// ```
pub const DEFAULT_STATE: &str = r#"{
  "issues": [
    {"owner": "acme", "repo": "api", "number": 1, "title": "Epic", "body": "- [ ] Backend\n- [ ] Write docs\n- [x] Announce"},
    {"owner": "acme", "repo": "api", "number": 2, "title": "Backend"},
    {"owner": "acme", "repo": "web", "number": 3, "title": "Frontend"},
    {"owner": "acme", "repo": "api", "number": 4, "title": "Schema"},
    {"owner": "acme", "repo": "api", "number": 5, "title": "Crash on start", "labels": ["bug"]},
    {"owner": "acme", "repo": "web", "number": 6, "title": "Typo", "labels": ["bug", "tracked"]},
    {"owner": "acme", "repo": "api", "number": 7, "title": "Old", "state": "CLOSED", "labels": ["bug"]}
  ],
  "sub_issues": [
    {"parent": "acme/api#1", "children": ["acme/api#2", "acme/web#3"]},
    {"parent": "acme/api#2", "children": ["acme/api#4"]}
  ],
  "project": {
    "owner": "acme",
    "number": 3,
    "title": "Roadmap",
    "fields": [
      {"name": "Status", "data_type": "SINGLE_SELECT", "options": ["Backlog", "In progress", "Done"]},
      {"name": "Priority", "data_type": "SINGLE_SELECT", "options": ["P0", "P1", "P2"]},
      {"name": "Estimate", "data_type": "NUMBER"}
    ],
    "items": ["acme/api#1", "acme/api#4"],
    "pull_requests": 1
  }
}"#;

pub const DEFAULT_CONFIG: &str = r#"
project: { owner: acme, number: 3 }
repositories: [acme/api, acme/web]
fields:
  status:   { field: Status,   values: { backlog: Backlog, wip: In progress, done: Done } }
  priority: { field: Priority, values: { p0: P0, p1: P1 } }
triage:
  bugs:
    query: "is:open label:bug -label:tracked"
    apply: { labels: [tracked], fields: { status: backlog } }
"#;

pub struct TestContext {
	pub dir: TempDir,
	pub config_path: PathBuf,
	pub mock_state_path: PathBuf,
	pub trace_file: PathBuf,
}

impl TestContext {
	pub fn new(config: &str, mock_state: &str) -> Self {
		let dir = tempfile::tempdir().unwrap();
		let config_path = dir.path().join("config.yml");
		let mock_state_path = dir.path().join("mock_state.json");
		let trace_file = dir.path().join("trace.jsonl");
		fs::write(&config_path, config).unwrap();
		fs::write(&mock_state_path, mock_state).unwrap();
		Self {
			dir,
			config_path,
			mock_state_path,
			trace_file,
		}
	}

	/// Run `ghpm` against the mock, from inside the temp dir so no stray `.ghpm.yml` is picked up.
	pub fn run(&self, args: &[&str]) -> Output {
		Command::new(get_binary_path())
			.arg("--config")
			.arg(&self.config_path)
			.args(args)
			.current_dir(self.dir.path())
			.env("GHPM_MOCK_STATE", &self.mock_state_path)
			.env("GHPM_TRACE_FILE", &self.trace_file)
			.env("XDG_CONFIG_HOME", self.dir.path())
			.env_remove("RUST_LOG")
			.env_remove("GHPM_CONFIG")
			.output()
			.unwrap()
	}

	/// Like `run`, but panics with stderr unless the command succeeded. Returns stdout.
	pub fn run_ok(&self, args: &[&str]) -> String {
		let output = self.run(args);
		assert!(output.status.success(), "ghpm {args:?} failed:\n{}", String::from_utf8_lossy(&output.stderr));
		String::from_utf8(output.stdout).unwrap()
	}

	pub fn trace(&self) -> TraceLog {
		TraceLog::from_file(&self.trace_file)
	}
}

#[fixture]
pub fn ctx() -> TestContext {
	TestContext::new(DEFAULT_CONFIG, DEFAULT_STATE)
}
