//! Utilities for capturing and verifying tracing output in integration tests.
//!
//! When tests spawn the binary with `GHPM_TRACE_FILE` set, trace events are
//! written in JSON format to that file. The mock client emits `tracing::info!`
//! events with target "mock_github" named after the method called, which
//! `has_mock_call` and friends look for.

use std::{fs, path::Path};

use serde::Deserialize;

/// A single trace event from the JSON log
#[derive(Debug, Deserialize)]
pub struct TraceEvent {
	pub level: String,
	pub target: String,
	pub fields: TraceFields,
}

#[derive(Debug, Deserialize)]
pub struct TraceFields {
	pub message: Option<String>,
	pub owner: Option<String>,
	pub repo: Option<String>,
	pub issue_number: Option<u64>,
	pub label: Option<String>,
	pub title: Option<String>,
	pub project_id: Option<String>,
	pub field_id: Option<String>,
}

pub struct TraceLog {
	events: Vec<TraceEvent>,
}

impl TraceLog {
	pub fn from_file(path: &Path) -> Self {
		let content = fs::read_to_string(path).unwrap_or_default();
		let events: Vec<TraceEvent> = content.lines().filter(|line| !line.is_empty()).filter_map(|line| serde_json::from_str(line).ok()).collect();

		Self { events }
	}

	fn calls<'a>(&'a self, method_name: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
		self.events
			.iter()
			.filter(move |e| e.target == "mock_github" && e.fields.message.as_deref() == Some(method_name))
	}

	pub fn has_mock_call(&self, method_name: &str) -> bool {
		self.calls(method_name).next().is_some()
	}

	pub fn count(&self, method_name: &str) -> usize {
		self.calls(method_name).count()
	}

	pub fn has_mock_call_with_issue(&self, method_name: &str, owner: &str, repo: &str, issue_number: u64) -> bool {
		self.calls(method_name).any(|e| e.fields.owner.as_deref() == Some(owner) && e.fields.repo.as_deref() == Some(repo) && e.fields.issue_number == Some(issue_number))
	}

	/// Whether any mutation reached the mock.
	pub fn has_writes(&self) -> bool {
		["add_issue_to_project", "set_field_value", "add_label", "create_issue", "add_sub_issue", "remove_sub_issue"]
			.iter()
			.any(|m| self.has_mock_call(m))
	}

	pub fn mock_calls(&self) -> Vec<&TraceEvent> {
		self.events.iter().filter(|e| e.target == "mock_github").collect()
	}
}

/// Assert that a mock method was called
#[macro_export]
macro_rules! assert_traced {
	($log:expr, $method:expr) => {
		assert!(
			$log.has_mock_call($method),
			"Expected mock call '{}' to be traced, but it wasn't. Mock calls:\n{:#?}",
			$method,
			$log.mock_calls()
		);
	};
	($log:expr, $method:expr, $owner:expr, $repo:expr, $issue_number:expr) => {
		assert!(
			$log.has_mock_call_with_issue($method, $owner, $repo, $issue_number),
			"Expected mock call '{}' with owner='{}' repo='{}' issue_number={} to be traced, but it wasn't. Mock calls:\n{:#?}",
			$method,
			$owner,
			$repo,
			$issue_number,
			$log.mock_calls()
		);
	};
}
