//! Typed errors of the domain layer.
//!
//! Uses miette for diagnostic codes and help text; the binary reports them
//! through color-eyre.

#![allow(unused_assignments)] // Fields are read by miette's derive macro via attributes

use miette::Diagnostic;

use crate::project::FieldDataType;

/// Failure to translate a value into a field mutation payload.
#[derive(Clone, Debug, Diagnostic, Eq, PartialEq, thiserror::Error)]
pub enum FieldError {
	#[error("field '{field}' not found in project")]
	#[diagnostic(code(ghpm::field::not_found), help("field names are case-sensitive; run `ghpm field list` to see what the project defines"))]
	FieldNotFound { field: String },

	#[error("'{value}' is not an option of field '{field}' (available: {})", .available.join(", "))]
	#[diagnostic(code(ghpm::field::option_not_found), help("option names must match exactly, including case; add an alias under `fields:` in the config"))]
	OptionNotFound { field: String, value: String, available: Vec<String> },

	#[error("'{value}' is not a valid number for field '{field}'")]
	#[diagnostic(code(ghpm::field::invalid_number))]
	InvalidNumber { field: String, value: String },

	#[error("field '{field}' has unsupported type {data_type}")]
	#[diagnostic(code(ghpm::field::unsupported_type), help("only single-select, text and number fields can be set"))]
	UnsupportedFieldType { field: String, data_type: FieldDataType },
}

/// Failure to parse an issue or repository reference.
#[derive(Clone, Debug, Diagnostic, Eq, PartialEq, thiserror::Error)]
pub enum IssueRefError {
	#[error("invalid repository '{0}', expected owner/name")]
	#[diagnostic(code(ghpm::reference::repo))]
	InvalidRepo(String),

	#[error("invalid issue reference '{0}'")]
	#[diagnostic(code(ghpm::reference::issue), help("use owner/repo#123, #123 or https://github.com/owner/repo/issues/123"))]
	InvalidReference(String),

	#[error("invalid issue number '{0}'")]
	#[diagnostic(code(ghpm::reference::number))]
	InvalidNumber(String),

	#[error("'{0}' needs a repository")]
	#[diagnostic(code(ghpm::reference::missing_repo), help("write owner/repo#N, or configure `repositories:` so the first entry is used as default"))]
	MissingRepository(String),
}

/// Failure to parse an ad-hoc `key=value,...` apply string.
#[derive(Clone, Debug, Diagnostic, Eq, PartialEq, thiserror::Error)]
pub enum AssignmentError {
	#[error("expected key=value, got '{0}'")]
	#[diagnostic(code(ghpm::apply::malformed), help("example: --apply \"labels=triaged;needs-info,status=backlog\""))]
	Malformed(String),

	#[error("empty key in '{0}'")]
	#[diagnostic(code(ghpm::apply::empty_key))]
	EmptyKey(String),
}

/// Structured reason for a rejected sub-issue link/unlink.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkFailure {
	/// The child already has this (or another) parent.
	AlreadyLinked,
	/// The child is not a sub-issue of the given parent.
	NotALink,
}

/// Classify a host error message from `addSubIssue`/`removeSubIssue`.
///
/// The host exposes no error code for these cases, so this is a substring
/// heuristic. Keep every such check in here.
pub fn classify_link_failure(message: &str) -> Option<LinkFailure> {
	let lower = message.to_ascii_lowercase();
	if lower.contains("already") && (lower.contains("sub-issue") || lower.contains("sub issue") || lower.contains("parent") || lower.contains("linked")) {
		return Some(LinkFailure::AlreadyLinked);
	}
	if lower.contains("not a sub-issue") || lower.contains("not a sub issue") || lower.contains("is not linked") || lower.contains("no parent") {
		return Some(LinkFailure::NotALink);
	}
	None
}

/// Whether a host error from `addProjectV2ItemById` means the item exists already.
pub fn is_already_member(message: &str) -> bool {
	let lower = message.to_ascii_lowercase();
	lower.contains("already exists") || lower.contains("already in") || lower.contains("already added")
}
