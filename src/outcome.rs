//! Per-issue results and the processed/skipped/failed tally of a batch.

use std::fmt;

use serde::Serialize;

use crate::issue::IssueRef;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
	Processed,
	/// Dry-run: would have been processed.
	Planned,
	Skipped { reason: String },
	Failed { error: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IssueOutcome {
	pub issue: IssueRef,
	pub title: String,
	#[serde(flatten)]
	pub status: OutcomeStatus,
	/// Changes made, or in a dry-run the changes that would be made.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub actions: Vec<String>,
	/// Non-fatal problems, e.g. a label that could not be added.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub warnings: Vec<String>,
}

impl IssueOutcome {
	pub fn new(issue: IssueRef, title: impl Into<String>, status: OutcomeStatus) -> Self {
		Self {
			issue,
			title: title.into(),
			status,
			actions: Vec::new(),
			warnings: Vec::new(),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BatchSummary {
	pub processed: usize,
	pub planned: usize,
	pub skipped: usize,
	pub failed: usize,
	/// Operator quit before the batch finished.
	pub aborted: bool,
}

impl BatchSummary {
	pub fn record(&mut self, status: &OutcomeStatus) {
		match status {
			OutcomeStatus::Processed => self.processed += 1,
			OutcomeStatus::Planned => self.planned += 1,
			OutcomeStatus::Skipped { .. } => self.skipped += 1,
			OutcomeStatus::Failed { .. } => self.failed += 1,
		}
	}

	pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a IssueOutcome>) -> Self {
		let mut summary = Self::default();
		for outcome in outcomes {
			summary.record(&outcome.status);
		}
		summary
	}
}

impl fmt::Display for BatchSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.planned > 0 {
			write!(f, "planned={} ", self.planned)?;
		}
		write!(f, "processed={} skipped={} failed={}", self.processed, self.skipped, self.failed)?;
		if self.aborted {
			write!(f, " (aborted)")?;
		}
		Ok(())
	}
}
