//! Sub-issue creation from a checklist, and link/unlink of existing issues.

use std::collections::HashSet;

use color_eyre::eyre::{Result, WrapErr};
use ghpm::{BatchSummary, Issue, IssueRef, LinkFailure, OutcomeStatus, classify_link_failure};
use serde::Serialize;
use tracing::instrument;

use crate::{
	github::{IssueSource, IssueWriter, SubIssueSource},
	hierarchy::{self, ItemIndex},
};

/// Title of a `- [ ] title` / `- [x] title` line. Trailing `<!-- -->` comments are cut off.
pub fn checklist_title(line: &str) -> Option<String> {
	let trimmed = line.trim();
	let rest = ["- [ ] ", "- [x] ", "- [X] ", "* [ ] ", "* [x] "].iter().find_map(|prefix| trimmed.strip_prefix(prefix))?;

	let title = match rest.find("<!--") {
		Some(pos) => &rest[..pos],
		None => rest,
	};
	let title = title.trim();
	if title.is_empty() { None } else { Some(title.to_string()) }
}

/// Checklist titles of a body, in order. Lines inside fenced code blocks are ignored.
pub fn checklist_titles(body: &str) -> Vec<String> {
	let mut in_fence = false;
	let mut titles = Vec::new();
	for line in body.lines() {
		if line.trim_start().starts_with("```") {
			in_fence = !in_fence;
			continue;
		}
		if !in_fence && let Some(title) = checklist_title(line) {
			titles.push(title);
		}
	}
	titles
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SplitReport {
	pub outcomes: Vec<SplitOutcome>,
	pub summary: BatchSummary,
}

#[derive(Clone, Debug, Serialize)]
pub struct SplitOutcome {
	pub title: String,
	/// The created sub-issue, when one was created.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub issue: Option<IssueRef>,
	#[serde(flatten)]
	pub status: OutcomeStatus,
}

/// Create a sub-issue of `parent` per title, in the parent's repository.
///
/// Titles matching an existing direct sub-issue (or repeated in `titles`) are skipped.
#[instrument(skip(client, titles), fields(n_titles = titles.len()))]
pub async fn split<C: IssueSource + SubIssueSource + IssueWriter + ?Sized>(client: &C, parent: &IssueRef, titles: &[String], dry_run: bool) -> Result<SplitReport> {
	let parent_issue = client.fetch_issue(parent).await.wrap_err_with(|| format!("Failed to fetch {parent}"))?;
	let existing = hierarchy::collect(client, parent, &ItemIndex::default(), 1, 1).await?;
	let mut taken: HashSet<String> = existing.nodes.iter().map(|node| node.issue.title.trim().to_string()).collect();

	let mut report = SplitReport::default();
	for title in titles {
		let outcome = if !taken.insert(title.trim().to_string()) {
			SplitOutcome {
				title: title.clone(),
				issue: None,
				status: OutcomeStatus::Skipped { reason: "already a sub-issue".into() },
			}
		} else if dry_run {
			SplitOutcome {
				title: title.clone(),
				issue: None,
				status: OutcomeStatus::Planned,
			}
		} else {
			create_child(client, &parent_issue, title).await
		};
		report.summary.record(&outcome.status);
		report.outcomes.push(outcome);
	}

	tracing::info!(parent = %parent, summary = %report.summary, "split finished");
	Ok(report)
}

async fn create_child<C: IssueWriter + ?Sized>(client: &C, parent: &Issue, title: &str) -> SplitOutcome {
	let body = format!("Split from {}", parent.reference());
	let child = match client.create_issue(&parent.repo, title, &body).await {
		Ok(child) => child,
		Err(e) => {
			tracing::warn!(title, error = %e, "failed to create sub-issue");
			return SplitOutcome {
				title: title.to_string(),
				issue: None,
				status: OutcomeStatus::Failed { error: format!("{e:#}") },
			};
		}
	};

	let status = match client.add_sub_issue(&parent.id, &child.id).await {
		Ok(()) => OutcomeStatus::Processed,
		Err(e) => {
			tracing::warn!(child = %child.reference(), error = %e, "created but not linked");
			OutcomeStatus::Failed {
				error: format!("created {} but could not link it: {e:#}", child.reference()),
			}
		}
	};
	SplitOutcome {
		title: title.to_string(),
		issue: Some(child.reference()),
		status,
	}
}

/// What a link/unlink call amounted to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkChange {
	Changed,
	/// The host rejected the call because the link already was in the requested state.
	Unchanged,
}

pub async fn link<C: IssueSource + IssueWriter + ?Sized>(client: &C, parent: &IssueRef, child: &IssueRef) -> Result<LinkChange> {
	let (parent_issue, child_issue) = fetch_pair(client, parent, child).await?;
	match client.add_sub_issue(&parent_issue.id, &child_issue.id).await {
		Ok(()) => Ok(LinkChange::Changed),
		Err(e) if classify_link_failure(&format!("{e:#}")) == Some(LinkFailure::AlreadyLinked) => {
			tracing::info!(parent = %parent, child = %child, "already linked");
			Ok(LinkChange::Unchanged)
		}
		Err(e) => Err(e.wrap_err(format!("Failed to add {child} as a sub-issue of {parent}"))),
	}
}

pub async fn unlink<C: IssueSource + IssueWriter + ?Sized>(client: &C, parent: &IssueRef, child: &IssueRef) -> Result<LinkChange> {
	let (parent_issue, child_issue) = fetch_pair(client, parent, child).await?;
	match client.remove_sub_issue(&parent_issue.id, &child_issue.id).await {
		Ok(()) => Ok(LinkChange::Changed),
		Err(e) if classify_link_failure(&format!("{e:#}")) == Some(LinkFailure::NotALink) => {
			tracing::info!(parent = %parent, child = %child, "not linked");
			Ok(LinkChange::Unchanged)
		}
		Err(e) => Err(e.wrap_err(format!("Failed to remove {child} from {parent}"))),
	}
}

async fn fetch_pair<C: IssueSource + ?Sized>(client: &C, parent: &IssueRef, child: &IssueRef) -> Result<(Issue, Issue)> {
	let parent_issue = client.fetch_issue(parent).await.wrap_err_with(|| format!("Failed to fetch {parent}"))?;
	let child_issue = client.fetch_issue(child).await.wrap_err_with(|| format!("Failed to fetch {child}"))?;
	Ok((parent_issue, child_issue))
}

#[cfg(test)]
mod tests {
	use ghpm::IssueState;
	use rstest::rstest;

	use super::*;
	use crate::mock_github::MockGitHubClient;

	fn r(s: &str) -> IssueRef {
		s.parse().unwrap()
	}

	#[rstest]
	#[case("- [ ] Write docs", Some("Write docs"))]
	#[case("  - [x] Done already", Some("Done already"))]
	#[case("- [ ] Tracked <!-- id:42 -->", Some("Tracked"))]
	#[case("- [ ]   ", None)]
	#[case("- plain bullet", None)]
	#[case("[ ] no dash", None)]
	fn test_checklist_title(#[case] line: &str, #[case] expected: Option<&str>) {
		assert_eq!(checklist_title(line).as_deref(), expected);
	}

	#[test]
	fn test_checklist_titles_skip_code_fences() {
		let body = "Plan:\n- [ ] one\n```\n- [ ] not me\n```\n- [x] two\n";
		assert_eq!(checklist_titles(body), vec!["one".to_string(), "two".to_string()]);
	}

	fn setup() -> MockGitHubClient {
		let client = MockGitHubClient::new();
		client.add_issue(&r("acme/api#1"), "Epic", IssueState::Open, &[]);
		client.add_issue(&r("acme/api#2"), "Existing", IssueState::Open, &[]);
		client.add_sub_issue_relation(&r("acme/api#1"), &r("acme/api#2"));
		client
	}

	#[tokio::test]
	async fn test_split_skips_existing_titles() {
		let client = setup();
		let titles = vec!["Existing".to_string(), "New one".to_string(), "New one".to_string()];
		let report = split(&client, &r("acme/api#1"), &titles, false).await.unwrap();

		assert_eq!(report.summary.to_string(), "processed=1 skipped=2 failed=0");
		assert_eq!(report.outcomes[1].issue, Some(r("acme/api#3")));
		assert_eq!(client.children_of(&r("acme/api#1")), vec![r("acme/api#2"), r("acme/api#3")]);
	}

	#[tokio::test]
	async fn test_split_dry_run_creates_nothing() {
		let client = setup();
		let report = split(&client, &r("acme/api#1"), &["A".to_string(), "B".to_string()], true).await.unwrap();
		assert_eq!(report.summary.planned, 2);
		assert!(client.get_call_log().iter().all(|c| !c.starts_with("create_issue") && !c.starts_with("add_sub_issue")));
	}

	#[tokio::test]
	async fn test_split_link_failure_is_counted() {
		let client = setup();
		client.add_issue(&r("acme/api#9"), "Other parent", IssueState::Open, &[]);
		// The next created issue is #10, which #9 already claims
		client.add_sub_issue_relation(&r("acme/api#9"), &r("acme/api#10"));

		let report = split(&client, &r("acme/api#1"), &["A".to_string()], false).await.unwrap();
		assert_eq!(report.summary.to_string(), "processed=0 skipped=0 failed=1");
		assert_eq!(report.outcomes[0].issue, Some(r("acme/api#10")));
		let OutcomeStatus::Failed { error } = &report.outcomes[0].status else {
			panic!("expected failure, got {:?}", report.outcomes[0].status);
		};
		assert!(error.starts_with("created acme/api#10 but could not link it"), "{error}");
	}

	#[tokio::test]
	async fn test_link_then_link_again_is_unchanged() {
		let client = MockGitHubClient::new();
		client.add_issue(&r("acme/api#1"), "P", IssueState::Open, &[]);
		client.add_issue(&r("acme/web#5"), "C", IssueState::Open, &[]);

		assert_eq!(link(&client, &r("acme/api#1"), &r("acme/web#5")).await.unwrap(), LinkChange::Changed);
		assert_eq!(link(&client, &r("acme/api#1"), &r("acme/web#5")).await.unwrap(), LinkChange::Unchanged);
		assert_eq!(client.children_of(&r("acme/api#1")), vec![r("acme/web#5")]);
	}

	#[tokio::test]
	async fn test_unlink_missing_link_is_unchanged() {
		let client = setup();
		assert_eq!(unlink(&client, &r("acme/api#1"), &r("acme/api#2")).await.unwrap(), LinkChange::Changed);
		assert_eq!(unlink(&client, &r("acme/api#1"), &r("acme/api#2")).await.unwrap(), LinkChange::Unchanged);
	}

	#[tokio::test]
	async fn test_link_unknown_issue_is_an_error() {
		let client = setup();
		assert!(link(&client, &r("acme/api#1"), &r("acme/api#404")).await.is_err());
	}
}
