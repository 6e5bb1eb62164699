//! Sub-issue tree traversal.
//!
//! Depth-first, parent before children, children in host order. A branch that
//! fails to load becomes a warning; its siblings are still walked.

use std::{
	collections::{HashMap, HashSet},
	fmt,
	future::Future,
	pin::Pin,
};

use color_eyre::eyre::{Result, WrapErr};
use ghpm::{HierarchyNode, IssueRef, ProjectItem};
use serde::Serialize;
use tracing::instrument;

use crate::github::SubIssueSource;

/// Project item ids keyed by `owner/repo#number`, built once from a full item fetch.
#[derive(Clone, Debug, Default)]
pub struct ItemIndex {
	by_issue: HashMap<String, String>,
}

impl ItemIndex {
	pub fn from_items(items: &[ProjectItem]) -> Self {
		let by_issue = items.iter().map(|item| (item.issue.reference().to_string(), item.id.clone())).collect();
		Self { by_issue }
	}

	pub fn item_id(&self, issue: &IssueRef) -> Option<&str> {
		self.by_issue.get(&issue.to_string()).map(String::as_str)
	}

	/// Record an item created after the index was built.
	pub fn insert(&mut self, issue: &IssueRef, item_id: String) {
		self.by_issue.insert(issue.to_string(), item_id);
	}

	pub fn len(&self) -> usize {
		self.by_issue.len()
	}
}

/// A branch that could not be walked.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TraversalWarning {
	pub issue: IssueRef,
	pub message: String,
}

impl fmt::Display for TraversalWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.issue, self.message)
	}
}

/// Descendants in pre-order, plus whatever could not be walked.
#[derive(Clone, Debug, Default)]
pub struct Hierarchy {
	pub nodes: Vec<HierarchyNode>,
	pub warnings: Vec<TraversalWarning>,
}

/// Collect the descendants of `root`, children of `root` being at `current_depth`.
///
/// Returns nothing, without any fetch, when `current_depth > max_depth`. Called as
/// `collect(.., 1, 1)` this yields the direct children only. Failing to fetch the
/// root's own children is an error; failing below that is a warning.
#[instrument(skip(client, index))]
pub async fn collect<C: SubIssueSource + ?Sized>(client: &C, root: &IssueRef, index: &ItemIndex, current_depth: usize, max_depth: usize) -> Result<Hierarchy> {
	let mut out = Hierarchy::default();
	let mut visited = HashSet::from([root.clone()]);
	collect_into(client, root, index, current_depth, max_depth, &mut visited, &mut out)
		.await
		.wrap_err_with(|| format!("Failed to fetch sub-issues of {root}"))?;
	tracing::debug!(n_nodes = out.nodes.len(), n_warnings = out.warnings.len(), "collected hierarchy");
	Ok(out)
}

fn collect_into<'a, C: SubIssueSource + ?Sized>(
	client: &'a C,
	parent: &'a IssueRef,
	index: &'a ItemIndex,
	depth: usize,
	max_depth: usize,
	visited: &'a mut HashSet<IssueRef>,
	out: &'a mut Hierarchy,
) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
	Box::pin(async move {
		if depth > max_depth {
			return Ok(());
		}
		let children = client.fetch_sub_issues(parent).await?;

		for child in children {
			let reference = child.reference();
			if !visited.insert(reference.clone()) {
				tracing::warn!(issue = %reference, parent = %parent, "sub-issue cycle, not descending");
				out.warnings.push(TraversalWarning {
					issue: reference,
					message: format!("already visited (cycle through {parent})"),
				});
				continue;
			}

			let item_id = index.item_id(&reference).map(str::to_string);
			out.nodes.push(HierarchyNode { issue: child, item_id, depth });

			if let Err(e) = collect_into(client, &reference, index, depth + 1, max_depth, visited, out).await {
				tracing::warn!(issue = %reference, error = %e, "skipping branch");
				out.warnings.push(TraversalWarning {
					issue: reference.clone(),
					message: format!("{e:#}"),
				});
			}
		}
		Ok(())
	})
}
