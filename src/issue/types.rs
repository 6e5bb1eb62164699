use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::{IssueRef, RepoRef};

/// Issue state. The GraphQL API spells it `OPEN`/`CLOSED`, REST uses lowercase.
#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum IssueState {
	#[default]
	#[serde(rename = "OPEN", alias = "open")]
	#[display("OPEN")]
	Open,
	#[serde(rename = "CLOSED", alias = "closed")]
	#[display("CLOSED")]
	Closed,
}

impl IssueState {
	pub fn is_open(self) -> bool {
		self == Self::Open
	}
}

/// An issue as fetched from the host.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Issue {
	/// Opaque node id, used by every mutation.
	pub id: String,
	pub number: u64,
	pub title: String,
	#[serde(default)]
	pub body: String,
	pub state: IssueState,
	pub repo: RepoRef,
	#[serde(default)]
	pub labels: Vec<String>,
	#[serde(default)]
	pub assignees: Vec<String>,
	#[serde(default)]
	pub milestone: Option<String>,
}

impl Issue {
	pub fn reference(&self) -> IssueRef {
		IssueRef::new(self.repo.clone(), self.number)
	}

	/// Exact, case-sensitive label lookup.
	pub fn has_label(&self, name: &str) -> bool {
		self.labels.iter().any(|l| l == name)
	}
}

/// One entry of a sub-issue traversal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HierarchyNode {
	pub issue: Issue,
	/// Project item id, `None` when the issue is not on the board.
	pub item_id: Option<String>,
	/// Distance from the traversal root; direct children are at the depth the walk started with.
	pub depth: usize,
}

impl HierarchyNode {
	pub fn is_project_item(&self) -> bool {
		self.item_id.is_some()
	}
}
