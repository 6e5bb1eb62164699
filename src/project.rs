//! Project board types: fields, options, items and pages of items.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::issue::Issue;

/// A Projects board.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Project {
	pub id: String,
	pub number: u64,
	pub title: String,
	pub owner: String,
}

/// Declared data type of a project field, as spelled by the host (`SINGLE_SELECT`, ...).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FieldDataType {
	SingleSelect,
	Text,
	Number,
	Date,
	Iteration,
	Other(String),
}

impl FieldDataType {
	pub fn as_str(&self) -> &str {
		match self {
			Self::SingleSelect => "SINGLE_SELECT",
			Self::Text => "TEXT",
			Self::Number => "NUMBER",
			Self::Date => "DATE",
			Self::Iteration => "ITERATION",
			Self::Other(s) => s,
		}
	}
}

impl From<&str> for FieldDataType {
	fn from(s: &str) -> Self {
		match s {
			"SINGLE_SELECT" => Self::SingleSelect,
			"TEXT" => Self::Text,
			"NUMBER" => Self::Number,
			"DATE" => Self::Date,
			"ITERATION" => Self::Iteration,
			other => Self::Other(other.to_string()),
		}
	}
}

impl fmt::Display for FieldDataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Serialize for FieldDataType {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for FieldDataType {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Ok(Self::from(s.as_str()))
	}
}

/// A single-select option. `id` is stable, `name` is what users see.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldOption {
	pub id: String,
	pub name: String,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProjectField {
	pub id: String,
	pub name: String,
	pub data_type: FieldDataType,
	/// Ordered as on the board. Empty unless `SINGLE_SELECT`.
	#[serde(default)]
	pub options: Vec<FieldOption>,
}

impl ProjectField {
	/// Exact, case-sensitive option lookup.
	pub fn option_named(&self, name: &str) -> Option<&FieldOption> {
		self.options.iter().find(|o| o.name == name)
	}

	pub fn option_names(&self) -> Vec<String> {
		self.options.iter().map(|o| o.name.clone()).collect()
	}
}

/// Typed payload of a field-value mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
	/// Always the option's stable id, never its display name.
	SingleSelect { option_id: String },
	Text(String),
	Number(f64),
}

impl FieldValue {
	/// The `ProjectV2FieldValue` input object.
	pub fn to_graphql_input(&self) -> serde_json::Value {
		match self {
			Self::SingleSelect { option_id } => serde_json::json!({ "singleSelectOptionId": option_id }),
			Self::Text(text) => serde_json::json!({ "text": text }),
			Self::Number(number) => serde_json::json!({ "number": number }),
		}
	}
}

/// What a project item points at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ItemContent {
	Issue(Issue),
	PullRequest,
	DraftIssue,
}

/// A project item as returned by one page, before filtering.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawProjectItem {
	pub id: String,
	pub content: ItemContent,
	pub field_values: BTreeMap<String, String>,
}

impl RawProjectItem {
	/// Keep only items backed by an issue.
	pub fn into_issue_item(self) -> Option<ProjectItem> {
		match self.content {
			ItemContent::Issue(issue) => Some(ProjectItem {
				id: self.id,
				issue,
				field_values: self.field_values,
			}),
			ItemContent::PullRequest | ItemContent::DraftIssue => None,
		}
	}
}

/// An issue's membership in a project, with its current field values by field name.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ProjectItem {
	pub id: String,
	pub issue: Issue,
	pub field_values: BTreeMap<String, String>,
}

/// One page of project items, cursor-paginated.
#[derive(Clone, Debug, Default)]
pub struct ItemsPage {
	pub items: Vec<RawProjectItem>,
	pub end_cursor: Option<String>,
	pub has_next_page: bool,
}
