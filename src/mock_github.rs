//! Mock GitHub client for testing purposes.
//!
//! Stores issues, sub-issue links and a single project board in memory. Used by
//! unit tests directly, and by the `is_integration_test` build, which seeds it
//! from the JSON file named by `GHPM_MOCK_STATE`.

use std::{
	collections::{BTreeMap, HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail, eyre};
use ghpm::{FieldDataType, FieldOption, FieldValue, Issue, IssueRef, IssueState, ItemContent, ItemsPage, Project, ProjectField, RawProjectItem, RepoRef};
use serde::Deserialize;
use tracing::instrument;

use crate::github::{AddItemOutcome, IssueSource, IssueWriter, ProjectSource, ProjectWriter, SubIssueSource};

/// Internal representation of an issue in the mock
#[derive(Clone, Debug)]
struct MockIssueData {
	id: String,
	title: String,
	body: String,
	state: IssueState,
	labels: Vec<String>,
	assignees: Vec<String>,
	milestone: Option<String>,
}

#[derive(Clone, Debug)]
enum MockItemContent {
	Issue(IssueRef),
	PullRequest,
	DraftIssue,
}

#[derive(Clone, Debug)]
struct MockItem {
	id: String,
	content: MockItemContent,
	field_values: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
struct MockProject {
	project: Project,
	fields: Vec<ProjectField>,
	items: Vec<MockItem>,
}

/// A field-value mutation as received by the mock.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldWrite {
	pub item_id: String,
	pub field_id: String,
	pub value: FieldValue,
}

/// Mock GitHub client that stores all state in memory.
/// Thread-safe for use in async contexts.
#[derive(Default)]
pub struct MockGitHubClient {
	next_id: AtomicU64,

	/// All issues, keyed by repository then number
	issues: Mutex<HashMap<RepoRef, BTreeMap<u64, MockIssueData>>>,

	/// Parent → children, in insertion order
	sub_issues: Mutex<HashMap<IssueRef, Vec<IssueRef>>>,

	/// At most one board; that is all the CLI ever talks to
	project: Mutex<Option<MockProject>>,

	/// Issues whose sub-issue fetch fails
	fail_sub_issues: Mutex<HashSet<IssueRef>>,

	/// Make `fetch_item_id` come back empty, like a host that cannot report existing items
	hide_existing_items: AtomicBool,

	field_writes: Mutex<Vec<FieldWrite>>,

	/// Labels the host refuses to apply
	rejected_labels: Mutex<HashSet<String>>,

	/// Call log for debugging
	call_log: Mutex<Vec<String>>,
}

impl MockGitHubClient {
	pub fn new() -> Self {
		Self {
			next_id: AtomicU64::new(1000),
			..Default::default()
		}
	}

	/// Load the client from the state file named by `GHPM_MOCK_STATE`, or start empty.
	#[cfg(feature = "is_integration_test")]
	pub fn from_env() -> Result<Self> {
		let client = Self::new();
		if let Ok(state_file) = std::env::var("GHPM_MOCK_STATE") {
			let content = std::fs::read_to_string(&state_file).map_err(|e| eyre!("Failed to read mock state {state_file}: {e}"))?;
			client.load_state_json(&content)?;
			tracing::debug!(target: "mock_github", %state_file, "loaded mock state");
		}
		Ok(client)
	}

	/// Load state from JSON content
	///
	/// ```json
	/// {
	///   "issues": [{"owner": "o", "repo": "r", "number": 1, "title": "t", "labels": ["bug"]}],
	///   "sub_issues": [{"parent": "o/r#1", "children": ["o/r#2", "x/y#5"]}],
	///   "project": {"owner": "o", "number": 3, "title": "Board",
	///     "fields": [{"name": "Status", "data_type": "SINGLE_SELECT", "options": ["Backlog", "Done"]}],
	///     "items": ["o/r#1"]},
	///   "fail_sub_issues": ["o/r#3"]
	/// }
	/// ```
	pub fn load_state_json(&self, content: &str) -> Result<()> {
		let state: MockState = serde_json::from_str(content)?;

		for issue in state.issues {
			let repo = RepoRef::new(issue.owner, issue.repo);
			let mut data = self.issue_data(&issue.title, issue.state);
			data.body = issue.body;
			data.labels = issue.labels;
			data.assignees = issue.assignees;
			data.milestone = issue.milestone;
			self.issues.lock().unwrap().entry(repo).or_default().insert(issue.number, data);
		}

		for rel in state.sub_issues {
			for child in rel.children {
				self.add_sub_issue_relation(&rel.parent, &child);
			}
		}

		if let Some(project) = state.project {
			self.add_project(&project.owner, project.number, &project.title);
			for field in project.fields {
				let options: Vec<&str> = field.options.iter().map(String::as_str).collect();
				self.add_field(&field.name, FieldDataType::from(field.data_type.as_str()), &options);
			}
			for item in project.items {
				self.add_project_item(&item)?;
			}
			for _ in 0..project.pull_requests {
				self.add_non_issue_item(false);
			}
		}

		for issue in state.fail_sub_issues {
			self.fail_sub_issues_for(&issue);
		}
		self.hide_existing_items.store(state.hide_existing_items, Ordering::SeqCst);

		Ok(())
	}

	fn issue_data(&self, title: &str, state: IssueState) -> MockIssueData {
		MockIssueData {
			id: format!("I_{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
			title: title.to_string(),
			body: String::new(),
			state,
			labels: Vec::new(),
			assignees: Vec::new(),
			milestone: None,
		}
	}

	/// Add an issue to the mock state. Returns its node id.
	pub fn add_issue(&self, issue: &IssueRef, title: &str, state: IssueState, labels: &[&str]) -> String {
		let mut data = self.issue_data(title, state);
		data.labels = labels.iter().map(|s| s.to_string()).collect();
		let id = data.id.clone();
		self.issues.lock().unwrap().entry(issue.repo.clone()).or_default().insert(issue.number, data);
		id
	}

	#[cfg(test)]
	pub fn set_body(&self, issue: &IssueRef, body: &str) {
		if let Some(data) = self.issues.lock().unwrap().get_mut(&issue.repo).and_then(|r| r.get_mut(&issue.number)) {
			data.body = body.to_string();
		}
	}

	/// Add a sub-issue relationship
	pub fn add_sub_issue_relation(&self, parent: &IssueRef, child: &IssueRef) {
		self.sub_issues.lock().unwrap().entry(parent.clone()).or_default().push(child.clone());
	}

	pub fn fail_sub_issues_for(&self, issue: &IssueRef) {
		self.fail_sub_issues.lock().unwrap().insert(issue.clone());
	}

	#[cfg(test)]
	pub fn reject_label(&self, label: &str) {
		self.rejected_labels.lock().unwrap().insert(label.to_string());
	}

	#[cfg(test)]
	pub fn hide_existing_items(&self) {
		self.hide_existing_items.store(true, Ordering::SeqCst);
	}

	pub fn add_project(&self, owner: &str, number: u64, title: &str) {
		let project = Project {
			id: format!("PVT_{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
			number,
			title: title.to_string(),
			owner: owner.to_string(),
		};
		*self.project.lock().unwrap() = Some(MockProject {
			project,
			fields: Vec::new(),
			items: Vec::new(),
		});
	}

	/// Add a field to the project. Options only matter for `SINGLE_SELECT`.
	pub fn add_field(&self, name: &str, data_type: FieldDataType, options: &[&str]) {
		let field_id = format!("PVTF_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
		let options = options
			.iter()
			.map(|o| FieldOption {
				id: format!("opt_{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
				name: o.to_string(),
			})
			.collect();
		if let Some(project) = self.project.lock().unwrap().as_mut() {
			project.fields.push(ProjectField {
				id: field_id,
				name: name.to_string(),
				data_type,
				options,
			});
		}
	}

	/// Put an existing issue on the board. Returns the item id.
	pub fn add_project_item(&self, issue: &IssueRef) -> Result<String> {
		if self.lookup_issue(issue).is_none() {
			bail!("Issue not found: {issue}");
		}
		let item_id = self.next_item_id();
		let mut project = self.project.lock().unwrap();
		let project = project.as_mut().ok_or_else(|| eyre!("No project configured"))?;
		project.items.push(MockItem {
			id: item_id.clone(),
			content: MockItemContent::Issue(issue.clone()),
			field_values: BTreeMap::new(),
		});
		Ok(item_id)
	}

	/// Put a pull request or draft on the board.
	pub fn add_non_issue_item(&self, draft: bool) {
		let id = self.next_item_id();
		if let Some(project) = self.project.lock().unwrap().as_mut() {
			project.items.push(MockItem {
				id,
				content: if draft { MockItemContent::DraftIssue } else { MockItemContent::PullRequest },
				field_values: BTreeMap::new(),
			});
		}
	}

	fn next_item_id(&self) -> String {
		format!("PVTI_{}", self.next_id.fetch_add(1, Ordering::SeqCst))
	}

	/// Get the call log for debugging
	#[cfg(test)]
	pub fn get_call_log(&self) -> Vec<String> {
		self.call_log.lock().unwrap().clone()
	}

	#[cfg(test)]
	pub fn field_writes(&self) -> Vec<FieldWrite> {
		self.field_writes.lock().unwrap().clone()
	}

	#[cfg(test)]
	pub fn labels_of(&self, issue: &IssueRef) -> Vec<String> {
		self.lookup_issue(issue).map(|d| d.labels).unwrap_or_default()
	}

	#[cfg(test)]
	pub fn children_of(&self, parent: &IssueRef) -> Vec<IssueRef> {
		self.sub_issues.lock().unwrap().get(parent).cloned().unwrap_or_default()
	}

	#[cfg(test)]
	pub fn project_item_count(&self) -> usize {
		self.project.lock().unwrap().as_ref().map(|p| p.items.len()).unwrap_or(0)
	}

	fn log_call(&self, call: &str) {
		self.call_log.lock().unwrap().push(call.to_string());
	}

	fn lookup_issue(&self, issue: &IssueRef) -> Option<MockIssueData> {
		self.issues.lock().unwrap().get(&issue.repo).and_then(|r| r.get(&issue.number)).cloned()
	}

	fn find_by_id(&self, id: &str) -> Option<IssueRef> {
		let issues = self.issues.lock().unwrap();
		issues
			.iter()
			.find_map(|(repo, by_number)| by_number.iter().find(|(_, d)| d.id == id).map(|(number, _)| IssueRef::new(repo.clone(), *number)))
	}

	fn convert_issue_data(&self, issue: &IssueRef, data: MockIssueData) -> Issue {
		Issue {
			id: data.id,
			number: issue.number,
			title: data.title,
			body: data.body,
			state: data.state,
			repo: issue.repo.clone(),
			labels: data.labels,
			assignees: data.assignees,
			milestone: data.milestone,
		}
	}

	fn get_issue(&self, issue: &IssueRef) -> Result<Issue> {
		let data = self.lookup_issue(issue).ok_or_else(|| eyre!("Issue not found: {issue}"))?;
		Ok(self.convert_issue_data(issue, data))
	}

	fn project_id_matches(&self, project_id: &str) -> Result<()> {
		match self.project.lock().unwrap().as_ref() {
			Some(p) if p.project.id == project_id => Ok(()),
			_ => bail!("Project not found: {project_id}"),
		}
	}
}

#[async_trait]
impl IssueSource for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::fetch_issue")]
	async fn fetch_issue(&self, issue: &IssueRef) -> Result<Issue> {
		tracing::info!(target: "mock_github", owner = issue.repo.owner.as_str(), repo = issue.repo.name.as_str(), issue_number = issue.number, "fetch_issue");
		self.log_call(&format!("fetch_issue({issue})"));
		self.get_issue(issue)
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_parent_issue")]
	async fn fetch_parent_issue(&self, issue: &IssueRef) -> Result<Option<Issue>> {
		tracing::info!(target: "mock_github", owner = issue.repo.owner.as_str(), repo = issue.repo.name.as_str(), issue_number = issue.number, "fetch_parent_issue");
		self.log_call(&format!("fetch_parent_issue({issue})"));

		let parent = self.sub_issues.lock().unwrap().iter().find(|(_, children)| children.contains(issue)).map(|(parent, _)| parent.clone());
		parent.map(|p| self.get_issue(&p)).transpose()
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_repository_issues")]
	async fn fetch_repository_issues(&self, repo: &RepoRef, state: IssueState) -> Result<Vec<Issue>> {
		tracing::info!(target: "mock_github", owner = repo.owner.as_str(), repo = repo.name.as_str(), state = %state, "fetch_repository_issues");
		self.log_call(&format!("fetch_repository_issues({repo}, {state})"));

		let issues = self.issues.lock().unwrap();
		let Some(by_number) = issues.get(repo) else {
			return Ok(Vec::new());
		};
		Ok(by_number
			.iter()
			.filter(|(_, d)| d.state == state)
			.map(|(number, d)| self.convert_issue_data(&IssueRef::new(repo.clone(), *number), d.clone()))
			.collect())
	}
}

#[async_trait]
impl SubIssueSource for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::fetch_sub_issues")]
	async fn fetch_sub_issues(&self, parent: &IssueRef) -> Result<Vec<Issue>> {
		tracing::info!(target: "mock_github", owner = parent.repo.owner.as_str(), repo = parent.repo.name.as_str(), issue_number = parent.number, "fetch_sub_issues");
		self.log_call(&format!("fetch_sub_issues({parent})"));

		if self.fail_sub_issues.lock().unwrap().contains(parent) {
			bail!("fetch_sub_issues: 502 Bad Gateway for {parent}");
		}
		let children = self.sub_issues.lock().unwrap().get(parent).cloned().unwrap_or_default();
		children.iter().map(|child| self.get_issue(child)).collect()
	}
}

#[async_trait]
impl ProjectSource for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::fetch_project")]
	async fn fetch_project(&self, owner: &str, number: u64) -> Result<Project> {
		tracing::info!(target: "mock_github", owner, project_number = number, "fetch_project");
		self.log_call(&format!("fetch_project({owner}, {number})"));

		match self.project.lock().unwrap().as_ref() {
			Some(p) if p.project.owner == owner && p.project.number == number => Ok(p.project.clone()),
			_ => bail!("Project {owner}/{number} not found"),
		}
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_project_fields")]
	async fn fetch_project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>> {
		tracing::info!(target: "mock_github", project_id, "fetch_project_fields");
		self.log_call(&format!("fetch_project_fields({project_id})"));
		self.project_id_matches(project_id)?;
		Ok(self.project.lock().unwrap().as_ref().map(|p| p.fields.clone()).unwrap_or_default())
	}

	/// Cursors are stringified offsets; callers must treat them as opaque.
	#[instrument(skip(self), name = "MockGitHubClient::fetch_project_items_page")]
	async fn fetch_project_items_page(&self, project_id: &str, cursor: Option<&str>, page_size: u32) -> Result<ItemsPage> {
		tracing::info!(target: "mock_github", project_id, cursor, page_size, "fetch_project_items_page");
		self.log_call(&format!("fetch_project_items_page({project_id}, {cursor:?}, {page_size})"));
		self.project_id_matches(project_id)?;

		let start: usize = match cursor {
			Some(c) => c.strip_prefix("cursor:").and_then(|n| n.parse().ok()).ok_or_else(|| eyre!("Invalid cursor: {c}"))?,
			None => 0,
		};
		let items = self.project.lock().unwrap().as_ref().map(|p| p.items.clone()).unwrap_or_default();
		let end = (start + page_size.max(1) as usize).min(items.len());

		let mut page = Vec::new();
		for item in items.get(start..end).unwrap_or_default() {
			let content = match &item.content {
				MockItemContent::Issue(issue) => ItemContent::Issue(self.get_issue(issue)?),
				MockItemContent::PullRequest => ItemContent::PullRequest,
				MockItemContent::DraftIssue => ItemContent::DraftIssue,
			};
			page.push(RawProjectItem {
				id: item.id.clone(),
				content,
				field_values: item.field_values.clone(),
			});
		}

		let has_next_page = end < items.len();
		Ok(ItemsPage {
			items: page,
			end_cursor: (end > start).then(|| format!("cursor:{end}")),
			has_next_page,
		})
	}

	#[instrument(skip(self), name = "MockGitHubClient::fetch_item_id")]
	async fn fetch_item_id(&self, project_id: &str, issue_id: &str) -> Result<Option<String>> {
		tracing::info!(target: "mock_github", project_id, issue_id, "fetch_item_id");
		self.log_call(&format!("fetch_item_id({project_id}, {issue_id})"));
		self.project_id_matches(project_id)?;

		if self.hide_existing_items.load(Ordering::SeqCst) {
			return Ok(None);
		}
		let Some(issue) = self.find_by_id(issue_id) else {
			return Ok(None);
		};
		let project = self.project.lock().unwrap();
		Ok(project
			.as_ref()
			.and_then(|p| p.items.iter().find(|i| matches!(&i.content, MockItemContent::Issue(r) if *r == issue)))
			.map(|i| i.id.clone()))
	}
}

#[async_trait]
impl ProjectWriter for MockGitHubClient {
	/// A duplicate add reports `AlreadyMember` without the id, the way the host does.
	#[instrument(skip(self), name = "MockGitHubClient::add_issue_to_project")]
	async fn add_issue_to_project(&self, project_id: &str, issue_id: &str) -> Result<AddItemOutcome> {
		tracing::info!(target: "mock_github", project_id, issue_id, "add_issue_to_project");
		self.log_call(&format!("add_issue_to_project({project_id}, {issue_id})"));
		self.project_id_matches(project_id)?;

		let issue = self.find_by_id(issue_id).ok_or_else(|| eyre!("Could not resolve to a node with the global id of '{issue_id}'"))?;
		let already = self
			.project
			.lock()
			.unwrap()
			.as_ref()
			.is_some_and(|p| p.items.iter().any(|i| matches!(&i.content, MockItemContent::Issue(r) if *r == issue)));
		if already {
			return Ok(AddItemOutcome::AlreadyMember { item_id: None });
		}
		let item_id = self.add_project_item(&issue)?;
		Ok(AddItemOutcome::Added { item_id })
	}

	#[instrument(skip(self), name = "MockGitHubClient::set_field_value")]
	async fn set_field_value(&self, project_id: &str, item_id: &str, field_id: &str, value: &FieldValue) -> Result<()> {
		tracing::info!(target: "mock_github", project_id, item_id, field_id, "set_field_value");
		self.log_call(&format!("set_field_value({item_id}, {field_id})"));
		self.project_id_matches(project_id)?;

		let mut project = self.project.lock().unwrap();
		let Some(project) = project.as_mut() else {
			bail!("No project configured");
		};
		let field = project.fields.iter().find(|f| f.id == field_id).ok_or_else(|| eyre!("Field not found: {field_id}"))?;
		let display = match value {
			FieldValue::SingleSelect { option_id } => field.options.iter().find(|o| &o.id == option_id).map(|o| o.name.clone()).ok_or_else(|| eyre!("Option not found: {option_id}"))?,
			FieldValue::Text(text) => text.clone(),
			FieldValue::Number(n) => n.to_string(),
		};
		let field_name = field.name.clone();
		let item = project.items.iter_mut().find(|i| i.id == item_id).ok_or_else(|| eyre!("Item not found: {item_id}"))?;
		item.field_values.insert(field_name, display);

		self.field_writes.lock().unwrap().push(FieldWrite {
			item_id: item_id.to_string(),
			field_id: field_id.to_string(),
			value: value.clone(),
		});
		Ok(())
	}
}

#[async_trait]
impl IssueWriter for MockGitHubClient {
	#[instrument(skip(self), name = "MockGitHubClient::add_label")]
	async fn add_label(&self, issue: &IssueRef, label: &str) -> Result<()> {
		tracing::info!(target: "mock_github", owner = issue.repo.owner.as_str(), repo = issue.repo.name.as_str(), issue_number = issue.number, label, "add_label");
		self.log_call(&format!("add_label({issue}, {label})"));

		if self.rejected_labels.lock().unwrap().contains(label) {
			bail!("add_label: 422 Unprocessable Entity - label '{label}' is not allowed");
		}

		let mut issues = self.issues.lock().unwrap();
		let data = issues.get_mut(&issue.repo).and_then(|r| r.get_mut(&issue.number)).ok_or_else(|| eyre!("Issue not found: {issue}"))?;
		if !data.labels.iter().any(|l| l == label) {
			data.labels.push(label.to_string());
		}
		Ok(())
	}

	#[instrument(skip(self, body), name = "MockGitHubClient::create_issue")]
	async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue> {
		tracing::info!(target: "mock_github", owner = repo.owner.as_str(), repo = repo.name.as_str(), title, "create_issue");
		self.log_call(&format!("create_issue({repo}, {title})"));

		let number = self.issues.lock().unwrap().get(repo).and_then(|r| r.keys().next_back().copied()).unwrap_or(0) + 1;
		let reference = IssueRef::new(repo.clone(), number);
		self.add_issue(&reference, title, IssueState::Open, &[]);
		if let Some(data) = self.issues.lock().unwrap().get_mut(repo).and_then(|r| r.get_mut(&number)) {
			data.body = body.to_string();
		}
		self.get_issue(&reference)
	}

	#[instrument(skip(self), name = "MockGitHubClient::add_sub_issue")]
	async fn add_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()> {
		tracing::info!(target: "mock_github", parent_id, child_id, "add_sub_issue");
		self.log_call(&format!("add_sub_issue({parent_id}, {child_id})"));

		let parent = self.find_by_id(parent_id).ok_or_else(|| eyre!("Issue not found: {parent_id}"))?;
		let child = self.find_by_id(child_id).ok_or_else(|| eyre!("Issue not found: {child_id}"))?;
		let mut links = self.sub_issues.lock().unwrap();
		if links.values().any(|children| children.contains(&child)) {
			bail!("Sub issue may only have one parent: {child} already has a parent");
		}
		links.entry(parent).or_default().push(child);
		Ok(())
	}

	#[instrument(skip(self), name = "MockGitHubClient::remove_sub_issue")]
	async fn remove_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()> {
		tracing::info!(target: "mock_github", parent_id, child_id, "remove_sub_issue");
		self.log_call(&format!("remove_sub_issue({parent_id}, {child_id})"));

		let parent = self.find_by_id(parent_id).ok_or_else(|| eyre!("Issue not found: {parent_id}"))?;
		let child = self.find_by_id(child_id).ok_or_else(|| eyre!("Issue not found: {child_id}"))?;
		let mut links = self.sub_issues.lock().unwrap();
		let children = links.entry(parent).or_default();
		let before = children.len();
		children.retain(|c| *c != child);
		if children.len() == before {
			bail!("{child} is not a sub-issue of the given parent");
		}
		Ok(())
	}
}

#[derive(Deserialize)]
struct MockState {
	#[serde(default)]
	issues: Vec<MockStateIssue>,
	#[serde(default)]
	sub_issues: Vec<MockStateLink>,
	project: Option<MockStateProject>,
	#[serde(default)]
	fail_sub_issues: Vec<IssueRef>,
	#[serde(default)]
	hide_existing_items: bool,
}

#[derive(Deserialize)]
struct MockStateIssue {
	owner: String,
	repo: String,
	number: u64,
	#[serde(default)]
	title: String,
	#[serde(default)]
	body: String,
	#[serde(default = "open_state")]
	state: IssueState,
	#[serde(default)]
	labels: Vec<String>,
	#[serde(default)]
	assignees: Vec<String>,
	milestone: Option<String>,
}

fn open_state() -> IssueState {
	IssueState::Open
}

#[derive(Deserialize)]
struct MockStateLink {
	parent: IssueRef,
	children: Vec<IssueRef>,
}

#[derive(Deserialize)]
struct MockStateProject {
	owner: String,
	number: u64,
	#[serde(default)]
	title: String,
	#[serde(default)]
	fields: Vec<MockStateField>,
	#[serde(default)]
	items: Vec<IssueRef>,
	/// Pull request items appended after the issue items
	#[serde(default)]
	pull_requests: usize,
}

#[derive(Deserialize)]
struct MockStateField {
	name: String,
	data_type: String,
	#[serde(default)]
	options: Vec<String>,
}
