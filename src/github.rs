use std::{fmt, sync::Arc};

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use ghpm::{FieldDataType, FieldOption, FieldValue, Issue, IssueRef, IssueState, ItemContent, ItemsPage, Project, ProjectField, RawProjectItem, RepoRef, is_already_member};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::instrument;

const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("ghpm/", env!("CARGO_PKG_VERSION"));
/// Host-side maximum for `first:` on connections.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Result of asking the host to put an issue on a board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddItemOutcome {
	Added { item_id: String },
	/// The host reported a duplicate; it may or may not say which item.
	AlreadyMember { item_id: Option<String> },
}

//==============================================================================
// Capability traits
//==============================================================================

/// Reading issues.
#[async_trait]
pub trait IssueSource: Send + Sync {
	async fn fetch_issue(&self, issue: &IssueRef) -> Result<Issue>;

	/// `None` when the issue has no parent.
	async fn fetch_parent_issue(&self, issue: &IssueRef) -> Result<Option<Issue>>;

	/// Every issue of the repository in the given state, oldest first.
	async fn fetch_repository_issues(&self, repo: &RepoRef, state: IssueState) -> Result<Vec<Issue>>;
}

/// Reading sub-issue links.
#[async_trait]
pub trait SubIssueSource: Send + Sync {
	/// Direct children, in host order. Children may live in other repositories.
	async fn fetch_sub_issues(&self, parent: &IssueRef) -> Result<Vec<Issue>>;
}

/// Reading project boards.
#[async_trait]
pub trait ProjectSource: Send + Sync {
	async fn fetch_project(&self, owner: &str, number: u64) -> Result<Project>;

	async fn fetch_project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>>;

	async fn fetch_project_items_page(&self, project_id: &str, cursor: Option<&str>, page_size: u32) -> Result<ItemsPage>;

	/// The item representing `issue_id` on `project_id`, if any.
	async fn fetch_item_id(&self, project_id: &str, issue_id: &str) -> Result<Option<String>>;
}

/// Writing to project boards.
#[async_trait]
pub trait ProjectWriter: Send + Sync {
	async fn add_issue_to_project(&self, project_id: &str, issue_id: &str) -> Result<AddItemOutcome>;

	async fn set_field_value(&self, project_id: &str, item_id: &str, field_id: &str, value: &FieldValue) -> Result<()>;
}

/// Writing to issues.
#[async_trait]
pub trait IssueWriter: Send + Sync {
	async fn add_label(&self, issue: &IssueRef, label: &str) -> Result<()>;

	async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue>;

	/// Both ids are node ids, not issue numbers.
	async fn add_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()>;

	async fn remove_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()>;
}

/// Everything the CLI needs from the host.
pub trait GitHubClient: IssueSource + SubIssueSource + ProjectSource + ProjectWriter + IssueWriter {}

impl<T: IssueSource + SubIssueSource + ProjectSource + ProjectWriter + IssueWriter + ?Sized> GitHubClient for T {}

pub type BoxedGitHubClient = Arc<dyn GitHubClient>;

//==============================================================================
// Real client
//==============================================================================

/// GraphQL for reads and project mutations, REST where GraphQL wants extra lookups (labels, issue creation).
pub struct RealGitHubClient {
	http_client: Client,
	api_url: String,
	github_token: String,
}

impl fmt::Debug for RealGitHubClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RealGitHubClient").field("api_url", &self.api_url).field("github_token", &"<redacted>").finish()
	}
}

impl RealGitHubClient {
	pub fn new(github_token: impl Into<String>, api_url: Option<String>) -> Result<Self> {
		let http_client = Client::builder().user_agent(USER_AGENT).build().wrap_err("failed to initialize HTTP client")?;
		Ok(Self {
			http_client,
			api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()).trim_end_matches('/').to_string(),
			github_token: github_token.into(),
		})
	}

	fn auth_header(&self) -> String {
		format!("Bearer {}", self.github_token)
	}

	#[instrument(skip(self, query, variables), name = "RealGitHubClient::graphql")]
	async fn graphql(&self, operation: &str, query: &str, variables: Value) -> Result<Value> {
		let res = self
			.http_client
			.post(format!("{}/graphql", self.api_url))
			.header("Authorization", self.auth_header())
			.header("GraphQL-Features", "sub_issues")
			.json(&json!({ "query": query, "variables": variables }))
			.send()
			.await
			.wrap_err_with(|| format!("{operation}: request failed"))?;

		let status = res.status();
		let body = res.text().await.unwrap_or_default();
		if !status.is_success() {
			bail!("{operation}: {status} - {}", truncate_for_error(&body));
		}

		let envelope: GraphqlEnvelope = serde_json::from_str(&body).wrap_err_with(|| format!("{operation}: malformed response"))?;
		if let Some(errors) = envelope.errors
			&& !errors.is_empty()
		{
			let message = errors.into_iter().map(|e| e.message).collect::<Vec<_>>().join("; ");
			bail!("{operation}: {message}");
		}
		envelope.data.ok_or_else(|| eyre!("{operation}: response had no data"))
	}

	async fn rest_post(&self, operation: &str, path: &str, payload: Value) -> Result<Value> {
		let res = self
			.http_client
			.post(format!("{}{path}", self.api_url))
			.header("Authorization", self.auth_header())
			.header("Accept", "application/vnd.github+json")
			.json(&payload)
			.send()
			.await?;

		if !res.status().is_success() {
			let status = res.status();
			let body = res.text().await.unwrap_or_default();
			bail!("{operation}: {status} - {}", truncate_for_error(&body));
		}

		Ok(res.json::<Value>().await?)
	}

	/// Walk an issue connection at `pointer` until exhausted.
	async fn collect_issue_pages(&self, operation: &str, query: &str, mut variables: Value, pointer: &str, fallback_repo: &RepoRef) -> Result<Vec<Issue>> {
		let mut out = Vec::new();
		loop {
			let data = self.graphql(operation, query, variables.clone()).await?;
			let Some(connection) = take_at::<Connection<IssueNode>>(&data, pointer)? else {
				bail!("{operation}: issue not found");
			};
			out.extend(connection.nodes.into_iter().flatten().map(|n| n.into_issue(fallback_repo)));
			match connection.page_info {
				Some(PageInfo {
					has_next_page: true,
					end_cursor: Some(cursor),
				}) => variables["after"] = json!(cursor),
				_ => return Ok(out),
			}
		}
	}
}

#[async_trait]
impl IssueSource for RealGitHubClient {
	async fn fetch_issue(&self, issue: &IssueRef) -> Result<Issue> {
		let query = with_issue_fields(ISSUE_QUERY);
		let data = self.graphql("fetch_issue", &query, issue_variables(issue)).await?;
		let node = take_at::<IssueNode>(&data, "/repository/issue")?.ok_or_else(|| eyre!("Issue not found: {issue}"))?;
		Ok(node.into_issue(&issue.repo))
	}

	async fn fetch_parent_issue(&self, issue: &IssueRef) -> Result<Option<Issue>> {
		let query = with_issue_fields(PARENT_QUERY);
		let data = self.graphql("fetch_parent_issue", &query, issue_variables(issue)).await?;
		Ok(take_at::<IssueNode>(&data, "/repository/issue/parent")?.map(|n| n.into_issue(&issue.repo)))
	}

	async fn fetch_repository_issues(&self, repo: &RepoRef, state: IssueState) -> Result<Vec<Issue>> {
		let query = with_issue_fields(REPOSITORY_ISSUES_QUERY);
		let variables = json!({ "owner": repo.owner, "name": repo.name, "states": [state.to_string()], "after": null });
		self.collect_issue_pages("fetch_repository_issues", &query, variables, "/repository/issues", repo).await
	}
}

#[async_trait]
impl SubIssueSource for RealGitHubClient {
	async fn fetch_sub_issues(&self, parent: &IssueRef) -> Result<Vec<Issue>> {
		let query = with_issue_fields(SUB_ISSUES_QUERY);
		let mut variables = issue_variables(parent);
		variables["after"] = Value::Null;
		// Children without repository info share the parent's repository
		self.collect_issue_pages("fetch_sub_issues", &query, variables, "/repository/issue/subIssues", &parent.repo).await
	}
}

#[async_trait]
impl ProjectSource for RealGitHubClient {
	async fn fetch_project(&self, owner: &str, number: u64) -> Result<Project> {
		let data = self.graphql("fetch_project", PROJECT_QUERY, json!({ "owner": owner, "number": number })).await?;
		let node = take_at::<ProjectNode>(&data, "/repositoryOwner/projectV2")?.ok_or_else(|| eyre!("Project {owner}/{number} not found"))?;
		Ok(Project {
			id: node.id,
			number: node.number,
			title: node.title,
			owner: owner.to_string(),
		})
	}

	async fn fetch_project_fields(&self, project_id: &str) -> Result<Vec<ProjectField>> {
		let data = self.graphql("fetch_project_fields", PROJECT_FIELDS_QUERY, json!({ "project": project_id })).await?;
		let connection = take_at::<Connection<FieldNode>>(&data, "/node/fields")?.ok_or_else(|| eyre!("Project {project_id} not found"))?;
		Ok(connection
			.nodes
			.into_iter()
			.flatten()
			.filter_map(|f| {
				Some(ProjectField {
					id: f.id?,
					name: f.name?,
					data_type: FieldDataType::from(f.data_type?.as_str()),
					options: f.options.unwrap_or_default(),
				})
			})
			.collect())
	}

	async fn fetch_project_items_page(&self, project_id: &str, cursor: Option<&str>, page_size: u32) -> Result<ItemsPage> {
		let query = with_issue_fields(PROJECT_ITEMS_QUERY);
		let variables = json!({ "project": project_id, "first": page_size.min(MAX_PAGE_SIZE), "after": cursor });
		let data = self.graphql("fetch_project_items_page", &query, variables).await?;
		let connection = take_at::<Connection<ItemNode>>(&data, "/node/items")?.ok_or_else(|| eyre!("Project {project_id} not found"))?;
		let page_info = connection.page_info.unwrap_or_default();

		let mut items = Vec::new();
		for node in connection.nodes.into_iter().flatten() {
			if let Some(item) = node.into_raw_item()? {
				items.push(item);
			}
		}
		Ok(ItemsPage {
			items,
			end_cursor: page_info.end_cursor,
			has_next_page: page_info.has_next_page,
		})
	}

	async fn fetch_item_id(&self, project_id: &str, issue_id: &str) -> Result<Option<String>> {
		let mut variables = json!({ "issue": issue_id, "after": null });
		loop {
			let data = self.graphql("fetch_item_id", ISSUE_PROJECT_ITEMS_QUERY, variables.clone()).await?;
			let Some(connection) = take_at::<Connection<IssueProjectItemNode>>(&data, "/node/projectItems")? else {
				return Ok(None);
			};
			if let Some(item) = connection.nodes.into_iter().flatten().find(|n| n.project.id == project_id) {
				return Ok(Some(item.id));
			}
			match connection.page_info {
				Some(PageInfo {
					has_next_page: true,
					end_cursor: Some(cursor),
				}) if variables["after"] != json!(cursor) => variables["after"] = json!(cursor),
				_ => return Ok(None),
			}
		}
	}
}

#[async_trait]
impl ProjectWriter for RealGitHubClient {
	async fn add_issue_to_project(&self, project_id: &str, issue_id: &str) -> Result<AddItemOutcome> {
		match self.graphql("add_issue_to_project", ADD_ITEM_MUTATION, json!({ "project": project_id, "content": issue_id })).await {
			Ok(data) => match take_at::<IdNode>(&data, "/addProjectV2ItemById/item")? {
				Some(item) => Ok(AddItemOutcome::Added { item_id: item.id }),
				None => bail!("add_issue_to_project: response carried no item"),
			},
			Err(e) if is_already_member(&format!("{e:#}")) => Ok(AddItemOutcome::AlreadyMember { item_id: None }),
			Err(e) => Err(e),
		}
	}

	async fn set_field_value(&self, project_id: &str, item_id: &str, field_id: &str, value: &FieldValue) -> Result<()> {
		let variables = json!({ "project": project_id, "item": item_id, "field": field_id, "value": value.to_graphql_input() });
		self.graphql("set_field_value", SET_FIELD_MUTATION, variables).await?;
		Ok(())
	}
}

#[async_trait]
impl IssueWriter for RealGitHubClient {
	async fn add_label(&self, issue: &IssueRef, label: &str) -> Result<()> {
		let path = format!("{}/issues/{}/labels", repo_path(&issue.repo), issue.number);
		self.rest_post("add_label", &path, json!({ "labels": [label] })).await?;
		Ok(())
	}

	async fn create_issue(&self, repo: &RepoRef, title: &str, body: &str) -> Result<Issue> {
		#[derive(Deserialize)]
		struct CreatedIssue {
			number: u64,
		}

		let path = format!("{}/issues", repo_path(repo));
		let created: CreatedIssue = serde_json::from_value(self.rest_post("create_issue", &path, json!({ "title": title, "body": body })).await?)?;
		self.fetch_issue(&IssueRef::new(repo.clone(), created.number)).await
	}

	async fn add_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()> {
		self.graphql("add_sub_issue", ADD_SUB_ISSUE_MUTATION, json!({ "parent": parent_id, "child": child_id })).await?;
		Ok(())
	}

	async fn remove_sub_issue(&self, parent_id: &str, child_id: &str) -> Result<()> {
		self.graphql("remove_sub_issue", REMOVE_SUB_ISSUE_MUTATION, json!({ "parent": parent_id, "child": child_id })).await?;
		Ok(())
	}
}

/// Create the client for a token. `GITHUB_API_URL` overrides the endpoint (GitHub Enterprise).
pub fn create_client(github_token: &str) -> Result<BoxedGitHubClient> {
	let api_url = std::env::var("GITHUB_API_URL").ok().filter(|u| !u.is_empty());
	Ok(Arc::new(RealGitHubClient::new(github_token, api_url)?))
}

//==============================================================================
// Wire format
//==============================================================================

const ISSUE_FIELDS: &str = r#"
fragment IssueFields on Issue {
  id
  number
  title
  body
  state
  repository { name owner { login } }
  labels(first: 50) { nodes { name } }
  assignees(first: 20) { nodes { login } }
  milestone { title }
}
"#;

const ISSUE_QUERY: &str = r#"
query Issue($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) { ...IssueFields }
  }
}
"#;

const PARENT_QUERY: &str = r#"
query ParentIssue($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) { parent { ...IssueFields } }
  }
}
"#;

const SUB_ISSUES_QUERY: &str = r#"
query SubIssues($owner: String!, $name: String!, $number: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) {
      subIssues(first: 100, after: $after) {
        nodes { ...IssueFields }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}
"#;

const REPOSITORY_ISSUES_QUERY: &str = r#"
query RepositoryIssues($owner: String!, $name: String!, $states: [IssueState!], $after: String) {
  repository(owner: $owner, name: $name) {
    issues(first: 100, after: $after, states: $states, orderBy: { field: CREATED_AT, direction: ASC }) {
      nodes { ...IssueFields }
      pageInfo { hasNextPage endCursor }
    }
  }
}
"#;

const PROJECT_QUERY: &str = r#"
query Project($owner: String!, $number: Int!) {
  repositoryOwner(login: $owner) {
    ... on ProjectV2Owner {
      projectV2(number: $number) { id number title }
    }
  }
}
"#;

const PROJECT_FIELDS_QUERY: &str = r#"
query ProjectFields($project: ID!) {
  node(id: $project) {
    ... on ProjectV2 {
      fields(first: 100) {
        nodes {
          ... on ProjectV2FieldCommon { id name dataType }
          ... on ProjectV2SingleSelectField { options { id name } }
        }
      }
    }
  }
}
"#;

const PROJECT_ITEMS_QUERY: &str = r#"
query ProjectItems($project: ID!, $first: Int!, $after: String) {
  node(id: $project) {
    ... on ProjectV2 {
      items(first: $first, after: $after) {
        pageInfo { hasNextPage endCursor }
        nodes {
          id
          content {
            __typename
            ... on Issue { ...IssueFields }
          }
          fieldValues(first: 30) {
            nodes {
              ... on ProjectV2ItemFieldSingleSelectValue { name field { ... on ProjectV2FieldCommon { name } } }
              ... on ProjectV2ItemFieldTextValue { text field { ... on ProjectV2FieldCommon { name } } }
              ... on ProjectV2ItemFieldNumberValue { number field { ... on ProjectV2FieldCommon { name } } }
              ... on ProjectV2ItemFieldDateValue { date field { ... on ProjectV2FieldCommon { name } } }
              ... on ProjectV2ItemFieldIterationValue { title field { ... on ProjectV2FieldCommon { name } } }
            }
          }
        }
      }
    }
  }
}
"#;

const ISSUE_PROJECT_ITEMS_QUERY: &str = r#"
query IssueProjectItems($issue: ID!, $after: String) {
  node(id: $issue) {
    ... on Issue {
      projectItems(first: 100, after: $after) {
        nodes { id project { id } }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}
"#;

const ADD_ITEM_MUTATION: &str = r#"
mutation AddItem($project: ID!, $content: ID!) {
  addProjectV2ItemById(input: { projectId: $project, contentId: $content }) { item { id } }
}
"#;

const SET_FIELD_MUTATION: &str = r#"
mutation SetField($project: ID!, $item: ID!, $field: ID!, $value: ProjectV2FieldValue!) {
  updateProjectV2ItemFieldValue(input: { projectId: $project, itemId: $item, fieldId: $field, value: $value }) {
    projectV2Item { id }
  }
}
"#;

const ADD_SUB_ISSUE_MUTATION: &str = r#"
mutation AddSubIssue($parent: ID!, $child: ID!) {
  addSubIssue(input: { issueId: $parent, subIssueId: $child }) { issue { id } }
}
"#;

const REMOVE_SUB_ISSUE_MUTATION: &str = r#"
mutation RemoveSubIssue($parent: ID!, $child: ID!) {
  removeSubIssue(input: { issueId: $parent, subIssueId: $child }) { issue { id } }
}
"#;

fn with_issue_fields(query: &str) -> String {
	format!("{query}\n{ISSUE_FIELDS}")
}

fn issue_variables(issue: &IssueRef) -> Value {
	json!({ "owner": issue.repo.owner, "name": issue.repo.name, "number": issue.number })
}

fn repo_path(repo: &RepoRef) -> String {
	format!("/repos/{}/{}", urlencoding::encode(&repo.owner), urlencoding::encode(&repo.name))
}

/// Deserialize the value at `pointer`, treating a missing or `null` node as `None`.
fn take_at<T: DeserializeOwned>(data: &Value, pointer: &str) -> Result<Option<T>> {
	match data.pointer(pointer) {
		None | Some(Value::Null) => Ok(None),
		Some(v) => Ok(Some(serde_json::from_value(v.clone()).wrap_err_with(|| format!("unexpected shape at {pointer}"))?)),
	}
}

fn truncate_for_error(body: &str) -> String {
	const MAX_LEN: usize = 200;
	if body.chars().count() <= MAX_LEN {
		body.to_owned()
	} else {
		format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
	}
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
	data: Option<Value>,
	errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
	message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection<T> {
	#[serde(default = "Vec::new")]
	nodes: Vec<Option<T>>,
	page_info: Option<PageInfo>,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
	has_next_page: bool,
	end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct IdNode {
	id: String,
}

#[derive(Deserialize)]
struct NameNode {
	name: String,
}

#[derive(Deserialize)]
struct LoginNode {
	login: String,
}

#[derive(Deserialize)]
struct RepositoryNode {
	name: String,
	owner: LoginNode,
}

#[derive(Deserialize)]
struct MilestoneNode {
	title: String,
}

#[derive(Deserialize)]
struct IssueNode {
	id: String,
	number: u64,
	title: String,
	body: Option<String>,
	state: IssueState,
	repository: Option<RepositoryNode>,
	labels: Option<Connection<NameNode>>,
	assignees: Option<Connection<LoginNode>>,
	milestone: Option<MilestoneNode>,
}

impl IssueNode {
	fn into_issue(self, fallback_repo: &RepoRef) -> Issue {
		let repo = self.repository.map(|r| RepoRef::new(r.owner.login, r.name)).unwrap_or_else(|| fallback_repo.clone());
		Issue {
			id: self.id,
			number: self.number,
			title: self.title,
			body: self.body.unwrap_or_default(),
			state: self.state,
			repo,
			labels: self.labels.map(|c| c.nodes.into_iter().flatten().map(|l| l.name).collect()).unwrap_or_default(),
			assignees: self.assignees.map(|c| c.nodes.into_iter().flatten().map(|u| u.login).collect()).unwrap_or_default(),
			milestone: self.milestone.map(|m| m.title),
		}
	}
}

#[derive(Deserialize)]
struct ProjectNode {
	id: String,
	number: u64,
	title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldNode {
	id: Option<String>,
	name: Option<String>,
	data_type: Option<String>,
	options: Option<Vec<FieldOption>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemNode {
	id: String,
	content: Option<Value>,
	field_values: Option<Connection<FieldValueNode>>,
}

impl ItemNode {
	/// `None` for items whose content is hidden from the token.
	fn into_raw_item(self) -> Result<Option<RawProjectItem>> {
		let Some(content) = self.content else {
			return Ok(None);
		};
		let content = match content.get("__typename").and_then(Value::as_str) {
			Some("Issue") => {
				let node: IssueNode = serde_json::from_value(content).wrap_err("unexpected issue shape in project item")?;
				// Issue content always carries its repository, the fallback is never used
				let fallback = RepoRef::new("", "");
				ItemContent::Issue(node.into_issue(&fallback))
			}
			Some("PullRequest") => ItemContent::PullRequest,
			_ => ItemContent::DraftIssue,
		};
		let field_values = self
			.field_values
			.map(|c| c.nodes.into_iter().flatten().filter_map(FieldValueNode::into_pair).collect())
			.unwrap_or_default();
		Ok(Some(RawProjectItem { id: self.id, content, field_values }))
	}
}

#[derive(Deserialize)]
struct FieldValueNode {
	name: Option<String>,
	text: Option<String>,
	number: Option<f64>,
	date: Option<String>,
	title: Option<String>,
	field: Option<NameNode>,
}

impl FieldValueNode {
	fn into_pair(self) -> Option<(String, String)> {
		let field = self.field?.name;
		let value = self.name.or(self.text).or(self.number.map(|n| n.to_string())).or(self.date).or(self.title)?;
		Some((field, value))
	}
}

#[derive(Deserialize)]
struct IssueProjectItemNode {
	id: String,
	project: IdNode,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_issue_node_without_repository_uses_parent_repo() {
		let node: IssueNode = serde_json::from_value(json!({
			"id": "I_9", "number": 9, "title": "child", "body": null, "state": "OPEN",
			"labels": { "nodes": [{ "name": "bug" }, null] }
		}))
		.unwrap();
		let issue = node.into_issue(&RepoRef::new("acme", "api"));
		assert_eq!(issue.reference().to_string(), "acme/api#9");
		assert_eq!(issue.labels, vec!["bug".to_string()]);
		assert_eq!(issue.body, "");
	}

	#[test]
	fn test_issue_node_cross_repository() {
		let node: IssueNode = serde_json::from_value(json!({
			"id": "I_3", "number": 3, "title": "elsewhere", "body": "b", "state": "CLOSED",
			"repository": { "name": "web", "owner": { "login": "other" } },
			"milestone": { "title": "v1" }
		}))
		.unwrap();
		let issue = node.into_issue(&RepoRef::new("acme", "api"));
		assert_eq!(issue.reference().to_string(), "other/web#3");
		assert_eq!(issue.state, IssueState::Closed);
		assert_eq!(issue.milestone.as_deref(), Some("v1"));
	}

	#[test]
	fn test_item_node_content_types() {
		let issue_item: ItemNode = serde_json::from_value(json!({
			"id": "PVTI_1",
			"content": { "__typename": "Issue", "id": "I_1", "number": 1, "title": "t", "body": "", "state": "OPEN",
				"repository": { "name": "api", "owner": { "login": "acme" } } },
			"fieldValues": { "nodes": [
				{ "name": "Backlog", "field": { "name": "Status" } },
				{ "number": 3.0, "field": { "name": "Estimate" } },
				{}
			] }
		}))
		.unwrap();
		let raw = issue_item.into_raw_item().unwrap().unwrap();
		assert_eq!(raw.field_values.get("Status").map(String::as_str), Some("Backlog"));
		assert_eq!(raw.field_values.get("Estimate").map(String::as_str), Some("3"));
		assert!(matches!(raw.content, ItemContent::Issue(_)));

		let pr_item: ItemNode = serde_json::from_value(json!({ "id": "PVTI_2", "content": { "__typename": "PullRequest" } })).unwrap();
		assert_eq!(pr_item.into_raw_item().unwrap().unwrap().content, ItemContent::PullRequest);

		let hidden: ItemNode = serde_json::from_value(json!({ "id": "PVTI_3", "content": null })).unwrap();
		assert!(hidden.into_raw_item().unwrap().is_none());
	}

	#[test]
	fn test_take_at_treats_null_as_missing() {
		let data = json!({ "repository": { "issue": null } });
		assert!(take_at::<IssueNode>(&data, "/repository/issue").unwrap().is_none());
		assert!(take_at::<IssueNode>(&data, "/nothing/here").unwrap().is_none());
	}

	#[test]
	fn test_repo_path_encodes_segments() {
		assert_eq!(repo_path(&RepoRef::new("acme", "api")), "/repos/acme/api");
		assert_eq!(repo_path(&RepoRef::new("acme", "my repo/x")), "/repos/acme/my%20repo%2Fx");
	}

	#[test]
	fn test_issue_project_items_page_info() {
		let connection: Connection<IssueProjectItemNode> = serde_json::from_value(json!({
			"nodes": [{ "id": "PVTI_1", "project": { "id": "PVT_other" } }],
			"pageInfo": { "hasNextPage": true, "endCursor": "c1" }
		}))
		.unwrap();
		let page_info = connection.page_info.unwrap();
		assert!(page_info.has_next_page);
		assert_eq!(page_info.end_cursor.as_deref(), Some("c1"));
	}

	#[test]
	fn test_truncate_for_error() {
		let long = "x".repeat(300);
		assert_eq!(truncate_for_error(&long).len(), 203);
		assert_eq!(truncate_for_error("short"), "short");
	}
}
