//! Subcommand arguments, handlers and plain-text rendering.

use std::{fmt::Write as _, sync::OnceLock};

use clap::{Args, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use ghpm::{BatchSummary, HierarchyNode, Issue, IssueOutcome, IssueRef, OutcomeStatus, Project, ProjectField, ProjectItem, RepoRef, parse_field_assignments};
use serde::Serialize;

use crate::{
	bulk_move::{self, MoveRequest},
	config::AppConfig,
	field_setter::set_field,
	github::{BoxedGitHubClient, GitHubClient},
	hierarchy::{self, ItemIndex, TraversalWarning},
	items,
	membership::ensure_member,
	prompt::{DialoguerPrompter, confirm_batch},
	split::{self, LinkChange, SplitReport},
	triage::{TriageProcessor, TriageRequest, resolve_rule},
};

/// What every handler works against. The client is only built once a command needs the host.
pub struct Context {
	pub config: AppConfig,
	client: OnceLock<BoxedGitHubClient>,
	connect: fn() -> Result<BoxedGitHubClient>,
}

impl Context {
	pub fn new(config: AppConfig, connect: fn() -> Result<BoxedGitHubClient>) -> Self {
		Self {
			config,
			client: OnceLock::new(),
			connect,
		}
	}

	fn client(&self) -> Result<&dyn GitHubClient> {
		if let Some(client) = self.client.get() {
			return Ok(client.as_ref());
		}
		let client = (self.connect)()?;
		Ok(self.client.get_or_init(|| client).as_ref())
	}

	/// The configured project, fetched from the host.
	async fn project(&self) -> Result<Project> {
		let configured = self.config.project()?;
		self.client()?
			.fetch_project(&configured.owner, configured.number)
			.await
			.wrap_err_with(|| format!("Failed to load project {}/{}", configured.owner, configured.number))
	}

	fn issue_ref(&self, s: &str) -> Result<IssueRef> {
		Ok(IssueRef::parse(s, self.config.default_repo())?)
	}
}

// Triage

/// Apply a triage rule to every matching issue.
///
/// Either name a rule from the config, or give `--query` with `--apply "labels=a;b,status=backlog"`.
#[derive(Args, Debug)]
pub struct TriageArgs {
	/// Rule name from the `triage:` config section
	pub rule: Option<String>,

	/// Ad-hoc query, e.g. `is:open -label:tracked`
	#[arg(short, long)]
	pub query: Option<String>,

	/// Ad-hoc changes, e.g. `labels=tracked;needs-info,status=backlog`
	#[arg(short, long, requires = "query")]
	pub apply: Option<String>,

	/// Repositories to search instead of the configured ones
	#[arg(short, long = "repo")]
	pub repos: Vec<RepoRef>,

	/// Show what would change without changing anything
	#[arg(short = 'n', long)]
	pub dry_run: bool,

	/// Confirm each issue before touching it
	#[arg(short, long)]
	pub interactive: bool,

	#[arg(long)]
	pub json: bool,
}

pub async fn triage_command(ctx: &Context, args: TriageArgs) -> Result<()> {
	let rule = resolve_rule(&ctx.config.triage, args.rule.as_deref(), args.query.as_deref(), args.apply.as_deref())?;
	let repositories = if args.repos.is_empty() { ctx.config.repositories.clone() } else { args.repos };
	if repositories.is_empty() {
		bail!("No repositories to search. Pass --repo or list them under `repositories:` in the config");
	}

	let project = ctx.project().await?;
	let resolver = ctx.config.resolver();
	let request = TriageRequest {
		rule,
		repositories,
		dry_run: args.dry_run,
		interactive: args.interactive,
	};
	let mut prompter = DialoguerPrompter::default();
	let report = TriageProcessor::new(ctx.client()?, &resolver).run(&project, &request, &mut prompter).await?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		print!("{}", render_outcomes(&report.outcomes, &report.summary));
	}
	Ok(())
}

// Move

/// Set project fields on an issue, optionally on its whole sub-issue tree.
#[derive(Args, Debug)]
pub struct MoveArgs {
	/// `owner/repo#N`, `#N` (first configured repository) or an issue URL
	pub issue: String,

	/// Shorthand for `--field status=<value>`
	#[arg(short, long)]
	pub status: Option<String>,

	/// Shorthand for `--field priority=<value>`
	#[arg(short, long)]
	pub priority: Option<String>,

	/// `key=value[,key=value]`, keys and values go through the field aliases
	#[arg(short, long = "field")]
	pub fields: Vec<String>,

	/// Include sub-issues, down to `--depth`
	#[arg(short, long, requires = "depth")]
	pub recursive: bool,

	#[arg(short, long, requires = "recursive")]
	pub depth: Option<usize>,

	#[arg(short = 'n', long)]
	pub dry_run: bool,

	/// Skip the confirmation before a recursive update
	#[arg(short, long)]
	pub yes: bool,

	#[arg(long)]
	pub json: bool,
}

impl MoveArgs {
	fn assignments(&self) -> Result<Vec<(String, String)>> {
		let mut out = Vec::new();
		if let Some(status) = &self.status {
			out.push(("status".to_string(), status.clone()));
		}
		if let Some(priority) = &self.priority {
			out.push(("priority".to_string(), priority.clone()));
		}
		for raw in &self.fields {
			out.extend(parse_field_assignments(raw)?);
		}
		Ok(out)
	}
}

pub async fn move_command(ctx: &Context, args: MoveArgs) -> Result<()> {
	let assignments = args.assignments()?;
	if assignments.is_empty() {
		bail!("Nothing to set. Pass --status, --priority or --field key=value");
	}
	let root = ctx.issue_ref(&args.issue)?;
	let recursive_depth = if args.recursive { args.depth } else { None };

	if let Some(depth) = recursive_depth
		&& !args.dry_run
		&& !confirm_batch(&format!("Update {root} and its sub-issues down to depth {depth}?"), args.yes)?
	{
		println!("Nothing changed.");
		return Ok(());
	}

	let project = ctx.project().await?;
	let request = MoveRequest {
		root,
		assignments,
		recursive_depth,
		dry_run: args.dry_run,
	};
	let report = bulk_move::run_move(ctx.client()?, &project, &ctx.config.resolver(), &request, ctx.config.defaults.page_size).await?;

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		print!("{}", render_warnings(&report.warnings));
		print!("{}", render_outcomes(&report.outcomes, &report.summary));
	}
	Ok(())
}

// Sub-issues

#[derive(Args, Debug)]
pub struct SubArgs {
	#[command(subcommand)]
	pub command: SubCommands,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
	/// Parent and sub-issue tree of an issue
	List {
		issue: String,
		/// Defaults to `defaults.depth` from the config
		#[arg(short, long)]
		depth: Option<usize>,
		#[arg(long)]
		json: bool,
	},
	/// Make `child` a sub-issue of `parent`
	Add { parent: String, child: String },
	/// Detach `child` from `parent`
	Remove { parent: String, child: String },
}

#[derive(Serialize)]
struct TreeJson<'a> {
	parent: Option<IssueRef>,
	root: &'a Issue,
	nodes: &'a [HierarchyNode],
	warnings: Vec<String>,
}

pub async fn sub_command(ctx: &Context, args: SubArgs) -> Result<()> {
	match args.command {
		SubCommands::List { issue, depth, json } => {
			let root = ctx.issue_ref(&issue)?;
			let depth = depth.unwrap_or(ctx.config.defaults.depth);
			let root_issue = ctx.client()?.fetch_issue(&root).await.wrap_err_with(|| format!("Failed to fetch {root}"))?;
			let parent = ctx.client()?.fetch_parent_issue(&root).await.wrap_err_with(|| format!("Failed to fetch the parent of {root}"))?;

			// Membership markers need the board; without a project they are left out
			let index = match ctx.config.project {
				Some(_) => {
					let project = ctx.project().await?;
					Some(ItemIndex::from_items(&items::fetch_all(ctx.client()?, &project.id, ctx.config.defaults.page_size).await?))
				}
				None => None,
			};
			let tree = hierarchy::collect(ctx.client()?, &root, &index.clone().unwrap_or_default(), 1, depth).await?;

			if json {
				let out = TreeJson {
					parent: parent.as_ref().map(Issue::reference),
					root: &root_issue,
					nodes: &tree.nodes,
					warnings: tree.warnings.iter().map(ToString::to_string).collect(),
				};
				println!("{}", serde_json::to_string_pretty(&out)?);
			} else {
				let root_member = index.as_ref().map(|idx| idx.item_id(&root).is_some());
				print!("{}", render_tree(parent.as_ref(), &root_issue, root_member, &tree.nodes, index.is_some()));
				print!("{}", render_warnings(&tree.warnings));
			}
			Ok(())
		}
		SubCommands::Add { parent, child } => {
			let (parent, child) = (ctx.issue_ref(&parent)?, ctx.issue_ref(&child)?);
			match split::link(ctx.client()?, &parent, &child).await? {
				LinkChange::Changed => println!("Added {child} as a sub-issue of {parent}"),
				LinkChange::Unchanged => println!("{child} is already a sub-issue, nothing to do"),
			}
			Ok(())
		}
		SubCommands::Remove { parent, child } => {
			let (parent, child) = (ctx.issue_ref(&parent)?, ctx.issue_ref(&child)?);
			match split::unlink(ctx.client()?, &parent, &child).await? {
				LinkChange::Changed => println!("Removed {child} from {parent}"),
				LinkChange::Unchanged => println!("{child} is not a sub-issue of {parent}, nothing to do"),
			}
			Ok(())
		}
	}
}

// Split

/// Create sub-issues from titles and/or the issue's own checklist.
#[derive(Args, Debug)]
pub struct SplitArgs {
	pub issue: String,

	/// Titles of the sub-issues to create
	pub titles: Vec<String>,

	/// Also take one title per `- [ ] ...` line of the issue body
	#[arg(short, long)]
	pub from_body: bool,

	#[arg(short = 'n', long)]
	pub dry_run: bool,

	#[arg(long)]
	pub json: bool,
}

pub async fn split_command(ctx: &Context, args: SplitArgs) -> Result<()> {
	let parent = ctx.issue_ref(&args.issue)?;
	let mut titles = args.titles;
	if args.from_body {
		let issue = ctx.client()?.fetch_issue(&parent).await.wrap_err_with(|| format!("Failed to fetch {parent}"))?;
		titles.extend(split::checklist_titles(&issue.body));
	}
	if titles.is_empty() {
		bail!("No titles to split into. Pass TITLE arguments or --from-body on an issue with a checklist");
	}

	let report = split::split(ctx.client()?, &parent, &titles, args.dry_run).await?;
	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
	} else {
		print!("{}", render_split(&report));
	}
	Ok(())
}

// Listings

/// Every issue on the project board.
#[derive(Args, Debug)]
pub struct ItemsArgs {
	/// Only items from this repository
	#[arg(short, long)]
	pub repo: Option<RepoRef>,

	#[arg(long)]
	pub json: bool,
}

pub async fn items_command(ctx: &Context, args: ItemsArgs) -> Result<()> {
	let project = ctx.project().await?;
	let mut board = items::fetch_all(ctx.client()?, &project.id, ctx.config.defaults.page_size).await?;
	if let Some(repo) = &args.repo {
		board = items::filter_by_repo(board, repo);
	}

	if args.json {
		println!("{}", serde_json::to_string_pretty(&board)?);
	} else {
		print!("{}", render_items(&board));
	}
	Ok(())
}

#[derive(Args, Debug)]
pub struct FieldArgs {
	#[command(subcommand)]
	pub command: FieldCommands,
}

#[derive(Subcommand, Debug)]
pub enum FieldCommands {
	/// Field definitions of the project
	List {
		#[arg(long)]
		json: bool,
	},
	/// Show what a configured key and alias translate to
	Resolve { key: String, alias: String },
	/// Set one field on one issue, adding it to the board first if needed
	Set { issue: String, key: String, alias: String },
}

pub async fn field_command(ctx: &Context, args: FieldArgs) -> Result<()> {
	match args.command {
		FieldCommands::List { json } => {
			let project = ctx.project().await?;
			let fields = ctx.client()?.fetch_project_fields(&project.id).await.wrap_err("Failed to load project fields")?;
			if json {
				println!("{}", serde_json::to_string_pretty(&fields)?);
			} else {
				print!("{}", render_fields(&fields));
			}
		}
		FieldCommands::Resolve { key, alias } => {
			let (field, value) = ctx.config.resolver().resolve(&key, &alias);
			println!("{field}: {value}");
		}
		FieldCommands::Set { issue, key, alias } => {
			let reference = ctx.issue_ref(&issue)?;
			let project = ctx.project().await?;
			let issue = ctx.client()?.fetch_issue(&reference).await.wrap_err_with(|| format!("Failed to fetch {reference}"))?;
			let item_id = ensure_member(ctx.client()?, &project.id, &issue.id).await?;
			let (field, value) = ctx.config.resolver().resolve(&key, &alias);
			set_field(ctx.client()?, &project.id, &item_id, &field, &value).await?;
			println!("{reference}: {field} = {value}");
		}
	}
	Ok(())
}

// Rendering

fn status_tag(status: &OutcomeStatus) -> &'static str {
	match status {
		OutcomeStatus::Processed => "done",
		OutcomeStatus::Planned => "plan",
		OutcomeStatus::Skipped { .. } => "skip",
		OutcomeStatus::Failed { .. } => "FAIL",
	}
}

pub fn render_outcomes(outcomes: &[IssueOutcome], summary: &BatchSummary) -> String {
	let mut out = String::new();
	for outcome in outcomes {
		let _ = writeln!(out, "[{}] {} {}", status_tag(&outcome.status), outcome.issue, outcome.title);
		for action in &outcome.actions {
			let _ = writeln!(out, "       {action}");
		}
		match &outcome.status {
			OutcomeStatus::Skipped { reason } => {
				let _ = writeln!(out, "       skipped: {reason}");
			}
			OutcomeStatus::Failed { error } => {
				let _ = writeln!(out, "       error: {error}");
			}
			OutcomeStatus::Processed | OutcomeStatus::Planned => {}
		}
		for warning in &outcome.warnings {
			let _ = writeln!(out, "       warning: {warning}");
		}
	}
	let _ = writeln!(out, "{summary}");
	out
}

pub fn render_warnings(warnings: &[TraversalWarning]) -> String {
	warnings.iter().map(|w| format!("warning: could not walk {w}\n")).collect()
}

/// Indented pre-order tree. `show_membership` adds a `*` before every issue on the board.
pub fn render_tree(parent: Option<&Issue>, root: &Issue, root_member: Option<bool>, nodes: &[HierarchyNode], show_membership: bool) -> String {
	let marker = |member: bool| match (show_membership, member) {
		(false, _) => "",
		(true, true) => "* ",
		(true, false) => "  ",
	};
	let state = |issue: &Issue| if issue.state.is_open() { "" } else { " (closed)" };

	let mut out = String::new();
	if let Some(parent) = parent {
		let _ = writeln!(out, "parent: {} {}{}", parent.reference(), parent.title, state(parent));
	}
	let _ = writeln!(out, "{}{} {}{}", marker(root_member.unwrap_or(false)), root.reference(), root.title, state(root));
	for node in nodes {
		let indent = "  ".repeat(node.depth);
		let _ = writeln!(out, "{}{indent}{} {}{}", marker(node.is_project_item()), node.issue.reference(), node.issue.title, state(&node.issue));
	}
	out
}

pub fn render_items(items: &[ProjectItem]) -> String {
	let mut out = String::new();
	for item in items {
		let _ = write!(out, "{} {}", item.issue.reference(), item.issue.title);
		if !item.field_values.is_empty() {
			let values: Vec<String> = item.field_values.iter().map(|(field, value)| format!("{field}={value}")).collect();
			let _ = write!(out, "  [{}]", values.join(", "));
		}
		out.push('\n');
	}
	let _ = writeln!(out, "{} items", items.len());
	out
}

pub fn render_fields(fields: &[ProjectField]) -> String {
	let mut out = String::new();
	for field in fields {
		let _ = write!(out, "{} ({})", field.name, field.data_type);
		if !field.options.is_empty() {
			let _ = write!(out, ": {}", field.option_names().join(" | "));
		}
		out.push('\n');
	}
	out
}

pub fn render_split(report: &SplitReport) -> String {
	let mut out = String::new();
	for outcome in &report.outcomes {
		let _ = write!(out, "[{}] {}", status_tag(&outcome.status), outcome.title);
		if let Some(issue) = &outcome.issue {
			let _ = write!(out, " -> {issue}");
		}
		match &outcome.status {
			OutcomeStatus::Skipped { reason } => {
				let _ = write!(out, " ({reason})");
			}
			OutcomeStatus::Failed { error } => {
				let _ = write!(out, ": {error}");
			}
			OutcomeStatus::Processed | OutcomeStatus::Planned => {}
		}
		out.push('\n');
	}
	let _ = writeln!(out, "{}", report.summary);
	out
}
