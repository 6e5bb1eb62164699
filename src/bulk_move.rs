//! Set fields on an issue and, optionally, on every descendant.

use color_eyre::eyre::{Result, WrapErr};
use ghpm::{BatchSummary, FieldResolver, Issue, IssueOutcome, IssueRef, OutcomeStatus, Project};
use serde::Serialize;
use tracing::instrument;

use crate::{
	field_setter::FieldSetter,
	github::GitHubClient,
	hierarchy::{self, ItemIndex, TraversalWarning},
	items,
	membership::ensure_member,
};

#[derive(Clone, Debug)]
pub struct MoveRequest {
	pub root: IssueRef,
	/// `(field key, alias)` pairs, resolved through the alias config.
	pub assignments: Vec<(String, String)>,
	/// `Some(depth)` to include descendants down to `depth` levels.
	pub recursive_depth: Option<usize>,
	pub dry_run: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MoveReport {
	pub outcomes: Vec<IssueOutcome>,
	pub summary: BatchSummary,
	pub warnings: Vec<TraversalWarning>,
}

/// Everything a move would touch, root first, then descendants in pre-order.
#[derive(Clone, Debug)]
struct Target {
	issue: Issue,
	item_id: Option<String>,
}

#[instrument(skip(client, resolver), fields(root = %request.root))]
pub async fn run_move<C: GitHubClient + ?Sized>(client: &C, project: &Project, resolver: &FieldResolver, request: &MoveRequest, page_size: u32) -> Result<MoveReport> {
	let setter = FieldSetter::load(client, &project.id).await?;
	let board = items::fetch_all(client, &project.id, page_size).await?;
	let mut index = ItemIndex::from_items(&board);
	tracing::debug!(n_items = index.len(), "indexed project items");

	let root = client.fetch_issue(&request.root).await.wrap_err_with(|| format!("Failed to fetch {}", request.root))?;
	let mut targets = vec![Target {
		item_id: index.item_id(&request.root).map(str::to_string),
		issue: root,
	}];

	let mut report = MoveReport::default();
	if let Some(depth) = request.recursive_depth {
		let tree = hierarchy::collect(client, &request.root, &index, 1, depth).await?;
		report.warnings = tree.warnings;
		targets.extend(tree.nodes.into_iter().map(|node| Target {
			item_id: node.item_id,
			issue: node.issue,
		}));
	}

	let assignments: Vec<(String, String)> = request.assignments.iter().map(|(key, alias)| resolver.resolve(key, alias)).collect();

	for target in targets {
		let outcome = if request.dry_run {
			plan(&setter, &assignments, &target)
		} else {
			apply(client, project, &setter, &assignments, &target, &mut index).await
		};
		report.summary.record(&outcome.status);
		report.outcomes.push(outcome);
	}

	tracing::info!(summary = %report.summary, "move finished");
	Ok(report)
}

fn plan<C: GitHubClient + ?Sized>(setter: &FieldSetter<'_, C>, assignments: &[(String, String)], target: &Target) -> IssueOutcome {
	let mut outcome = IssueOutcome::new(target.issue.reference(), &target.issue.title, OutcomeStatus::Planned);
	if target.item_id.is_none() {
		outcome.actions.push("add to project".to_string());
	}
	for (field, value) in assignments {
		match setter.prepare(field, value) {
			Ok(_) => outcome.actions.push(format!("{field} = {value}")),
			Err(e) => outcome.warnings.push(format!("would fail: {e}")),
		}
	}
	outcome
}

async fn apply<C: GitHubClient + ?Sized>(client: &C, project: &Project, setter: &FieldSetter<'_, C>, assignments: &[(String, String)], target: &Target, index: &mut ItemIndex) -> IssueOutcome {
	let reference = target.issue.reference();
	let mut outcome = IssueOutcome::new(reference.clone(), &target.issue.title, OutcomeStatus::Processed);

	let item_id = match &target.item_id {
		Some(id) => id.clone(),
		None => match ensure_member(client, &project.id, &target.issue.id).await {
			Ok(id) => {
				outcome.actions.push("add to project".to_string());
				index.insert(&reference, id.clone());
				id
			}
			Err(e) => {
				outcome.status = OutcomeStatus::Failed { error: format!("{e:#}") };
				return outcome;
			}
		},
	};

	for (field, value) in assignments {
		if let Err(e) = setter.set(&item_id, field, value).await {
			tracing::warn!(issue = %reference, field = %field, error = %e, "field not set");
			outcome.status = OutcomeStatus::Failed { error: format!("{e:#}") };
			return outcome;
		}
		outcome.actions.push(format!("{field} = {value}"));
	}
	outcome
}
