//! Rule-driven bulk triage.
//!
//! select → (dry-run: report, stop) → per issue: confirm → ensure member →
//! labels (best-effort) → fields (first failure fails the issue) → tally.
//!
//! A failure on one issue never stops the batch. Only missing project metadata
//! or an unreadable repository aborts before anything is written.

use std::collections::{BTreeMap, HashSet};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use ghpm::{BatchSummary, FieldResolver, Issue, IssueOutcome, OutcomeStatus, Project, Query, RepoRef, TriageRule};
use serde::Serialize;
use tracing::instrument;

use crate::{field_setter::FieldSetter, github::GitHubClient, membership::ensure_member};

/// Operator answer to "process this issue?".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Confirmation {
	Yes,
	No,
	/// Stop the batch; what is done stays done.
	Quit,
}

/// Interactive input. Never consulted in dry-run.
pub trait Prompter {
	fn confirm(&mut self, issue: &Issue) -> Result<Confirmation>;

	/// Pick one of `options` for `field`, `None` to leave the field alone.
	fn choose_option(&mut self, issue: &Issue, field: &str, options: &[String]) -> Result<Option<String>>;
}

#[derive(Clone, Debug)]
pub struct TriageRequest {
	pub rule: TriageRule,
	/// Searched in order.
	pub repositories: Vec<RepoRef>,
	pub dry_run: bool,
	/// Ask before each issue, and for the rule's interactive fields.
	pub interactive: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct TriageReport {
	pub outcomes: Vec<IssueOutcome>,
	pub summary: BatchSummary,
}

/// Pick the rule to run: a configured one by name, or an ad-hoc `--query`/`--apply` pair.
pub fn resolve_rule(rules: &BTreeMap<String, TriageRule>, name: Option<&str>, query: Option<&str>, apply: Option<&str>) -> Result<TriageRule> {
	match (name, query) {
		(Some(_), Some(_)) => bail!("Give either a rule name or --query, not both"),
		(Some(name), None) => rules.get(name).cloned().ok_or_else(|| {
			let known = rules.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
			eyre!("No triage rule named '{name}' (configured: {known})")
		}),
		(None, Some(query)) => Ok(TriageRule::ad_hoc(query, apply.unwrap_or_default())?),
		(None, None) => bail!("Give a rule name or --query"),
	}
}

pub struct TriageProcessor<'a, C: ?Sized> {
	client: &'a C,
	resolver: &'a FieldResolver,
}

impl<'a, C: GitHubClient + ?Sized> TriageProcessor<'a, C> {
	pub fn new(client: &'a C, resolver: &'a FieldResolver) -> Self {
		Self { client, resolver }
	}

	/// Issues of `repositories` matching `query`, repository order first, then host order.
	#[instrument(skip(self))]
	pub async fn select(&self, query: &str, repositories: &[RepoRef]) -> Result<Vec<Issue>> {
		let query = Query::parse(query);
		let mut seen = HashSet::new();
		let mut candidates = Vec::new();
		for repo in repositories {
			for state in query.states() {
				let issues = self.client.fetch_repository_issues(repo, state).await.wrap_err_with(|| format!("Failed to list issues of {repo}"))?;
				candidates.extend(issues.into_iter().filter(|issue| query.matches(issue) && seen.insert(issue.reference())));
			}
		}
		tracing::info!(n_candidates = candidates.len(), "selected triage candidates");
		Ok(candidates)
	}

	#[instrument(skip_all, fields(project = %project.title, query = %request.rule.query, dry_run = request.dry_run))]
	pub async fn run(&self, project: &Project, request: &TriageRequest, prompter: &mut dyn Prompter) -> Result<TriageReport> {
		let setter = FieldSetter::load(self.client, &project.id).await?;
		let candidates = self.select(&request.rule.query, &request.repositories).await?;

		let mut report = TriageReport::default();
		if request.dry_run {
			for issue in &candidates {
				let outcome = self.plan(&setter, request, issue);
				report.summary.record(&outcome.status);
				report.outcomes.push(outcome);
			}
			return Ok(report);
		}

		for issue in &candidates {
			if request.interactive {
				match prompter.confirm(issue) {
					Ok(Confirmation::Yes) => {}
					Ok(Confirmation::No) => {
						let outcome = IssueOutcome::new(issue.reference(), &issue.title, OutcomeStatus::Skipped { reason: "declined".into() });
						report.summary.record(&outcome.status);
						report.outcomes.push(outcome);
						continue;
					}
					Ok(Confirmation::Quit) => {
						tracing::info!(issue = %issue.reference(), "triage aborted by operator");
						report.summary.aborted = true;
						break;
					}
					Err(e) => {
						tracing::warn!(error = %e, "prompt failed, stopping");
						report.summary.aborted = true;
						break;
					}
				}
			}

			let (outcome, aborted) = self.apply(project, &setter, request, issue, prompter).await;
			report.summary.record(&outcome.status);
			report.outcomes.push(outcome);
			if aborted {
				report.summary.aborted = true;
				break;
			}
		}

		tracing::info!(summary = %report.summary, "triage finished");
		Ok(report)
	}

	/// What `apply` would do, validated against the field definitions but without any call.
	fn plan(&self, setter: &FieldSetter<'_, C>, request: &TriageRequest, issue: &Issue) -> IssueOutcome {
		let rule = &request.rule;
		let mut outcome = IssueOutcome::new(issue.reference(), &issue.title, OutcomeStatus::Planned);
		for label in rule.apply.labels.iter().filter(|l| !issue.has_label(l)) {
			outcome.actions.push(format!("+label {label}"));
		}
		for (key, alias) in &rule.apply.fields {
			let (field, value) = self.resolver.resolve(key, alias);
			match setter.prepare(&field, &value) {
				Ok(_) => outcome.actions.push(format!("{field} = {value}")),
				Err(e) => outcome.warnings.push(format!("would fail: {e}")),
			}
		}
		for key in rule.interactive_fields().filter(|_| request.interactive) {
			outcome.actions.push(format!("{} = (ask)", self.resolver.resolve_field_name(key)));
		}
		outcome
	}

	/// Returns the outcome and whether the operator asked to stop.
	/// Per-field prompts only happen in interactive runs.
	async fn apply(&self, project: &Project, setter: &FieldSetter<'_, C>, request: &TriageRequest, issue: &Issue, prompter: &mut dyn Prompter) -> (IssueOutcome, bool) {
		let rule = &request.rule;
		let reference = issue.reference();
		let mut outcome = IssueOutcome::new(reference.clone(), &issue.title, OutcomeStatus::Processed);

		let item_id = match ensure_member(self.client, &project.id, &issue.id).await {
			Ok(item_id) => item_id,
			Err(e) => {
				tracing::warn!(issue = %reference, error = %e, "could not add to project");
				outcome.status = OutcomeStatus::Failed { error: format!("{e:#}") };
				return (outcome, false);
			}
		};

		for label in rule.apply.labels.iter().filter(|l| !issue.has_label(l)) {
			match self.client.add_label(&reference, label).await {
				Ok(()) => outcome.actions.push(format!("+label {label}")),
				Err(e) => {
					tracing::warn!(issue = %reference, label = %label, error = %e, "label not applied");
					outcome.warnings.push(format!("label '{label}': {e:#}"));
				}
			}
		}

		let mut assignments: Vec<(String, String)> = rule.apply.fields.iter().map(|(key, alias)| self.resolver.resolve(key, alias)).collect();
		for key in rule.interactive_fields().filter(|_| request.interactive) {
			let field = self.resolver.resolve_field_name(key);
			let options = setter.field(&field).map(|f| f.option_names()).unwrap_or_default();
			match prompter.choose_option(issue, &field, &options) {
				Ok(Some(value)) => assignments.push((field, value)),
				Ok(None) => {}
				Err(e) => {
					tracing::warn!(error = %e, "prompt failed, stopping");
					outcome.status = OutcomeStatus::Failed {
						error: format!("prompt for {field} failed: {e:#}"),
					};
					return (outcome, true);
				}
			}
		}

		for (field, value) in assignments {
			if let Err(e) = setter.set(&item_id, &field, &value).await {
				tracing::warn!(issue = %reference, field = %field, error = %e, "field not set");
				outcome.status = OutcomeStatus::Failed { error: format!("{e:#}") };
				return (outcome, false);
			}
			outcome.actions.push(format!("{field} = {value}"));
		}

		tracing::info!(issue = %reference, "triaged");
		(outcome, false)
	}
}
