//! Minimal search-query matching for triage rules.
//!
//! Only a handful of qualifiers are understood, all combined with AND:
//! - `label:<name>`: issue must carry the label (every occurrence enforced)
//! - `-label:<name>`: issue must not carry the label
//! - `is:open` / `is:closed`: state must match
//!
//! Anything else is ignored, so richer search syntax can sit in a rule
//! without breaking it. Label values may be double-quoted to include spaces.

use crate::issue::{Issue, IssueState};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Qualifier {
	Label(String),
	NotLabel(String),
	State(IssueState),
}

impl Qualifier {
	fn holds(&self, issue: &Issue) -> bool {
		match self {
			Self::Label(name) => issue.has_label(name),
			Self::NotLabel(name) => !issue.has_label(name),
			Self::State(state) => issue.state == *state,
		}
	}
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
	pub qualifiers: Vec<Qualifier>,
}

impl Query {
	pub fn parse(query: &str) -> Self {
		let qualifiers = tokenize(query).into_iter().filter_map(|token| parse_qualifier(&token)).collect();
		Self { qualifiers }
	}

	pub fn matches(&self, issue: &Issue) -> bool {
		self.qualifiers.iter().all(|q| q.holds(issue))
	}

	/// Issue states worth fetching for this query. Without an `is:` qualifier, both.
	pub fn states(&self) -> Vec<IssueState> {
		let wants_open = self.qualifiers.contains(&Qualifier::State(IssueState::Open));
		let wants_closed = self.qualifiers.contains(&Qualifier::State(IssueState::Closed));
		match (wants_open, wants_closed) {
			(true, false) => vec![IssueState::Open],
			(false, true) => vec![IssueState::Closed],
			_ => vec![IssueState::Open, IssueState::Closed],
		}
	}
}

/// Evaluate `query` against a single issue.
pub fn matches(issue: &Issue, query: &str) -> bool {
	Query::parse(query).matches(issue)
}

fn parse_qualifier(token: &str) -> Option<Qualifier> {
	if let Some(name) = token.strip_prefix("-label:") {
		return (!name.is_empty()).then(|| Qualifier::NotLabel(name.to_string()));
	}
	if let Some(name) = token.strip_prefix("label:") {
		return (!name.is_empty()).then(|| Qualifier::Label(name.to_string()));
	}
	match token {
		"is:open" => Some(Qualifier::State(IssueState::Open)),
		"is:closed" => Some(Qualifier::State(IssueState::Closed)),
		_ => None,
	}
}

/// Whitespace split that keeps double-quoted runs together (quotes dropped).
fn tokenize(query: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();
	let mut in_quotes = false;

	for ch in query.chars() {
		match ch {
			'"' => in_quotes = !in_quotes,
			c if c.is_whitespace() && !in_quotes => {
				if !current.is_empty() {
					tokens.push(std::mem::take(&mut current));
				}
			}
			c => current.push(c),
		}
	}
	if !current.is_empty() {
		tokens.push(current);
	}
	tokens
}
