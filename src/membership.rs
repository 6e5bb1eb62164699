//! Idempotent "put this issue on the board".

use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::instrument;

use crate::github::{AddItemOutcome, ProjectSource, ProjectWriter};

/// Add `issue_id` to `project_id` and return the item id, whether it was just added or already there.
///
/// When the host reports a duplicate without naming the existing item, the item is looked up
/// explicitly; only if that also comes back empty is this an error.
///
/// Not safe to race for the same (project, issue) pair.
#[instrument(skip(client))]
pub async fn ensure_member<C: ProjectSource + ProjectWriter + ?Sized>(client: &C, project_id: &str, issue_id: &str) -> Result<String> {
	let outcome = client.add_issue_to_project(project_id, issue_id).await.wrap_err("Failed to add issue to project")?;
	match outcome {
		AddItemOutcome::Added { item_id } => Ok(item_id),
		AddItemOutcome::AlreadyMember { item_id: Some(item_id) } => Ok(item_id),
		AddItemOutcome::AlreadyMember { item_id: None } => {
			tracing::debug!(issue_id, "already a project item, looking up its id");
			match client.fetch_item_id(project_id, issue_id).await? {
				Some(item_id) => Ok(item_id),
				None => bail!("Issue {issue_id} is already in the project, but could not determine item id"),
			}
		}
	}
}
