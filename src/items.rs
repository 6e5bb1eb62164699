//! Full project item listing over cursor pagination.

use std::collections::HashSet;

use color_eyre::eyre::{Result, WrapErr, bail};
use ghpm::{ProjectItem, RepoRef};
use tracing::instrument;

use crate::github::{MAX_PAGE_SIZE, ProjectSource};

/// Every issue-backed item of the project, in board order.
///
/// Pull requests and drafts are dropped. An item showing up on two pages is kept once.
#[instrument(skip(client))]
pub async fn fetch_all<C: ProjectSource + ?Sized>(client: &C, project_id: &str, page_size: u32) -> Result<Vec<ProjectItem>> {
	let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
	let mut items = Vec::new();
	let mut seen = HashSet::new();
	let mut cursor: Option<String> = None;
	let mut n_pages = 0usize;

	loop {
		let page = client
			.fetch_project_items_page(project_id, cursor.as_deref(), page_size)
			.await
			.wrap_err_with(|| format!("Failed to fetch page {} of project items", n_pages + 1))?;
		n_pages += 1;

		for raw in page.items {
			if !seen.insert(raw.id.clone()) {
				tracing::debug!(item_id = %raw.id, "duplicate item across pages");
				continue;
			}
			if let Some(item) = raw.into_issue_item() {
				items.push(item);
			}
		}

		if !page.has_next_page {
			break;
		}
		match page.end_cursor {
			Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
			// A repeated or missing cursor would loop forever
			_ => bail!("Project items pagination stalled after {n_pages} pages"),
		}
	}

	tracing::debug!(n_pages, n_items = items.len(), "fetched project items");
	Ok(items)
}

/// Keep only items whose issue lives in `repo`.
pub fn filter_by_repo(items: Vec<ProjectItem>, repo: &RepoRef) -> Vec<ProjectItem> {
	items.into_iter().filter(|item| &item.issue.repo == repo).collect()
}
