//! `ghpm items` and `ghpm field`.

use rstest::rstest;

use crate::fixtures::{TestContext, ctx};

#[rstest]
fn test_items_lists_issues_only(ctx: TestContext) {
	let stdout = ctx.run_ok(&["items"]);
	assert_eq!(stdout, "acme/api#1 Epic\nacme/api#4 Schema\n2 items\n");
	assert_eq!(ctx.trace().count("fetch_project_items_page"), 1);
}

#[rstest]
#[case("acme/api", 2)]
#[case("acme/web", 0)]
fn test_items_repo_filter(ctx: TestContext, #[case] repo: &str, #[case] expected: usize) {
	let stdout = ctx.run_ok(&["items", "--repo", repo, "--json"]);
	let items: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
	assert_eq!(items.len(), expected);
}

#[rstest]
fn test_field_list(ctx: TestContext) {
	let stdout = ctx.run_ok(&["field", "list"]);
	assert_eq!(stdout, "Status (SINGLE_SELECT): Backlog | In progress | Done\nPriority (SINGLE_SELECT): P0 | P1 | P2\nEstimate (NUMBER)\n");
}

#[rstest]
#[case(&["status", "wip"], "Status: In progress")]
#[case(&["status", "Blocked"], "Status: Blocked")]
#[case(&["team", "core"], "team: core")]
fn test_field_resolve_makes_no_calls(ctx: TestContext, #[case] args: &[&str], #[case] expected: &str) {
	let mut full = vec!["field", "resolve"];
	full.extend_from_slice(args);
	assert_eq!(ctx.run_ok(&full).trim(), expected);
	assert!(ctx.trace().mock_calls().is_empty());
}

#[rstest]
fn test_field_set_adds_missing_issue_to_board(ctx: TestContext) {
	let stdout = ctx.run_ok(&["field", "set", "acme/web#3", "priority", "p0"]);
	assert_eq!(stdout.trim(), "acme/web#3: Priority = P0");

	let trace = ctx.trace();
	assert_eq!(trace.count("add_issue_to_project"), 1);
	assert_eq!(trace.count("set_field_value"), 1);
}

#[rstest]
fn test_field_set_unknown_option_is_an_error(ctx: TestContext) {
	let output = ctx.run(&["field", "set", "acme/api#1", "status", "someday"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("'someday' is not an option of field 'Status'"));
	assert!(!ctx.trace().has_mock_call("set_field_value"));
}
