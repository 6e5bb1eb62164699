//! `ghpm move`, on a single issue and on whole trees.

use rstest::rstest;

use crate::fixtures::{DEFAULT_CONFIG, DEFAULT_STATE, TestContext, ctx};

#[rstest]
fn test_move_single_issue(ctx: TestContext) {
	let stdout = ctx.run_ok(&["move", "acme/api#1", "--status", "wip"]);

	assert!(stdout.contains("[done] acme/api#1 Epic\n       Status = In progress"), "{stdout}");
	let trace = ctx.trace();
	assert_eq!(trace.count("set_field_value"), 1);
	assert!(!trace.has_mock_call("add_issue_to_project"));
	assert!(!trace.has_mock_call("fetch_sub_issues"));
}

#[rstest]
fn test_move_recursive_adds_missing_descendants(ctx: TestContext) {
	let stdout = ctx.run_ok(&["move", "acme/api#1", "--status", "done", "--recursive", "--depth", "10", "--yes"]);

	assert!(stdout.trim_end().ends_with("processed=4 skipped=0 failed=0"), "{stdout}");
	let trace = ctx.trace();
	// #2 and web#3 were not on the board yet
	assert_eq!(trace.count("add_issue_to_project"), 2);
	assert_eq!(trace.count("set_field_value"), 4);
}

#[rstest]
fn test_move_dry_run_lists_targets(ctx: TestContext) {
	let stdout = ctx.run_ok(&["move", "acme/api#1", "--priority", "p1", "--field", "Estimate=3", "--recursive", "--depth", "1", "--dry-run"]);

	insta::assert_snapshot!(stdout, @r"
	[plan] acme/api#1 Epic
	       Priority = P1
	       Estimate = 3
	[plan] acme/api#2 Backend
	       add to project
	       Priority = P1
	       Estimate = 3
	[plan] acme/web#3 Frontend
	       add to project
	       Priority = P1
	       Estimate = 3
	planned=3 processed=0 skipped=0 failed=0
	");
	assert!(!ctx.trace().has_writes());
}

#[rstest]
fn test_move_bad_value_fails_issue(ctx: TestContext) {
	let stdout = ctx.run_ok(&["move", "acme/api#1", "--field", "Estimate=lots"]);
	assert!(stdout.contains("[FAIL] acme/api#1 Epic"), "{stdout}");
	assert!(stdout.contains("'lots' is not a valid number"), "{stdout}");
	assert!(!ctx.trace().has_mock_call("set_field_value"));
}

#[rstest]
fn test_move_recursive_requires_depth(ctx: TestContext) {
	let output = ctx.run(&["move", "acme/api#1", "--status", "wip", "--recursive"]);
	assert!(!output.status.success());
	assert!(!ctx.trace().has_writes());
}

#[rstest]
fn test_move_without_fields_is_an_error(ctx: TestContext) {
	let output = ctx.run(&["move", "acme/api#1"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("Nothing to set"));
}

#[test]
fn test_move_unreadable_branch_is_a_warning() {
	let state = DEFAULT_STATE.replacen("\"project\": {", "\"fail_sub_issues\": [\"acme/api#2\"],\n  \"project\": {", 1);
	let ctx = TestContext::new(DEFAULT_CONFIG, &state);

	let stdout = ctx.run_ok(&["move", "acme/api#1", "--status", "wip", "--recursive", "--depth", "5", "--yes"]);
	assert!(stdout.starts_with("warning: could not walk acme/api#2"), "{stdout}");
	assert!(stdout.trim_end().ends_with("processed=3 skipped=0 failed=0"), "{stdout}");
}

#[test]
fn test_move_json_carries_warnings() {
	let state = DEFAULT_STATE.replacen("\"project\": {", "\"fail_sub_issues\": [\"acme/api#2\"],\n  \"project\": {", 1);
	let ctx = TestContext::new(DEFAULT_CONFIG, &state);

	let stdout = ctx.run_ok(&["move", "acme/api#1", "--status", "wip", "--recursive", "--depth", "5", "--dry-run", "--json"]);
	let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
	assert_eq!(report["outcomes"].as_array().unwrap().len(), 3);
	assert_eq!(report["warnings"][0]["issue"], "acme/api#2");
}
