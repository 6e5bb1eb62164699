//! `ghpm sub` and `ghpm split`.

use rstest::rstest;

use crate::{
	assert_traced,
	fixtures::{TestContext, ctx},
};

#[rstest]
fn test_list_tree_with_membership(ctx: TestContext) {
	let stdout = ctx.run_ok(&["sub", "list", "acme/api#1"]);

	insta::assert_snapshot!(stdout, @r"
	* acme/api#1 Epic
	    acme/api#2 Backend
	*     acme/api#4 Schema
	    acme/web#3 Frontend
	");
	assert_traced!(ctx.trace(), "fetch_sub_issues", "acme", "web", 3);
}

#[rstest]
fn test_list_respects_depth_and_shows_parent(ctx: TestContext) {
	let stdout = ctx.run_ok(&["sub", "list", "acme/api#2", "--depth", "1"]);
	assert!(stdout.starts_with("parent: acme/api#1 Epic\n"), "{stdout}");
	assert!(stdout.contains("acme/api#4 Schema"), "{stdout}");

	let stdout = ctx.run_ok(&["sub", "list", "acme/api#1", "--depth", "1"]);
	assert!(!stdout.contains("acme/api#4"), "{stdout}");
	assert!(!ctx.trace().has_mock_call_with_issue("fetch_sub_issues", "acme", "api", 2));
}

#[rstest]
fn test_list_json(ctx: TestContext) {
	let stdout = ctx.run_ok(&["sub", "list", "#1", "--json"]);
	let tree: serde_json::Value = serde_json::from_str(&stdout).unwrap();

	assert_eq!(tree["parent"], serde_json::Value::Null);
	assert_eq!(tree["root"]["title"], "Epic");
	let depths: Vec<u64> = tree["nodes"].as_array().unwrap().iter().map(|n| n["depth"].as_u64().unwrap()).collect();
	assert_eq!(depths, vec![1, 2, 1]);
}

#[rstest]
fn test_add_and_remove(ctx: TestContext) {
	let stdout = ctx.run_ok(&["sub", "add", "acme/api#1", "acme/api#5"]);
	assert_eq!(stdout.trim(), "Added acme/api#5 as a sub-issue of acme/api#1");

	let stdout = ctx.run_ok(&["sub", "remove", "acme/api#1", "acme/web#3"]);
	assert_eq!(stdout.trim(), "Removed acme/web#3 from acme/api#1");
	assert_traced!(ctx.trace(), "remove_sub_issue");
}

#[rstest]
fn test_add_existing_link_and_remove_missing_link_are_no_ops(ctx: TestContext) {
	let stdout = ctx.run_ok(&["sub", "add", "acme/api#1", "acme/api#2"]);
	assert!(stdout.contains("already a sub-issue, nothing to do"), "{stdout}");

	let stdout = ctx.run_ok(&["sub", "remove", "acme/api#1", "acme/api#5"]);
	assert!(stdout.contains("is not a sub-issue of acme/api#1, nothing to do"), "{stdout}");
}

#[rstest]
fn test_split_from_body_skips_existing(ctx: TestContext) {
	let stdout = ctx.run_ok(&["split", "acme/api#1", "--from-body"]);

	insta::assert_snapshot!(stdout, @r"
	[skip] Backend (already a sub-issue)
	[done] Write docs -> acme/api#8
	[done] Announce -> acme/api#9
	processed=2 skipped=1 failed=0
	");
	let trace = ctx.trace();
	assert_eq!(trace.count("create_issue"), 2);
	assert_eq!(trace.count("add_sub_issue"), 2);
}

#[rstest]
fn test_split_dry_run(ctx: TestContext) {
	let stdout = ctx.run_ok(&["split", "acme/api#1", "New thing", "--dry-run"]);
	assert!(stdout.contains("[plan] New thing"), "{stdout}");
	assert!(!ctx.trace().has_writes());
}

#[rstest]
fn test_split_without_titles_is_an_error(ctx: TestContext) {
	let output = ctx.run(&["split", "acme/api#2"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("No titles to split into"));
}
