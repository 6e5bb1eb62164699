//! `ghpm triage` against the mock board.

use rstest::rstest;

use crate::{
	assert_traced,
	fixtures::{DEFAULT_STATE, TestContext, ctx},
};

#[rstest]
fn test_configured_rule_adds_labels_and_fields(ctx: TestContext) {
	let stdout = ctx.run_ok(&["triage", "bugs"]);

	assert!(stdout.contains("[done] acme/api#5 Crash on start"), "{stdout}");
	assert!(stdout.contains("+label tracked"), "{stdout}");
	assert!(stdout.contains("Status = Backlog"), "{stdout}");
	assert!(stdout.trim_end().ends_with("processed=1 skipped=0 failed=0"), "{stdout}");

	let trace = ctx.trace();
	assert_traced!(trace, "add_issue_to_project");
	assert_traced!(trace, "add_label", "acme", "api", 5);
	assert_eq!(trace.count("set_field_value"), 1);
	// Already tracked, so never touched
	assert!(!trace.has_mock_call_with_issue("add_label", "acme", "web", 6));
}

#[rstest]
fn test_dry_run_writes_nothing(ctx: TestContext) {
	let stdout = ctx.run_ok(&["triage", "bugs", "--dry-run"]);

	assert!(stdout.contains("[plan] acme/api#5 Crash on start"), "{stdout}");
	assert!(stdout.trim_end().ends_with("planned=1 processed=0 skipped=0 failed=0"), "{stdout}");
	assert!(!ctx.trace().has_writes(), "{:#?}", ctx.trace().mock_calls());
}

#[rstest]
fn test_ad_hoc_rule_with_json_output(ctx: TestContext) {
	let stdout = ctx.run_ok(&["triage", "--query", "is:open label:bug", "--apply", "labels=triaged,priority=p1", "--json"]);
	let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();

	assert_eq!(report["summary"]["processed"], 2);
	let issues: Vec<&str> = report["outcomes"].as_array().unwrap().iter().map(|o| o["issue"].as_str().unwrap()).collect();
	assert_eq!(issues, vec!["acme/api#5", "acme/web#6"]);
	assert_eq!(ctx.trace().count("add_label"), 2);
}

#[rstest]
fn test_unknown_field_option_fails_the_issue_only(ctx: TestContext) {
	let stdout = ctx.run_ok(&["triage", "--query", "is:open label:bug", "--apply", "status=someday"]);

	assert!(stdout.contains("[FAIL] acme/api#5"), "{stdout}");
	assert!(stdout.contains("[FAIL] acme/web#6"), "{stdout}");
	assert!(stdout.contains("someday"), "{stdout}");
	assert!(stdout.trim_end().ends_with("processed=0 skipped=0 failed=2"), "{stdout}");
	assert!(!ctx.trace().has_mock_call("set_field_value"));
}

#[rstest]
fn test_unknown_rule_is_an_error(ctx: TestContext) {
	let output = ctx.run(&["triage", "nope"]);
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("No triage rule named 'nope'"), "{stderr}");
	assert!(stderr.contains("bugs"), "{stderr}");
}

#[test]
fn test_missing_project_field_fails_each_issue() {
	let state = DEFAULT_STATE.replace(r#"{"name": "Status", "data_type": "SINGLE_SELECT", "options": ["Backlog", "In progress", "Done"]},"#, "");
	let ctx = TestContext::new(crate::fixtures::DEFAULT_CONFIG, &state);

	let stdout = ctx.run_ok(&["triage", "bugs"]);
	assert!(stdout.contains("[FAIL] acme/api#5"), "{stdout}");
	assert!(stdout.contains("Status"), "{stdout}");
	assert!(!ctx.trace().has_mock_call("set_field_value"));
}

const RULE_CONFIG: &str = r#"
project: { owner: acme, number: 3 }
repositories: [acme/api]
fields:
  status:   { field: Status,   values: { backlog: Backlog } }
  priority: { field: Priority, values: { p1: P1 } }
triage:
  ask:
    query: "is:open label:bug"
    apply: { fields: { status: backlog } }
    interactive: { priority: true }
  ordered:
    query: "is:open label:bug"
    apply: { fields: { status: someday, priority: never } }
"#;

#[test]
fn test_interactive_fields_are_not_asked_without_flag() {
	let ctx = TestContext::new(RULE_CONFIG, DEFAULT_STATE);

	let stdout = ctx.run_ok(&["triage", "ask"]);
	assert!(stdout.contains("[done] acme/api#5 Crash on start\n       Status = Backlog"), "{stdout}");
	assert!(stdout.trim_end().ends_with("processed=1 skipped=0 failed=0"), "{stdout}");
	assert_eq!(ctx.trace().count("set_field_value"), 1);
}

#[test]
fn test_rule_fields_apply_in_written_order() {
	let ctx = TestContext::new(RULE_CONFIG, DEFAULT_STATE);

	let stdout = ctx.run_ok(&["triage", "ordered"]);
	assert!(stdout.contains("'someday' is not an option of field 'Status'"), "{stdout}");
	assert!(!stdout.contains("'never'"), "{stdout}");
}
