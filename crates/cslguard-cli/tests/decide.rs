use assert_cmd::Command;
use predicates::prelude::*;

fn cslguard_cmd() -> Command {
    Command::cargo_bin("cslguard").unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/../../tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn over_limit_context_escalates_with_exit_3() {
    cslguard_cmd()
        .args([
            "--root",
            &fixture("clean"),
            "decide",
            "--scope",
            "budget_limits",
            "--context",
            &format!("{}/context_over.json", fixture("clean")),
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("\"outcome\": \"escalate\""))
        .stdout(predicate::str::contains("exceeds auto-approval limit"));
}

#[test]
fn under_limit_context_is_approved() {
    cslguard_cmd()
        .args([
            "--root",
            &fixture("clean"),
            "decide",
            "--scope",
            "budget_limits",
            "--context",
            &format!("{}/context_under.json", fixture("clean")),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"approved\""))
        .stdout(predicate::str::contains("no applicable constraints fired"));
}

#[test]
fn rejecting_context_exits_2() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let context = tmp.path().join("context.json");
    std::fs::write(&context, "{\"dataset\": \"pii_raw\"}").expect("write context");

    cslguard_cmd()
        .args([
            "--root",
            &fixture("clean"),
            "decide",
            "--scope",
            "data_access",
            "--context",
            context.to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"outcome\": \"rejected\""));
}

#[test]
fn missing_context_variable_escalates() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let context = tmp.path().join("context.json");
    std::fs::write(&context, "{\"currency\": \"USD\"}").expect("write context");

    cslguard_cmd()
        .args([
            "--root",
            &fixture("clean"),
            "decide",
            "--scope",
            "budget_limits",
            "--context",
            context.to_str().unwrap(),
        ])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("missing from the decision context"));
}

#[test]
fn decide_refuses_a_failing_rule_set() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let context = tmp.path().join("context.json");
    std::fs::write(&context, "{\"amount\": 1}").expect("write context");

    cslguard_cmd()
        .args([
            "--root",
            &fixture("missing_clause"),
            "decide",
            "--context",
            context.to_str().unwrap(),
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refusing to evaluate"));
}

#[test]
fn malformed_context_is_a_runtime_error() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let context = tmp.path().join("context.json");
    std::fs::write(&context, "[1, 2, 3]").expect("write context");

    cslguard_cmd()
        .args([
            "--root",
            &fixture("clean"),
            "decide",
            "--scope",
            "budget_limits",
            "--context",
            context.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("context must be a JSON object"));
}
