use assert_cmd::Command;
use predicates::prelude::*;

fn elearning_lint() -> Command {
    Command::cargo_bin("elearning-lint").unwrap()
}

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn valid_package_exits_zero_and_reports_the_standard() {
    let mut cmd = elearning_lint();
    cmd.arg(fixture("valid_scorm12"))
        .assert()
        .success()
        .stdout(predicate::str::contains("SCORM 1.2"))
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn package_with_errors_exits_one_and_lists_the_issue() {
    let mut cmd = elearning_lint();
    cmd.arg(fixture("broken_scorm12"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("SCORM12_MISSING_RESOURCE_REF"));
}

#[test]
fn strict_mode_turns_errors_into_a_fatal_exit() {
    let mut cmd = elearning_lint();
    cmd.arg(fixture("broken_scorm12"))
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn unrecognized_layout_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.txt"), "not a package").unwrap();

    let mut cmd = elearning_lint();
    cmd.arg(dir.path()).assert().code(2);
}

#[test]
fn json_format_emits_parseable_output() {
    let mut cmd = elearning_lint();
    let output = cmd
        .arg(fixture("valid_scorm12"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["moduleType"], "SCORM 1.2");
}
