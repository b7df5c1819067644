use guardpatch_cli::{render, run, Invocation, Mode, EXIT_ERROR, EXIT_PENDING};
use guardpatch_test_utils::{basis_plan_toml, go_source_with_basis_checks, temp_dir, write_fixture};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::Command;

fn invocation(args: &[&str]) -> Invocation {
    let mut full = vec!["guardpatch"];
    full.extend_from_slice(args);
    Invocation::parse_from(full).unwrap()
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn apply_uses_the_plan_file_and_reports_count() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(3);
    let file = write_fixture(dir.path(), "calc.go", &source);
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(Some("calc.go"), &checks));

    let summary = run(&invocation(&["apply", "--plan", arg(&plan)])).unwrap();

    assert_eq!(summary.file.applied(), 3);
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(
        render(&summary, false, 0).unwrap(),
        format!("Applied 3 of 3 guard patches to {}", file.display())
    );
}

#[test]
fn check_flags_pending_then_passes_after_apply() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(2);
    let file = write_fixture(dir.path(), "calc.go", &source);
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(None, &checks));

    let check = invocation(&["check", "--plan", arg(&plan), "--file", arg(&file)]);
    let pending = run(&check).unwrap();
    assert_eq!(pending.mode, Mode::Check);
    assert_eq!(pending.exit_code(), EXIT_PENDING);
    assert!(!pending.file.written);
    assert_eq!(std::fs::read_to_string(&file).unwrap(), source);

    run(&invocation(&["apply", "--plan", arg(&plan), "--file", arg(&file)])).unwrap();

    let clean = run(&check).unwrap();
    assert_eq!(clean.exit_code(), 0);
    assert!(render(&clean, false, 0).unwrap().starts_with("No pending guard patches"));
}

#[test]
fn strict_turns_a_shifted_line_into_an_error() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(1);
    let file = write_fixture(dir.path(), "calc.go", &format!("// moved\n{source}"));
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(Some("calc.go"), &checks));

    let lenient = run(&invocation(&["apply", "--plan", arg(&plan), "--dry-run"])).unwrap();
    assert_eq!(lenient.file.applied(), 0);

    let err = run(&invocation(&["apply", "--plan", arg(&plan), "--strict"])).unwrap_err();
    assert!(format!("{err:#}").contains("rejected"));
    assert!(std::fs::read_to_string(&file).unwrap().starts_with("// moved\n"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = temp_dir();
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(None, &[1]));
    let err = run(&invocation(&["apply", "--plan", arg(&plan)])).unwrap_err();
    assert!(err.to_string().contains("no file to patch"));
}

#[test]
fn json_report_lists_each_target() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(2);
    write_fixture(dir.path(), "calc.go", &source);
    let plan = write_fixture(
        dir.path(),
        "fix.toml",
        &basis_plan_toml(Some("calc.go"), &[checks[0], checks[1] + 1]),
    );

    let summary = run(&invocation(&["apply", "--plan", arg(&plan), "--json"])).unwrap();
    let value: serde_json::Value = serde_json::from_str(&render(&summary, true, 0).unwrap()).unwrap();

    let entries = value["report"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["outcome"], "applied");
    assert_eq!(entries[1]["outcome"], "no_match");
    assert_eq!(value["written"], true);
}

#[test]
fn verbose_text_lists_outcomes() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(1);
    write_fixture(dir.path(), "calc.go", &source);
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(Some("calc.go"), &checks));

    let summary = run(&invocation(&["apply", "--plan", arg(&plan)])).unwrap();
    let text = render(&summary, false, 1).unwrap();
    assert!(text.contains(&format!("target 0 (basis): applied at line {}", checks[0])));
}

#[test]
fn binary_exit_codes() {
    let dir = temp_dir();
    let (source, checks) = go_source_with_basis_checks(1);
    let file = write_fixture(dir.path(), "calc.go", &source);
    let plan = write_fixture(dir.path(), "fix.toml", &basis_plan_toml(Some("calc.go"), &checks));
    let bin = env!("CARGO_BIN_EXE_guardpatch");

    let check = Command::new(bin).args(["check", "--plan", arg(&plan)]).output().unwrap();
    assert_eq!(check.status.code(), Some(i32::from(EXIT_PENDING)));

    let apply = Command::new(bin).args(["apply", "--plan", arg(&plan)]).output().unwrap();
    assert!(apply.status.success());
    assert!(String::from_utf8_lossy(&apply.stdout).starts_with("Applied 1 of 1"));
    assert!(std::fs::read_to_string(&file).unwrap().contains("isLiteralEmptyString"));

    let missing = Command::new(bin)
        .args(["apply", "--plan", arg(&dir.path().join("nope.toml"))])
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(i32::from(EXIT_ERROR)));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("loading plan"));
}
