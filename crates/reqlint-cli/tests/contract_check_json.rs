use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn reqlint() -> Command {
    Command::cargo_bin("reqlint").unwrap()
}

fn assert_schema(v: &Value) {
    assert_eq!(v["schema_version"], 1);
    assert!(v.get("ok").expect("missing ok").is_boolean());
    assert!(v.get("exit_code").expect("missing exit_code").is_i64());
    assert_eq!(v["tool"]["name"], "reqlint");
    assert!(v["tool"]["version"].is_string());
    assert!(
        v.get("diagnostics")
            .expect("missing diagnostics")
            .is_array(),
        "diagnostics must be array"
    );
    let summary = v.get("summary").expect("missing summary");
    for key in ["diagnostic_count", "error_count", "warn_count", "note_count"] {
        assert!(summary.get(key).expect(key).is_u64(), "{key} must be uint");
    }
}

fn run_check_json(dir: &std::path::Path, extra: &[&str]) -> (Value, i32) {
    let mut cmd = reqlint();
    cmd.current_dir(dir).arg("check").arg("--format").arg("json");
    for arg in extra {
        cmd.arg(arg);
    }
    let output = cmd.output().unwrap();
    let v: Value = serde_json::from_slice(&output.stdout).expect("stdout must be JSON");
    (v, output.status.code().unwrap())
}

#[test]
fn clean_manifest_report() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "fastapi>=0.104.0\nuvicorn[standard]>=0.24.0\n",
    )
    .unwrap();

    let (v, code) = run_check_json(dir.path(), &[]);
    assert_eq!(code, 0);
    assert_schema(&v);
    assert_eq!(v["ok"], true);
    assert_eq!(v["exit_code"], 0);
    assert_eq!(v["summary"]["diagnostic_count"], 0);
}

#[test]
fn findings_are_sorted_and_coded() {
    let dir = tempdir().unwrap();
    // One warning (redundant duplicate) and two errors (syntax, conflict).
    fs::write(
        dir.path().join("requirements.txt"),
        "broken ???\npydantic>=2.9,<2.10\npydantic>=3.0\nrequests>=2.31\nrequests>=2.28\n",
    )
    .unwrap();

    let (v, code) = run_check_json(dir.path(), &[]);
    assert_eq!(code, 1);
    assert_schema(&v);
    assert_eq!(v["ok"], false);

    let diags = v["diagnostics"].as_array().unwrap();
    let codes: Vec<&str> = diags.iter().map(|d| d["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["E_DUP_CONFLICT", "E_SYNTAX", "W_DUP_REDUNDANT"]);

    let severities: Vec<&str> = diags
        .iter()
        .map(|d| d["severity"].as_str().unwrap())
        .collect();
    assert_eq!(severities, vec!["error", "error", "warn"]);

    // Context carries 1-based line numbers.
    assert_eq!(diags[1]["context"]["line"], 1);
    assert_eq!(v["summary"]["error_count"], 2);
    assert_eq!(v["summary"]["warn_count"], 1);
}

#[test]
fn strict_flag_is_echoed_and_promotes() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "requests>=2.31\nrequests>=2.28\n",
    )
    .unwrap();

    let (v, code) = run_check_json(dir.path(), &["--strict"]);
    assert_eq!(code, 1);
    assert_eq!(v["summary"]["strict"], true);
    assert_eq!(v["summary"]["error_count"], 1);
    assert_eq!(v["summary"]["warn_count"], 0);
}

#[test]
fn output_flag_writes_report_to_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("requirements.txt"), "fastapi>=0.104.0\n").unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg("report.json")
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("report.json")).unwrap();
    let v: Value = serde_json::from_str(&content).unwrap();
    assert_schema(&v);
    assert_eq!(v["command"]["name"], "check");
    assert_eq!(v["command"]["manifest"], "requirements.txt");
}

#[test]
fn diagnostics_carry_fix_steps() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "pydantic>=2.10,<2.9\n",
    )
    .unwrap();

    let (v, code) = run_check_json(dir.path(), &[]);
    assert_eq!(code, 1);
    let diags = v["diagnostics"].as_array().unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["code"], "E_UNSATISFIABLE");
    assert!(!diags[0]["fix_steps"].as_array().unwrap().is_empty());
}
