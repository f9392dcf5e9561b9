use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CLEAN: &str = "\
# Core dependencies
fastapi>=0.104.0
uvicorn[standard]>=0.24.0
pydantic>=2.9,<2.10

# Database
aiosqlite>=0.19.0
# asyncpg>=0.29.0
";

fn reqlint() -> Command {
    Command::cargo_bin("reqlint").unwrap()
}

#[test]
fn check_clean_manifest_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("requirements.txt"), CLEAN).unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("OK"));
}

#[test]
fn check_conflict_exits_one() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "pydantic>=2.9,<2.10\npydantic>=3.0\n",
    )
    .unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E_DUP_CONFLICT"));
}

#[test]
fn check_missing_manifest_exits_two() {
    let dir = tempdir().unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .arg("missing.txt")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn check_warnings_pass_unless_strict() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "requests>=2.31\nrequests>=2.28\n",
    )
    .unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("W_DUP_REDUNDANT"));

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .arg("--strict")
        .assert()
        .code(1);
}

#[test]
fn check_syntax_error_reports_line() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "fastapi>=0.104.0\npydantic>=\n",
    )
    .unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("E_SYNTAX"))
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn fmt_check_flags_non_canonical() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("requirements.txt"),
        "FastAPI >= 0.104.0\n",
    )
    .unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("fmt")
        .arg("--check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not in canonical form"));
}

#[test]
fn fmt_write_then_check_is_clean() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("requirements.txt");
    fs::write(&path, "FastAPI >= 0.104.0\nUvicorn[watchfiles, standard]>=0.24.0\n").unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("fmt")
        .arg("--write")
        .assert()
        .success();

    let formatted = fs::read_to_string(&path).unwrap();
    assert_eq!(
        formatted,
        "fastapi>=0.104.0\nuvicorn[standard,watchfiles]>=0.24.0\n"
    );

    reqlint()
        .current_dir(dir.path())
        .arg("fmt")
        .arg("--check")
        .assert()
        .success();
}

#[test]
fn fmt_stdout_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("requirements.txt");
    fs::write(&path, "FastAPI >= 0.104.0\n").unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("fmt")
        .assert()
        .success()
        .stdout(predicate::eq("fastapi>=0.104.0\n"));

    assert_eq!(fs::read_to_string(&path).unwrap(), "FastAPI >= 0.104.0\n");
}

#[test]
fn diff_equivalent_manifests_exits_zero() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "FastAPI >= 0.104.0\n").unwrap();
    fs::write(dir.path().join("b.txt"), "# web\nfastapi>=0.104.0\n").unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("diff")
        .arg("a.txt")
        .arg("b.txt")
        .assert()
        .success();
}

#[test]
fn diff_detects_changes_and_exits_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "pydantic>=2.9,<2.10\n").unwrap();
    fs::write(dir.path().join("b.txt"), "pydantic>=2.9,<2.11\n").unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("diff")
        .arg("a.txt")
        .arg("b.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("1 changed"));
}

#[test]
fn fingerprint_is_stable_across_layout() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "fastapi>=0.104.0\npydantic>=2.9\n").unwrap();
    fs::write(
        dir.path().join("b.txt"),
        "# Core\npydantic >= 2.9\n\nfastapi>=0.104.0  # web\n",
    )
    .unwrap();

    let a = reqlint()
        .current_dir(dir.path())
        .arg("fingerprint")
        .arg("a.txt")
        .output()
        .unwrap();
    let b = reqlint()
        .current_dir(dir.path())
        .arg("fingerprint")
        .arg("b.txt")
        .output()
        .unwrap();

    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
    assert_eq!(String::from_utf8(a.stdout).unwrap().trim().len(), 64);
}

#[test]
fn list_shows_sections_and_disabled() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("requirements.txt"), CLEAN).unwrap();

    reqlint()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("uvicorn[standard]"))
        .stdout(predicate::str::contains("Database"))
        .stdout(predicate::str::contains("asyncpg").not());

    reqlint()
        .current_dir(dir.path())
        .arg("list")
        .arg("--all")
        .assert()
        .success()
        .stdout(predicate::str::contains("# asyncpg"));
}
