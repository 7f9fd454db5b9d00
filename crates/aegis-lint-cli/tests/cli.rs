//! End-to-end tests for the `aegis-lint` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// The binary with per-user config isolated from the host.
fn aegis_lint(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("aegis-lint").unwrap();
    cmd.env("AEGIS_LINT_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_arguments_are_usage_errors_on_stdout() {
    let home = TempDir::new().unwrap();

    aegis_lint(home.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));

    aegis_lint(home.path())
        .arg("layering")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_root_is_rejected_before_scanning() {
    let home = TempDir::new().unwrap();
    aegis_lint(home.path())
        .args(["naming", "/definitely/not/here"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("directory does not exist"));
}

#[test]
fn layering_violation_fails_the_run() {
    let home = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write(
        tree.path(),
        "src/infrastructure/infrastructure_repo.c",
        "#include \"domain_foo.h\"\n#include \"app_bar.h\"\n",
    );

    aegis_lint(home.path())
        .arg("layering")
        .arg(tree.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Layer dependency check"))
        .stdout(predicate::str::contains(
            "src/infrastructure/infrastructure_repo.c:2 [LAYER_VIOLATION]",
        ))
        .stdout(predicate::str::contains("Errors: 1"))
        .stdout(predicate::str::contains("FAILED"));
}

#[test]
fn warnings_alone_pass() {
    let home = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write(
        tree.path(),
        "src/domain/domain_sensor.c",
        "/* @req: REQ-1 */\nint aegis_domain_sensor_read(void)\n{\n    return 0;\n}\n",
    );

    aegis_lint(home.path())
        .arg("traceability")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("FILE_TRACE_MISSING"))
        .stdout(predicate::str::contains("PASSED"));
}

#[test]
fn json_output_and_jobs_flag() {
    let home = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write(
        tree.path(),
        "src/domain/domain_counter.c",
        "static int counter = 0;\nstatic const int LIMIT = 10;\n",
    );

    let output = aegis_lint(home.path())
        .args(["globals", "--format", "json", "--jobs", "2"])
        .arg(tree.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["checker"], "globals");
    assert_eq!(value["files_checked"], 1);
    assert_eq!(value["diagnostics"].as_array().map(Vec::len), Some(1));
    assert_eq!(value["diagnostics"][0]["code"], "GLOBAL_VAR");
}

#[test]
fn exclude_flag_and_project_config() {
    let home = TempDir::new().unwrap();
    let tree = TempDir::new().unwrap();
    write(tree.path(), "src/domain/domain_counter.c", "int counter;\n");
    write(tree.path(), "src/domain/vendor/domain_blob.c", "int blob;\n");

    aegis_lint(home.path())
        .args(["globals", "--format", "compact", "--exclude", "**/vendor/**"])
        .arg(tree.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("domain_counter.c"))
        .stdout(predicate::str::contains("domain_blob.c").not());

    write(tree.path(), "aegis-lint.toml", "[rules.globals]\nseverity = \"warning\"\n");
    aegis_lint(home.path())
        .arg("globals")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings: 2"));
}

#[test]
fn list_rules_names_every_checker() {
    let home = TempDir::new().unwrap();
    aegis_lint(home.path())
        .arg("list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("isr-safety"))
        .stdout(predicate::str::contains("GLOBAL_VAR"))
        .stdout(predicate::str::contains("traceability"));
}

#[test]
fn init_writes_config_once() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    aegis_lint(home.path())
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success();
    assert!(dir.path().join("aegis-lint.toml").is_file());

    aegis_lint(home.path())
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .failure();
}
