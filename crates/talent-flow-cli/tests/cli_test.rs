//! Drives the `talent-flow` binary end to end.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn talent_flow(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("talent-flow").unwrap();
    cmd.current_dir(dir).env_remove("TALENT_FLOW_LOG");
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn migrate_reports_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    talent_flow(dir.path())
        .args(["migrate", "--db", "tf.db", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schema_version\": 1"));
    assert!(dir.path().join("tf.db").exists());
}

#[test]
fn run_baselines_then_detects_hire() {
    let dir = tempfile::tempdir().unwrap();
    let before = write(
        dir.path(),
        "before.jsonl",
        "{\"person_id\": \"p1\", \"company_name\": \"Acme\", \"data_source\": \"linkedin\", \"observed_at\": \"2026-05-01T00:00:00Z\"}\n\
         not json at all\n",
    );
    let after = write(
        dir.path(),
        "after.json",
        r#"[{"person_id": "p1", "company_name": "NewCo", "title": "Engineer",
             "data_source": "linkedin", "observed_at": "2026-05-02T00:00:00Z"}]"#,
    );

    talent_flow(dir.path())
        .args(["run", "--db", "tf.db", "--now", "2026-05-02T00:00:00Z", "--input"])
        .arg(&before)
        .assert()
        .success()
        .stdout(predicate::str::contains("baselined").and(predicate::str::contains("run ")));

    talent_flow(dir.path())
        .args(["run", "--db", "tf.db", "--now", "2026-05-03T00:00:00Z", "--output", "json", "--input"])
        .arg(&after)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hire\": 1"))
        .stdout(predicate::str::contains("\"signals_emitted\": 1"));

    talent_flow(dir.path())
        .args(["runs", "--db", "tf.db", "--limit", "5", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"baselined\": 1"))
        .stdout(predicate::str::contains("\"skipped_malformed\": 1"));
}

#[test]
fn config_prints_effective_toml() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "talent_flow.toml", "[governance]\nmax_movements_per_period = 5\n");
    talent_flow(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[governance]"))
        .stdout(predicate::str::contains("max_movements_per_period = 5"));
}

#[test]
fn invalid_config_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "bad.toml", "[movements.hire]\nmin_confidence = 2.0\n");
    talent_flow(dir.path())
        .args(["migrate", "--db", "tf.db", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_ERROR"));
    assert!(!dir.path().join("tf.db").exists());
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    talent_flow(dir.path())
        .args(["run", "--db", "tf.db", "--input", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}
