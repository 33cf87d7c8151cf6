//! Runs the `counter_demo` binary headless.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn counter_demo() -> Command {
    let mut cmd = Command::cargo_bin("counter_demo").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("NO_COLOR")
        .env_remove("COUNTER_NAME")
        .env_remove("COUNTER_ENDPOINT")
        .env_remove("COUNTER_CONFIG");
    cmd
}

#[test]
fn self_check_prints_offline_count() {
    counter_demo()
        .args(["--self-check", "--offline-count", "42", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current: 42"))
        .stdout(predicate::str::contains("Count: counter"))
        .stdout(predicate::str::contains("[ + ] [ - ]"))
        .stdout(predicate::str::contains("probe: healthy"));
}

#[test]
fn self_check_floors_negative_count() {
    counter_demo()
        .args(["--self-check", "--offline-count=-5", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current: 0"));
}

#[test]
fn self_check_with_injected_fault() {
    counter_demo()
        .args([
            "--self-check",
            "--offline-count",
            "8",
            "--inject-fault",
            "--no-color",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("probe: healthy").not())
        .stdout(predicate::str::contains("Current: 8"));
}

#[test]
fn unreachable_endpoint_falls_back() {
    counter_demo()
        .args([
            "--self-check",
            "--no-color",
            "--endpoint",
            "http://127.0.0.1:9/random",
            "--timeout-ms",
            "200",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current: 99"));
}

#[test]
fn diagnostics_shows_config() {
    counter_demo()
        .args(["--name", "clicks", "diagnostics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: clicks"))
        .stdout(predicate::str::contains("randomnumberapi.com"));
}

#[test]
fn config_file_is_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "name": "from-file", "offline_count": 17 }}"#).unwrap();

    counter_demo()
        .args(["--self-check", "--no-color", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Count: from-file"))
        .stdout(predicate::str::contains("Current: 17"));
}

#[test]
fn invalid_config_fails() {
    counter_demo()
        .args(["--self-check", "--name", " ", "--offline-count", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must not be empty"));
}

#[test]
fn log_file_receives_records() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("counter.log");

    counter_demo()
        .args(["--self-check", "--no-color", "--offline-count", "3", "-vv"])
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("initial count fetched"));
}
