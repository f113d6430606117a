//! End-to-end tests for the `appconfigguard` binary against a `file:` store.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated working directory with its own config dir, so no user
/// settings or environment leak into the run.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn store_endpoint(&self) -> String {
        format!("file:{}", self.path("store.json").display())
    }

    fn write_local(&self, content: &str) -> PathBuf {
        let path = self.path("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_appconfigguard"));
        cmd.current_dir(self.dir.path());
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("xdg"));
        cmd.env_remove("APPCONFIGGUARD_CONFIG");
        cmd.env_remove("APPCONFIGGUARD_ENDPOINT");
        cmd.env_remove("APP_CONFIG_TOKEN");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn sync(&self, local: &Path, extra: &[&str]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("sync")
            .arg("--file")
            .arg(local)
            .arg("--endpoint")
            .arg(self.store_endpoint())
            .args(extra);
        cmd
    }
}

const LOCAL: &str = r#"{
  "app": {"name": "demo", "port": 8080},
  "feature": {"new_ui": true},
  "secrets": {"db": "@Microsoft.KeyVault(SecretUri=https://myvault.vault.azure.net/secrets/db-password)"}
}"#;

#[test]
fn test_validate_clean_file() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.cmd()
        .args(["validate", "--file"])
        .arg(&local)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid (4 entries checked)."));
}

#[test]
fn test_validate_reports_issues_and_fails() {
    let env = TestEnv::new();
    let local = env.write_local(
        r#"{"feature": {"beta": "sometimes"}, "secrets": {"x": "@Microsoft.KeyVault(SecretUri=https://example.com/secrets/x)"}}"#,
    );

    env.cmd()
        .args(["validate", "--file"])
        .arg(&local)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[parsing_error] feature.beta"))
        .stdout(predicate::str::contains("secrets.x"));
}

#[test]
fn test_validate_json_output() {
    let env = TestEnv::new();
    let local = env.write_local(r#"{"feature": {"beta": "maybe"}}"#);

    let output = env
        .cmd()
        .args(["validate", "--output", "json", "--file"])
        .arg(&local)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["issues"][0]["key"], "feature.beta");
}

#[test]
fn test_sync_preview_does_not_write() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.sync(&local, &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ ADD     app.name"))
        .stdout(predicate::str::contains("to add:    4"));
    assert!(!env.path("store.json").exists());
}

#[test]
fn test_sync_apply_then_no_changes() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.sync(&local, &["--apply", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Applied 4 write(s) and 0 delete(s)."));

    let stored = std::fs::read_to_string(env.path("store.json")).unwrap();
    assert!(stored.contains(r#"{\"uri\":\"https://myvault.vault.azure.net/secrets/db-password\"}"#));

    env.sync(&local, &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes detected"));
}

#[test]
fn test_sync_ci_exit_codes() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.sync(&local, &["--ci"]).assert().code(1);
    env.sync(&local, &["--apply", "--yes"]).assert().success();
    env.sync(&local, &["--ci"]).assert().code(0);
}

#[test]
fn test_sync_apply_declined() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.sync(&local, &["--apply"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Aborted"));
    assert!(!env.path("store.json").exists());
}

#[test]
fn test_sync_strict_deletes_remote_only_keys() {
    let env = TestEnv::new();
    let local = env.write_local(r#"{"a": "1", "b": "2"}"#);
    env.sync(&local, &["--apply", "--yes"]).assert().success();

    let local = env.write_local(r#"{"a": "1"}"#);
    env.sync(&local, &[])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes detected"));

    let output = env
        .sync(&local, &["--strict", "--output", "json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["deleted"], 1);
    assert_eq!(json["changes"][0]["type"], "delete");
    assert_eq!(json["changes"][0]["key"], "b");
}

#[test]
fn test_sync_label_and_tags_on_added_keys() {
    let env = TestEnv::new();
    let local = env.write_local(r#"{"a": "1"}"#);

    env.sync(&local, &["--label", "dev", "--tags", "team=core", "--apply", "--yes"])
        .assert()
        .success();

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(env.path("store.json")).unwrap()).unwrap();
    assert_eq!(stored[0]["label"], "dev");
    assert_eq!(stored[0]["tags"]["team"], "core");
}

#[test]
fn test_download_round_trip() {
    let env = TestEnv::new();
    let local = env.write_local(r#"{"db": {"host": "localhost", "port": 5432}, "hosts": ["a", "b"]}"#);
    env.sync(&local, &["--apply", "--yes"]).assert().success();

    let out = env.path("downloaded.json");
    env.cmd()
        .args(["download", "--endpoint", &env.store_endpoint(), "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded 4 setting(s)"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({"db": {"host": "localhost", "port": "5432"}, "hosts": ["a", "b"]})
    );
}

#[test]
fn test_download_empty_store_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["download", "--endpoint", &env.store_endpoint(), "--output"])
        .arg(env.path("out.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No configuration items found"));
}

#[test]
fn test_missing_endpoint_fails() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.cmd()
        .args(["sync", "--file"])
        .arg(&local)
        .assert()
        .failure()
        .stderr(predicate::str::contains("an endpoint is required"));
}

#[test]
fn test_endpoint_from_settings_file() {
    let env = TestEnv::new();
    let local = env.write_local(r#"{"a": "1"}"#);
    let settings = env.path("settings.yaml");
    std::fs::write(
        &settings,
        format!("endpoint: {}\nstrict: true\n", env.store_endpoint()),
    )
    .unwrap();

    env.cmd()
        .args(["sync", "--config"])
        .arg(&settings)
        .arg("--file")
        .arg(&local)
        .assert()
        .success()
        .stdout(predicate::str::contains("+ ADD     a"));
}

#[test]
fn test_https_endpoint_without_token_fails() {
    let env = TestEnv::new();
    let local = env.write_local(LOCAL);

    env.cmd()
        .args(["sync", "--endpoint", "https://example.azconfig.io", "--file"])
        .arg(&local)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing store credentials"));
}
