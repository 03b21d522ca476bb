#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! once assert_cmd 2.1 is the floor

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const COMPOSE: &str = r#"
version: '2.1'
services:
  myapp:
    image: registry.sitehost.co.nz/sitehost-php8-nginx:5.0.1-noble
    environment:
      - 'VIRTUAL_HOST=myapp.example.com, www.myapp.example.com'
    labels:
      - 'nz.sitehost.container.type=www'
      - 'nz.sitehost.container.image_update=True'
      - 'nz.sitehost.container.monitored=True'
      - 'nz.sitehost.container.backup_disable=False'
"#;

fn sitehost() -> Command {
    Command::cargo_bin("sitehost").unwrap()
}

/// Runs with no config file reachable and no provider variables set
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = sitehost();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("SITEHOST_CONFIG_PATH")
        .env_remove("SITEHOST_API_KEY")
        .env_remove("SITEHOST_CLIENT_ID")
        .env_remove("SITEHOST_API_ENDPOINT");
    cmd
}

#[test]
fn test_cli_help() {
    sitehost()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("id"))
        .stdout(predicate::str::contains("env-diff"))
        .stdout(predicate::str::contains("manifest"));
}

#[test]
fn test_cli_version() {
    sitehost()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitehost"));
}

#[test]
fn test_id_short_form() {
    sitehost()
        .args(["id", "ch-server1/myproject"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ch-server1"))
        .stdout(predicate::str::contains("ch-server1/myproject/myproject"));
}

#[test]
fn test_id_url_form_as_json() {
    let output = sitehost()
        .args([
            "id",
            "https://cp.sitehost.nz/cloud/manage-container/server/ch-server1/stack/myproject",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let id: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(id["server_name"], "ch-server1");
    assert_eq!(id["project"], "myproject");
    assert_eq!(id["service"], "myproject");
}

#[test]
fn test_id_invalid() {
    sitehost()
        .args(["id", "only-one-part"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid id: only-one-part"));
}

#[test]
fn test_env_diff() {
    let dir = TempDir::new().unwrap();
    let observed = dir.path().join("observed.yaml");
    let desired = dir.path().join("desired.yaml");
    fs::write(&observed, "A: '1'\nB: '2'\nC: '3'\n").unwrap();
    fs::write(&desired, "A: '1'\nB: '20'\nD: '4'\n").unwrap();

    sitehost()
        .arg("env-diff")
        .arg("-o")
        .arg(&observed)
        .arg("-d")
        .arg(&desired)
        .assert()
        .success()
        .stdout(predicate::str::contains("~ B=20"))
        .stdout(predicate::str::contains("- C"))
        .stdout(predicate::str::contains("~ D=4"))
        .stdout(predicate::str::contains("A=1").not())
        .stdout(predicate::str::contains("2 to set, 1 to remove"));
}

#[test]
fn test_env_diff_json_entries() {
    let dir = TempDir::new().unwrap();
    let observed = dir.path().join("observed.json");
    let desired = dir.path().join("desired.yaml");
    fs::write(&observed, r#"{"db_host": "old", "debug": "true"}"#).unwrap();
    fs::write(&desired, "DB_HOST: new\n").unwrap();

    let output = sitehost()
        .arg("env-diff")
        .arg("-o")
        .arg(&observed)
        .arg("-d")
        .arg(&desired)
        .args(["--uppercase", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            { "name": "DB_HOST", "content": "new" },
            { "name": "DEBUG", "content": "" },
        ])
    );
}

#[test]
fn test_env_diff_no_changes() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.yaml");
    fs::write(&settings, "A: '1'\n").unwrap();

    sitehost()
        .arg("env-diff")
        .arg("-o")
        .arg(&settings)
        .arg("-d")
        .arg(&settings)
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes"));
}

#[test]
fn test_manifest_labels() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("docker-compose.yml");
    fs::write(&compose, COMPOSE).unwrap();

    sitehost()
        .arg("manifest")
        .arg(&compose)
        .args(["--service", "myapp", "--label", "myapp.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("www.myapp.example.com"))
        .stdout(predicate::str::contains("aliases:        myapp.example.com").not())
        .stdout(predicate::str::contains("type:           www"))
        .stdout(predicate::str::contains("monitored:      true"))
        .stdout(predicate::str::contains("backup_disable: false"));
}

#[test]
fn test_manifest_unknown_service() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("docker-compose.yml");
    fs::write(&compose, COMPOSE).unwrap();

    sitehost()
        .arg("manifest")
        .arg(&compose)
        .args(["--service", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service 'other' not found"));
}

#[test]
fn test_config_missing_settings() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("api_key"));
}

#[test]
fn test_config_from_env() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .arg("config")
        .env("SITEHOST_API_KEY", "abcdef123456")
        .env("SITEHOST_CLIENT_ID", "12345")
        .assert()
        .success()
        .stdout(predicate::str::contains("********3456"))
        .stdout(predicate::str::contains("12345"));
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sitehost.yaml"),
        "api_key: from-file-key\nclient_id: '42'\napi_endpoint: https://api.sitehost.nz/1.2\n",
    )
    .unwrap();

    isolated(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitehost.yaml"))
        .stdout(predicate::str::contains("https://api.sitehost.nz/1.2"));
}

#[test]
fn test_config_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("elsewhere.yaml");
    fs::write(&path, "api_key: explicit-key-9999\nclient_id: '7'\n").unwrap();
    // ignored when a file is given explicitly
    fs::write(dir.path().join("sitehost.yaml"), "api_key: other\n").unwrap();

    isolated(&dir)
        .arg("config")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere.yaml"))
        .stdout(predicate::str::contains("9999"));
}

#[test]
fn test_config_path_from_env() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("from-env.yaml");
    fs::write(&path, "api_key: env-path-key-4321\nclient_id: '7'\n").unwrap();

    isolated(&dir)
        .arg("config")
        .env("SITEHOST_CONFIG_PATH", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("from-env.yaml"))
        .stdout(predicate::str::contains("4321"));
}

#[test]
fn test_config_explicit_file_missing() {
    let dir = TempDir::new().unwrap();

    isolated(&dir)
        .args(["config", "--file", "missing.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_debug_logging_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("docker-compose.yml");
    fs::write(&compose, COMPOSE).unwrap();

    sitehost()
        .arg("manifest")
        .arg(&compose)
        .args(["--service", "myapp"])
        .env("RUST_LOG", "debug")
        .assert()
        .success()
        .stderr(predicate::str::contains("Decoded manifest"))
        .stdout(predicate::str::contains("Decoded manifest").not());
}
