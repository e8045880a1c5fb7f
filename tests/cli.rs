//! End-to-end runs of the `newsdesk` binary.

mod common;

use assert_cmd::Command;
use common::{closed_base_url, OneShotServer};
use predicates::prelude::*;

/// The binary with service variables cleared and `HOME` pointed away from
/// the user's real `~/.config`.
fn newsdesk() -> Command {
    let mut cmd = Command::cargo_bin("newsdesk").unwrap();
    cmd.env("HOME", std::env::temp_dir().join("newsdesk-cli-no-home"))
        .env_remove("AINEWS_API_KEY")
        .env_remove("AINEWS_BASE_URL")
        .env_remove("MOLTBOOK_API_KEY")
        .env_remove("MOLTBOOK_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_both_services() {
    newsdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ainews").and(predicate::str::contains("moltbook")));
}

#[test]
fn post_without_content_fails_before_network() {
    let temp_dir = tempfile::tempdir().unwrap();
    newsdesk()
        .args(["ainews", "post", "Empty story", "--api-key", "k"])
        .arg("--base-url")
        .arg(closed_base_url())
        .arg("--credentials")
        .arg(temp_dir.path().join("credentials.json"))
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Either content or url is required"));
}

#[test]
fn moltbook_without_credentials_asks_to_register() {
    let temp_dir = tempfile::tempdir().unwrap();
    newsdesk()
        .args(["moltbook", "status", "--credentials"])
        .arg(temp_dir.path().join("credentials.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Credentials file not found"));
}

#[test]
fn unreachable_service_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    newsdesk()
        .args(["ainews", "health", "--base-url"])
        .arg(closed_base_url())
        .arg("--credentials")
        .arg(temp_dir.path().join("credentials.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Request failed"));
}

#[test]
fn api_error_prints_code_and_details() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(
        "429 Too Many Requests",
        r#"{"error":"Rate limit exceeded","code":"RATE_LIMITED","details":"1 story per hour"}"#,
    );
    newsdesk()
        .args(["ainews", "link", "A title", "https://example.com", "--api-key", "k"])
        .args(["--base-url", server.base_url.as_str()])
        .arg("--credentials")
        .arg(temp_dir.path().join("credentials.json"))
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("Rate limit exceeded")
                .and(predicate::str::contains("Code: RATE_LIMITED"))
                .and(predicate::str::contains("Details: 1 story per hour")),
        );
    server.request();
}

#[test]
fn stories_are_rendered() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(
        "200 OK",
        r#"[{"id":"1","title":"Agents learn to collaborate","journalist_name":"NewsBot","points":7,"created_at":"2026-02-01T10:00:00Z","url":"https://example.com/a"}]"#,
    );
    newsdesk()
        .args(["ainews", "stories", "--base-url", server.base_url.as_str()])
        .arg("--credentials")
        .arg(temp_dir.path().join("credentials.json"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Agents learn to collaborate")
                .and(predicate::str::contains("NewsBot"))
                .and(predicate::str::contains("2026-02-01"))
                .and(predicate::str::contains("https://example.com/a")),
        );
    assert!(!server.request().contains("x-api-key"));
}

#[test]
fn malformed_credentials_file_is_reported() {
    let temp_dir = tempfile::tempdir().unwrap();
    let creds_path = temp_dir.path().join("credentials.json");
    std::fs::write(&creds_path, "{ not json").unwrap();

    newsdesk()
        .args(["ainews", "stories", "--base-url"])
        .arg(closed_base_url())
        .arg("--credentials")
        .arg(&creds_path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Malformed credentials file"));
}

#[test]
fn register_writes_credentials_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let creds_path = temp_dir.path().join("nested/credentials.json");
    let server = OneShotServer::start(
        "201 Created",
        r#"{"id":"j-1","name":"NewsBot","api_key":"ainews_secret","verification_code":"reef-42"}"#,
    );

    newsdesk()
        .args(["ainews", "register", "NewsBot", "--base-url", server.base_url.as_str()])
        .arg("--credentials")
        .arg(&creds_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully registered as 'NewsBot'"));

    let saved = std::fs::read_to_string(&creds_path).unwrap();
    assert!(saved.contains("\"api_key\": \"ainews_secret\""));
    assert!(saved.contains("\"verification_code\": \"reef-42\""));
    assert!(server.request().contains(r#""name":"newsbot""#));
}
