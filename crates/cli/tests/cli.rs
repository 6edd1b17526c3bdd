use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};
use tokio::time::timeout;

/// Find a port nothing is listening on
fn get_unused_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Run the binary with the given config file and arguments
async fn run_engine(config_path: &Path, args: &[&str]) -> Output {
    timeout(
        Duration::from_secs(15),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_prowlarr-engine"))
            .arg("--config")
            .arg(config_path)
            .args(args)
            .env("RUST_LOG", "error") // Quiet logs during tests
            .env_remove("PROWLARR_API_KEY")
            .env_remove("PROWLARR_URL")
            .env_remove("PROWLARR_TRACKER_FIRST")
            .env_remove("PROWLARR_TIMEOUT_SECS")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command")
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_download_magnet_prints_it_twice() {
    let dir = TempDir::new().unwrap();
    let magnet = "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567";

    let output = run_engine(&dir.path().join("prowlarr.json"), &["download", magnet]).await;

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec![format!("{} {}", magnet, magnet)]);
}

#[tokio::test]
async fn test_missing_config_is_created_and_reports_api_key_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("prowlarr.json");

    let output = run_engine(&config_path, &["search", "all", "ubuntu"]).await;

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("api key error"));
    assert!(lines[0].contains("Search: 'ubuntu'"));

    let written = std::fs::read_to_string(&config_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["api_key"], "YOUR_API_KEY_HERE");
    assert_eq!(parsed["tracker_first"], false);
    assert_eq!(parsed["url"], "http://127.0.0.1:9696");
}

#[tokio::test]
async fn test_malformed_config_reports_error_row() {
    let config = config_file("{ this is not json");

    let output = run_engine(config.path(), &["search", "movies", "big", "buck", "bunny"]).await;

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("malformed configuration file"));
    assert!(lines[0].contains("Search: 'big buck bunny'"));
}

#[tokio::test]
async fn test_unreachable_service_reports_connection_error() {
    let port = get_unused_port();
    let config = config_file(&format!(
        r#"{{"api_key": "abc", "tracker_first": false, "url": "http://127.0.0.1:{}"}}"#,
        port
    ));

    let output = run_engine(config.path(), &["search", "tv", "a|b"]).await;

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("connection error"));
    // 7 fields, the pipe in the search text is escaped
    assert_eq!(lines[0].split('|').count(), 7);
    assert!(lines[0].contains("Search: 'a%7Cb'"));
}

#[tokio::test]
async fn test_search_keywords_may_start_with_hyphen() {
    let port = get_unused_port();
    let config = config_file(&format!(
        r#"{{"api_key": "abc", "tracker_first": false, "url": "http://127.0.0.1:{}"}}"#,
        port
    ));

    let output = run_engine(config.path(), &["search", "all", "ubuntu", "-server"]).await;

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("connection error"));
    assert!(lines[0].contains("Search: 'ubuntu -server'"));
}

#[tokio::test]
async fn test_env_does_not_complete_partial_config() {
    let config = config_file(r#"{"tracker_first": false, "url": "http://127.0.0.1:1"}"#);

    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_prowlarr-engine"))
        .arg("--config")
        .arg(config.path())
        .arg("config")
        .env("RUST_LOG", "error")
        .env("PROWLARR_API_KEY", "fromenv")
        .output()
        .await
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["malformed"], true);
}

#[tokio::test]
async fn test_unknown_category_exits_with_error() {
    let dir = TempDir::new().unwrap();

    let output = run_engine(&dir.path().join("prowlarr.json"), &["search", "pictures", "x"]).await;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_capabilities() {
    let config = config_file(r#"{"api_key": "abc", "tracker_first": false, "url": "http://p:9696/"}"#);

    let output = run_engine(config.path(), &["capabilities"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("<url>http://p:9696</url>"));
    assert!(stdout.contains("<categories>all anime books games movies music software tv</categories>"));
}

#[tokio::test]
async fn test_config_hides_api_key() {
    let config = config_file(r#"{"api_key": "super-secret", "tracker_first": true, "url": "http://p:9696"}"#);

    let output = run_engine(config.path(), &["config"]).await;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["api_key_configured"], true);
    assert_eq!(json["malformed"], false);
    assert_eq!(json["tracker_first"], true);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("super-secret"));
}
