//! End-to-end runs of the client against a mock script server.

use std::path::Path;

use clap::Parser;
use playerbot_cli::{Cli, RunOutcome};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, server: &MockServer, token: &str) -> String {
    let config = dir.join("playerbot.toml");
    std::fs::write(
        &config,
        format!(
            "api_host = \"{}\"\ntoken = \"{token}\"\nsrc_dir = \"scripts\"\n",
            server.uri()
        ),
    )
    .unwrap();
    config.display().to_string()
}

fn cli(config: &str, flags: &[&str]) -> Cli {
    let mut args = vec!["playerbot", "--config", config];
    args.extend_from_slice(flags);
    Cli::try_parse_from(args).unwrap()
}

async fn accept_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/scripts/{token}/")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "accountId": 17, "token": token, "age": "2024-01-01T00:00:00" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_config_writes_template() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("playerbot.toml");

    let outcome = playerbot_cli::run(cli(&config.display().to_string(), &[]))
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::ConfigCreated);
    assert!(config.exists());
    assert!(!temp_dir.path().join("scripts").exists());
}

#[tokio::test]
async fn test_rejected_token_stops_before_touching_scripts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scripts/stale/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server, "stale");

    let outcome = playerbot_cli::run(cli(&config, &["--deploy"])).await.unwrap();

    assert_eq!(outcome, RunOutcome::TokenRejected);
    assert!(!outcome.is_success());
    assert!(!temp_dir.path().join("scripts").exists());
}

#[tokio::test]
async fn test_deploy_creates_directory_and_seeds_entrypoint() {
    let server = MockServer::start().await;
    accept_token(&server, "abc").await;
    Mock::given(method("POST"))
        .and(path("/scripts"))
        .and(body_json(json!({
            "accountId": 17,
            "scripts": [],
            "isComplete": true
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server, "abc");

    let outcome = playerbot_cli::run(cli(&config, &["--deploy"])).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert!(temp_dir.path().join("scripts").join("main.lua").is_file());
}

#[tokio::test]
async fn test_deploy_sends_existing_scripts() {
    let server = MockServer::start().await;
    accept_token(&server, "abc").await;
    Mock::given(method("POST"))
        .and(path("/scripts"))
        .and(body_json(json!({
            "accountId": 17,
            "scripts": [
                { "accountId": 17, "name": "lib.util", "script": "return {}" },
                { "accountId": 17, "name": "main", "script": "function main() end" }
            ],
            "isComplete": true
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let scripts = temp_dir.path().join("scripts");
    std::fs::create_dir_all(scripts.join("lib")).unwrap();
    std::fs::write(scripts.join("main.lua"), "function main() end").unwrap();
    std::fs::write(scripts.join("lib").join("util.lua"), "return {}").unwrap();
    let config = write_config(temp_dir.path(), &server, "abc");

    let outcome = playerbot_cli::run(cli(&config, &["--deploy"])).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
}

#[tokio::test]
async fn test_default_run_downloads_server_scripts() {
    let server = MockServer::start().await;
    accept_token(&server, "abc").await;
    Mock::given(method("GET"))
        .and(path("/scripts/17/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "accountId": 17, "name": "main", "script": "function main() end", "data": null },
            { "accountId": 17, "name": "lib.util", "script": "return {}", "data": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), &server, "abc");

    let outcome = playerbot_cli::run(cli(&config, &[])).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    let scripts = temp_dir.path().join("scripts");
    assert_eq!(
        std::fs::read_to_string(scripts.join("lib").join("util.lua")).unwrap(),
        "return {}"
    );
    assert_eq!(
        std::fs::read_to_string(scripts.join("main.lua")).unwrap(),
        "function main() end"
    );
}
