//! Network command tests - help output and full runs against a stub server

// Allow deprecated - cargo_bin is standard for CLI testing
#![allow(deprecated)]

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn quantum_cmd() -> Command {
    let mut cmd = Command::cargo_bin("quantum").expect("Failed to find quantum binary");
    cmd.env_remove("OS_URL")
        .env_remove("OS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

async fn run(server: &MockServer, args: &[&str]) -> Assert {
    run_with_token(server, Some("tok"), args).await
}

/// Run the binary against the stub server, off the async runtime.
async fn run_with_token(server: &MockServer, token: Option<&str>, args: &[&str]) -> Assert {
    let mut cmd = quantum_cmd();
    cmd.env("OS_URL", server.uri()).args(args);
    if let Some(token) = token {
        cmd.env("OS_TOKEN", token);
    }
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .expect("command thread panicked")
        .expect("Failed to run quantum binary")
        .assert()
}

#[test]
fn test_help_lists_network_commands() {
    quantum_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("net-list"))
        .stdout(predicate::str::contains("net-external-list"))
        .stdout(predicate::str::contains("net-create"));
}

#[test]
fn test_net_create_help() {
    quantum_cmd()
        .args(["net-create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--admin-state-down"))
        .stdout(predicate::str::contains("--shared"))
        .stdout(predicate::str::contains("--tenant-id"))
        .stdout(predicate::str::contains("admin_state_down").not());
}

#[test]
fn test_version() {
    quantum_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quantum"));
}

#[test]
fn test_missing_url_fails() {
    quantum_cmd()
        .arg("net-list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--os-url"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_list_joins_subnets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(header("X-Auth-Token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [
                {"id": "n1", "name": "private", "status": "ACTIVE", "subnets": ["s1"]},
                {"id": "n2", "name": "public", "status": "ACTIVE", "subnets": ["s9"]}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/subnets"))
        .and(query_param("fields", "cidr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subnets": [{"id": "s1", "cidr": "10.0.0.0/24"}]
        })))
        .mount(&server)
        .await;

    run(&server, &["net-list"])
        .await
        .success()
        .stdout(predicate::str::contains("private"))
        .stdout(predicate::str::contains("s1 10.0.0.0/24"))
        .stdout(predicate::str::contains("s9"))
        .stdout(predicate::str::contains("ACTIVE").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_list_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(|req: &Request| !req.headers.contains_key("X-Auth-Token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "n1", "name": "private", "subnets": []}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"subnets": []})))
        .mount(&server)
        .await;

    run_with_token(&server, None, &["net-list"])
        .await
        .success()
        .stdout(predicate::str::contains("private"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_list_field_after_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(query_param("name", "private"))
        .and(query_param("fields", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "n1"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"subnets": []})))
        .mount(&server)
        .await;

    run(&server, &["net-list", "--name=private", "-F", "id"])
        .await
        .success()
        .stdout(predicate::str::contains("n1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_external_list_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(query_param("router:external", "True"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "n2", "name": "public", "subnets": []}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/subnets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"subnets": []})))
        .mount(&server)
        .await;

    let assert = run(&server, &["-j", "net-external-list"]).await.success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let records: Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(records, json!([{"id": "n2", "name": "public", "subnets": []}]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_create_prints_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2.0/networks"))
        .and(body_json(json!({
            "network": {"name": "net1", "admin_state_up": false, "shared": true}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "network": {"id": "n1", "name": "net1", "admin_state_up": false, "shared": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    run(&server, &["net-create", "--admin-state-down", "--shared", "net1"])
        .await
        .success()
        .stdout(predicate::str::contains("Created a new network:"))
        .stdout(predicate::str::contains("admin_state_up"))
        .stdout(predicate::str::contains("False"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_delete_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(query_param("id", "private"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .and(query_param("name", "private"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "networks": [{"id": "n1"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2.0/networks/n1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    run(&server, &["net-delete", "private"])
        .await
        .success()
        .stdout(predicate::str::contains("Deleted network: private"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_update_without_values_fails() {
    let server = MockServer::start().await;

    run(&server, &["net-update", "n1"])
        .await
        .failure()
        .stderr(predicate::str::contains(
            "Must specify new values to update network",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_net_show_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2.0/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
        .mount(&server)
        .await;

    run(&server, &["net-show", "ghost"])
        .await
        .failure()
        .stderr(predicate::str::contains(
            "Unable to find network with name 'ghost'",
        ));
}
