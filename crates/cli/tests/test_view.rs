//! Test `xbe view` commands against a mock API

mod common;

use predicates::prelude::predicate;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

/// Mount a response for `GET path`
async fn mock_get(server: &MockServer, path: &str, body: serde_json::Value) {
    Mock::given(matchers::method("GET"))
        .and(matchers::path(path))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// List brokers as a table. Query params carry the defaults and filters
#[tokio::test]
async fn test_list_table() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/brokers"))
        .and(matchers::query_param("page[limit]", "50"))
        .and(matchers::query_param("sort", "company-name"))
        .and(matchers::query_param("filter[company-name]", "Acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "type": "brokers",
                    "id": "1",
                    "attributes": {"company-name": "Acme Hauling"},
                },
            ],
        })))
        .mount(&server)
        .await;

    let (mut command, _) = common::xbe();
    command.args([
        "view",
        "brokers",
        "list",
        "--company-name",
        "Acme",
        "--base-url",
        &server.uri(),
    ]);
    command
        .assert()
        .success()
        .stdout("ID  COMPANY\n1   Acme Hauling\n");
}

#[tokio::test]
async fn test_list_empty() {
    let server = MockServer::start().await;
    mock_get(&server, "/v1/taggings", json!({"data": []})).await;

    let (mut command, _) = common::xbe();
    command.args(["view", "taggings", "ls", "--base-url", &server.uri()]);
    command.assert().success().stdout("No taggings found.\n");
}

/// `--json` prints the flattened rows
#[tokio::test]
async fn test_list_json() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/v1/taggings",
        json!({
            "data": [
                {
                    "type": "taggings",
                    "id": "5",
                    "relationships": {
                        "tag": {"data": {"type": "tags", "id": "9"}},
                        "taggable": {"data": {"type": "projects", "id": "12"}},
                    },
                },
            ],
            "included": [
                {"type": "tags", "id": "9", "attributes": {"name": "urgent"}},
            ],
        }),
    )
    .await;

    let (mut command, _) = common::xbe();
    command.env("XBE_BASE_URL", server.uri()).args([
        "view",
        "taggings",
        "list",
        "--json",
        "--omit-null",
    ]);
    let output = command.assert().success().get_output().stdout.clone();
    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        rows,
        json!([{
            "id": "5",
            "tag_id": "9",
            "tag_name": "urgent",
            "taggable_type": "projects",
            "taggable_id": "12",
        }])
    );
}

/// Show prints a detail block with a relationships section
#[tokio::test]
async fn test_show() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "/v1/taggings/5",
        json!({
            "data": {
                "type": "taggings",
                "id": "5",
                "attributes": {"created-at": "2025-01-02T03:04:05Z"},
                "relationships": {
                    "tag": {"data": {"type": "tags", "id": "9"}},
                },
            },
        }),
    )
    .await;

    let (mut command, _) = common::xbe();
    command.args(["view", "taggings", "show", "5", "--base-url", &server.uri()]);
    command
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID: 5\n"))
        .stdout(predicate::str::contains("Relationships:"))
        .stdout(predicate::str::contains("Tag: 9"));
}

/// A stored token is sent on read commands, unless `--no-auth` is given
#[tokio::test]
async fn test_token() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/brokers"))
        .and(matchers::header(
            "Authorization",
            format!("Bearer {}", common::TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/brokers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let (mut command, _config_dir) = common::xbe_with_token(&server.uri());
    command.args(["view", "brokers", "list"]);
    command.assert().success().stdout("No brokers found.\n");

    let (mut command, _config_dir) = common::xbe_with_token(&server.uri());
    command.args(["view", "brokers", "list", "--no-auth"]);
    command.assert().failure();
}

/// Non-2xx responses print the server's body, then the error, and exit 1
#[tokio::test]
async fn test_http_error() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/projects/404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"errors":[{"title":"Not found"}]}"#),
        )
        .mount(&server)
        .await;

    let (mut command, _) = common::xbe();
    command.args(["view", "projects", "show", "404", "--base-url", &server.uri()]);
    command
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::starts_with(r#"{"errors":[{"title":"Not found"}]}"#))
        .stderr(predicate::str::contains("failed with status 404"));
}

/// Filter validation happens before anything is sent
#[tokio::test]
async fn test_invalid_filter() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (mut command, _) = common::xbe();
    command.args([
        "view",
        "answer-related-contents",
        "list",
        "--related-content-id",
        "4",
        "--base-url",
        &server.uri(),
    ]);
    command.assert().failure().stderr(predicate::str::contains(
        "--related-content-id requires --related-content-type",
    ));
}
