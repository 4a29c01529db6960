//! Tests for the http module

use super::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};
use xbe_util::{assert_err, assert_matches};

/// Build a client pointed at a mock server
fn client(server: &MockServer, token: Option<&str>) -> XbeClient {
    XbeClient::new(
        &HttpConfig::default(),
        server.uri().parse().unwrap(),
        token.map(String::from),
    )
    .unwrap()
}

#[rstest]
#[case::plain("https://api.example.com", "/v1/objectives", "https://api.example.com/v1/objectives")]
#[case::trailing_slash("https://api.example.com/", "/v1/objectives", "https://api.example.com/v1/objectives")]
#[case::prefix("https://example.com/api/", "v1/users/3", "https://example.com/api/v1/users/3")]
fn test_url(#[case] base_url: &str, #[case] path: &str, #[case] expected: &str) {
    let client = XbeClient::new(
        &HttpConfig::default(),
        base_url.parse().unwrap(),
        None,
    )
    .unwrap();
    assert_eq!(client.url(path, &Query::new()).unwrap().as_str(), expected);
}

#[test]
fn test_url_query_encoding() {
    let client = XbeClient::new(
        &HttpConfig::default(),
        "https://api.example.com".parse().unwrap(),
        None,
    )
    .unwrap();
    let query: Query = [("filter[name]", "a b&c")].into_iter().collect();
    let url = client.url("/v1/tags", &query).unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.example.com/v1/tags?filter%5Bname%5D=a+b%26c"
    );
    assert_eq!(
        url.query_pairs().collect::<Vec<_>>(),
        vec![("filter[name]".into(), "a b&c".into())]
    );
}

/// GET sends the JSON:API accept header, bearer token, and query
#[tokio::test]
async fn test_get() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/objectives"))
        .and(matchers::query_param("page[limit]", "5"))
        .and(matchers::header("Accept", MEDIA_TYPE))
        .and(matchers::header("Authorization", "Bearer tok"))
        .and(matchers::header("User-Agent", USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Some("tok"));
    let query: Query = [("page[limit]", "5")].into_iter().collect();
    let body = client.get("/v1/objectives", &query).await.unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
        json!({"data": []})
    );
}

/// No token means no Authorization header at all
#[tokio::test]
async fn test_get_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/users/1"))
        .and(matchers::header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/v1/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = client(&server, None);
    let body = client.get("/v1/users/1", &Query::new()).await.unwrap();
    assert_eq!(&body[..], b"{}");
}

#[rstest]
#[case::post(Method::POST)]
#[case::patch(Method::PATCH)]
#[tokio::test]
async fn test_send_body(#[case] method: Method) {
    let server = MockServer::start().await;
    let body = json!({"data": {"type": "tags", "attributes": {"name": "x"}}});
    Mock::given(matchers::method(method.as_str()))
        .and(matchers::path("/v1/tags"))
        .and(matchers::header("Content-Type", MEDIA_TYPE))
        .and(matchers::body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Some("tok"));
    let bytes = serde_json::to_vec(&body).unwrap();
    let response = if method == Method::POST {
        client.post("/v1/tags", bytes).await
    } else {
        client.patch("/v1/tags", bytes).await
    };
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&response.unwrap())
            .unwrap(),
        body
    );
}

/// Empty 204 response to a delete is a success
#[tokio::test]
async fn test_delete() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path("/v1/taggings/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server, Some("tok"))
        .delete("/v1/taggings/4")
        .await
        .unwrap();
    assert!(body.is_empty());
}

/// Non-2xx keeps the body so the server's message can be shown
#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    let errors = r#"{"errors":[{"detail":"name can't be blank"}]}"#;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v1/objectives"))
        .respond_with(ResponseTemplate::new(422).set_body_string(errors))
        .mount(&server)
        .await;

    let error = client(&server, Some("tok"))
        .post("/v1/objectives", b"{}".to_vec())
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(error.response_body(), Some(errors));
    assert!(error.to_string().contains("failed with status 422"));
}

#[tokio::test]
async fn test_error_status_empty_body() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = client(&server, None)
        .get("/v1/nope", &Query::new())
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(error.response_body(), None);
}

#[tokio::test]
async fn test_redirect_disabled() {
    let server = MockServer::start().await;
    Mock::given(matchers::path("/v1/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("Location", format!("{}/v1/new", server.uri())),
        )
        .mount(&server)
        .await;

    let config = HttpConfig {
        follow_redirects: false,
        ..HttpConfig::default()
    };
    let client =
        XbeClient::new(&config, server.uri().parse().unwrap(), None).unwrap();
    let error = client.get("/v1/old", &Query::new()).await.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::MOVED_PERMANENTLY));
}

/// Connection failure is a transport error, with no status or body
#[tokio::test]
async fn test_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let client = XbeClient::new(
        &HttpConfig::default(),
        "http://127.0.0.1:9".parse().unwrap(),
        None,
    )
    .unwrap();
    let result = client.get("/v1/users", &Query::new()).await;
    assert_matches!(&result, Err(HttpError::Transport { .. }));
    assert_err!(result, "Error sending GET http://127.0.0.1:9/v1/users");
}
