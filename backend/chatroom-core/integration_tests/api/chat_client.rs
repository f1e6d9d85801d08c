use chatroom_core::api::ChatApiClient;
use chatroom_core::error::ApiClientError;

use common::HttpStatusCode;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn given_models_endpoint_when_listing_then_returns_models_and_current() {
    // GIVEN: A backend with two models
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": ["llama3", "qwen2"],
            "currentModel": "llama3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Listing models
    let client = ChatApiClient::new(&server.uri()).unwrap();
    let response = client.list_models().await.unwrap();

    // THEN: Both models and the current one come back
    assert_eq!(response.models, vec!["llama3", "qwen2"]);
    assert_eq!(response.current_model.as_deref(), Some("llama3"));
}

#[tokio::test]
async fn given_tools_without_descriptions_when_listing_then_description_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tools": [
                { "name": "search", "description": "Web search" },
                { "name": "calculator" }
            ]
        })))
        .mount(&server)
        .await;

    let client = ChatApiClient::new(&server.uri()).unwrap();
    let tools = client.list_tools().await.unwrap();

    assert_eq!(tools.len(), 2);
    assert_eq!(tools[0].description.as_deref(), Some("Web search"));
    assert_eq!(tools[1].name, "calculator");
    assert_eq!(tools[1].description, None);
}

/// **VALUE**: Non-2xx statuses become `Server` errors with the body kept.
///
/// **BUG THIS CATCHES**: reqwest does not fail on error statuses by itself; a
/// missing status check would try to parse an error page as JSON.
#[tokio::test]
async fn given_server_error_status_when_sending_chat_then_server_error_with_body() {
    // GIVEN: A chat endpoint that fails
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;

    // WHEN: Sending a chat turn
    let client = ChatApiClient::new(&server.uri()).unwrap();
    let result = client.send_chat("hello").await;

    // THEN: Server error carrying status and body
    match result {
        Err(ApiClientError::Server {
            status, message, ..
        }) => {
            assert_eq!(status, HttpStatusCode(502));
            assert_eq!(message, "upstream down");
        }
        other => panic!("Expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_chat_endpoint_when_sending_then_posts_message_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({ "message": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "reply": "hi there" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatApiClient::new(&server.uri()).unwrap();
    let response = client.send_chat("hello").await.unwrap();

    assert_eq!(response.reply, "hi there");
    assert_eq!(response.tool_results, None);
}

#[tokio::test]
async fn given_select_and_reset_endpoints_when_called_then_post_expected_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/model/select"))
        .and(body_json(json!({ "model": "qwen2" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/new"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatApiClient::new(&server.uri()).unwrap();

    client.select_model(Some("qwen2")).await.unwrap();
    client.reset_chat().await.unwrap();
}

/// **VALUE**: A base URL with a path prefix keeps the prefix.
///
/// **WHY THIS MATTERS**: Backends behind a reverse proxy live under a prefix;
/// `Url::join` would otherwise drop the last segment.
#[tokio::test]
async fn given_base_url_with_path_prefix_when_listing_then_prefix_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/proxy/api/tools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tools": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatApiClient::new(&format!("{}/proxy", server.uri())).unwrap();

    assert!(client.base_url().as_str().ends_with("/proxy/"));
    assert!(client.list_tools().await.unwrap().is_empty());
}

#[test]
fn given_invalid_base_url_when_creating_client_then_url_parse_error() {
    let result = ChatApiClient::new("not a url");

    assert!(matches!(result, Err(ApiClientError::UrlParse { .. })));
}

#[tokio::test]
async fn given_malformed_json_when_listing_models_then_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = ChatApiClient::new(&server.uri()).unwrap();

    assert!(client.list_models().await.is_err());
}
