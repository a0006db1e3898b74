//! Mock API tests for Gemini model listing and its v1beta to v1 fallback.

use std::time::Duration;

use adi_gateway::{ErrorCode, ErrorKind, Gateway, GatewayConfig, ProviderId, RetryPolicy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer, config: GatewayConfig) -> Gateway {
    let policy = RetryPolicy::new()
        .with_max_retries(2)
        .with_initial_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_millis(40));
    Gateway::new(
        config
            .with_base_url(ProviderId::Gemini, server.uri())
            .with_retry_policy(policy),
    )
    .unwrap()
}

fn models_page() -> serde_json::Value {
    json!({
        "models": [
            {
                "name": "models/gemini-1.5-flash",
                "version": "001",
                "displayName": "Gemini 1.5 Flash",
                "description": "Fast and versatile multimodal model",
                "inputTokenLimit": 1048576,
                "outputTokenLimit": 8192,
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            },
            {
                "name": "models/text-embedding-004",
                "version": "004",
                "displayName": "Text Embedding 004",
                "description": "Obtain a distributed representation of a text.",
                "inputTokenLimit": 2048,
                "outputTokenLimit": 1,
                "supportedGenerationMethods": ["embedContent"]
            }
        ]
    })
}

#[tokio::test]
async fn lists_generation_models_from_v1beta() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("key", "gm-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_page()))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, GatewayConfig::new());
    let list = gateway.list_models(Some(" gm-key ")).await.unwrap();

    assert_eq!(list.models.len(), 1);
    let model = &list.models[0];
    assert_eq!(model.id, "gemini-1.5-flash");
    assert_eq!(model.display_name, "Gemini 1.5 Flash");
    assert_eq!(model.input_limit, 1_048_576);
    assert_eq!(model.output_limit, 8192);
    assert!(model.supports_generation);
    assert!(list.timestamp > 0);
}

#[tokio::test]
async fn falls_back_to_v1_when_v1beta_keeps_failing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "internal", "status": "INTERNAL"}
        })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(query_param("key", "env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_page()))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(
        &server,
        GatewayConfig::new().with_credential(ProviderId::Gemini, "env-key"),
    );
    let list = gateway.list_models(None).await.unwrap();

    assert_eq!(list.models.len(), 1);
    assert_eq!(list.models[0].id, "gemini-1.5-flash");
}

#[tokio::test]
async fn follows_page_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("pageToken", "next"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "models/gemini-2.0-flash",
                "supportedGenerationMethods": ["generateContent"]
            }]
        })))
        .mount(&server)
        .await;
    let mut first_page = models_page();
    first_page["nextPageToken"] = json!("next");
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, GatewayConfig::new());
    let list = gateway.list_models(Some("k")).await.unwrap();

    let ids: Vec<_> = list.models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gemini-1.5-flash", "gemini-2.0-flash"]);
}

#[tokio::test]
async fn stops_when_a_page_token_repeats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .and(query_param("pageToken", "same"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "models/gemini-2.0-flash",
                "supportedGenerationMethods": ["generateContent"]
            }],
            "nextPageToken": "same"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let mut first_page = models_page();
    first_page["nextPageToken"] = json!("same");
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, GatewayConfig::new());
    let list = gateway.list_models(Some("k")).await.unwrap();

    let ids: Vec<_> = list.models.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["gemini-1.5-flash", "gemini-2.0-flash"]);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn only_the_fallback_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server, GatewayConfig::new());
    let err = gateway.list_models(Some("bad")).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.http_status, 401);
}

#[tokio::test]
async fn missing_key_is_reported_without_network() {
    let server = MockServer::start().await;
    let gateway = gateway_for(&server, GatewayConfig::new());

    let err = gateway.list_models(Some("   ")).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.code, ErrorCode::MissingCredential);
    assert!(server.received_requests().await.unwrap().is_empty());
}
