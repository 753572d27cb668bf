use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use nin_api::{ApiServer, ApiServerConfig};
use nin_core::gateway::{GatewayConfig, ToolGateway};
use nin_core::providers::GrowwConfig;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app() -> Router {
    let gateway = Arc::new(ToolGateway::new(&GatewayConfig::default()));
    ApiServer::new(gateway, ApiServerConfig::default()).router()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    send_to(app(), request).await
}

async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_is_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 16).await.expect("body");
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn umbrella_endpoint_returns_the_envelope() {
    let (status, body) = send(post_json(
        "/api/claude/mcp",
        &json!({"name": "analyzeFundamentals", "arguments": {"symbol": "reliance"}}),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"][0]["role"], "assistant");
    assert_eq!(
        body["references"][0]["title"],
        "Fundamental Analysis for RELIANCE"
    );
}

#[tokio::test]
async fn unknown_tool_is_a_bad_request() {
    let (status, body) = send(post_json(
        "/api/claude/mcp",
        &json!({"name": "riskAssessment", "arguments": {}}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid tool specified");
    assert_eq!(
        body["messages"][0]["content"],
        "I'm sorry, the tool \"riskAssessment\" is not available."
    );
}

#[tokio::test]
async fn invalid_arguments_return_the_failure_envelope() {
    let (status, body) = send(post_json(
        "/api/claude/mcp",
        &json!({"name": "analyzePortfolio", "arguments": {"holdings": []}}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["references"], json!([]));
    assert!(
        body["messages"][0]["content"]
            .as_str()
            .is_some_and(|content| content.starts_with("Invalid arguments for analyzePortfolio"))
    );
}

#[tokio::test]
async fn broker_failures_are_still_ok_responses() {
    let (status, body) = send(post_json(
        "/api/claude/mcp",
        &json!({"name": "getGrowwHoldings"}),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["references"], json!([]));
}

#[tokio::test]
async fn legacy_endpoint_accepts_bare_params() {
    let (status, body) = send(post_json(
        "/api/mcp",
        &json!({"tool": "analyzeTechnicals", "params": "INFY"}),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["references"][0]["title"], "Technical Analysis for INFY");
}

#[tokio::test]
async fn manifest_uses_the_host_header() {
    let request = Request::get("/api")
        .header(header::HOST, "nin.example:4030")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "NIN Terminal");
    assert_eq!(body["api"]["url"], "http://nin.example:4030/api/openapi.json");
}

#[tokio::test]
async fn discovery_documents_list_all_tools() {
    let (_, openapi) = send(
        Request::get("/api/openapi.json")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(openapi["openapi"], "3.0.0");

    let (_, config) = send(
        Request::get("/api/mcp-config")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(config["tools"].as_array().map(Vec::len), Some(20));
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let gateway = Arc::new(ToolGateway::new(&GatewayConfig::default()));
    let app = ApiServer::new(gateway, ApiServerConfig::default().with_max_body_bytes(64)).router();
    let padding = "x".repeat(256);
    let response = app
        .oneshot(post_json(
            "/api/claude/mcp",
            &json!({"name": "analyzeMarket", "arguments": {"query": padding}}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

async fn slow_groww() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/holdings/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "SUCCESS", "payload": {"holdings": []}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    server
}

fn groww_app(
    server: &MockServer,
    tool_timeout: Option<Duration>,
    request_timeout: Duration,
) -> Router {
    let groww = GrowwConfig::default()
        .with_api_key("token")
        .with_base_url(server.uri());
    let gateway = Arc::new(ToolGateway::new(
        &GatewayConfig::default()
            .with_groww(groww)
            .with_tool_timeout(tool_timeout),
    ));
    ApiServer::new(
        gateway,
        ApiServerConfig::default().with_request_timeout(request_timeout),
    )
    .router()
}

#[tokio::test]
async fn request_timeout_still_returns_an_envelope() {
    let server = slow_groww().await;
    let app = groww_app(&server, None, Duration::from_secs(1));

    let request = post_json("/api/claude/mcp", &json!({"name": "getGrowwHoldings"}));
    let (status, body) = send_to(app, request).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["error"], "Tool request timed out");
    assert_eq!(body["messages"][0]["role"], "assistant");
    assert_eq!(
        body["messages"][0]["content"],
        "getGrowwHoldings timed out after 1s"
    );
    assert_eq!(body["references"], json!([]));
}

#[tokio::test]
async fn tool_timeout_maps_to_request_timeout() {
    let server = slow_groww().await;
    let app = groww_app(&server, Some(Duration::from_secs(1)), Duration::from_secs(10));

    let request = post_json("/api/claude/mcp", &json!({"name": "getGrowwHoldings"}));
    let (status, body) = send_to(app, request).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        body["messages"][0]["content"],
        "getGrowwHoldings timed out after 1s"
    );
    assert_eq!(body["references"], json!([]));
}

#[tokio::test]
async fn malformed_json_is_answered_with_an_envelope() {
    let request = Request::post("/api/claude/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .expect("request");
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
    assert!(
        body["messages"][0]["content"]
            .as_str()
            .is_some_and(|content| content.starts_with("I couldn't read that request"))
    );
    assert_eq!(body["references"], json!([]));
}

#[tokio::test]
async fn missing_tool_name_is_a_bad_request() {
    let (status, body) = send(post_json("/api/mcp", &json!({"params": "INFY"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
    assert_eq!(body["references"], json!([]));
}
