//! HTTP API for nin-terminal.
//!
//! Exposes the tool gateway through an umbrella endpoint plus the capability
//! manifest, OpenAPI document and MCP tool listing used for discovery.

pub mod manifest;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use nin_core::control::ToolErrorKind;
use nin_core::gateway::ToolGateway;
use nin_core::request::RawToolRequest;
use nin_store::envelope::ResponseEnvelope;
use nin_store::schema::ToolName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

pub const DEFAULT_API_PORT: u16 = 4030;

/// Exceeds the gateway's default tool timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the HTTP API server.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl ApiServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_body_bytes: 1024 * 1024,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_API_PORT)))
    }
}

/// HTTP API server wrapper.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub const fn new(gateway: Arc<ToolGateway>, config: ApiServerConfig) -> Self {
        let state = AppState {
            gateway,
            request_timeout: config.request_timeout,
        };
        Self { config, state }
    }

    /// The routes without binding a listener.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.config.max_body_bytes)
    }

    /// Runs the HTTP server until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let app = self.router();

        info!("nin-api listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    gateway: Arc<ToolGateway>,
    request_timeout: Duration,
}

/// Error body: a failure envelope plus a short `error` label.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(flatten)]
    envelope: ResponseEnvelope,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    envelope: ResponseEnvelope,
}

impl ApiError {
    fn invalid_tool(envelope: ResponseEnvelope) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid tool specified".to_string(),
            envelope,
        }
    }

    fn timeout(tool: &str, after: Duration) -> Self {
        Self {
            status: StatusCode::REQUEST_TIMEOUT,
            message: "Tool request timed out".to_string(),
            envelope: ResponseEnvelope::failure(format!(
                "{tool} timed out after {}s",
                after.as_secs()
            )),
        }
    }

    fn invalid_body(rejection: &JsonRejection) -> Self {
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            message: "Invalid request body".to_string(),
            envelope: ResponseEnvelope::failure(format!(
                "I couldn't read that request: {}",
                rejection.body_text()
            )),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_body(&rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
            envelope: self.envelope,
        });
        (self.status, payload).into_response()
    }
}

/// Legacy request shape: `{tool, params}`.
#[derive(Debug, Deserialize)]
struct LegacyToolRequest {
    tool: String,
    #[serde(default)]
    params: Value,
}

fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api", get(capability_manifest))
        .route("/api/openapi.json", get(openapi_document))
        .route("/api/mcp-config", get(mcp_config))
        .route("/api/claude/mcp", post(execute_tool))
        .route("/api/mcp", post(execute_legacy_tool))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
}

async fn capability_manifest(headers: HeaderMap) -> Json<Value> {
    Json(manifest::capability_manifest(request_host(&headers)))
}

async fn openapi_document(headers: HeaderMap) -> Json<Value> {
    Json(manifest::openapi_document(request_host(&headers)))
}

async fn mcp_config() -> Json<Value> {
    Json(manifest::mcp_config())
}

async fn execute_tool(
    State(state): State<AppState>,
    request: Result<Json<RawToolRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    run(&state, request).await
}

async fn execute_legacy_tool(
    State(state): State<AppState>,
    request: Result<Json<LegacyToolRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    let arguments = legacy_arguments(&request.tool, request.params);
    run(
        &state,
        RawToolRequest {
            name: request.tool,
            arguments,
        },
    )
    .await
}

/// Bare string params name the symbol, or the query for the market tools.
fn legacy_arguments(tool: &str, params: Value) -> Value {
    let Value::String(text) = params else {
        return params;
    };
    let key = match ToolName::from_wire(tool) {
        Some(ToolName::AnalyzeMarket | ToolName::GetMarketNews) => "query",
        _ => "symbol",
    };
    Value::Object(Map::from_iter([(key.to_string(), Value::String(text))]))
}

async fn run(state: &AppState, request: RawToolRequest) -> Result<Response, ApiError> {
    let tool = request.name.clone();
    let after = state.request_timeout;
    let response = tokio::time::timeout(after, state.gateway.invoke(request))
        .await
        .map_err(|_| ApiError::timeout(&tool, after))?;

    match response.error {
        Some(ToolErrorKind::InvalidTool) => Err(ApiError::invalid_tool(response.envelope)),
        Some(ToolErrorKind::InvalidArguments) => {
            Ok((StatusCode::BAD_REQUEST, Json(response.envelope)).into_response())
        }
        Some(ToolErrorKind::Timeout) => {
            Ok((StatusCode::REQUEST_TIMEOUT, Json(response.envelope)).into_response())
        }
        _ => Ok(Json(response.envelope).into_response()),
    }
}
