//! Daemon entry point for the NIN Terminal MCP server.
//!
//! Loads configuration from the environment, builds the tool gateway, and
//! serves it over the enabled surfaces: MCP on stdio, MCP over streamable
//! HTTP, and the HTTP tool API.

mod config;

use std::future::Future;
use std::sync::Arc;

use nin_api::{ApiServer, ApiServerConfig};
use nin_core::gateway::ToolGateway;
use nin_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, NinConfig};

type ServeResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> ServeResult {
    let config = NinConfig::from_args()?;
    init_tracing(config.log_format);

    let gateway = Arc::new(ToolGateway::new(&config.gateway_config()));
    let mut surfaces: JoinSet<ServeResult> = JoinSet::new();

    if config.mcp_serve {
        let mcp_config = McpHttpServerConfig::new(config.mcp_http_addr);
        surfaces.spawn(serve_streamable_http(gateway.clone(), mcp_config));
    }

    if config.api_serve {
        let api_config = ApiServerConfig::new(config.api_addr)
            .with_max_body_bytes(config.api_max_body_bytes)
            .with_request_timeout(config.api_timeout);
        surfaces.spawn(ApiServer::new(gateway.clone(), api_config).serve());
    }

    if config.enable_stdio {
        // The process lives as long as the stdio client; HTTP surfaces stop with it.
        return serve_with_surfaces(serve_stdio(gateway), &mut surfaces).await;
    }

    supervise(&mut surfaces).await
}

/// Waits on the background surfaces, failing on the first one that stops
/// with an error.
async fn supervise(surfaces: &mut JoinSet<ServeResult>) -> ServeResult {
    while let Some(joined) = surfaces.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!("surface stopped: {err}");
                return Err(err);
            }
            Err(err) => {
                error!("surface task failed: {err}");
                return Err(Box::new(err));
            }
        }
    }
    Ok(())
}

/// Runs the foreground surface while watching the background ones. Returns
/// when the foreground ends or a background surface fails.
async fn serve_with_surfaces<F>(foreground: F, surfaces: &mut JoinSet<ServeResult>) -> ServeResult
where
    F: Future<Output = ServeResult>,
{
    let result = tokio::select! {
        result = foreground => {
            info!("stdio session closed");
            result
        }
        Err(err) = supervise(surfaces) => Err(err),
    };
    surfaces.abort_all();
    result
}

#[cfg(test)]
mod tests {
    use std::future::pending;
    use std::io;

    use super::*;

    fn failing_surface() -> ServeResult {
        Err(Box::new(io::Error::new(
            io::ErrorKind::AddrInUse,
            "address already in use",
        )))
    }

    #[tokio::test]
    async fn background_failure_ends_the_foreground() {
        let mut surfaces: JoinSet<ServeResult> = JoinSet::new();
        surfaces.spawn(async { failing_surface() });

        let result = serve_with_surfaces(pending::<ServeResult>(), &mut surfaces).await;

        let err = result.expect_err("surface failure");
        assert_eq!(err.to_string(), "address already in use");
    }

    #[tokio::test]
    async fn foreground_exit_stops_the_background() {
        let mut surfaces: JoinSet<ServeResult> = JoinSet::new();
        surfaces.spawn(pending::<ServeResult>());

        let result = serve_with_surfaces(async { Ok(()) }, &mut surfaces).await;

        assert!(result.is_ok());
        let joined = surfaces.join_next().await.expect("aborted surface");
        assert!(joined.expect_err("cancelled").is_cancelled());
    }

    #[tokio::test]
    async fn foreground_keeps_running_without_background_surfaces() {
        let mut surfaces: JoinSet<ServeResult> = JoinSet::new();

        let result = serve_with_surfaces(async { Ok(()) }, &mut surfaces).await;

        assert!(result.is_ok());
    }
}
