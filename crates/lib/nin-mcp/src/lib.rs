//! MCP server implementation for nin-terminal.
//!
//! This crate wires the tool gateway into rmcp tool handlers. Every tool
//! handler forwards to [`ToolGateway`], so MCP clients see exactly the
//! envelopes the HTTP API returns.

mod helpers;
mod prompts;
mod resources;
mod tools;
pub mod server;

use std::sync::Arc;

use nin_core::gateway::ToolGateway;
use nin_core::request::{RawToolRequest, ToolCall};
use nin_store::schema::ToolName;
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::router::prompt::PromptRouter,
    handler::server::tool::ToolRouter,
    prompt_handler,
    service::RequestContext,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{
    CallToolResult,
    Content,
    ErrorCode,
    GetPromptRequestParams,
    GetPromptResult,
    ListPromptsResult,
    ListResourcesResult,
    PaginatedRequestParam,
    PaginatedRequestParams,
    ReadResourceRequestParam,
    ReadResourceResult,
    ServerCapabilities,
    ServerInfo,
};
use serde::Serialize;

const SERVER_INSTRUCTIONS: &str = r"nin-terminal provides market analysis and brokerage tools for Indian equities and crypto.

Analysis (in-process market desk, always available):
- `analyzeFundamentals`, `analyzeTechnicals`, `analyzeOptions` take a `symbol` such as RELIANCE or INFY.
- `analyzeMarket` and `getMarketNews` take an optional `query`.
- `analyzePortfolio` takes `holdings` with `industry`, `currentPrice` and `shares`.
- `screenStocks` filters a fixed universe by sector, price, market cap, P/E, dividend, price change, volume and technicals.
- `getUserHoldings` returns the demo account's holdings.

Brokers (require credentials configured on the server):
- Groww: holdings, positions, LTP/OHLC for several symbols, detailed quote, place/modify/cancel order, order status, user margin, order margin.
- Binance: `getUserBinanceHoldings` merges spot balances with Simple Earn positions, valued in USDT.

The `market-analysis` prompt drafts a report request for an optional `sector` and `timeframe`.
The `nin://market-data` resource serves the current market snapshot as JSON.

Every tool answers with a markdown summary followed by a JSON list of references; the reference metadata carries the structured result.
Failures are reported as error results with a single explanatory message.";

/// MCP server wrapper around the tool gateway.
#[derive(Clone)]
pub struct NinMcp {
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
    gateway: Arc<ToolGateway>,
}

impl NinMcp {
    #[must_use]
    pub fn new(gateway: ToolGateway) -> Self {
        Self::with_gateway(Arc::new(gateway))
    }

    /// Creates a new server using a shared gateway handle.
    #[must_use]
    pub fn with_gateway(gateway: Arc<ToolGateway>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_analysis()
            + Self::tool_router_groww()
            + Self::tool_router_binance();
        Self {
            tool_router,
            prompt_router: Self::prompt_router_market(),
            gateway,
        }
    }

    /// Validates `args` as the arguments of `tool` and runs it.
    pub(crate) async fn invoke<T: Serialize>(
        &self,
        tool: ToolName,
        args: &T,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = serde_json::to_value(args)
            .map_err(|err| helpers::mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()))?;
        let response = self
            .gateway
            .invoke(RawToolRequest {
                name: tool.as_str().to_string(),
                arguments,
            })
            .await;
        helpers::call_result(&response)
    }

    /// Runs a tool that takes no arguments.
    pub(crate) async fn dispatch(&self, call: ToolCall) -> Result<CallToolResult, ErrorData> {
        let response = self.gateway.dispatch(call).await;
        helpers::call_result(&response)
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl NinMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for NinMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(vec![
            resources::market_data_resource(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read_market_resource(&request.uri)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use nin_core::gateway::GatewayConfig;

    use super::*;

    fn server() -> NinMcp {
        NinMcp::new(ToolGateway::new(&GatewayConfig::default()))
    }

    #[test]
    fn every_tool_is_routed_with_its_description() {
        let routed: BTreeMap<String, String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| {
                let description = tool.description.as_deref().unwrap_or_default().to_string();
                (tool.name.to_string(), description)
            })
            .collect();

        assert_eq!(routed.len(), ToolName::ALL.len() + 1);
        assert!(routed.contains_key("health"));
        for tool in ToolName::ALL {
            assert_eq!(
                routed.get(tool.as_str()).map(String::as_str),
                Some(tool.description()),
                "{tool} is not routed with its description"
            );
        }
    }

    #[test]
    fn market_analysis_prompt_is_routed() {
        let prompts = server().prompt_router.list_all();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert_eq!(prompt.name, "market-analysis");
        let arguments: Vec<String> = prompt
            .arguments
            .iter()
            .flatten()
            .map(|argument| argument.name.to_string())
            .collect();
        assert!(arguments.contains(&"sector".to_string()));
        assert!(arguments.contains(&"timeframe".to_string()));
    }

    #[test]
    fn server_advertises_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(
            info.instructions
                .is_some_and(|text| text.contains("getUserBinanceHoldings"))
        );
    }
}
