use nin_core::request::ToolCall;
use rmcp::{ErrorData, model::CallToolResult, tool, tool_router};

use crate::NinMcp;

#[tool_router(router = tool_router_binance, vis = "pub")]
impl NinMcp {
    #[tool(name = "getUserBinanceHoldings", description = "Get user's Binance portfolio holdings")]
    async fn get_user_binance_holdings(&self) -> Result<CallToolResult, ErrorData> {
        self.dispatch(ToolCall::GetUserBinanceHoldings).await
    }
}
