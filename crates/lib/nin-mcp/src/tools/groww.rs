use nin_core::request::{
    ModifyOrderArgs, OrderIdArgs, OrderMarginArgs, PlaceOrderArgs, PositionsArgs, QuoteArgs,
    SymbolsArgs, ToolCall,
};
use nin_store::schema::ToolName;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::NinMcp;

#[tool_router(router = tool_router_groww, vis = "pub")]
impl NinMcp {
    #[tool(name = "getGrowwHoldings", description = "Get user's Groww portfolio holdings")]
    async fn get_groww_holdings(&self) -> Result<CallToolResult, ErrorData> {
        self.dispatch(ToolCall::GetGrowwHoldings).await
    }

    #[tool(name = "getGrowwPositions", description = "Get user's Groww positions")]
    async fn get_groww_positions(
        &self,
        Parameters(args): Parameters<PositionsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwPositions, &args).await
    }

    #[tool(
        name = "getGrowwSymbolsLTP",
        description = "Get last traded prices for multiple symbols from Groww"
    )]
    async fn get_groww_symbols_ltp(
        &self,
        Parameters(args): Parameters<SymbolsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwSymbolsLtp, &args).await
    }

    #[tool(
        name = "getGrowwSymbolsOHLC",
        description = "Get OHLC data for multiple symbols from Groww"
    )]
    async fn get_groww_symbols_ohlc(
        &self,
        Parameters(args): Parameters<SymbolsArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwSymbolsOhlc, &args).await
    }

    #[tool(
        name = "getGrowwSymbolQuote",
        description = "Get detailed quote for a single symbol from Groww"
    )]
    async fn get_groww_symbol_quote(
        &self,
        Parameters(args): Parameters<QuoteArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwSymbolQuote, &args).await
    }

    #[tool(name = "placeGrowwOrder", description = "Place a new order on Groww")]
    async fn place_groww_order(
        &self,
        Parameters(args): Parameters<PlaceOrderArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::PlaceGrowwOrder, &args).await
    }

    #[tool(name = "modifyGrowwOrder", description = "Modify an existing Groww order")]
    async fn modify_groww_order(
        &self,
        Parameters(args): Parameters<ModifyOrderArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::ModifyGrowwOrder, &args).await
    }

    #[tool(name = "cancelGrowwOrder", description = "Cancel an existing Groww order")]
    async fn cancel_groww_order(
        &self,
        Parameters(args): Parameters<OrderIdArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::CancelGrowwOrder, &args).await
    }

    #[tool(
        name = "getGrowwOrderStatus",
        description = "Get status and details of a Groww order"
    )]
    async fn get_groww_order_status(
        &self,
        Parameters(args): Parameters<OrderIdArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwOrderStatus, &args).await
    }

    #[tool(name = "getGrowwUserMargin", description = "Get user's available margin on Groww")]
    async fn get_groww_user_margin(&self) -> Result<CallToolResult, ErrorData> {
        self.dispatch(ToolCall::GetGrowwUserMargin).await
    }

    #[tool(
        name = "getGrowwOrderMargin",
        description = "Calculate required margin for Groww order(s)"
    )]
    async fn get_groww_order_margin(
        &self,
        Parameters(args): Parameters<OrderMarginArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetGrowwOrderMargin, &args).await
    }
}
