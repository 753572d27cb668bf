use nin_core::request::{PortfolioArgs, QueryArgs, ScreeningCriteria, SymbolArgs, ToolCall};
use nin_store::schema::ToolName;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::NinMcp;

#[tool_router(router = tool_router_analysis, vis = "pub")]
impl NinMcp {
    #[tool(name = "analyzeFundamentals", description = "Analyze fundamental metrics for a stock")]
    async fn analyze_fundamentals(
        &self,
        Parameters(args): Parameters<SymbolArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::AnalyzeFundamentals, &args).await
    }

    #[tool(name = "analyzeMarket", description = "Analyze overall market conditions")]
    async fn analyze_market(
        &self,
        Parameters(args): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::AnalyzeMarket, &args).await
    }

    #[tool(name = "getMarketNews", description = "Get latest market news")]
    async fn get_market_news(
        &self,
        Parameters(args): Parameters<QueryArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::GetMarketNews, &args).await
    }

    #[tool(name = "analyzeOptions", description = "Analyze options data for a stock")]
    async fn analyze_options(
        &self,
        Parameters(args): Parameters<SymbolArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::AnalyzeOptions, &args).await
    }

    #[tool(name = "analyzePortfolio", description = "Analyze a portfolio of stocks")]
    async fn analyze_portfolio(
        &self,
        Parameters(args): Parameters<PortfolioArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::AnalyzePortfolio, &args).await
    }

    #[tool(name = "screenStocks", description = "Screen stocks based on criteria")]
    async fn screen_stocks(
        &self,
        Parameters(criteria): Parameters<ScreeningCriteria>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::ScreenStocks, &criteria).await
    }

    #[tool(name = "analyzeTechnicals", description = "Analyze technical indicators for a stock")]
    async fn analyze_technicals(
        &self,
        Parameters(args): Parameters<SymbolArgs>,
    ) -> Result<CallToolResult, ErrorData> {
        self.invoke(ToolName::AnalyzeTechnicals, &args).await
    }

    #[tool(name = "getUserHoldings", description = "Get user's portfolio holdings")]
    async fn get_user_holdings(&self) -> Result<CallToolResult, ErrorData> {
        self.dispatch(ToolCall::GetUserHoldings).await
    }
}
