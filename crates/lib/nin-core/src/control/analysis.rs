use nin_store::envelope::ResponseEnvelope;

use super::{NinControlPlane, ToolError, envelope};
use crate::request::{PortfolioArgs, QueryArgs, ScreeningCriteria, SymbolArgs};

impl NinControlPlane {
    /// `analyzeFundamentals`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn analyze_fundamentals(&self, args: &SymbolArgs) -> Result<ResponseEnvelope, ToolError> {
        let analysis = self.desk.fundamentals(&args.symbol);
        envelope(
            analysis.summary(),
            format!("Fundamental Analysis for {}", args.symbol),
            analysis.report(),
            &analysis,
        )
    }

    /// `analyzeTechnicals`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn analyze_technicals(&self, args: &SymbolArgs) -> Result<ResponseEnvelope, ToolError> {
        let analysis = self.desk.technicals(&args.symbol);
        envelope(
            analysis.summary(),
            format!("Technical Analysis for {}", args.symbol),
            analysis.report(),
            &analysis,
        )
    }

    /// `analyzeOptions`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn analyze_options(&self, args: &SymbolArgs) -> Result<ResponseEnvelope, ToolError> {
        let analysis = self.desk.options(&args.symbol);
        envelope(
            analysis.summary(),
            format!("Options Analysis for {}", args.symbol),
            analysis.report(),
            &analysis,
        )
    }

    /// `analyzeMarket`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn analyze_market(&self, args: &QueryArgs) -> Result<ResponseEnvelope, ToolError> {
        let overview = self.desk.market_overview(args.query.as_deref());
        envelope(
            overview.summary(),
            "Market Analysis",
            overview.report(),
            &overview,
        )
    }

    /// `getMarketNews`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn market_news(&self, args: &QueryArgs) -> Result<ResponseEnvelope, ToolError> {
        let news = self.desk.market_news(args.query.as_deref());
        envelope(
            news.summary(),
            "Market News & Economic Calendar",
            news.report(),
            &news,
        )
    }

    /// `analyzePortfolio`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn analyze_portfolio(&self, args: &PortfolioArgs) -> Result<ResponseEnvelope, ToolError> {
        let analysis = self.desk.portfolio(&args.holdings);
        envelope(
            analysis.summary(),
            "Portfolio Analysis",
            analysis.report(),
            &analysis,
        )
    }

    /// `screenStocks`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn screen_stocks(&self, criteria: ScreeningCriteria) -> Result<ResponseEnvelope, ToolError> {
        let result = self.desk.screen(criteria);
        envelope(
            result.summary(),
            "Stock Screening Results",
            result.report(),
            &result,
        )
    }

    /// `getUserHoldings`
    ///
    /// # Errors
    /// Fails only if the result cannot be encoded as JSON.
    pub fn user_holdings(&self) -> Result<ResponseEnvelope, ToolError> {
        let holdings = self.desk.user_holdings();
        envelope(
            holdings.summary(),
            "User Holdings",
            "Holdings data available in metadata",
            &holdings,
        )
    }
}
