use std::fmt;

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const DEFAULT_SEGMENT: &str = "CASH";
pub const DEFAULT_EXCHANGE: &str = "NSE";

/// Prefix applied to bare trading symbols for Groww live-data lookups.
pub const NSE_SYMBOL_PREFIX: &str = "NSE_";

/// Assets Binance holdings are valued against at par.
pub const USD_STABLECOINS: [&str; 4] = ["USDT", "BUSD", "USDC", "TUSD"];

/// The fixed set of tools exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolName {
    AnalyzeFundamentals,
    AnalyzeMarket,
    GetMarketNews,
    AnalyzeOptions,
    AnalyzePortfolio,
    ScreenStocks,
    AnalyzeTechnicals,
    GetUserHoldings,
    GetUserBinanceHoldings,
    GetGrowwHoldings,
    GetGrowwPositions,
    GetGrowwSymbolsLtp,
    GetGrowwSymbolsOhlc,
    GetGrowwSymbolQuote,
    PlaceGrowwOrder,
    ModifyGrowwOrder,
    CancelGrowwOrder,
    GetGrowwOrderStatus,
    GetGrowwUserMargin,
    GetGrowwOrderMargin,
}

impl ToolName {
    pub const ALL: [Self; 20] = [
        Self::AnalyzeFundamentals,
        Self::AnalyzeMarket,
        Self::GetMarketNews,
        Self::AnalyzeOptions,
        Self::AnalyzePortfolio,
        Self::ScreenStocks,
        Self::AnalyzeTechnicals,
        Self::GetUserHoldings,
        Self::GetUserBinanceHoldings,
        Self::GetGrowwHoldings,
        Self::GetGrowwPositions,
        Self::GetGrowwSymbolsLtp,
        Self::GetGrowwSymbolsOhlc,
        Self::GetGrowwSymbolQuote,
        Self::PlaceGrowwOrder,
        Self::ModifyGrowwOrder,
        Self::CancelGrowwOrder,
        Self::GetGrowwOrderStatus,
        Self::GetGrowwUserMargin,
        Self::GetGrowwOrderMargin,
    ];

    /// Wire name used by MCP clients and the HTTP API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnalyzeFundamentals => "analyzeFundamentals",
            Self::AnalyzeMarket => "analyzeMarket",
            Self::GetMarketNews => "getMarketNews",
            Self::AnalyzeOptions => "analyzeOptions",
            Self::AnalyzePortfolio => "analyzePortfolio",
            Self::ScreenStocks => "screenStocks",
            Self::AnalyzeTechnicals => "analyzeTechnicals",
            Self::GetUserHoldings => "getUserHoldings",
            Self::GetUserBinanceHoldings => "getUserBinanceHoldings",
            Self::GetGrowwHoldings => "getGrowwHoldings",
            Self::GetGrowwPositions => "getGrowwPositions",
            Self::GetGrowwSymbolsLtp => "getGrowwSymbolsLTP",
            Self::GetGrowwSymbolsOhlc => "getGrowwSymbolsOHLC",
            Self::GetGrowwSymbolQuote => "getGrowwSymbolQuote",
            Self::PlaceGrowwOrder => "placeGrowwOrder",
            Self::ModifyGrowwOrder => "modifyGrowwOrder",
            Self::CancelGrowwOrder => "cancelGrowwOrder",
            Self::GetGrowwOrderStatus => "getGrowwOrderStatus",
            Self::GetGrowwUserMargin => "getGrowwUserMargin",
            Self::GetGrowwOrderMargin => "getGrowwOrderMargin",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AnalyzeFundamentals => "Analyze fundamental metrics for a stock",
            Self::AnalyzeMarket => "Analyze overall market conditions",
            Self::GetMarketNews => "Get latest market news",
            Self::AnalyzeOptions => "Analyze options data for a stock",
            Self::AnalyzePortfolio => "Analyze a portfolio of stocks",
            Self::ScreenStocks => "Screen stocks based on criteria",
            Self::AnalyzeTechnicals => "Analyze technical indicators for a stock",
            Self::GetUserHoldings => "Get user's portfolio holdings",
            Self::GetUserBinanceHoldings => "Get user's Binance portfolio holdings",
            Self::GetGrowwHoldings => "Get user's Groww portfolio holdings",
            Self::GetGrowwPositions => "Get user's Groww positions",
            Self::GetGrowwSymbolsLtp => "Get last traded prices for multiple symbols from Groww",
            Self::GetGrowwSymbolsOhlc => "Get OHLC data for multiple symbols from Groww",
            Self::GetGrowwSymbolQuote => "Get detailed quote for a single symbol from Groww",
            Self::PlaceGrowwOrder => "Place a new order on Groww",
            Self::ModifyGrowwOrder => "Modify an existing Groww order",
            Self::CancelGrowwOrder => "Cancel an existing Groww order",
            Self::GetGrowwOrderStatus => "Get status and details of a Groww order",
            Self::GetGrowwUserMargin => "Get user's available margin on Groww",
            Self::GetGrowwOrderMargin => "Calculate required margin for Groww order(s)",
        }
    }

    /// Resolves a wire name. Matching is exact.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
