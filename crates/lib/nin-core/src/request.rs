//! Typed tool requests.
//!
//! Every tool owns an argument struct. [`ToolCall::parse`] resolves the wire
//! name, then decodes the argument bag into the matching variant so the
//! gateway can dispatch with a `match` instead of a string lookup.

use nin_store::schema::{DEFAULT_EXCHANGE, DEFAULT_SEGMENT, ToolName};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::control::ToolError;

/// Untyped wire form of a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl RawToolRequest {
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

fn default_segment() -> String {
    DEFAULT_SEGMENT.to_string()
}

fn default_exchange() -> String {
    DEFAULT_EXCHANGE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SymbolArgs {
    /// Stock symbol to analyze (e.g. RELIANCE, INFY).
    pub symbol: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QueryArgs {
    /// Optional query or filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// One line of a portfolio submitted for analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHolding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Industry the holding is grouped under.
    pub industry: String,
    /// Current price per share.
    pub current_price: f64,
    /// Number of shares held.
    pub shares: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PortfolioArgs {
    /// Holdings to analyze.
    pub holdings: Vec<PortfolioHolding>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketCapBand {
    Large,
    Mid,
    Small,
    Micro,
}

impl MarketCapBand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Mid => "mid",
            Self::Small => "small",
            Self::Micro => "micro",
        }
    }

    /// Whether a market capitalisation falls inside the band.
    #[must_use]
    pub fn contains(self, market_cap: f64) -> bool {
        match self {
            Self::Large => market_cap >= 500_000_000_000.0,
            Self::Mid => (100_000_000_000.0..=500_000_000_000.0).contains(&market_cap),
            Self::Small => (20_000_000_000.0..=100_000_000_000.0).contains(&market_cap),
            Self::Micro => market_cap <= 20_000_000_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum ChangePeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl ChangePeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MacdTrend {
    Bullish,
    Bearish,
}

impl MacdTrend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

/// Position of the price relative to its 50- and 200-day moving averages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovingAverageSignal {
    Above50,
    Below50,
    Above200,
    Below200,
    Crossover50,
    Crossover200,
}

impl MovingAverageSignal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Above50 => "above50",
            Self::Below50 => "below50",
            Self::Above200 => "above200",
            Self::Below200 => "below200",
            Self::Crossover50 => "crossover50",
            Self::Crossover200 => "crossover200",
        }
    }

    #[must_use]
    pub fn holds(self, price: f64, ma50: f64, ma200: f64) -> bool {
        match self {
            Self::Above50 => price >= ma50,
            Self::Below50 => price <= ma50,
            Self::Above200 => price >= ma200,
            Self::Below200 => price <= ma200,
            Self::Crossover50 => price > ma50 && ma50 > ma200,
            Self::Crossover200 => price > ma200 && ma50 < ma200,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Range {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Range {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub(crate) fn describe(&self, suffix: &str) -> String {
        let mut parts = Vec::with_capacity(2);
        if let Some(min) = self.min {
            parts.push(format!("min {min}{suffix}"));
        }
        if let Some(max) = self.max {
            parts.push(format!("max {max}{suffix}"));
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Minimum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PriceChangeFilter {
    /// Lookback period of the change.
    pub period: ChangePeriod,
    /// Minimum change, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum change, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TechnicalFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_averages: Option<MovingAverageSignal>,
}

/// Screening criteria. Every supplied criterion must hold for a stock to match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ScreeningCriteria {
    /// Sector to filter by (exact match, e.g. "IT").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Minimum stock price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Maximum stock price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Market capitalisation band.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<MarketCapBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<Range>,
    /// Minimum dividend yield, in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend: Option<Minimum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change: Option<PriceChangeFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Minimum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technicals: Option<TechnicalFilter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PositionsArgs {
    /// Segment filter (CASH, FNO).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SymbolsArgs {
    /// Trading symbols (e.g. ["RELIANCE", "TCS", "INFY"]).
    pub symbols: Vec<String>,
    /// Market segment (CASH, FNO).
    #[serde(default = "default_segment")]
    pub segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuoteArgs {
    /// Trading symbol (e.g. RELIANCE).
    pub symbol: String,
    /// Exchange (NSE, BSE).
    #[serde(default = "default_exchange")]
    pub exchange: String,
    /// Market segment (CASH, FNO).
    #[serde(default = "default_segment")]
    pub segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlaceOrderArgs {
    /// Trading symbol (e.g. RELIANCE).
    pub trading_symbol: String,
    /// Number of shares to trade.
    pub quantity: u64,
    /// Price per share (LIMIT orders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Trigger price (SL orders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    /// Order validity (DAY).
    pub validity: String,
    /// Exchange (NSE, BSE).
    pub exchange: String,
    /// Segment (CASH, FNO).
    pub segment: String,
    /// Product type (CNC, MIS, NRML).
    pub product: String,
    /// Order type (MARKET, LIMIT, SL, SL_M).
    pub order_type: String,
    /// Transaction type (BUY, SELL).
    pub transaction_type: String,
    /// Caller supplied reference id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_reference_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ModifyOrderArgs {
    /// Groww order id to modify.
    pub groww_order_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    /// Order type (MARKET, LIMIT, SL, SL_M).
    pub order_type: String,
    /// Segment (CASH, FNO).
    pub segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OrderIdArgs {
    /// Groww order id.
    pub order_id: String,
    /// Segment (CASH, FNO).
    #[serde(default = "default_segment")]
    pub segment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MarginOrder {
    pub trading_symbol: String,
    pub quantity: u64,
    pub price: f64,
    pub exchange: String,
    pub segment: String,
    pub product: String,
    pub order_type: String,
    pub transaction_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OrderMarginArgs {
    /// Orders to price.
    pub orders: Vec<MarginOrder>,
    /// Market segment.
    #[serde(default = "default_segment")]
    pub segment: String,
}

/// A validated invocation of one tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    AnalyzeFundamentals(SymbolArgs),
    AnalyzeMarket(QueryArgs),
    GetMarketNews(QueryArgs),
    AnalyzeOptions(SymbolArgs),
    AnalyzePortfolio(PortfolioArgs),
    ScreenStocks(ScreeningCriteria),
    AnalyzeTechnicals(SymbolArgs),
    GetUserHoldings,
    GetUserBinanceHoldings,
    GetGrowwHoldings,
    GetGrowwPositions(PositionsArgs),
    GetGrowwSymbolsLtp(SymbolsArgs),
    GetGrowwSymbolsOhlc(SymbolsArgs),
    GetGrowwSymbolQuote(QuoteArgs),
    PlaceGrowwOrder(PlaceOrderArgs),
    ModifyGrowwOrder(ModifyOrderArgs),
    CancelGrowwOrder(OrderIdArgs),
    GetGrowwOrderStatus(OrderIdArgs),
    GetGrowwUserMargin,
    GetGrowwOrderMargin(OrderMarginArgs),
}

impl ToolCall {
    #[must_use]
    pub const fn tool(&self) -> ToolName {
        match self {
            Self::AnalyzeFundamentals(_) => ToolName::AnalyzeFundamentals,
            Self::AnalyzeMarket(_) => ToolName::AnalyzeMarket,
            Self::GetMarketNews(_) => ToolName::GetMarketNews,
            Self::AnalyzeOptions(_) => ToolName::AnalyzeOptions,
            Self::AnalyzePortfolio(_) => ToolName::AnalyzePortfolio,
            Self::ScreenStocks(_) => ToolName::ScreenStocks,
            Self::AnalyzeTechnicals(_) => ToolName::AnalyzeTechnicals,
            Self::GetUserHoldings => ToolName::GetUserHoldings,
            Self::GetUserBinanceHoldings => ToolName::GetUserBinanceHoldings,
            Self::GetGrowwHoldings => ToolName::GetGrowwHoldings,
            Self::GetGrowwPositions(_) => ToolName::GetGrowwPositions,
            Self::GetGrowwSymbolsLtp(_) => ToolName::GetGrowwSymbolsLtp,
            Self::GetGrowwSymbolsOhlc(_) => ToolName::GetGrowwSymbolsOhlc,
            Self::GetGrowwSymbolQuote(_) => ToolName::GetGrowwSymbolQuote,
            Self::PlaceGrowwOrder(_) => ToolName::PlaceGrowwOrder,
            Self::ModifyGrowwOrder(_) => ToolName::ModifyGrowwOrder,
            Self::CancelGrowwOrder(_) => ToolName::CancelGrowwOrder,
            Self::GetGrowwOrderStatus(_) => ToolName::GetGrowwOrderStatus,
            Self::GetGrowwUserMargin => ToolName::GetGrowwUserMargin,
            Self::GetGrowwOrderMargin(_) => ToolName::GetGrowwOrderMargin,
        }
    }

    /// Resolves the tool name and decodes its arguments.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidTool`] for an unregistered name and
    /// [`ToolError::InvalidArguments`] when the arguments do not match the
    /// tool's contract.
    pub fn parse(raw: RawToolRequest) -> Result<Self, ToolError> {
        let tool = ToolName::from_wire(&raw.name).ok_or(ToolError::InvalidTool(raw.name))?;
        Self::from_arguments(tool, raw.arguments)
    }

    /// Decodes an argument bag for an already resolved tool.
    ///
    /// # Errors
    /// Returns [`ToolError::InvalidArguments`] when decoding or validation fails.
    pub fn from_arguments(tool: ToolName, arguments: Value) -> Result<Self, ToolError> {
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let call = match tool {
            ToolName::AnalyzeFundamentals => Self::AnalyzeFundamentals(symbol_args(tool, arguments)?),
            ToolName::AnalyzeMarket => Self::AnalyzeMarket(decode(tool, arguments)?),
            ToolName::GetMarketNews => Self::GetMarketNews(decode(tool, arguments)?),
            ToolName::AnalyzeOptions => Self::AnalyzeOptions(symbol_args(tool, arguments)?),
            ToolName::AnalyzePortfolio => Self::AnalyzePortfolio(portfolio_args(tool, arguments)?),
            ToolName::ScreenStocks => Self::ScreenStocks(decode(tool, unwrap_criteria(arguments))?),
            ToolName::AnalyzeTechnicals => Self::AnalyzeTechnicals(symbol_args(tool, arguments)?),
            ToolName::GetUserHoldings => Self::GetUserHoldings,
            ToolName::GetUserBinanceHoldings => Self::GetUserBinanceHoldings,
            ToolName::GetGrowwHoldings => Self::GetGrowwHoldings,
            ToolName::GetGrowwPositions => Self::GetGrowwPositions(decode(tool, arguments)?),
            ToolName::GetGrowwSymbolsLtp => Self::GetGrowwSymbolsLtp(symbols_args(tool, arguments)?),
            ToolName::GetGrowwSymbolsOhlc => {
                Self::GetGrowwSymbolsOhlc(symbols_args(tool, arguments)?)
            }
            ToolName::GetGrowwSymbolQuote => {
                let mut args: QuoteArgs = decode(tool, arguments)?;
                args.symbol = required_symbol(tool, &args.symbol)?;
                Self::GetGrowwSymbolQuote(args)
            }
            ToolName::PlaceGrowwOrder => {
                let mut args: PlaceOrderArgs = decode(tool, arguments)?;
                args.trading_symbol = required_symbol(tool, &args.trading_symbol)?;
                Self::PlaceGrowwOrder(args)
            }
            ToolName::ModifyGrowwOrder => {
                let args: ModifyOrderArgs = decode(tool, arguments)?;
                required_text(tool, "groww_order_id", &args.groww_order_id)?;
                Self::ModifyGrowwOrder(args)
            }
            ToolName::CancelGrowwOrder => Self::CancelGrowwOrder(order_id_args(tool, arguments)?),
            ToolName::GetGrowwOrderStatus => {
                Self::GetGrowwOrderStatus(order_id_args(tool, arguments)?)
            }
            ToolName::GetGrowwUserMargin => Self::GetGrowwUserMargin,
            ToolName::GetGrowwOrderMargin => {
                let args: OrderMarginArgs = decode(tool, arguments)?;
                if args.orders.is_empty() {
                    return Err(invalid(tool, "at least one order is required"));
                }
                Self::GetGrowwOrderMargin(args)
            }
        };
        Ok(call)
    }
}

fn invalid(tool: ToolName, message: impl Into<String>) -> ToolError {
    ToolError::InvalidArguments {
        tool,
        message: message.into(),
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|err| invalid(tool, err.to_string()))
}

fn required_text(tool: ToolName, field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(invalid(tool, format!("{field} must not be empty")));
    }
    Ok(())
}

fn required_symbol(tool: ToolName, symbol: &str) -> Result<String, ToolError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(invalid(tool, "symbol must not be empty"));
    }
    Ok(symbol)
}

fn symbol_args(tool: ToolName, arguments: Value) -> Result<SymbolArgs, ToolError> {
    let args: SymbolArgs = decode(tool, arguments)?;
    Ok(SymbolArgs {
        symbol: required_symbol(tool, &args.symbol)?,
    })
}

fn symbols_args(tool: ToolName, arguments: Value) -> Result<SymbolsArgs, ToolError> {
    let args: SymbolsArgs = decode(tool, arguments)?;
    let symbols = args
        .symbols
        .iter()
        .map(|symbol| required_symbol(tool, symbol))
        .collect::<Result<Vec<_>, _>>()?;
    if symbols.is_empty() {
        return Err(invalid(tool, "at least one symbol is required"));
    }
    Ok(SymbolsArgs {
        symbols,
        segment: args.segment,
    })
}

fn order_id_args(tool: ToolName, arguments: Value) -> Result<OrderIdArgs, ToolError> {
    let args: OrderIdArgs = decode(tool, arguments)?;
    required_text(tool, "order_id", &args.order_id)?;
    Ok(args)
}

fn portfolio_args(tool: ToolName, arguments: Value) -> Result<PortfolioArgs, ToolError> {
    // A bare array is accepted as the holdings list.
    let arguments = match arguments {
        Value::Array(holdings) => Value::Object(Map::from_iter([(
            "holdings".to_string(),
            Value::Array(holdings),
        )])),
        other => other,
    };
    let args: PortfolioArgs = decode(tool, arguments)?;
    if args.holdings.is_empty() {
        return Err(invalid(tool, "portfolio must contain at least one holding"));
    }
    for (index, holding) in args.holdings.iter().enumerate() {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if !valid(holding.current_price) || !valid(holding.shares) {
            let label = holding.symbol.as_deref().unwrap_or(&holding.industry);
            return Err(invalid(
                tool,
                format!(
                    "holding {index} ({label}) needs a non-negative currentPrice and shares"
                ),
            ));
        }
    }
    let total: f64 = args
        .holdings
        .iter()
        .map(|holding| holding.current_price * holding.shares)
        .sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(invalid(tool, "portfolio has no market value"));
    }
    Ok(args)
}

fn unwrap_criteria(arguments: Value) -> Value {
    match arguments {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("criteria") => {
            map.remove("criteria").unwrap_or(Value::Null)
        }
        other => other,
    }
}
