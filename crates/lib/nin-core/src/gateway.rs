//! Tool invocation gateway.
//!
//! The single entry point for every surface: resolves a request to its
//! handler, bounds it by the tool timeout, and normalizes every outcome into
//! a [`ResponseEnvelope`].

use std::time::Duration;

use chrono::NaiveDate;
use nin_store::envelope::ResponseEnvelope;
use nin_store::schema::ToolName;
use tracing::{debug, error, warn};

use crate::control::{NinControlPlane, ToolError, ToolErrorKind};
use crate::market::MarketDesk;
use crate::providers::{BinanceConfig, GrowwConfig};
use crate::request::{RawToolRequest, ToolCall};

pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub groww: GrowwConfig,
    pub binance: BinanceConfig,
    /// Caller-visible bound on one invocation; `None` disables it.
    pub tool_timeout: Option<Duration>,
    /// Pins the market desk's notion of today.
    pub reference_date: Option<NaiveDate>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            groww: GrowwConfig::default(),
            binance: BinanceConfig::default(),
            tool_timeout: Some(DEFAULT_TOOL_TIMEOUT),
            reference_date: None,
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn with_groww(mut self, groww: GrowwConfig) -> Self {
        self.groww = groww;
        self
    }

    #[must_use]
    pub fn with_binance(mut self, binance: BinanceConfig) -> Self {
        self.binance = binance;
        self
    }

    #[must_use]
    pub const fn with_tool_timeout(mut self, tool_timeout: Option<Duration>) -> Self {
        self.tool_timeout = tool_timeout;
        self
    }

    #[must_use]
    pub const fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }
}

/// Outcome of one invocation. Only `envelope` is meant for callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResponse {
    /// The resolved tool, if the name was recognised.
    pub tool: Option<ToolName>,
    pub envelope: ResponseEnvelope,
    pub error: Option<ToolErrorKind>,
}

impl ToolResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    fn from_result(tool: Option<ToolName>, result: Result<ResponseEnvelope, ToolError>) -> Self {
        match result {
            Ok(envelope) => Self {
                tool,
                envelope,
                error: None,
            },
            Err(err) => {
                let kind = err.kind();
                warn!(tool = ?tool.map(ToolName::as_str), kind = %kind, "tool failed: {err}");
                Self {
                    tool,
                    envelope: err.to_envelope(),
                    error: Some(kind),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolGateway {
    control: NinControlPlane,
    tool_timeout: Option<Duration>,
}

impl ToolGateway {
    /// Builds the gateway. Missing broker credentials are logged here and
    /// surface later as configuration failures of the affected tools.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        if !config.groww.has_credentials() {
            error!("GROWW_API_KEY is not set; Groww tools will fail");
        }
        if !config.binance.has_credentials() {
            error!("BINANCE_API_KEY or BINANCE_SECRET_KEY is not set; Binance holdings will fail");
        }
        let desk = config.reference_date.map_or_else(MarketDesk::new, MarketDesk::at);
        Self {
            control: NinControlPlane::new(desk, &config.groww, &config.binance),
            tool_timeout: config.tool_timeout.filter(|timeout| !timeout.is_zero()),
        }
    }

    #[must_use]
    pub const fn control(&self) -> &NinControlPlane {
        &self.control
    }

    /// Parses and dispatches an untyped request.
    pub async fn invoke(&self, request: RawToolRequest) -> ToolResponse {
        debug!(tool = %request.name, "tool request");
        match ToolCall::parse(request) {
            Ok(call) => self.dispatch(call).await,
            Err(err) => {
                let tool = match &err {
                    ToolError::InvalidArguments { tool, .. } => Some(*tool),
                    _ => None,
                };
                ToolResponse::from_result(tool, Err(err))
            }
        }
    }

    /// Runs a validated call under the tool timeout.
    pub async fn dispatch(&self, call: ToolCall) -> ToolResponse {
        let tool = call.tool();
        debug!(tool = tool.as_str(), "dispatching tool");
        let result = match self.tool_timeout {
            Some(after) => tokio::time::timeout(after, self.run(call))
                .await
                .unwrap_or(Err(ToolError::Timeout { tool, after })),
            None => self.run(call).await,
        };
        ToolResponse::from_result(Some(tool), result)
    }

    async fn run(&self, call: ToolCall) -> Result<ResponseEnvelope, ToolError> {
        let control = &self.control;
        match call {
            ToolCall::AnalyzeFundamentals(args) => control.analyze_fundamentals(&args),
            ToolCall::AnalyzeMarket(args) => control.analyze_market(&args),
            ToolCall::GetMarketNews(args) => control.market_news(&args),
            ToolCall::AnalyzeOptions(args) => control.analyze_options(&args),
            ToolCall::AnalyzePortfolio(args) => control.analyze_portfolio(&args),
            ToolCall::ScreenStocks(criteria) => control.screen_stocks(criteria),
            ToolCall::AnalyzeTechnicals(args) => control.analyze_technicals(&args),
            ToolCall::GetUserHoldings => control.user_holdings(),
            ToolCall::GetUserBinanceHoldings => control.binance_holdings().await,
            ToolCall::GetGrowwHoldings => control.groww_holdings().await,
            ToolCall::GetGrowwPositions(args) => control.groww_positions(&args).await,
            ToolCall::GetGrowwSymbolsLtp(args) => control.groww_ltp(&args).await,
            ToolCall::GetGrowwSymbolsOhlc(args) => control.groww_ohlc(&args).await,
            ToolCall::GetGrowwSymbolQuote(args) => control.groww_quote(&args).await,
            ToolCall::PlaceGrowwOrder(args) => control.place_groww_order(&args).await,
            ToolCall::ModifyGrowwOrder(args) => control.modify_groww_order(&args).await,
            ToolCall::CancelGrowwOrder(args) => control.cancel_groww_order(&args).await,
            ToolCall::GetGrowwOrderStatus(args) => control.groww_order_status(&args).await,
            ToolCall::GetGrowwUserMargin => control.groww_user_margin().await,
            ToolCall::GetGrowwOrderMargin(args) => control.groww_order_margin(&args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gateway() -> ToolGateway {
        ToolGateway::new(&GatewayConfig::default())
    }

    fn request(name: &str, arguments: serde_json::Value) -> RawToolRequest {
        RawToolRequest {
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let response = gateway().invoke(request("riskAssessment", json!({}))).await;
        assert_eq!(response.error, Some(ToolErrorKind::InvalidTool));
        assert_eq!(response.tool, None);
        assert_eq!(
            response.envelope.summary(),
            "I'm sorry, the tool \"riskAssessment\" is not available."
        );
    }

    #[tokio::test]
    async fn bad_arguments_keep_the_tool() {
        let response = gateway()
            .invoke(request("analyzeFundamentals", json!({"symbol": 42})))
            .await;
        assert_eq!(response.error, Some(ToolErrorKind::InvalidArguments));
        assert_eq!(response.tool, Some(ToolName::AnalyzeFundamentals));
        assert!(response.envelope.references.is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_are_configuration_failures() {
        let response = gateway().invoke(request("getGrowwHoldings", json!({}))).await;
        assert_eq!(response.error, Some(ToolErrorKind::Configuration));
        assert!(response
            .envelope
            .summary()
            .starts_with("Error fetching Groww holdings: "));

        let response = gateway().dispatch(ToolCall::GetUserBinanceHoldings).await;
        assert_eq!(response.error, Some(ToolErrorKind::Configuration));
        assert!(response
            .envelope
            .summary()
            .starts_with("Error fetching Binance holdings: "));
    }

    #[test]
    fn zero_timeout_disables_the_bound() {
        let gateway = ToolGateway::new(
            &GatewayConfig::default().with_tool_timeout(Some(Duration::ZERO)),
        );
        assert_eq!(gateway.tool_timeout, None);
    }
}
