use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Demat holding as reported by `GET /v1/holdings/user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowwHolding {
    pub isin: String,
    pub trading_symbol: String,
    pub quantity: f64,
    pub average_price: f64,
    pub pledge_quantity: f64,
    pub demat_locked_quantity: f64,
    pub groww_locked_quantity: f64,
    pub repledge_quantity: f64,
    pub t1_quantity: f64,
    pub demat_free_quantity: f64,
    pub corporate_action_additional_quantity: f64,
    pub active_demat_transfer_quantity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HoldingsPayload {
    pub holdings: Vec<GrowwHolding>,
}

/// Open position as reported by `GET /v1/positions/user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowwPosition {
    pub trading_symbol: String,
    pub credit_quantity: f64,
    pub credit_price: f64,
    pub debit_quantity: f64,
    pub debit_price: f64,
    pub carry_forward_credit_quantity: f64,
    pub carry_forward_credit_price: f64,
    pub carry_forward_debit_quantity: f64,
    pub carry_forward_debit_price: f64,
    pub exchange: String,
    pub symbol_isin: String,
    pub quantity: f64,
    pub product: String,
    pub net_carry_forward_quantity: f64,
    pub net_price: f64,
    pub net_carry_forward_price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PositionsPayload {
    pub positions: Vec<GrowwPosition>,
}

/// Last traded price keyed by exchange symbol, e.g. `NSE_RELIANCE`.
pub type LtpPayload = BTreeMap<String, f64>;

/// OHLC values keyed by exchange symbol.
pub type OhlcPayload = BTreeMap<String, OhlcValue>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Ohlc {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Groww returns OHLC either as an object or as a brace-delimited string
/// such as `{open: 149.50,high: 150.50,low: 148.50,close: 149.50}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OhlcValue {
    Bars(Ohlc),
    Text(String),
}

impl OhlcValue {
    /// Returns the parsed quadruple. Text that carries no recognizable
    /// `key: number` pair yields `None`; missing keys read as zero.
    #[must_use]
    pub fn resolve(&self) -> Option<Ohlc> {
        match self {
            Self::Bars(bars) => Some(*bars),
            Self::Text(text) => parse_ohlc_text(text),
        }
    }
}

fn parse_ohlc_text(text: &str) -> Option<Ohlc> {
    let mut ohlc = Ohlc::default();
    let mut matched = false;
    for pair in text.trim().trim_matches(|c| c == '{' || c == '}').split(',') {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let Ok(value) = value.trim().parse::<f64>() else {
            continue;
        };
        let slot = match key.trim().trim_matches('"') {
            "open" => &mut ohlc.open,
            "high" => &mut ohlc.high,
            "low" => &mut ohlc.low,
            "close" => &mut ohlc.close,
            _ => continue,
        };
        *slot = value;
        matched = true;
    }
    matched.then_some(ohlc)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DepthLevel {
    pub price: f64,
    pub quantity: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuoteDepth {
    pub buy: Vec<DepthLevel>,
    pub sell: Vec<DepthLevel>,
}

/// Detailed quote as reported by `GET /v1/live-data/quote`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrowwQuote {
    pub average_price: f64,
    pub bid_quantity: f64,
    pub bid_price: f64,
    pub day_change: f64,
    pub day_change_perc: f64,
    pub upper_circuit_limit: f64,
    pub lower_circuit_limit: f64,
    pub depth: QuoteDepth,
    pub high_trade_range: f64,
    pub implied_volatility: Option<f64>,
    pub last_trade_quantity: f64,
    pub last_trade_time: f64,
    pub low_trade_range: f64,
    pub last_price: f64,
    pub market_cap: Option<f64>,
    pub offer_price: f64,
    pub offer_quantity: f64,
    pub open_interest: Option<f64>,
    pub total_buy_quantity: f64,
    pub total_sell_quantity: f64,
    pub volume: f64,
    pub week_52_high: f64,
    pub week_52_low: f64,
}

/// Acknowledgement returned by order create, modify and cancel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrderAck {
    pub groww_order_id: String,
    pub order_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Order detail as reported by `GET /v1/order/detail/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderDetail {
    pub groww_order_id: String,
    pub trading_symbol: String,
    pub order_status: String,
    pub remark: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub trigger_price: Option<f64>,
    pub filled_quantity: Option<f64>,
    pub remaining_quantity: Option<f64>,
    pub average_fill_price: Option<f64>,
    pub deliverable_quantity: Option<f64>,
    pub amo_status: Option<String>,
    pub validity: String,
    pub exchange: String,
    pub order_type: String,
    pub transaction_type: String,
    pub segment: String,
    pub product: String,
    pub created_at: Option<String>,
    pub exchange_time: Option<String>,
    pub trade_date: Option<String>,
    pub order_reference_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FnoMarginDetails {
    pub net_fno_margin_used: f64,
    pub span_margin_used: f64,
    pub exposure_margin_used: f64,
    pub future_balance_available: f64,
    pub option_buy_balance_available: f64,
    pub option_sell_balance_available: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EquityMarginDetails {
    pub net_equity_margin_used: f64,
    pub cnc_margin_used: f64,
    pub mis_margin_used: f64,
    pub cnc_balance_available: f64,
    pub mis_balance_available: f64,
}

/// Account margin as reported by `GET /v1/margins/detail/user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserMargin {
    pub clear_cash: f64,
    pub net_margin_used: f64,
    pub brokerage_and_charges: f64,
    pub collateral_used: f64,
    pub collateral_available: f64,
    pub adhoc_margin: f64,
    pub fno_margin_details: FnoMarginDetails,
    pub equity_margin_details: EquityMarginDetails,
}

/// Margin requirement for one order or a basket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OrderMargin {
    pub exposure_required: f64,
    pub span_required: f64,
    pub option_buy_premium: f64,
    pub brokerage_and_charges: f64,
    pub total_requirement: f64,
    pub cash_cnc_margin_required: f64,
    pub cash_mis_margin_required: f64,
    pub physical_delivery_margin_requirement: f64,
}
