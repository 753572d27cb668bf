use serde::{Deserialize, Serialize};

/// Spot balance as reported by `POST /sapi/v3/asset/getUserAsset`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAsset {
    pub asset: String,
    pub free: String,
    pub locked: String,
    pub freeze: String,
    pub withdrawing: String,
    pub btc_valuation: String,
}

/// Simple Earn position listing; both flexible and locked use `rows`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EarnPositions<T> {
    pub rows: Vec<T>,
    pub total: u64,
}

impl<T> Default for EarnPositions<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct FlexiblePosition {
    pub asset: String,
    pub total_amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LockedPosition {
    pub asset: String,
    pub amount: String,
}

/// Entry of `GET /api/v3/ticker/24hr`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub last_price: String,
}

/// Combined spot and earn balance of one asset, valued in USDT.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BinanceHolding {
    pub asset: String,
    pub free: String,
    pub locked: String,
    pub price_in_usdt: String,
    pub usd_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BinanceHoldings {
    pub spot: Vec<BinanceHolding>,
    pub total_value_usd: f64,
}
