use nin_store::models::groww::{
    GrowwQuote, HoldingsPayload, LtpPayload, OhlcPayload, OrderAck, OrderDetail, OrderMargin,
    PositionsPayload, UserMargin,
};
use nin_store::schema::{NSE_SYMBOL_PREFIX, STATUS_SUCCESS};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::{Fetched, GrowwConfig, ProviderError, http_client, trim_base_url};
use crate::request::{MarginOrder, ModifyOrderArgs, PlaceOrderArgs};

const PROVIDER: &str = "Groww";
const MISSING_KEY: &str = "Groww API key not configured";
const API_VERSION: &str = "1.0";

/// Authenticated client for the Groww trading API.
#[derive(Debug, Clone)]
pub struct GrowwClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GrowwClient {
    #[must_use]
    pub fn new(config: &GrowwConfig) -> Self {
        Self {
            http: http_client(config.timeout),
            base_url: trim_base_url(&config.base_url),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn holdings(&self) -> Result<Fetched<HoldingsPayload>, ProviderError> {
        self.get("/v1/holdings/user", &[], "Failed to fetch Groww holdings")
            .await
    }

    pub async fn positions(
        &self,
        segment: Option<&str>,
    ) -> Result<Fetched<PositionsPayload>, ProviderError> {
        let query: Vec<(&str, &str)> = segment.map(|s| ("segment", s)).into_iter().collect();
        self.get("/v1/positions/user", &query, "Failed to fetch Groww positions")
            .await
    }

    pub async fn ltp(
        &self,
        symbols: &[String],
        segment: &str,
    ) -> Result<Fetched<LtpPayload>, ProviderError> {
        let exchange_symbols = exchange_symbols(symbols);
        self.get(
            "/v1/live-data/ltp",
            &[("segment", segment), ("exchange_symbols", &exchange_symbols)],
            "Failed to fetch Groww LTP data",
        )
        .await
    }

    pub async fn ohlc(
        &self,
        symbols: &[String],
        segment: &str,
    ) -> Result<Fetched<OhlcPayload>, ProviderError> {
        let exchange_symbols = exchange_symbols(symbols);
        self.get(
            "/v1/live-data/ohlc",
            &[("segment", segment), ("exchange_symbols", &exchange_symbols)],
            "Failed to fetch Groww OHLC data",
        )
        .await
    }

    pub async fn quote(
        &self,
        symbol: &str,
        exchange: &str,
        segment: &str,
    ) -> Result<Fetched<GrowwQuote>, ProviderError> {
        self.get(
            "/v1/live-data/quote",
            &[
                ("exchange", exchange),
                ("segment", segment),
                ("trading_symbol", symbol),
            ],
            "Failed to fetch Groww quote data",
        )
        .await
    }

    pub async fn place_order(
        &self,
        order: &PlaceOrderArgs,
    ) -> Result<Fetched<OrderAck>, ProviderError> {
        self.post("/v1/order/create", &[], order, "Failed to place order")
            .await
    }

    pub async fn modify_order(
        &self,
        order: &ModifyOrderArgs,
    ) -> Result<Fetched<OrderAck>, ProviderError> {
        self.post("/v1/order/modify", &[], order, "Failed to modify order")
            .await
    }

    pub async fn cancel_order(
        &self,
        order_id: &str,
        segment: &str,
    ) -> Result<Fetched<OrderAck>, ProviderError> {
        let body = json!({ "segment": segment, "groww_order_id": order_id });
        self.post("/v1/order/cancel", &[], &body, "Failed to cancel order")
            .await
    }

    pub async fn order_detail(
        &self,
        order_id: &str,
        segment: &str,
    ) -> Result<Fetched<OrderDetail>, ProviderError> {
        let path = format!("/v1/order/detail/{order_id}");
        self.get(&path, &[("segment", segment)], "Failed to fetch order details")
            .await
    }

    pub async fn user_margin(&self) -> Result<Fetched<UserMargin>, ProviderError> {
        self.get("/v1/margins/detail/user", &[], "Failed to fetch Groww user margin")
            .await
    }

    pub async fn order_margin(
        &self,
        orders: &[MarginOrder],
        segment: &str,
    ) -> Result<Fetched<OrderMargin>, ProviderError> {
        self.post(
            "/v1/margins/detail/orders",
            &[("segment", segment)],
            orders,
            "Failed to fetch Groww order margin",
        )
        .await
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredentials(MISSING_KEY))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> Result<Fetched<T>, ProviderError> {
        let api_key = self.api_key()?;
        debug!(path, "groww GET");
        let request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(query)
            .bearer_auth(api_key);
        Self::send(request, failure).await
    }

    async fn post<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
        failure: &str,
    ) -> Result<Fetched<T>, ProviderError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let api_key = self.api_key()?;
        debug!(path, "groww POST");
        let request = self
            .http
            .post(format!("{}{path}", self.base_url))
            .query(query)
            .bearer_auth(api_key)
            .json(body);
        Self::send(request, failure).await
    }

    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        failure: &str,
    ) -> Result<Fetched<T>, ProviderError> {
        let response = request
            .header(ACCEPT, "application/json")
            .header("X-API-VERSION", API_VERSION)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::status(PROVIDER, status));
        }
        let raw: Value = response.json().await?;
        unwrap_payload(raw, failure)
    }
}

fn exchange_symbols(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|symbol| format!("{NSE_SYMBOL_PREFIX}{symbol}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Checks the `status` field and decodes `payload`, keeping the raw body.
fn unwrap_payload<T: DeserializeOwned>(
    raw: Value,
    failure: &str,
) -> Result<Fetched<T>, ProviderError> {
    let succeeded = raw.get("status").and_then(Value::as_str) == Some(STATUS_SUCCESS);
    let has_payload = raw.get("payload").is_some_and(|payload| !payload.is_null());
    if !succeeded || !has_payload {
        return Err(ProviderError::Rejected {
            provider: PROVIDER,
            message: rejection_message(&raw, failure),
        });
    }
    let payload = T::deserialize(&raw["payload"])?;
    Ok(Fetched { payload, raw })
}

fn rejection_message(raw: &Value, failure: &str) -> String {
    let reason = raw
        .pointer("/payload/remark")
        .or_else(|| raw.pointer("/error/message"))
        .and_then(Value::as_str)
        .filter(|reason| !reason.is_empty());
    match reason {
        Some(reason) => format!("{failure}: {reason}"),
        None => failure.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_get_exchange_prefix() {
        let symbols = vec!["RELIANCE".to_string(), "TCS".to_string()];
        assert_eq!(exchange_symbols(&symbols), "NSE_RELIANCE,NSE_TCS");
    }

    #[test]
    fn failed_status_is_rejected_with_remark() {
        let raw = json!({"status": "FAILURE", "payload": {"remark": "Insufficient funds"}});
        let err = unwrap_payload::<OrderAck>(raw, "Failed to place order").expect_err("rejected");
        assert_eq!(err.to_string(), "Failed to place order: Insufficient funds");
    }

    #[test]
    fn missing_payload_is_rejected() {
        let raw = json!({"status": "SUCCESS"});
        let err = unwrap_payload::<HoldingsPayload>(raw, "Failed to fetch Groww holdings")
            .expect_err("rejected");
        assert_eq!(err.to_string(), "Failed to fetch Groww holdings");
    }

    #[test]
    fn success_keeps_raw_body() {
        let raw = json!({"status": "SUCCESS", "payload": {"NSE_TCS": 3400.0}});
        let fetched = unwrap_payload::<LtpPayload>(raw.clone(), "x").expect("decoded");
        assert_eq!(fetched.raw, raw);
        assert_eq!(fetched.payload.get("NSE_TCS"), Some(&3400.0));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = GrowwClient::new(&GrowwConfig::default().with_base_url("http://127.0.0.1:9"));
        let err = client.holdings().await.expect_err("missing key");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), MISSING_KEY);
    }
}
