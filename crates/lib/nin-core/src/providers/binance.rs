use std::collections::BTreeMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use nin_store::models::binance::{
    BinanceHolding, BinanceHoldings, EarnPositions, FlexiblePosition, LockedPosition, Ticker24h,
    UserAsset,
};
use nin_store::schema::USD_STABLECOINS;
use reqwest::Method;
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::{debug, warn};

use super::{BinanceConfig, ProviderError, http_client, trim_base_url};

type HmacSha256 = Hmac<Sha256>;

const PROVIDER: &str = "Binance";
const MISSING_KEYS: &str = "Binance API key or secret key not configured";
const EARN_PAGE_SIZE: &str = "100";

#[derive(Debug, Clone)]
struct Credentials {
    api_key: String,
    secret_key: String,
}

/// Signed client for the Binance spot and Simple Earn endpoints.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl BinanceClient {
    #[must_use]
    pub fn new(config: &BinanceConfig) -> Self {
        let credentials = match (&config.api_key, &config.secret_key) {
            (Some(api_key), Some(secret_key)) => Some(Credentials {
                api_key: api_key.clone(),
                secret_key: secret_key.clone(),
            }),
            _ => None,
        };
        Self {
            http: http_client(config.timeout),
            base_url: trim_base_url(&config.base_url),
            credentials,
        }
    }

    /// Spot balances merged with Simple Earn positions, valued in USDT.
    ///
    /// The four sources are fetched concurrently. Spot assets and tickers are
    /// required; an earn source that fails is logged and contributes nothing.
    pub async fn holdings(&self) -> Result<BinanceHoldings, ProviderError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ProviderError::MissingCredentials(MISSING_KEYS))?;

        let (spot, flexible, locked, tickers) = tokio::join!(
            self.signed::<Vec<UserAsset>>(
                credentials,
                Method::POST,
                "/sapi/v3/asset/getUserAsset",
                &[],
            ),
            self.signed::<EarnPositions<FlexiblePosition>>(
                credentials,
                Method::GET,
                "/sapi/v1/simple-earn/flexible/position",
                &[("size", EARN_PAGE_SIZE)],
            ),
            self.signed::<EarnPositions<LockedPosition>>(
                credentials,
                Method::GET,
                "/sapi/v1/simple-earn/locked/position",
                &[("size", EARN_PAGE_SIZE)],
            ),
            self.public::<Vec<Ticker24h>>("/api/v3/ticker/24hr"),
        );

        let spot = spot?;
        let tickers = tickers?;
        let flexible = flexible.unwrap_or_else(|err| {
            warn!(error = %err, "failed to fetch flexible earn positions");
            EarnPositions::default()
        });
        let locked = locked.unwrap_or_else(|err| {
            warn!(error = %err, "failed to fetch locked earn positions");
            EarnPositions::default()
        });

        let holdings = value_holdings(&spot, &flexible.rows, &locked.rows, &tickers);
        debug!(
            assets = holdings.spot.len(),
            total_value_usd = holdings.total_value_usd,
            "valued binance holdings"
        );
        Ok(holdings)
    }

    async fn signed<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let mut query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        query.push(format!("timestamp={}", Utc::now().timestamp_millis()));
        let query = query.join("&");
        let signature = sign(&credentials.secret_key, &query)?;

        let url = format!("{}{path}?{query}&signature={signature}", self.base_url);
        let response = self
            .http
            .request(method, url)
            .header("X-MBX-APIKEY", &credentials.api_key)
            .send()
            .await?;
        decode(response).await
    }

    async fn public<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::status(PROVIDER, status));
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Hex-encoded HMAC-SHA256 of `payload` keyed with the secret.
fn sign(secret: &str, payload: &str) -> Result<String, ProviderError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|err| ProviderError::Rejected {
            provider: PROVIDER,
            message: format!("Invalid HMAC secret length: {err}"),
        })?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn parse_amount(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

#[derive(Debug, Default, Clone, Copy)]
struct Balance {
    free: f64,
    locked: f64,
}

/// Merges spot and earn balances and values each asset in USDT.
///
/// Stablecoins are priced at par. Other assets use their `USDT` pair, then
/// their `BTC` pair times `BTCUSDT`, and are otherwise valued at zero.
#[must_use]
pub fn value_holdings(
    spot: &[UserAsset],
    flexible: &[FlexiblePosition],
    locked: &[LockedPosition],
    tickers: &[Ticker24h],
) -> BinanceHoldings {
    let prices: BTreeMap<&str, f64> = tickers
        .iter()
        .filter_map(|ticker| {
            let price = parse_amount(&ticker.last_price);
            (!ticker.symbol.is_empty() && price > 0.0).then_some((ticker.symbol.as_str(), price))
        })
        .collect();

    let mut balances: BTreeMap<&str, Balance> = BTreeMap::new();
    for asset in spot {
        let balance = balances.entry(asset.asset.as_str()).or_default();
        balance.free += parse_amount(&asset.free);
        balance.locked += parse_amount(&asset.locked);
    }
    for position in flexible {
        let amount = parse_amount(&position.total_amount);
        if amount > 0.0 {
            balances.entry(position.asset.as_str()).or_default().free += amount;
        }
    }
    for position in locked {
        let amount = parse_amount(&position.amount);
        if amount > 0.0 {
            balances.entry(position.asset.as_str()).or_default().locked += amount;
        }
    }

    let mut valued: Vec<(BinanceHolding, f64)> = balances
        .into_iter()
        .filter_map(|(asset, balance)| {
            let total = balance.free + balance.locked;
            if total <= 0.0 {
                return None;
            }
            let price = usdt_price(asset, &prices);
            let usd_value = total * price;
            let holding = BinanceHolding {
                asset: asset.to_string(),
                free: balance.free.to_string(),
                locked: balance.locked.to_string(),
                price_in_usdt: format!("{price:.8}"),
                usd_value: format!("{usd_value:.2}"),
            };
            Some((holding, usd_value))
        })
        .collect();

    valued.sort_by(|left, right| right.1.total_cmp(&left.1));
    let total_value_usd = valued.iter().map(|(_, value)| value).sum();

    BinanceHoldings {
        spot: valued.into_iter().map(|(holding, _)| holding).collect(),
        total_value_usd,
    }
}

fn usdt_price(asset: &str, prices: &BTreeMap<&str, f64>) -> f64 {
    if USD_STABLECOINS.contains(&asset) {
        return 1.0;
    }
    if let Some(price) = prices.get(format!("{asset}USDT").as_str()) {
        return *price;
    }
    match (
        prices.get(format!("{asset}BTC").as_str()),
        prices.get("BTCUSDT"),
    ) {
        (Some(in_btc), Some(btc_usdt)) => in_btc * btc_usdt,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, free: &str, locked: &str) -> UserAsset {
        UserAsset {
            asset: name.to_string(),
            free: free.to_string(),
            locked: locked.to_string(),
            ..UserAsset::default()
        }
    }

    fn ticker(symbol: &str, price: &str) -> Ticker24h {
        Ticker24h {
            symbol: symbol.to_string(),
            last_price: price.to_string(),
        }
    }

    #[test]
    fn signature_matches_reference_vector() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign(secret, query).expect("signature"),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn holdings_are_priced_merged_and_sorted() {
        let spot = vec![
            asset("USDT", "100", "0"),
            asset("BTC", "0.5", "0"),
            asset("XYZ", "10", "0"),
            asset("DUST", "0", "0"),
        ];
        let flexible = vec![FlexiblePosition {
            asset: "BTC".to_string(),
            total_amount: "0.25".to_string(),
        }];
        let locked = vec![LockedPosition {
            asset: "ETH".to_string(),
            amount: "2".to_string(),
        }];
        let tickers = vec![
            ticker("BTCUSDT", "40000"),
            ticker("XYZBTC", "0.0001"),
        ];

        let holdings = value_holdings(&spot, &flexible, &locked, &tickers);

        let assets: Vec<&str> = holdings.spot.iter().map(|h| h.asset.as_str()).collect();
        assert_eq!(assets, vec!["BTC", "USDT", "XYZ", "ETH"]);

        let btc = &holdings.spot[0];
        assert_eq!(btc.free, "0.75");
        assert_eq!(btc.price_in_usdt, "40000.00000000");
        assert_eq!(btc.usd_value, "30000.00");

        let xyz = &holdings.spot[2];
        assert_eq!(xyz.price_in_usdt, "4.00000000");
        assert_eq!(xyz.usd_value, "40.00");

        let eth = &holdings.spot[3];
        assert_eq!(eth.locked, "2");
        assert_eq!(eth.usd_value, "0.00");

        assert!((holdings.total_value_usd - 30_140.0).abs() < 1e-6);
    }

    #[test]
    fn empty_sources_produce_no_holdings() {
        let holdings = value_holdings(&[], &[], &[], &[]);
        assert!(holdings.spot.is_empty());
        assert!(holdings.total_value_usd.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_keys_are_a_configuration_error() {
        let client = BinanceClient::new(&BinanceConfig::default());
        let err = client.holdings().await.expect_err("missing keys");
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), MISSING_KEYS);
    }
}
