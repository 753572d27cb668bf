use nin_core::control::ToolErrorKind;
use nin_core::gateway::{GatewayConfig, ToolGateway};
use nin_core::providers::{BinanceConfig, GrowwConfig};
use nin_core::request::RawToolRequest;
use std::time::Duration;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "groww-test-token";

fn groww_gateway(server: &MockServer) -> ToolGateway {
    let groww = GrowwConfig::default()
        .with_api_key(TOKEN)
        .with_base_url(server.uri());
    ToolGateway::new(&GatewayConfig::default().with_groww(groww))
}

fn binance_gateway(server: &MockServer) -> ToolGateway {
    let binance = BinanceConfig::default()
        .with_credentials("binance-key", "binance-secret")
        .with_base_url(server.uri());
    ToolGateway::new(&GatewayConfig::default().with_binance(binance))
}

fn request(name: &str, arguments: Value) -> RawToolRequest {
    RawToolRequest {
        name: name.to_string(),
        arguments,
    }
}

#[tokio::test]
async fn order_status_server_error_yields_failure_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/order/detail/GMK39038RDT490CCVRO"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request(
            "getGrowwOrderStatus",
            json!({"order_id": "GMK39038RDT490CCVRO", "segment": "CASH"}),
        ))
        .await;

    assert_eq!(response.error, Some(ToolErrorKind::Provider));
    assert!(
        response
            .envelope
            .summary()
            .contains("Error fetching order status"),
        "unexpected message: {}",
        response.envelope.summary()
    );
    assert!(response.envelope.summary().contains("500"));
    assert!(response.envelope.references.is_empty());
}

#[tokio::test]
async fn ltp_table_strips_exchange_prefix() {
    let server = MockServer::start().await;
    let body = json!({
        "status": "SUCCESS",
        "payload": {"NSE_RELIANCE": 2650, "NSE_TCS": 3400}
    });
    Mock::given(method("GET"))
        .and(path("/v1/live-data/ltp"))
        .and(query_param("segment", "CASH"))
        .and(query_param("exchange_symbols", "NSE_RELIANCE,NSE_TCS"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("x-api-version", "1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request(
            "getGrowwSymbolsLTP",
            json!({"symbols": ["RELIANCE", "TCS"]}),
        ))
        .await;

    assert!(response.is_success(), "{}", response.envelope.summary());
    let summary = response.envelope.summary();
    assert!(summary.starts_with("Last Traded Prices for 2 symbols:"));
    assert!(summary.contains("| RELIANCE | ₹2650.00 |"));
    assert!(summary.contains("| TCS | ₹3400.00 |"));
    assert!(!summary.contains("NSE_"));
    assert_eq!(response.envelope.metadata(), Some(&body));
}

#[tokio::test]
async fn ohlc_accepts_brace_delimited_strings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/live-data/ohlc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "payload": {
                "NSE_INFY": "{open: 1590,high: 1610.5,low: 1585,close: 1600}",
                "NSE_TCS": {"open": 3390, "high": 3420, "low": 3380, "close": 3400}
            }
        })))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request("getGrowwSymbolsOHLC", json!({"symbols": ["INFY", "TCS"]})))
        .await;

    let summary = response.envelope.summary();
    assert!(summary.contains("| INFY | ₹1590.00 | ₹1610.50 | ₹1585.00 | ₹1600.00 |"));
    assert!(summary.contains("| TCS | ₹3390.00 | ₹3420.00 | ₹3380.00 | ₹3400.00 |"));
}

#[tokio::test]
async fn holdings_summarise_investment_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/holdings/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "payload": {
                "holdings": [
                    {"trading_symbol": "RELIANCE", "quantity": 10, "average_price": 2500, "demat_free_quantity": 10},
                    {"trading_symbol": "TCS", "quantity": 2, "average_price": 3300, "demat_free_quantity": 2}
                ]
            }
        })))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request("getGrowwHoldings", json!({})))
        .await;

    let summary = response.envelope.summary();
    assert!(summary.contains("Total Holdings: 2 stocks"));
    assert!(summary.contains("Total Investment Value: ₹31,600"));
    assert!(summary.contains("| RELIANCE | 10 | ₹2500.00 | ₹25,000 | 10 |"));
    assert_eq!(response.envelope.references[0].title, "Groww Holdings Data");
}

#[tokio::test]
async fn slow_broker_is_cut_off_by_the_tool_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/holdings/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "SUCCESS", "payload": {"holdings": []}}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let groww = GrowwConfig::default()
        .with_api_key(TOKEN)
        .with_base_url(server.uri());
    let gateway = ToolGateway::new(
        &GatewayConfig::default()
            .with_groww(groww)
            .with_tool_timeout(Some(Duration::from_secs(1))),
    );

    let response = gateway
        .invoke(request("getGrowwHoldings", json!({})))
        .await;

    assert_eq!(response.error, Some(ToolErrorKind::Timeout));
    assert_eq!(
        response.envelope.summary(),
        "getGrowwHoldings timed out after 1s"
    );
    assert!(response.envelope.references.is_empty());
}

#[tokio::test]
async fn rejected_order_reports_the_remark() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/order/create"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "FAILURE",
            "payload": {"remark": "Insufficient funds"}
        })))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request(
            "placeGrowwOrder",
            json!({
                "trading_symbol": "reliance",
                "quantity": 1,
                "price": 2600,
                "validity": "DAY",
                "exchange": "NSE",
                "segment": "CASH",
                "product": "CNC",
                "order_type": "LIMIT",
                "transaction_type": "BUY"
            }),
        ))
        .await;

    assert_eq!(response.error, Some(ToolErrorKind::Provider));
    assert_eq!(
        response.envelope.summary(),
        "Error placing order: Failed to place order: Insufficient funds"
    );
}

#[tokio::test]
async fn accepted_order_is_acknowledged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/order/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "payload": {"groww_order_id": "GMK1", "order_status": "CANCELLATION_REQUESTED"}
        })))
        .mount(&server)
        .await;

    let response = groww_gateway(&server)
        .invoke(request("cancelGrowwOrder", json!({"order_id": "GMK1"})))
        .await;

    assert!(response.is_success());
    assert!(
        response
            .envelope
            .summary()
            .starts_with("Order cancelled successfully!\n\nOrder ID: GMK1\nStatus: CANCELLATION_REQUESTED")
    );
}

async fn mount_binance(server: &MockServer, flexible: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/sapi/v3/asset/getUserAsset"))
        .and(header("x-mbx-apikey", "binance-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"asset": "BTC", "free": "0.4", "locked": "0"},
            {"asset": "USDT", "free": "100", "locked": "0"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sapi/v1/simple-earn/flexible/position"))
        .respond_with(flexible)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sapi/v1/simple-earn/locked/position"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"asset": "BTC", "amount": "0.1"}],
            "total": 1
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "BTCUSDT", "lastPrice": "60000"},
            {"symbol": "ETHBTC", "lastPrice": "0.05"}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn binance_earn_failure_degrades_to_spot_and_locked() {
    let server = MockServer::start().await;
    mount_binance(&server, ResponseTemplate::new(500)).await;

    let response = binance_gateway(&server)
        .invoke(request("getUserBinanceHoldings", json!({})))
        .await;

    assert!(response.is_success(), "{}", response.envelope.summary());
    let summary = response.envelope.summary();
    assert!(summary.contains("Total Portfolio Value: $30,100"));
    assert!(summary.contains("| BTC | 0.400000 | 0.100000 |"));
    assert!(summary.contains("| USDT | 100.000000 | 0.000000 |"));

    let metadata = response.envelope.metadata().expect("metadata");
    assert_eq!(metadata["spot"][0]["asset"], "BTC");
    assert_eq!(metadata["spot"][0]["usdValue"], "30000.00");
}

#[tokio::test]
async fn binance_flexible_earn_adds_to_free_balance() {
    let server = MockServer::start().await;
    mount_binance(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{"asset": "USDT", "totalAmount": "50"}],
            "total": 1
        })),
    )
    .await;

    let response = binance_gateway(&server)
        .invoke(request("getUserBinanceHoldings", json!({})))
        .await;

    let summary = response.envelope.summary();
    assert!(summary.contains("Total Portfolio Value: $30,150"));
    assert!(summary.contains("| USDT | 150.000000 | 0.000000 |"));
}

#[tokio::test]
async fn binance_spot_failure_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sapi/v3/asset/getUserAsset"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = binance_gateway(&server)
        .invoke(request("getUserBinanceHoldings", json!({})))
        .await;

    assert_eq!(response.error, Some(ToolErrorKind::Provider));
    assert_eq!(
        response.envelope.summary(),
        "Error fetching Binance holdings: Binance API error: 401 Unauthorized"
    );
    assert!(response.envelope.references.is_empty());
}
