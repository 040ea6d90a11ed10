//! Local stand-ins for the upstream market data APIs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tickerview_quotes::{CacheConfig, ProviderKind, QuoteResolver, ResolverConfig};

pub const API_KEY: &str = "test-key";

/// Counts requests that reached the stub.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{}", addr)
}

/// A base URL nothing listens on.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let addr = listener.local_addr().expect("free port address");
    drop(listener);
    format!("http://{}", addr)
}

/// Resolver pointed at an Alpha Vantage compatible endpoint.
pub fn alpha_vantage_resolver(base_url: &str) -> QuoteResolver {
    QuoteResolver::from_config(
        &ResolverConfig::live(ProviderKind::AlphaVantage, API_KEY)
            .with_base_url(format!("{}/query", base_url)),
    )
}

pub fn alpha_vantage_resolver_with(base_url: &str, timeout: Duration, cache: CacheConfig) -> QuoteResolver {
    QuoteResolver::from_config(
        &ResolverConfig::live(ProviderKind::AlphaVantage, API_KEY)
            .with_base_url(format!("{}/query", base_url))
            .with_timeout(timeout)
            .with_cache(cache),
    )
}

// ============================================================================
// Alpha Vantage stub
// ============================================================================

fn ibm_quote() -> Value {
    json!({
        "Global Quote": {
            "01. symbol": "IBM",
            "02. open": "190.5000",
            "03. high": "192.1000",
            "04. low": "189.8800",
            "05. price": "191.2300",
            "06. volume": "4123456",
            "07. latest trading day": "2024-03-08",
            "08. previous close": "191.8000",
            "09. change": "-0.5700",
            "10. change percent": "-0.2972%"
        }
    })
}

/// Ten trading days, 2024-02-26 through 2024-03-08.
fn ibm_daily() -> Value {
    let days = [
        "2024-02-26", "2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01",
        "2024-03-04", "2024-03-05", "2024-03-06", "2024-03-07", "2024-03-08",
    ];
    let mut series = serde_json::Map::new();
    for (i, day) in days.iter().enumerate() {
        series.insert(
            day.to_string(),
            json!({
                "1. open": format!("{}.1000", 180 + i),
                "2. high": format!("{}.9000", 181 + i),
                "3. low": format!("{}.5000", 179 + i),
                "4. close": format!("{}.2500", 180 + i),
                "5. volume": format!("{}", 3_000_000 + i * 1_000)
            }),
        );
    }
    json!({
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM"
        },
        "Time Series (Daily)": series
    })
}

fn ibm_overview() -> Value {
    json!({
        "Symbol": "IBM",
        "AssetType": "Common Stock",
        "Name": "International Business Machines",
        "Exchange": "NYSE",
        "Currency": "USD",
        "Sector": "TECHNOLOGY",
        "Industry": "COMPUTER & OFFICE EQUIPMENT",
        "MarketCapitalization": "191230000000",
        "PERatio": "22.15",
        "EPS": "8.14",
        "DividendYield": "0.0348",
        "52WeekHigh": "199.18",
        "52WeekLow": "120.55",
        "FullTimeEmployees": "282200"
    })
}

fn rate_limit_note() -> Value {
    json!({
        "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
    })
}

fn invalid_call() -> Value {
    json!({
        "Error Message": "Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for GLOBAL_QUOTE."
    })
}

/// Answers like Alpha Vantage for IBM; `LIMIT` is always rate limited,
/// `BADX` is rejected and anything else has no data.
async fn alpha_vantage_handler(
    State(hits): State<Hits>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    hits.record();

    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        let body = json!({ "Error Message": "the parameter apikey is invalid or missing." });
        return (StatusCode::OK, body.to_string());
    }

    let symbol = params.get("symbol").map(String::as_str).unwrap_or_default();
    let function = params.get("function").map(String::as_str).unwrap_or_default();

    let body = match (function, symbol) {
        (_, "LIMIT") => rate_limit_note(),
        (_, "BADX") => invalid_call(),
        ("GLOBAL_QUOTE", "IBM") => ibm_quote(),
        ("GLOBAL_QUOTE", _) => json!({ "Global Quote": {} }),
        ("TIME_SERIES_DAILY", "IBM") => ibm_daily(),
        ("OVERVIEW", "IBM") => ibm_overview(),
        ("OVERVIEW", _) => json!({}),
        _ => invalid_call(),
    };

    (StatusCode::OK, body.to_string())
}

/// Start the Alpha Vantage stub; returns base URL and hit counter.
pub async fn alpha_vantage_stub() -> (String, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/query", get(alpha_vantage_handler))
        .with_state(hits.clone());
    (serve(router).await, hits)
}

/// A stub that answers every request with `status` and `body`.
pub async fn fixed_stub(status: StatusCode, body: &'static str) -> (String, Hits) {
    let hits = Hits::default();
    let handler = move |State(hits): State<Hits>| async move {
        hits.record();
        (status, body)
    };
    let router = Router::new()
        .route("/query", get(handler))
        .route("/quote/{symbol}", get(handler))
        .with_state(hits.clone());
    (serve(router).await, hits)
}

/// A stub that answers only after `delay`.
pub async fn slow_stub(delay: Duration) -> String {
    let router = Router::new().route(
        "/query",
        get(move || async move {
            tokio::time::sleep(delay).await;
            ibm_quote().to_string()
        }),
    );
    serve(router).await
}

// ============================================================================
// FMP stub
// ============================================================================

async fn fmp_handler(
    State(hits): State<Hits>,
    axum::extract::Path(symbol): axum::extract::Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    hits.record();

    if params.get("apikey").map(String::as_str) != Some(API_KEY) {
        let body = json!({ "Error Message": "Invalid API KEY. Please retry or visit our documentation." });
        return (StatusCode::UNAUTHORIZED, body.to_string());
    }

    let body = match symbol.as_str() {
        "AAPL" => json!([
            {
                "symbol": "AAPL",
                "name": "Apple Inc.",
                "price": 189.84,
                "changesPercentage": 1.2,
                "change": 2.25,
                "dayLow": 187.3,
                "dayHigh": 190.05,
                "volume": 53_456_000,
                "open": 187.9,
                "previousClose": 187.59,
                "timestamp": 1709931600
            },
            { "symbol": "AAPL.NE", "price": 25.1 }
        ]),
        "LIMIT" => json!({
            "Error Message": "Limit Reach . Please upgrade your plan or visit our documentation for more details."
        }),
        _ => json!([]),
    };

    (StatusCode::OK, body.to_string())
}

/// Start the FMP stub; returns base URL and hit counter.
pub async fn fmp_stub() -> (String, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/quote/{symbol}", get(fmp_handler))
        .with_state(hits.clone());
    (serve(router).await, hits)
}
