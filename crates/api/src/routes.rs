use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use cryptorec_core::domain::exchange::ExchangeInfo;
use cryptorec_core::domain::market::{CoinDetail, MarketOverview};
use cryptorec_core::domain::recommendation::{RecommendationSet, VenueFilter};
use cryptorec_core::error::MarketError;
use cryptorec_core::market::{detail, MarketDataGateway};
use cryptorec_core::source::MarketSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MarketSource>,
    pub gateway: Arc<dyn MarketDataGateway>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/crypto/market-overview", get(market_overview))
        .route("/api/crypto/recommendations", get(recommendations))
        .route("/api/crypto/coin/:coin_id", get(coin_detail))
        .route("/api/crypto/exchanges", get(exchanges))
        .with_state(state)
        .layer(tower_http::catch_panic::CatchPanicLayer::custom(panic_response))
}

/// `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

impl<T> Envelope<T> {
    fn ok(body: T) -> Json<Self> {
        Json(Self {
            success: true,
            body,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    data: T,
}

#[derive(Debug)]
pub enum ApiError {
    Market(MarketError),
    Internal(String),
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError::Market(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Market(MarketError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            ApiError::Market(MarketError::Unavailable(msg)) => {
                tracing::warn!(error = %msg, "upstream unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::Market(err @ MarketError::Malformed(_)) => {
                let message = err.to_string();
                sentry_anyhow::capture_anyhow(&anyhow::Error::new(err));
                tracing::error!(error = %message, "malformed upstream payload");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({ "success": false, "error": message });
        (status, Json(body)).into_response()
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");
    ApiError::Internal("Internal server error".to_string()).into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn market_overview(
    State(state): State<AppState>,
) -> Result<Json<Envelope<MarketOverview>>, ApiError> {
    let overview = state.source.market_overview().await?;
    Ok(Envelope::ok(overview))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    exchange: Option<String>,
}

async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> Result<Json<Envelope<RecommendationSet>>, ApiError> {
    let filter = VenueFilter::parse(params.exchange.as_deref());
    let set = state.source.recommendations(&filter).await?;
    Ok(Envelope::ok(set))
}

async fn coin_detail(
    State(state): State<AppState>,
    Path(coin_id): Path<String>,
) -> Result<Json<Envelope<DataBody<CoinDetail>>>, ApiError> {
    let detail = detail::fetch_coin_detail(state.gateway.as_ref(), &coin_id).await?;
    Ok(Envelope::ok(DataBody { data: detail }))
}

async fn exchanges() -> Json<Envelope<DataBody<Vec<ExchangeInfo>>>> {
    Envelope::ok(DataBody {
        data: cryptorec_core::reference::supported_exchanges(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cryptorec_core::domain::market::{CoinSnapshot, MarketChart, MarketEntry};
    use cryptorec_core::market::{ChartQuery, MarketsQuery};
    use serde_json::{json, Value};

    struct FixedSource {
        overview: Result<MarketOverview, MarketError>,
    }

    #[async_trait::async_trait]
    impl MarketSource for FixedSource {
        fn source_name(&self) -> &'static str {
            "fixed"
        }

        async fn market_overview(&self) -> Result<MarketOverview, MarketError> {
            self.overview.clone()
        }

        async fn recommendations(
            &self,
            filter: &VenueFilter,
        ) -> Result<RecommendationSet, MarketError> {
            match filter {
                VenueFilter::All => Ok(RecommendationSet {
                    data: vec![],
                    total: 0,
                    timestamp: Utc.with_ymd_and_hms(2026, 1, 27, 0, 0, 0).unwrap(),
                }),
                VenueFilter::Only(v) => Err(MarketError::Unavailable(format!("filter {v}"))),
            }
        }
    }

    struct DetailOnlyGateway {
        record: Option<Value>,
    }

    #[async_trait::async_trait]
    impl MarketDataGateway for DetailOnlyGateway {
        fn provider_name(&self) -> &'static str {
            "detail"
        }

        async fn list_coins(&self, _query: &MarketsQuery) -> Option<Vec<CoinSnapshot>> {
            None
        }

        async fn market_chart(&self, _coin_id: &str, _query: &ChartQuery) -> Option<MarketChart> {
            None
        }

        async fn coin_detail(&self, _coin_id: &str) -> Option<Value> {
            self.record.clone()
        }
    }

    fn state(overview: Result<MarketOverview, MarketError>, record: Option<Value>) -> AppState {
        AppState {
            source: Arc::new(FixedSource { overview }),
            gateway: Arc::new(DetailOnlyGateway { record }),
        }
    }

    fn sample_overview() -> MarketOverview {
        MarketOverview {
            data: vec![MarketEntry {
                id: "bitcoin".to_string(),
                name: "Bitcoin".to_string(),
                symbol: "BTC".to_string(),
                price: Some(65000.0),
                change_24h: Some(1.0),
                market_cap: Some(1.2e12),
                volume: Some(3.0e10),
                image: None,
            }],
            timestamp: Utc.with_ymd_and_hms(2026, 1, 27, 0, 0, 0).unwrap(),
        }
    }

    async fn error_body(err: ApiError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn overview_is_wrapped_in_success_envelope() {
        let Json(env) = market_overview(State(state(Ok(sample_overview()), None)))
            .await
            .unwrap();
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"][0]["symbol"], json!("BTC"));
        assert!(v.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn upstream_failure_becomes_error_envelope() {
        let err = market_overview(State(state(
            Err(MarketError::Unavailable("Failed to fetch market data".to_string())),
            None,
        )))
        .await
        .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "error": "Failed to fetch market data"})
        );
    }

    #[tokio::test]
    async fn recommendations_parse_the_exchange_parameter() {
        let st = state(Ok(sample_overview()), None);

        for exchange in [None, Some("all".to_string()), Some("ALL".to_string())] {
            let Json(env) = recommendations(
                State(st.clone()),
                Query(RecommendationParams { exchange }),
            )
            .await
            .unwrap();
            let v = serde_json::to_value(&env).unwrap();
            assert_eq!(v["success"], json!(true));
            assert_eq!(v["total"], json!(0));
        }

        let err = recommendations(
            State(st),
            Query(RecommendationParams {
                exchange: Some("mexc".to_string()),
            }),
        )
        .await
        .unwrap_err();
        let (_, body) = error_body(err).await;
        assert_eq!(body["error"], json!("filter mexc"));
    }

    #[tokio::test]
    async fn unknown_coin_is_not_found() {
        let err = coin_detail(
            State(state(Ok(sample_overview()), None)),
            Path("nope".to_string()),
        )
        .await
        .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Coin not found"}));
    }

    #[tokio::test]
    async fn coin_detail_wraps_record_in_data() {
        let record = json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "description": {"en": ""},
            "market_data": {
                "current_price": {"usd": 65000.0},
                "market_cap": {"usd": 1.2e12},
                "total_volume": {"usd": 3.0e10},
                "price_change_percentage_24h": null,
                "price_change_percentage_7d": 2.0
            }
        });
        let Json(env) = coin_detail(
            State(state(Ok(sample_overview()), Some(record))),
            Path("bitcoin".to_string()),
        )
        .await
        .unwrap();

        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"]["symbol"], json!("BTC"));
        assert_eq!(v["data"]["price_history"], json!([]));
        assert_eq!(v["data"]["price_change_7d"], json!(2.0));
    }

    #[tokio::test]
    async fn malformed_coin_record_is_a_server_error() {
        let err = coin_detail(
            State(state(Ok(sample_overview()), Some(json!({"id": "x"})))),
            Path("x".to_string()),
        )
        .await
        .unwrap_err();

        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn exchanges_lists_static_metadata() {
        let Json(env) = exchanges().await;
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["success"], json!(true));
        assert_eq!(v["data"].as_array().unwrap().len(), 2);
        assert_eq!(v["data"][0]["id"], json!("binance"));
    }

    #[test]
    fn panics_become_internal_error_responses() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
