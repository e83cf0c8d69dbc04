use crate::domain::market::{CoinSnapshot, MarketChart};
use serde_json::Value;

pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Coin-universe listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsQuery {
    pub vs_currency: String,
    pub order: String,
    pub per_page: usize,
    pub page: u32,
    pub sparkline: bool,
    /// Comma-separated change windows, e.g. `1h,24h,7d`.
    pub price_change_percentage: Option<String>,
}

impl MarketsQuery {
    pub fn top_by_market_cap(per_page: usize) -> Self {
        Self {
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            order: "market_cap_desc".to_string(),
            per_page,
            page: 1,
            sparkline: false,
            price_change_percentage: None,
        }
    }

    pub fn with_price_change_windows(mut self, windows: &str) -> Self {
        self.price_change_percentage = Some(windows.to_string());
        self
    }
}

/// Historical series request for one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    pub vs_currency: String,
    pub days: u32,
    pub interval: String,
}

impl ChartQuery {
    pub fn daily(days: u32) -> Self {
        Self {
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            days,
            interval: "daily".to_string(),
        }
    }

    pub fn hourly(days: u32) -> Self {
        Self {
            interval: "hourly".to_string(),
            ..Self::daily(days)
        }
    }
}

/// Upstream market data. Every operation resolves to `None` on transport, status or decode
/// failure; implementations log the cause and never return errors.
#[async_trait::async_trait]
pub trait MarketDataGateway: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn list_coins(&self, query: &MarketsQuery) -> Option<Vec<CoinSnapshot>>;

    async fn market_chart(&self, coin_id: &str, query: &ChartQuery) -> Option<MarketChart>;

    /// Raw coin record; `None` doubles as not-found.
    async fn coin_detail(&self, coin_id: &str) -> Option<Value>;
}
