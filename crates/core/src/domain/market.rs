use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One listed asset as returned by the coin-universe listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSnapshot {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d_in_currency: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub image: Option<String>,
}

/// `[timestamp_ms, value]`, the provider's wire shape for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    pub fn value(&self) -> f64 {
        self.1
    }
}

/// Aligned price and volume history for one coin, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

impl MarketChart {
    pub fn price_values(&self) -> Vec<f64> {
        self.prices.iter().map(SeriesPoint::value).collect()
    }

    pub fn volume_values(&self) -> Vec<f64> {
        self.total_volumes.iter().map(SeriesPoint::value).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEntry {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: Option<f64>,
    pub change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    pub image: Option<String>,
}

impl From<&CoinSnapshot> for MarketEntry {
    fn from(coin: &CoinSnapshot) -> Self {
        Self {
            id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.to_uppercase(),
            price: coin.current_price,
            change_24h: coin.price_change_percentage_24h,
            market_cap: coin.market_cap,
            volume: coin.total_volume,
            image: coin.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOverview {
    pub data: Vec<MarketEntry>,
    #[serde(deserialize_with = "crate::domain::timestamp::lenient_utc")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub price_change_24h: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub price_history: Vec<SeriesPoint>,
    pub description: String,
    pub last_updated: DateTime<Utc>,
}
