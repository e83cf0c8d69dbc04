use crate::domain::market::{CoinDetail, MarketChart};
use crate::error::MarketError;
use crate::market::gateway::{ChartQuery, MarketDataGateway, DEFAULT_VS_CURRENCY};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const DESCRIPTION_MAX_CHARS: usize = 200;
const HISTORY_DAYS: u32 = 7;

#[derive(Debug, Deserialize)]
struct RawCoin {
    id: String,
    name: String,
    symbol: String,
    market_data: RawMarketData,
    description: Option<HashMap<String, Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct RawMarketData {
    current_price: HashMap<String, Option<f64>>,
    market_cap: HashMap<String, Option<f64>>,
    total_volume: HashMap<String, Option<f64>>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
}

/// Loads one coin record plus its 7-day hourly price history.
pub async fn fetch_coin_detail(
    gateway: &dyn MarketDataGateway,
    coin_id: &str,
) -> Result<CoinDetail, MarketError> {
    let raw = gateway
        .coin_detail(coin_id)
        .await
        .ok_or_else(|| MarketError::NotFound("Coin not found".to_string()))?;

    let history = gateway
        .market_chart(coin_id, &ChartQuery::hourly(HISTORY_DAYS))
        .await;

    build_coin_detail(raw, history, Utc::now())
}

pub fn build_coin_detail(
    raw: serde_json::Value,
    history: Option<MarketChart>,
    now: DateTime<Utc>,
) -> Result<CoinDetail, MarketError> {
    let coin: RawCoin = serde_json::from_value(raw)
        .map_err(|e| MarketError::Malformed(format!("coin record: {e}")))?;

    let usd = |map: &HashMap<String, Option<f64>>, field: &str| {
        map.get(DEFAULT_VS_CURRENCY).copied().flatten().ok_or_else(|| {
            MarketError::Malformed(format!("missing {field}.{DEFAULT_VS_CURRENCY}"))
        })
    };

    let description = coin
        .description
        .and_then(|mut by_lang| by_lang.remove("en").flatten());

    let md = &coin.market_data;
    Ok(CoinDetail {
        current_price: usd(&md.current_price, "current_price")?,
        market_cap: usd(&md.market_cap, "market_cap")?,
        volume_24h: usd(&md.total_volume, "total_volume")?,
        price_change_24h: md.price_change_percentage_24h,
        price_change_7d: md.price_change_percentage_7d,
        price_history: history.map(|c| c.prices).unwrap_or_default(),
        description: short_description(description),
        symbol: coin.symbol.to_uppercase(),
        id: coin.id,
        name: coin.name,
        last_updated: now,
    })
}

fn short_description(en: Option<String>) -> String {
    match en {
        Some(text) if !text.is_empty() => {
            let head: String = text.chars().take(DESCRIPTION_MAX_CHARS).collect();
            format!("{head}...")
        }
        _ => String::new(),
    }
}
