use crate::analysis::indicators::NEUTRAL_RSI;
use crate::analysis::{compute_indicators, synthesize_strength, Indicators};
use crate::config::env_or;
use crate::domain::market::{CoinSnapshot, MarketChart};
use crate::domain::recommendation::{
    Recommendation, RecommendationSet, RiskLevel, TimeFrame, Venue, VenueFilter,
};
use crate::error::MarketError;
use crate::market::gateway::{ChartQuery, MarketDataGateway, MarketsQuery};
use anyhow::{ensure, Context};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const CHANGE_WINDOWS: &str = "1h,24h,7d";
const HISTORY_DAYS: u32 = 30;
const VOLUME_WINDOW: usize = 7;

const REASON_OVERSOLD: &str = "RSI indicates oversold conditions";
const REASON_ABOVE_SMA: &str = "Price is above the 20-day moving average";
const REASON_VOLUME: &str = "Significant increase in trading volume";
const REASON_TREND: &str = "Strong upward trend over the past week";
const FALLBACK_REASONS: [&str; 2] = [
    "Overall positive technical picture",
    "Favorable market indicators",
];
const MAX_REASONS: usize = 3;

#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Coins requested from the listing, by market cap.
    pub universe_size: usize,

    /// Only the first `analysis_limit` coins of the universe get a history fetch.
    pub analysis_limit: usize,

    pub max_results: usize,

    /// Recommendations need a strength strictly above this.
    pub min_strength: u8,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            universe_size: 50,
            analysis_limit: 20,
            max_results: 10,
            min_strength: 60,
        }
    }
}

impl CompilerOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            universe_size: env_or("RECOMMENDATION_UNIVERSE_SIZE", defaults.universe_size),
            ..defaults
        }
    }
}

/// Runs the per-coin scoring pipeline over the top of the market and ranks the survivors.
pub struct RecommendationCompiler {
    gateway: Arc<dyn MarketDataGateway>,
    options: CompilerOptions,
}

impl RecommendationCompiler {
    pub fn new(gateway: Arc<dyn MarketDataGateway>, options: CompilerOptions) -> Self {
        Self { gateway, options }
    }

    pub async fn compile(&self, filter: &VenueFilter) -> Result<RecommendationSet, MarketError> {
        let query = MarketsQuery::top_by_market_cap(self.options.universe_size)
            .with_price_change_windows(CHANGE_WINDOWS);
        let coins = self
            .gateway
            .list_coins(&query)
            .await
            .ok_or_else(|| MarketError::Unavailable("Failed to fetch market data".to_string()))?;

        let now = Utc::now();
        let history = ChartQuery::daily(HISTORY_DAYS);
        let mut analysed: usize = 0;
        let mut out = Vec::new();

        for coin in coins.iter().take(self.options.analysis_limit) {
            let Some(chart) = self.gateway.market_chart(&coin.id, &history).await else {
                tracing::debug!(coin_id = %coin.id, "no usable history; skipping coin");
                continue;
            };
            analysed += 1;

            match evaluate_coin(coin, &chart, self.options.min_strength, now) {
                Ok(Some(rec)) => {
                    if filter.matches(rec.exchange) {
                        out.push(rec);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        coin_id = %coin.id,
                        name = %coin.name,
                        error = %format!("{err:#}"),
                        "coin analysis failed; skipping coin"
                    );
                }
            }
        }

        // Stable: equal strengths keep listing order.
        out.sort_by(|a, b| b.strength.cmp(&a.strength));
        let total = out.len();
        out.truncate(self.options.max_results);

        tracing::info!(
            provider = self.gateway.provider_name(),
            universe = coins.len(),
            analysed,
            total,
            returned = out.len(),
            ?filter,
            "recommendations compiled"
        );

        Ok(RecommendationSet {
            data: out,
            total,
            timestamp: now,
        })
    }
}

/// Scores one coin against its history. `Ok(None)` means the coin did not clear
/// `min_strength`; `Err` means its data could not be evaluated.
pub fn evaluate_coin(
    coin: &CoinSnapshot,
    chart: &MarketChart,
    min_strength: u8,
    now: DateTime<Utc>,
) -> anyhow::Result<Option<Recommendation>> {
    let indicators = compute_indicators(&chart.price_values());
    let volume_change = volume_change(&chart.volume_values());
    let market_trend = coin.price_change_percentage_7d_in_currency.unwrap_or(0.0);

    let strength = synthesize_strength(indicators.as_ref(), volume_change, market_trend);
    tracing::debug!(coin_id = %coin.id, strength, volume_change, market_trend, "coin scored");
    if strength <= min_strength {
        return Ok(None);
    }

    let current_price = coin.current_price.context("current_price missing")?;
    ensure!(current_price != 0.0, "current_price is zero");
    let market_cap = coin.market_cap.context("market_cap missing")?;

    let target_price = current_price * (1.0 + (f64::from(strength) - 50.0) / 100.0);
    let potential_return = (target_price - current_price) / current_price * 100.0;

    Ok(Some(Recommendation {
        id: coin.id.clone(),
        name: coin.name.clone(),
        symbol: coin.symbol.to_uppercase(),
        current_price,
        target_price: round_to(target_price, 6),
        strength,
        time_frame: TimeFrame::for_strength(strength),
        exchange: Venue::for_market_cap(market_cap),
        reasons: reasons(indicators.as_ref(), current_price, volume_change, market_trend),
        potential_return: round_to(potential_return, 2),
        risk_level: RiskLevel::for_strength(strength),
        last_updated: now,
    }))
}

/// Percentage change of the mean of the last 7 volumes over the 7 before them.
///
/// The previous window is clamped at the start of the series but still averaged over 7.
pub fn volume_change(volumes: &[f64]) -> f64 {
    let len = volumes.len();
    if len < VOLUME_WINDOW {
        return 0.0;
    }

    let recent = volumes[len - VOLUME_WINDOW..].iter().sum::<f64>() / VOLUME_WINDOW as f64;
    let previous_start = len.saturating_sub(2 * VOLUME_WINDOW);
    let previous =
        volumes[previous_start..len - VOLUME_WINDOW].iter().sum::<f64>() / VOLUME_WINDOW as f64;

    if previous > 0.0 {
        (recent - previous) / previous * 100.0
    } else {
        0.0
    }
}

fn reasons(
    indicators: Option<&Indicators>,
    current_price: f64,
    volume_change: f64,
    market_trend: f64,
) -> Vec<String> {
    let rsi = indicators.map_or(NEUTRAL_RSI, |i| i.rsi);
    let sma_20 = indicators.map_or(0.0, |i| i.sma_20);

    let mut out = Vec::new();
    if rsi < 35.0 {
        out.push(REASON_OVERSOLD);
    }
    if current_price > sma_20 {
        out.push(REASON_ABOVE_SMA);
    }
    if volume_change > 15.0 {
        out.push(REASON_VOLUME);
    }
    if market_trend > 5.0 {
        out.push(REASON_TREND);
    }
    if out.is_empty() {
        out.extend(FALLBACK_REASONS);
    }

    out.into_iter()
        .take(MAX_REASONS)
        .map(str::to_string)
        .collect()
}

/// Half-away-from-zero on the scaled value; exact ties round up in magnitude.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
