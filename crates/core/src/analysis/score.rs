use super::indicators::{Indicators, NEUTRAL_RSI};

pub const BASE_SCORE: i32 = 50;
pub const MAX_SCORE: i32 = 100;

/// Combines indicators with the volume and market trend percentages into a strength in
/// `0..=100`.
///
/// Missing indicators evaluate as `rsi = 50`, `sma_20 = 0` and `current_price = 0`.
pub fn synthesize_strength(
    indicators: Option<&Indicators>,
    volume_change: f64,
    market_trend: f64,
) -> u8 {
    let rsi = indicators.map_or(NEUTRAL_RSI, |i| i.rsi);
    let sma_20 = indicators.map_or(0.0, |i| i.sma_20);
    let current_price = indicators.map_or(0.0, |i| i.current_price);

    let mut score = BASE_SCORE;

    if rsi < 30.0 {
        score += 20;
    } else if rsi > 70.0 {
        score -= 15;
    } else if (40.0..=60.0).contains(&rsi) {
        score += 5;
    }

    // Equality lands in the penalty branch.
    if current_price > sma_20 {
        score += 15;
    } else {
        score -= 10;
    }

    if volume_change > 20.0 {
        score += 15;
    } else if volume_change > 0.0 {
        score += 5;
    } else {
        score -= 5;
    }

    if market_trend > 0.0 {
        score += 10;
    } else {
        score -= 5;
    }

    score.clamp(0, MAX_SCORE) as u8
}
