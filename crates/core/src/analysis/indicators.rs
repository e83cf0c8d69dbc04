use serde::Serialize;

pub const SMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Indicators {
    pub sma_20: f64,
    pub rsi: f64,
    pub current_price: f64,
}

/// Derives the indicator set from a chronological price series.
///
/// Returns `None` when fewer than [`SMA_PERIOD`] prices are available; callers treat that as
/// insufficient data rather than an error.
pub fn compute_indicators(prices: &[f64]) -> Option<Indicators> {
    let sma_20 = sma(prices, SMA_PERIOD)?;
    let current_price = *prices.last()?;

    Some(Indicators {
        sma_20,
        rsi: rsi(prices, RSI_PERIOD),
        current_price,
    })
}

/// Arithmetic mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Simplified RSI over the last `period` deltas.
///
/// A window without any losses yields a relative strength of 0, so the index comes out as 0
/// rather than 100.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    if period == 0 || deltas.len() < period {
        return NEUTRAL_RSI;
    }

    let recent = &deltas[deltas.len() - period..];
    let avg_gain = recent.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
    let avg_loss = recent
        .iter()
        .map(|d| if *d > 0.0 { 0.0 } else { d.abs() })
        .sum::<f64>()
        / period as f64;

    let rs = if avg_loss != 0.0 {
        avg_gain / avg_loss
    } else {
        0.0
    };
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn short_series_has_no_indicators() {
        assert_eq!(compute_indicators(&[]), None);
        let prices: Vec<f64> = (0..19).map(|i| 100.0 + i as f64).collect();
        assert_eq!(compute_indicators(&prices), None);
    }

    #[test]
    fn sma_is_mean_of_last_twenty() {
        let prices: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let ind = compute_indicators(&prices).unwrap();
        // 11..=30
        assert_close(ind.sma_20, 20.5);
        assert_close(ind.current_price, 30.0);
    }

    #[test]
    fn rsi_is_neutral_with_too_few_deltas() {
        let prices: Vec<f64> = (0..14).map(|i| 10.0 + (i % 3) as f64).collect();
        assert_eq!(rsi(&prices, RSI_PERIOD), NEUTRAL_RSI);
        assert_eq!(rsi(&[], RSI_PERIOD), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_is_zero_when_window_has_no_losses() {
        let rising: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert_eq!(rsi(&rising, RSI_PERIOD), 0.0);

        let flat = vec![42.0; 20];
        let ind = compute_indicators(&flat).unwrap();
        assert_eq!(ind.rsi, 0.0);
        assert_close(ind.sma_20, 42.0);
        assert_close(ind.current_price, 42.0);
    }

    #[test]
    fn rsi_balances_equal_gains_and_losses() {
        let zigzag: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 102.0 })
            .collect();
        assert_close(rsi(&zigzag, RSI_PERIOD), 50.0);
    }

    #[test]
    fn rsi_uses_only_the_last_window() {
        // Early crash is outside the last 14 deltas.
        let mut prices = vec![500.0, 100.0];
        for i in 0..14 {
            prices.push(if i % 2 == 0 { 103.0 } else { 100.0 });
        }
        // 7 gains of 3, 7 losses of 3
        assert_close(rsi(&prices, RSI_PERIOD), 50.0);

        prices.push(109.0);
        // Oldest gain leaves the window: gains 6*3 + 9, losses 7*3.
        assert_close(rsi(&prices, RSI_PERIOD), 56.25);
    }
}
