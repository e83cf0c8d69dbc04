use crate::config::{env_or, Settings};
use crate::domain::market::{CoinSnapshot, MarketChart};
use crate::market::gateway::{ChartQuery, MarketDataGateway, MarketsQuery};
use crate::pacing::IntervalGate;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PACING_MS: u64 = 100;
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Debug)]
pub struct CoinGeckoGateway {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    pacer: IntervalGate,
}

impl CoinGeckoGateway {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout_secs = env_or("MARKET_DATA_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        let pacing_ms = env_or("MARKET_DATA_PACING_MS", DEFAULT_PACING_MS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url: settings.market_data_base_url().to_string(),
            api_key: settings.market_data_api_key.clone(),
            pacer: IntervalGate::new(Duration::from_millis(pacing_ms)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(api_key) = &self.api_key {
            headers.insert(API_KEY_HEADER, HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        self.pacer.ready().await;

        let res = self
            .http
            .get(self.url(path))
            .headers(self.headers()?)
            .query(query)
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;

        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {}", truncate(&text, 200));
        }

        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("response is not valid JSON: {}", truncate(&text, 200)))?;
        serde_json::from_value::<T>(raw_json).context("unexpected response shape")
    }
}

#[async_trait::async_trait]
impl MarketDataGateway for CoinGeckoGateway {
    fn provider_name(&self) -> &'static str {
        "coingecko"
    }

    async fn list_coins(&self, query: &MarketsQuery) -> Option<Vec<CoinSnapshot>> {
        let res = self
            .get_json::<Vec<CoinSnapshot>>("coins/markets", &markets_params(query))
            .await;
        absent_on_error("coins/markets", res)
    }

    async fn market_chart(&self, coin_id: &str, query: &ChartQuery) -> Option<MarketChart> {
        let path = format!("coins/{coin_id}/market_chart");
        let res = self
            .get_json::<MarketChart>(&path, &chart_params(query))
            .await;
        absent_on_error(&path, res)
    }

    async fn coin_detail(&self, coin_id: &str) -> Option<Value> {
        let path = format!("coins/{coin_id}");
        let res = self.get_json::<Value>(&path, &detail_params()).await;
        absent_on_error(&path, res)
    }
}

fn absent_on_error<T>(endpoint: &str, res: Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::warn!(endpoint, error = %format!("{err:#}"), "market data fetch failed");
            None
        }
    }
}

fn markets_params(q: &MarketsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("vs_currency", q.vs_currency.clone()),
        ("order", q.order.clone()),
        ("per_page", q.per_page.to_string()),
        ("page", q.page.to_string()),
        ("sparkline", q.sparkline.to_string()),
    ];
    if let Some(windows) = &q.price_change_percentage {
        params.push(("price_change_percentage", windows.clone()));
    }
    params
}

fn chart_params(q: &ChartQuery) -> Vec<(&'static str, String)> {
    vec![
        ("vs_currency", q.vs_currency.clone()),
        ("days", q.days.to_string()),
        ("interval", q.interval.clone()),
    ]
}

fn detail_params() -> Vec<(&'static str, String)> {
    [
        ("localization", false),
        ("tickers", false),
        ("market_data", true),
        ("community_data", false),
        ("developer_data", false),
        ("sparkline", true),
    ]
    .into_iter()
    .map(|(k, v)| (k, v.to_string()))
    .collect()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
