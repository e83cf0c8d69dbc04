use crate::config::env_or;
use crate::domain::market::{MarketEntry, MarketOverview};
use crate::domain::recommendation::{RecommendationSet, VenueFilter};
use crate::error::MarketError;
use crate::market::gateway::{MarketDataGateway, MarketsQuery};
use crate::pipeline::{CompilerOptions, RecommendationCompiler};
use crate::source::MarketSource;
use chrono::Utc;
use std::sync::Arc;

const DEFAULT_OVERVIEW_SIZE: usize = 10;

pub struct LiveSource {
    gateway: Arc<dyn MarketDataGateway>,
    compiler: RecommendationCompiler,
    overview_size: usize,
}

impl LiveSource {
    pub fn new(
        gateway: Arc<dyn MarketDataGateway>,
        options: CompilerOptions,
        overview_size: usize,
    ) -> Self {
        Self {
            compiler: RecommendationCompiler::new(gateway.clone(), options),
            gateway,
            overview_size,
        }
    }

    pub fn from_env(gateway: Arc<dyn MarketDataGateway>) -> Self {
        Self::new(
            gateway,
            CompilerOptions::from_env(),
            env_or("MARKET_OVERVIEW_SIZE", DEFAULT_OVERVIEW_SIZE),
        )
    }
}

#[async_trait::async_trait]
impl MarketSource for LiveSource {
    fn source_name(&self) -> &'static str {
        self.gateway.provider_name()
    }

    async fn market_overview(&self) -> Result<MarketOverview, MarketError> {
        let coins = self
            .gateway
            .list_coins(&MarketsQuery::top_by_market_cap(self.overview_size))
            .await
            .ok_or_else(|| MarketError::Unavailable("Failed to fetch market data".to_string()))?;

        Ok(MarketOverview {
            data: coins.iter().map(MarketEntry::from).collect(),
            timestamp: Utc::now(),
        })
    }

    async fn recommendations(
        &self,
        filter: &VenueFilter,
    ) -> Result<RecommendationSet, MarketError> {
        self.compiler.compile(filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{CoinSnapshot, MarketChart};
    use crate::market::gateway::ChartQuery;
    use serde_json::Value;
    use std::sync::Mutex;

    struct ListingGateway {
        coins: Option<Vec<CoinSnapshot>>,
        queries: Mutex<Vec<MarketsQuery>>,
    }

    #[async_trait::async_trait]
    impl MarketDataGateway for ListingGateway {
        fn provider_name(&self) -> &'static str {
            "listing"
        }

        async fn list_coins(&self, query: &MarketsQuery) -> Option<Vec<CoinSnapshot>> {
            self.queries.lock().unwrap().push(query.clone());
            self.coins.clone()
        }

        async fn market_chart(&self, _coin_id: &str, _query: &ChartQuery) -> Option<MarketChart> {
            None
        }

        async fn coin_detail(&self, _coin_id: &str) -> Option<Value> {
            None
        }
    }

    fn snapshot(id: &str, symbol: &str, price: Option<f64>) -> CoinSnapshot {
        CoinSnapshot {
            id: id.to_string(),
            name: id.to_string(),
            symbol: symbol.to_string(),
            current_price: price,
            price_change_percentage_24h: Some(-2.0),
            price_change_percentage_7d_in_currency: None,
            market_cap: Some(1.0e9),
            total_volume: Some(5.0e7),
            image: Some(format!("https://img.test/{id}.png")),
        }
    }

    #[tokio::test]
    async fn overview_maps_listing_entries() {
        let gateway = Arc::new(ListingGateway {
            coins: Some(vec![
                snapshot("bitcoin", "btc", Some(65000.0)),
                snapshot("ghost", "gh", None),
            ]),
            queries: Mutex::new(Vec::new()),
        });
        let source = LiveSource::new(gateway.clone(), CompilerOptions::default(), 10);

        let overview = source.market_overview().await.unwrap();
        assert_eq!(overview.data.len(), 2);
        assert_eq!(overview.data[0].symbol, "BTC");
        assert_eq!(overview.data[0].price, Some(65000.0));
        assert_eq!(overview.data[0].change_24h, Some(-2.0));
        assert_eq!(overview.data[1].price, None);

        let queries = gateway.queries.lock().unwrap();
        assert_eq!(queries[0], MarketsQuery::top_by_market_cap(10));
    }

    #[tokio::test]
    async fn overview_fails_when_listing_is_absent() {
        let gateway = Arc::new(ListingGateway {
            coins: None,
            queries: Mutex::new(Vec::new()),
        });
        let source = LiveSource::new(gateway, CompilerOptions::default(), 10);

        let err = source.market_overview().await.unwrap_err();
        assert_eq!(
            err,
            MarketError::Unavailable("Failed to fetch market data".to_string())
        );
        assert!(source.recommendations(&VenueFilter::All).await.is_err());
    }
}
