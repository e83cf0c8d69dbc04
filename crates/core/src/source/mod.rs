//! Where the overview and recommendation payloads come from.
//!
//! Chosen once at startup: live provider data, or a static payload file whose sections
//! override the live ones.

pub mod live;
pub mod static_file;

use crate::config::Settings;
use crate::domain::market::MarketOverview;
use crate::domain::recommendation::{RecommendationSet, VenueFilter};
use crate::error::MarketError;
use std::sync::Arc;

pub use live::LiveSource;
pub use static_file::{StaticPayload, StaticSource};

#[async_trait::async_trait]
pub trait MarketSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn market_overview(&self) -> Result<MarketOverview, MarketError>;

    async fn recommendations(&self, filter: &VenueFilter)
        -> Result<RecommendationSet, MarketError>;
}

/// Picks the data source for this process. An unusable payload file degrades to live data.
pub fn select_source(settings: &Settings, live: LiveSource) -> Arc<dyn MarketSource> {
    let Some(path) = settings.static_payload_path.as_deref() else {
        tracing::info!(source = live.source_name(), "serving live market data");
        return Arc::new(live);
    };

    match StaticPayload::load(path) {
        Ok(payload) => {
            tracing::info!(
                path = %path.display(),
                market_overview = payload.market_overview.is_some(),
                recommendations = payload.recommendations.is_some(),
                "serving static market payload"
            );
            Arc::new(StaticSource::new(payload, Arc::new(live)))
        }
        Err(err) => {
            tracing::error!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "static payload unusable; serving live market data"
            );
            Arc::new(live)
        }
    }
}
