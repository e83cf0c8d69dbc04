use crate::domain::market::MarketOverview;
use crate::domain::recommendation::{RecommendationSet, VenueFilter};
use crate::error::MarketError;
use crate::source::MarketSource;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// File-backed substitute payload. Either section may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticPayload {
    pub market_overview: Option<MarketOverview>,
    pub recommendations: Option<RecommendationSet>,
}

impl StaticPayload {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read static payload {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("static payload {} has an unexpected shape", path.display()))
    }
}

/// Serves the sections present in a [`StaticPayload`] and delegates the rest.
pub struct StaticSource {
    payload: StaticPayload,
    fallback: Arc<dyn MarketSource>,
}

impl StaticSource {
    pub fn new(payload: StaticPayload, fallback: Arc<dyn MarketSource>) -> Self {
        Self { payload, fallback }
    }
}

#[async_trait::async_trait]
impl MarketSource for StaticSource {
    fn source_name(&self) -> &'static str {
        "static_file"
    }

    async fn market_overview(&self) -> Result<MarketOverview, MarketError> {
        match &self.payload.market_overview {
            Some(overview) => Ok(overview.clone()),
            None => self.fallback.market_overview().await,
        }
    }

    async fn recommendations(
        &self,
        filter: &VenueFilter,
    ) -> Result<RecommendationSet, MarketError> {
        match &self.payload.recommendations {
            Some(set) => Ok(filter_set(set, filter)),
            None => self.fallback.recommendations(filter).await,
        }
    }
}

/// Unfiltered requests get the stored set untouched; filtered ones report the filtered count.
fn filter_set(set: &RecommendationSet, filter: &VenueFilter) -> RecommendationSet {
    if *filter == VenueFilter::All {
        return set.clone();
    }

    let data: Vec<_> = set
        .data
        .iter()
        .filter(|rec| filter.matches(rec.exchange))
        .cloned()
        .collect();

    RecommendationSet {
        total: data.len(),
        data,
        timestamp: set.timestamp,
    }
}
