pub mod coingecko;
pub mod detail;
pub mod gateway;

pub use coingecko::CoinGeckoGateway;
pub use gateway::{ChartQuery, MarketDataGateway, MarketsQuery};
