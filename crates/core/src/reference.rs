//! Fixed metadata for the venues recommendations point to.

use crate::domain::exchange::ExchangeInfo;

struct ExchangeSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    website: &'static str,
    features: &'static [&'static str],
}

const EXCHANGES: [ExchangeSeed; 2] = [
    ExchangeSeed {
        id: "binance",
        name: "Binance",
        description: "The largest cryptocurrency exchange in the world",
        website: "https://www.binance.com",
        features: &["Spot trading", "Margin trading", "Futures", "Secure custody"],
    },
    ExchangeSeed {
        id: "mexc",
        name: "MEXC",
        description: "Advanced exchange with a wide range of listed coins",
        website: "https://www.mexc.com",
        features: &["Spot trading", "New listings", "Low fees", "Simple interface"],
    },
];

pub fn supported_exchanges() -> Vec<ExchangeInfo> {
    EXCHANGES
        .iter()
        .map(|seed| ExchangeInfo {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            website: seed.website.to_string(),
            supported: true,
            features: seed.features.iter().map(|f| f.to_string()).collect(),
        })
        .collect()
}
