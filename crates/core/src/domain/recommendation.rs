use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub data: Vec<Recommendation>,
    /// Number of recommendations before truncation.
    pub total: usize,
    #[serde(deserialize_with = "crate::domain::timestamp::lenient_utc")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub target_price: f64,
    pub strength: u8,
    pub time_frame: TimeFrame,
    pub exchange: Venue,
    pub reasons: Vec<String>,
    pub potential_return: f64,
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "crate::domain::timestamp::lenient_utc")]
    pub last_updated: DateTime<Utc>,
}

/// Also reads the Arabic labels found in older payload files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "1 month", alias = "شهر واحد")]
    OneMonth,
    #[serde(rename = "2 months", alias = "شهرين")]
    TwoMonths,
    #[serde(rename = "3 months", alias = "3 أشهر")]
    ThreeMonths,
}

impl TimeFrame {
    pub fn for_strength(strength: u8) -> Self {
        if strength >= 80 {
            TimeFrame::OneMonth
        } else if strength >= 70 {
            TimeFrame::TwoMonths
        } else {
            TimeFrame::ThreeMonths
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[serde(alias = "منخفضة")]
    Low,
    #[serde(alias = "متوسطة")]
    Medium,
    #[serde(alias = "عالية")]
    High,
}

impl RiskLevel {
    pub fn for_strength(strength: u8) -> Self {
        if strength >= 80 {
            RiskLevel::Low
        } else if strength >= 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// Suggested trading venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Venue {
    #[serde(alias = "binance")]
    Binance,
    #[serde(rename = "MEXC", alias = "mexc")]
    Mexc,
}

/// Coins above this market capitalization are routed to the large venue.
pub const LARGE_VENUE_MIN_MARKET_CAP: f64 = 1_000_000_000.0;

impl Venue {
    pub fn for_market_cap(market_cap: f64) -> Self {
        if market_cap > LARGE_VENUE_MIN_MARKET_CAP {
            Venue::Binance
        } else {
            Venue::Mexc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Binance => "Binance",
            Venue::Mexc => "MEXC",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Venue filter from the `exchange` query parameter.
///
/// `all` is matched case-insensitively and a blank value also selects every venue.
/// Older deployments compared `all` case-sensitively, so `ALL` used to yield nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VenueFilter {
    #[default]
    All,
    Only(String),
}

impl VenueFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => VenueFilter::All,
            Some(s) if s.eq_ignore_ascii_case("all") => VenueFilter::All,
            Some(s) => VenueFilter::Only(s.to_string()),
        }
    }

    pub fn matches(&self, venue: Venue) -> bool {
        match self {
            VenueFilter::All => true,
            VenueFilter::Only(wanted) => wanted.eq_ignore_ascii_case(venue.as_str()),
        }
    }
}
