//! Technical indicators and score synthesis. Pure functions, no I/O.

pub mod indicators;
pub mod score;

pub use indicators::{compute_indicators, Indicators};
pub use score::synthesize_strength;
