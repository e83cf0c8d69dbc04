pub mod exchange;
pub mod market;
pub mod recommendation;
pub mod timestamp;
