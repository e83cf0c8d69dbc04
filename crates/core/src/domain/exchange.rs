use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub website: String,
    pub supported: bool,
    pub features: Vec<String>,
}
