use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened link as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Mirrors `short_code`; clients key list rows by it
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: usize,
    /// Whether the caller chose the code
    pub custom_code: bool,
}

impl LinkRecord {
    pub fn new(short_code: String, original_url: String, custom_code: bool) -> Self {
        Self {
            id: short_code.clone(),
            short_code,
            original_url,
            created_at: Utc::now(),
            clicks: 0,
            custom_code,
        }
    }
}

/// One successful redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRecord {
    pub timestamp: DateTime<Utc>,
    pub user_agent: Option<String>,
    /// Requesting address
    pub ip: Option<String>,
}

impl AccessRecord {
    pub fn new(user_agent: Option<String>, ip: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            user_agent,
            ip,
        }
    }
}

/// Link record plus its click history (analytics view)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDetails {
    #[serde(flatten)]
    pub link: LinkRecord,
    pub click_history: Vec<AccessRecord>,
}

/// Aggregate counters derived from the store contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_urls: usize,
    pub total_clicks: usize,
}
