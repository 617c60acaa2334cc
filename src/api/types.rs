//! API request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::{Result, SnaplinkError};
use crate::storage::{LinkRecord, StoreStats};

/// Values handlers need to shape responses
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Prefix for `shortUrl`, without trailing slash
    pub public_url: String,
    /// Linked from the redirect 404 page
    pub frontend_url: String,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            public_url: config.public_url(),
            frontend_url: config.server.frontend_url.clone(),
        }
    }

    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.public_url, code)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// Kept as raw JSON so a wrong type maps to a URL error, not a body error
    pub url: Option<Value>,
    pub custom_code: Option<String>,
}

impl ShortenRequest {
    /// The target URL as text
    ///
    /// Falsy values (`null`, `""`, `0`, `false`) count as missing; any other
    /// non-string is malformed.
    pub fn target_url(&self) -> Result<&str> {
        match &self.url {
            Some(Value::String(url)) if !url.is_empty() => Ok(url.as_str()),
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                Err(SnaplinkError::validation("URL is required"))
            }
            Some(Value::String(_)) => Err(SnaplinkError::validation("URL is required")),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
                Err(SnaplinkError::validation("URL is required"))
            }
            Some(_) => Err(SnaplinkError::invalid_url("Invalid URL format")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub success: bool,
    pub data: LinkRecord,
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub stats: StoreStats,
}
