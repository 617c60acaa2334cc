//! Link lifecycle events
//!
//! Handlers call these hooks explicitly after a successful create, redirect
//! or delete. Events go out under the `snaplink::events` target so they can
//! be filtered (or routed to the log file) separately from request logs.

use actix_web::HttpRequest;
use tracing::info;

use crate::storage::LinkRecord;
use crate::utils::ip::extract_client_ip;

pub const EVENT_TARGET: &str = "snaplink::events";

/// Client details attached to every event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl RequestMeta {
    pub fn from_request(req: &HttpRequest) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };

        Self {
            ip: extract_client_ip(req),
            user_agent: header("user-agent"),
            referer: header("referer"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkEventLogger {
    enabled: bool,
}

impl Default for LinkEventLogger {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LinkEventLogger {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn link_created(&self, link: &LinkRecord, meta: &RequestMeta) {
        if !self.enabled {
            return;
        }
        info!(
            target: EVENT_TARGET,
            event = "url_created",
            short_code = %link.short_code,
            original_url = %link.original_url,
            custom_code = link.custom_code,
            created_at = %link.created_at.to_rfc3339(),
            ip = meta.ip.as_deref().unwrap_or("-"),
            user_agent = meta.user_agent.as_deref().unwrap_or("-"),
            "URL shortened"
        );
    }

    pub fn link_accessed(&self, link: &LinkRecord, meta: &RequestMeta) {
        if !self.enabled {
            return;
        }
        info!(
            target: EVENT_TARGET,
            event = "url_accessed",
            short_code = %link.short_code,
            original_url = %link.original_url,
            clicks = link.clicks,
            ip = meta.ip.as_deref().unwrap_or("-"),
            user_agent = meta.user_agent.as_deref().unwrap_or("-"),
            referer = meta.referer.as_deref().unwrap_or("-"),
            "URL accessed"
        );
    }

    pub fn link_deleted(&self, short_code: &str, meta: &RequestMeta) {
        if !self.enabled {
            return;
        }
        info!(
            target: EVENT_TARGET,
            event = "url_deleted",
            short_code = %short_code,
            ip = meta.ip.as_deref().unwrap_or("-"),
            user_agent = meta.user_agent.as_deref().unwrap_or("-"),
            "URL deleted"
        );
    }
}
