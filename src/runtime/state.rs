//! Shared application state
//!
//! Built once per process and cloned into every worker; `web::Data` is an
//! `Arc`, so all workers see the same store.

use actix_web::web;

use crate::api::ApiSettings;
use crate::config::AppConfig;
use crate::services::LinkEventLogger;
use crate::storage::{LinkStore, StoreSettings};

#[derive(Clone)]
pub struct AppState {
    pub store: web::Data<LinkStore>,
    pub settings: web::Data<ApiSettings>,
    pub events: web::Data<LinkEventLogger>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_store(LinkStore::new(StoreSettings::from(&config.links)), config)
    }

    /// Use a pre-built store (custom generator, pre-seeded data)
    pub fn with_store(store: LinkStore, config: &AppConfig) -> Self {
        Self {
            store: web::Data::new(store),
            settings: web::Data::new(ApiSettings::from_config(config)),
            events: web::Data::new(LinkEventLogger::new(config.request_log.log_link_events)),
        }
    }

    /// Register the state and every route on an app or scope
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.store.clone())
            .app_data(self.settings.clone())
            .app_data(self.events.clone())
            .service(crate::api::services::api_routes())
            .service(crate::api::services::redirect_routes());
    }
}
