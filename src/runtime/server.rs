//! Server mode
//!
//! Configures and starts the HTTP server with all routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::RequestLogger;
use crate::config::{AppConfig, CorsConfig};

use super::state::AppState;

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(cors_config.max_age);

    if cors_config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server until it is stopped by a signal
///
/// **Note**: logging must be initialized before calling this function
pub async fn run_server(config: AppConfig) -> Result<()> {
    let state = AppState::from_config(&config);
    let store = state.store.clone();

    let request_log = Arc::new(config.request_log.clone());
    let cors_config = config.cors.clone();

    if cors_config.allowed_origins.is_empty() {
        warn!("CORS allowed_origins is empty; browsers will block cross-origin calls");
    }

    let bind_address = config.bind_address();
    let workers = config.server.workers;
    info!("Using {} worker(s)", workers);

    let server = HttpServer::new(move || {
        let state = state.clone();

        App::new()
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .wrap(build_cors_middleware(&cors_config))
            // 最外层，记录完整的请求耗时
            .wrap(RequestLogger::from_shared(Arc::clone(&request_log)))
            .configure(|cfg| state.configure(cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(workers)
    .bind(&bind_address)?;

    info!("🚀 URL Shortener server running on http://{}", bind_address);
    info!("📊 Health check: http://{}/api/health", bind_address);
    info!("Short links are issued under {}", config.public_url());

    server.run().await?;

    let stats = store.stats();
    warn!(
        "Server stopped. {} links and {} clicks discarded",
        stats.total_urls, stats.total_clicks
    );

    Ok(())
}
