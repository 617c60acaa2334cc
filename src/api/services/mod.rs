pub mod analytics;
pub mod health;
pub mod links;
pub mod redirect;

pub use analytics::AnalyticsService;
pub use health::HealthService;
pub use links::LinksService;
pub use redirect::{RedirectService, not_found_page};

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::debug;

use crate::errors::{Result, SnaplinkError};

/// Request bodies above this size are rejected
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

/// 200 OK with a JSON body
pub(crate) fn json_ok<T: Serialize>(body: &T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected request body: {}", err);
    SnaplinkError::validation("Invalid request body").into()
}

async fn api_not_found() -> Result<HttpResponse> {
    Err(SnaplinkError::not_found("Not found"))
}

/// `/api` 路由配置
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .route("/shorten", web::post().to(LinksService::shorten))
        .route("/urls", web::get().to(LinksService::list))
        .route("/urls/{short_code}", web::delete().to(LinksService::delete))
        .route(
            "/analytics/{short_code}",
            web::get().to(AnalyticsService::link_analytics),
        )
        .route("/health", web::get().to(HealthService::health_check))
        .default_service(web::to(api_not_found))
}

/// Redirect 路由配置
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{short_code}").route(web::get().to(RedirectService::handle_redirect))
}
