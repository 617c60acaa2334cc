use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, error, trace};

use crate::api::types::ApiSettings;
use crate::errors::SnaplinkError;
use crate::services::{LinkEventLogger, RequestMeta};
use crate::storage::LinkStore;
use crate::utils::is_valid_short_code;
use crate::utils::url_validator::normalize_url;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{short_code}`: count the click and send a 302
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        store: web::Data<LinkStore>,
        settings: web::Data<ApiSettings>,
        events: web::Data<LinkEventLogger>,
    ) -> HttpResponse {
        let code = path.into_inner();

        let max_len = store
            .settings()
            .code_length
            .max(store.settings().max_custom_code_length);
        if !is_valid_short_code(&code, max_len) {
            // 非法短码，直接 404，不查存储
            trace!("Invalid short code rejected: {}", code);
            return Self::not_found_response(&settings.frontend_url);
        }

        let meta = RequestMeta::from_request(&req);
        // Location 先构造好，失败时不计点击
        let result = store.record_access_with(
            &code,
            meta.user_agent.clone(),
            meta.ip.clone(),
            |link| location_for(&link.original_url),
        );
        match result {
            Ok((link, location)) => {
                events.link_accessed(&link, &meta);
                HttpResponse::build(StatusCode::FOUND)
                    .insert_header((header::LOCATION, location))
                    .finish()
            }
            Err(SnaplinkError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response(&settings.frontend_url)
            }
            Err(e) => {
                error!("Error redirecting {}: {}", code, e);
                Self::error_response()
            }
        }
    }

    fn not_found_response(frontend_url: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body(not_found_page(frontend_url))
    }

    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Internal server error")
    }
}

/// `Location` value for a stored target: the normalized, ASCII-only form
fn location_for(original_url: &str) -> Result<HeaderValue, SnaplinkError> {
    let normalized = normalize_url(original_url)
        .map_err(|e| SnaplinkError::internal(format!("stored URL unusable: {}", e)))?;
    HeaderValue::from_str(&normalized)
        .map_err(|e| SnaplinkError::internal(format!("invalid Location value: {}", e)))
}

/// HTML shown for unknown short codes
pub fn not_found_page(frontend_url: &str) -> String {
    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; text-align: center; padding: 50px;">
    <h1>404 - Short URL Not Found</h1>
    <p>The short URL you're looking for doesn't exist.</p>
    <a href="{}" style="color: #3b82f6;">Go back to URL Shortener</a>
  </body>
</html>
"#,
        frontend_url.replace('"', "&quot;")
    )
}
