//! Link management endpoints: create, list, delete

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, info, trace};

use crate::api::types::{ApiResponse, ApiSettings, MessageResponse, ShortenRequest, ShortenResponse};
use crate::errors::Result;
use crate::services::{LinkEventLogger, RequestMeta};
use crate::storage::LinkStore;

use super::json_ok;

pub struct LinksService;

impl LinksService {
    /// `POST /api/shorten`
    pub async fn shorten(
        req: HttpRequest,
        body: web::Json<ShortenRequest>,
        store: web::Data<LinkStore>,
        settings: web::Data<ApiSettings>,
        events: web::Data<LinkEventLogger>,
    ) -> Result<HttpResponse> {
        let request = body.into_inner();
        let url = request.target_url()?;

        let link = store.create(url, request.custom_code.as_deref())?;
        info!(
            "Created short link {} -> {}",
            link.short_code, link.original_url
        );

        events.link_created(&link, &RequestMeta::from_request(&req));

        let short_url = settings.short_url(&link.short_code);
        Ok(json_ok(&ShortenResponse {
            success: true,
            data: link,
            short_url,
        }))
    }

    /// `GET /api/urls`
    pub async fn list(store: web::Data<LinkStore>) -> HttpResponse {
        let links = store.list();
        trace!("Listing {} links", links.len());
        json_ok(&ApiResponse::ok(links))
    }

    /// `DELETE /api/urls/{short_code}`
    pub async fn delete(
        req: HttpRequest,
        path: web::Path<String>,
        store: web::Data<LinkStore>,
        events: web::Data<LinkEventLogger>,
    ) -> Result<HttpResponse> {
        let code = path.into_inner();
        store.delete(&code)?;
        debug!("Deleted short link {}", code);

        events.link_deleted(&code, &RequestMeta::from_request(&req));

        Ok(json_ok(&MessageResponse {
            success: true,
            message: "URL deleted successfully".to_string(),
        }))
    }
}
