use actix_web::{HttpResponse, web};

use crate::api::types::ApiResponse;
use crate::errors::{Result, SnaplinkError};
use crate::storage::LinkStore;

use super::json_ok;

pub struct AnalyticsService;

impl AnalyticsService {
    /// `GET /api/analytics/{short_code}`: the record plus its click history
    pub async fn link_analytics(
        path: web::Path<String>,
        store: web::Data<LinkStore>,
    ) -> Result<HttpResponse> {
        let details = store
            .details(&path)
            .ok_or_else(|| SnaplinkError::not_found("URL not found"))?;

        Ok(json_ok(&ApiResponse::ok(details)))
    }
}
