use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::api::types::HealthResponse;
use crate::storage::LinkStore;

use super::json_ok;

pub const HEALTH_MESSAGE: &str = "URL Shortener API is running";

pub struct HealthService;

impl HealthService {
    /// Totals are computed from the store on every call
    pub async fn health_check(store: web::Data<LinkStore>) -> impl Responder {
        trace!("Received health check request");

        json_ok(&HealthResponse {
            success: true,
            message: HEALTH_MESSAGE.to_string(),
            stats: store.stats(),
        })
    }
}
