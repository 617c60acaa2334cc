//! Request logging middleware
//!
//! Wraps every request with structured log entries:
//! - an "Incoming" entry with method, path, client address and headers
//!   (plus the JSON body when `include_body` is on);
//! - a completion entry: "Request completed", "Redirect" or "Request failed",
//!   with status and elapsed time;
//! - a "Slow request detected" warning when the elapsed time exceeds the
//!   threshold. The slow check ignores the exclusion list.
//!
//! The middleware only observes; it never changes the response.

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::PayloadError,
    http::header,
};
use bytes::{Bytes, BytesMut};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use futures_util::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::RequestLogConfig;
use crate::utils::ip::client_ip;

/// Bodies larger than this are passed through unbuffered and not logged
pub const MAX_LOGGED_BODY: usize = 16 * 1024;

type PayloadStream = Pin<Box<dyn Stream<Item = Result<Bytes, PayloadError>>>>;

/// Request logger middleware factory
#[derive(Clone)]
pub struct RequestLogger {
    config: Arc<RequestLogConfig>,
}

impl RequestLogger {
    pub fn new(config: RequestLogConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_shared(config: Arc<RequestLogConfig>) -> Self {
        Self { config }
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new(RequestLogConfig::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerService {
            service: Rc::new(service),
            config: Arc::clone(&self.config),
        }))
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
    config: Arc<RequestLogConfig>,
}

/// What we remember about the request until the response is ready
struct RequestSummary {
    method: String,
    path: String,
    ip: String,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = Arc::clone(&self.config);
        let start = Instant::now();

        let logged = config.enabled && !is_excluded(req.path(), &config.exclude_paths);
        let summary = RequestSummary {
            method: req.method().to_string(),
            path: req.uri().to_string(),
            ip: client_ip(req.peer_addr(), req.headers()).unwrap_or_else(|| "-".to_string()),
        };

        Box::pin(async move {
            if logged {
                let body = if config.include_body && is_json(&req) {
                    capture_body(&mut req, MAX_LOGGED_BODY).await?
                } else {
                    None
                };
                log_incoming(&req, &summary, body.as_ref());
            }

            let result = srv.call(req).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(res) => {
                    if logged {
                        log_completion(res, &summary, elapsed);
                    }
                    if config.enabled {
                        log_performance(&config, &summary, res.status().as_u16(), elapsed);
                    }
                }
                Err(e) => {
                    // Errors that escape the handler chain become 500s upstream
                    if logged {
                        error!(
                            method = %summary.method,
                            url = %summary.path,
                            ip = %summary.ip,
                            status_code = 500u16,
                            duration_ms = elapsed.as_millis() as u64,
                            error = %e,
                            "Unhandled error: {} {}",
                            summary.method,
                            summary.path
                        );
                    }
                    if config.enabled {
                        log_performance(&config, &summary, 500, elapsed);
                    }
                }
            }

            result
        })
    }
}

/// Substring match, mirroring how exclusions are usually written ("/api/health")
pub fn is_excluded(path: &str, exclude_paths: &[String]) -> bool {
    exclude_paths
        .iter()
        .any(|p| !p.is_empty() && path.contains(p.as_str()))
}

fn is_json(req: &ServiceRequest) -> bool {
    req.content_type().eq_ignore_ascii_case("application/json")
}

fn declared_length(req: &ServiceRequest) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Read up to `limit` bytes of the payload, then hand the handler the same
/// bytes back
///
/// Returns `None` when the body is larger than `limit` or is not JSON worth
/// logging. At most `limit` bytes (plus one chunk) are ever held here.
pub async fn capture_body(
    req: &mut ServiceRequest,
    limit: usize,
) -> Result<Option<serde_json::Value>, Error> {
    if declared_length(req).is_some_and(|len| len > limit) {
        return Ok(None);
    }

    let mut payload = req.take_payload();
    let mut buf = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        buf.extend_from_slice(&chunk?);
        if buf.len() > limit {
            // 超限：已读部分放回流首，剩余部分不再缓冲
            let head = stream::once(ready(Ok::<_, PayloadError>(buf.freeze())));
            let rest: PayloadStream = Box::pin(head.chain(payload));
            req.set_payload(Payload::Stream { payload: rest });
            return Ok(None);
        }
    }
    let bytes = buf.freeze();

    let value = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .filter(|v| v.as_object().is_none_or(|o| !o.is_empty()));

    req.set_payload(Payload::from(bytes));
    Ok(value)
}

fn header_str<'a>(req: &'a ServiceRequest, name: header::HeaderName) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
}

fn log_incoming(req: &ServiceRequest, summary: &RequestSummary, body: Option<&serde_json::Value>) {
    let user_agent = header_str(req, header::USER_AGENT);
    let referer = header_str(req, header::REFERER);
    let content_type = header_str(req, header::CONTENT_TYPE);

    match body {
        Some(body) => info!(
            method = %summary.method,
            url = %summary.path,
            ip = %summary.ip,
            user_agent,
            referer,
            content_type,
            body = %body,
            "Incoming {} request to {}",
            summary.method,
            summary.path
        ),
        None => info!(
            method = %summary.method,
            url = %summary.path,
            ip = %summary.ip,
            user_agent,
            referer,
            content_type,
            "Incoming {} request to {}",
            summary.method,
            summary.path
        ),
    }
}

fn log_completion<B>(res: &ServiceResponse<B>, summary: &RequestSummary, elapsed: Duration) {
    let status = res.status();
    let duration_ms = elapsed.as_millis() as u64;

    if status.is_redirection() {
        let redirect_to = res
            .headers()
            .get(header::LOCATION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("-");
        info!(
            method = %summary.method,
            url = %summary.path,
            redirect_to,
            status_code = status.as_u16(),
            duration_ms,
            ip = %summary.ip,
            "Redirect: {} {}",
            summary.method,
            summary.path
        );
    } else if status.is_client_error() || status.is_server_error() {
        let reason = res
            .response()
            .error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        error!(
            method = %summary.method,
            url = %summary.path,
            status_code = status.as_u16(),
            duration_ms,
            ip = %summary.ip,
            error = %reason,
            "Request failed: {} {}",
            summary.method,
            summary.path
        );
    } else {
        info!(
            method = %summary.method,
            url = %summary.path,
            status_code = status.as_u16(),
            duration_ms,
            ip = %summary.ip,
            "Request completed: {} {}",
            summary.method,
            summary.path
        );
    }
}

/// Whether `elapsed` is over the configured slow-request threshold
pub fn is_slow(elapsed: Duration, threshold_ms: u64) -> bool {
    elapsed > Duration::from_millis(threshold_ms)
}

fn log_performance(
    config: &RequestLogConfig,
    summary: &RequestSummary,
    status_code: u16,
    elapsed: Duration,
) {
    let duration_ms = format!("{:.2}", elapsed.as_secs_f64() * 1000.0);

    if is_slow(elapsed, config.slow_request_threshold_ms) {
        warn!(
            method = %summary.method,
            url = %summary.path,
            duration_ms = %duration_ms,
            threshold_ms = config.slow_request_threshold_ms,
            status_code,
            ip = %summary.ip,
            "Slow request detected"
        );
    }

    if config.log_all_requests {
        debug!(
            method = %summary.method,
            url = %summary.path,
            duration_ms = %duration_ms,
            status_code,
            "Request performance"
        );
    }
}
