use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath, Request},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_governor::{governor::GovernorConfigBuilder, GovernorError, GovernorLayer};

use crate::utils::access::Caller;

/// Type alias for the global governor layer (IP-based rate limiting)
pub type GlobalGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Create a GovernorLayer for global rate limiting (per IP address)
/// - Bursts of 100 requests, one token replenished every 600ms (100 per minute)
/// - Applied before authentication so login and registration are covered too
pub fn create_global_governor() -> GlobalGovernorLayer {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(600)
            .burst_size(100)
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    );

    GovernorLayer::new(config).error_handler(rate_limit_error_handler)
}

/// Render governor failures in the same JSON shape as other errors
pub fn rate_limit_error_handler(error: GovernorError) -> Response<Body> {
    match error {
        // wait_time is whole seconds and truncates to 0 below the refill period
        GovernorError::TooManyRequests { wait_time, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, wait_time.max(1).to_string())],
            Json(json!({ "message": "Too many requests, please slow down" })),
        )
            .into_response(),
        other => {
            tracing::error!(error = ?other, "Rate limiter failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "An unexpected error occurred" })),
            )
                .into_response()
        }
    }
}

/// One line per request: peer, matched route, caller, status and latency.
///
/// The caller is read from the response, where the auth middleware leaves it.
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let user_id = response.extensions().get::<Caller>().map(|caller| caller.user_id);
    let elapsed_ms = started.elapsed().as_millis() as u64;

    // Rejections from the governor never reach this layer
    match status {
        s if s.is_server_error() => tracing::error!(
            client_ip = %addr.ip(), %method, %route, ?user_id, status = s.as_u16(), elapsed_ms,
            "Request failed"
        ),
        s => tracing::debug!(
            client_ip = %addr.ip(), %method, %route, ?user_id, status = s.as_u16(), elapsed_ms,
            "Request handled"
        ),
    }

    response
}
