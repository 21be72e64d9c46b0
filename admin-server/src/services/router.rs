use crate::core::ServerState;
use crate::utils::{AppError, ErrorCode};
use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::{BoxError, Router, middleware};
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

/// Room for multipart framing on top of the largest accepted file
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", latency_ms, "{} {} {}", method, uri, status);

    response
}

/// Failures raised by tower middleware, answered with the JSON error body
async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        return AppError::new(ErrorCode::RequestTimeout);
    }
    AppError::internal(format!("Unhandled middleware error: {err}"))
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::homepage::router())
        .merge(crate::api::upload::router())
        // Catalog APIs
        .merge(crate::api::categories::router())
        .merge(crate::api::search_tree::router())
        .merge(crate::api::products::router())
}

/// Build the complete service: routes, state and tower middleware
///
/// Used by [`crate::Server`] and by integration tests via `oneshot`.
pub fn build_router(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_LIMIT_OVERHEAD;
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    build_app()
        .with_state(state)
        // Tower HTTP 中间件
        // Extractors (Json, Multipart) report an oversized body as their own rejection
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout),
        )
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
