//! RMP Paper Products ordering portal.
//!
//! The portal is a library so the router can be served by the binary and
//! driven end to end by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod advisory;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod registry;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Uri, header::CACHE_CONTROL},
    middleware::from_fn,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outermost.
pub fn build_router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        ))
        .service(ServeDir::new(&state.config().static_dir));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", static_files)
        .fallback(not_found)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        portal_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
