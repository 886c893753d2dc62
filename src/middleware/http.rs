//! HTTP-level middleware (cross-cutting concerns).
//!
//! This module is for transport/infrastructure concerns that should apply to
//! most (or all) routes, regardless of API version.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Global timeouts
//! - Rate limiting (load-shed + buffer + rate limit)
//! - Panic containment (masked 500, never an empty reply)

use std::any::Any;
use std::convert::Infallible;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::Request;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::load_shed::LoadShedLayer;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

// Matches the original deployment's JSON body cap.
const BODY_LIMIT_BYTES: usize = 10 * 1024;

/// The finished application: the router wrapped in the stateful outer stack.
pub type AppService = BoxCloneSyncService<Request, Response, Infallible>;

/// Apply HTTP-level middleware to the given Router.
///
/// Layer-level failures (timeout, shed) are converted to classified errors so
/// every response this service produces has the same shape.
pub fn apply(router: Router, config: &Config) -> AppService {
    let request_id_header = HeaderName::from_static("x-request-id");

    // These layers hold no state across requests and can live on the Router.
    let router = router.layer(
        ServiceBuilder::new()
            // Generate a request id if missing, then propagate it to the response.
            .layer(SetRequestIdLayer::new(
                request_id_header.clone(),
                MakeRequestUuid,
            ))
            .layer(PropagateRequestIdLayer::new(request_id_header))
            // Limit request body size (protects against accidental/hostile large payloads).
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
            // Access log / tracing for all requests.
            .layer(TraceLayer::new_for_http())
            // Innermost so a panicking handler cannot take the buffer worker down.
            .layer(CatchPanicLayer::custom(handle_panic)),
    );

    // The limiter and its guards must wrap the finished router exactly once:
    // attached via Router::layer they are rebuilt per request and no rate
    // state survives between calls.
    let svc = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(classify_layer_error))
        // RateLimit is not Clone; Buffer makes the stack shareable per connection.
        .layer(BufferLayer::new(1024))
        // Shed immediately when the rate limiter is saturated instead of queueing.
        .layer(LoadShedLayer::new())
        .layer(RateLimitLayer::new(
            config.rate_limit_max,
            config.rate_limit_window,
        ))
        // Bound request time (protects against hanging upstreams / slow clients).
        .layer(TimeoutLayer::new(config.request_timeout))
        .service(router);

    BoxCloneSyncService::new(svc)
}

async fn classify_layer_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::RequestTimeout
    } else if err.is::<tower::load_shed::error::Overloaded>() {
        AppError::TooManyRequests
    } else {
        tracing::error!(error = %err, "middleware stack failure");
        AppError::Internal
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = %detail, "request handler panicked");

    AppError::Internal.into_response()
}
