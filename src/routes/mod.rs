//! Route registration and the middleware stack.

mod common;
mod subscribers;

pub use common::common_routes;
pub use subscribers::subscriber_routes;

use crate::error::AppError;
use crate::state::AppState;
use axum::{error_handling::HandleErrorLayer, http::Uri, BoxError, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Maps errors raised by the middleware stack onto the JSON error body.
fn middleware_error(request_timeout: Duration, err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout(request_timeout)
    } else {
        AppError::Middleware(err.to_string())
    }
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::UnknownRoute(uri.path().to_string())
}

/// Full application router. Requests exceeding `request_timeout` are dropped
/// (with any in-flight storage call) and answered with 408.
pub fn app(state: AppState, resource: &str, request_timeout: Duration) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(subscriber_routes(state, resource))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(request_timeout, err)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}
