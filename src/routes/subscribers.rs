//! Subscriber routes under the configured resource segment.

use crate::handlers::subscribers::{activate, create, delete as delete_handler, list, retrieve, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn subscriber_routes(state: AppState, resource: &str) -> Router {
    Router::new()
        .route(&format!("/{}", resource), get(list).post(create))
        .route(
            &format!("/{}/:index", resource),
            get(retrieve).put(update).patch(activate).delete(delete_handler),
        )
        .with_state(state)
}
