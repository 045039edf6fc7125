//! Shared application state for all routes.

use crate::service::SubscriberStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriberStore>,
}

impl AppState {
    pub fn new(store: impl SubscriberStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
