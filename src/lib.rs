//! Subscribers API: REST backend for subscriber records on PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{load_from_file, AppConfig};
pub use error::{AppError, ConfigError};
pub use model::{NewSubscriber, Subscriber, SubscriberChanges, SubscriberField};
pub use routes::{app, common_routes, subscriber_routes};
pub use service::{PgSubscriberStore, SubscriberStore};
pub use state::AppState;
