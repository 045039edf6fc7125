//! Subscriber store: trait seam and PostgreSQL implementation.

mod subscribers;
pub use subscribers::{PgSubscriberStore, SubscriberStore};
