//! HTTP handlers for the subscriber resource.

pub mod subscribers;
pub use subscribers::*;
