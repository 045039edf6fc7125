//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Echo of a written record.
#[derive(Serialize)]
pub struct Update<T> {
    pub message: &'static str,
    pub updates: T,
}

#[derive(Serialize)]
pub struct Message {
    pub status: &'static str,
    pub details: String,
}

pub fn record_created<T: Serialize>(data: T) -> (StatusCode, Json<Update<T>>) {
    (
        StatusCode::CREATED,
        Json(Update {
            message: "Record created",
            updates: data,
        }),
    )
}

pub fn record_updated<T: Serialize>(data: T) -> (StatusCode, Json<Update<T>>) {
    (
        StatusCode::OK,
        Json(Update {
            message: "Record updated",
            updates: data,
        }),
    )
}

pub fn success_message(details: String) -> (StatusCode, Json<Message>) {
    (
        StatusCode::OK,
        Json(Message {
            status: "success",
            details,
        }),
    )
}
