//! Subscriber handlers: list, create, retrieve, update, activate, delete.
//! Inputs arrive as query-string pairs; the index comes from the path.

use crate::error::AppError;
use crate::model::{NewSubscriber, SubscriberChanges, SubscriberField};
use crate::response::{record_created, record_updated, success_message};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

pub(crate) fn parse_index(index_str: &str) -> Result<u16, AppError> {
    index_str
        .parse::<u16>()
        .map_err(|e| AppError::MalformedInput(format!("invalid index '{}': {}", index_str, e)))
}

pub(crate) fn parse_activation_flag(params: &HashMap<String, String>) -> Result<bool, AppError> {
    match params.get(SubscriberField::ActivationFlag.key()).map(String::as_str) {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        _ => Err(AppError::MalformedInput(
            "Please set the activation_flag to 'true' or 'false'.".into(),
        )),
    }
}

fn require_parameters(method: &str, params: &HashMap<String, String>) -> Result<(), AppError> {
    if params.is_empty() {
        return Err(AppError::MissingParameters(format!(
            "HTTP command {} without providing parameters is not allowed. Please provide an acceptable HTTP command.",
            method
        )));
    }
    Ok(())
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = state.store.list().await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    require_parameters("POST", &params)?;
    let candidate = NewSubscriber::from_query(&params);
    let row = state.store.create(&candidate).await?;
    Ok(record_created(row))
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(index_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let index = parse_index(&index_str)?;
    let row = state.store.retrieve(index).await?;
    Ok(Json(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(index_str): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let index = parse_index(&index_str)?;
    require_parameters("PUT", &params)?;
    let changes = SubscriberChanges::from_query(&params);
    let row = state.store.update(index, &changes).await?;
    Ok(record_updated(row))
}

pub async fn activate(
    State(state): State<AppState>,
    Path(index_str): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let index = parse_index(&index_str)?;
    let flag = parse_activation_flag(&params)?;
    if state.store.activate(index, flag).await? == 0 {
        return Err(AppError::NotFound(index));
    }
    let verb = if flag { "activated" } else { "deactivated" };
    Ok(success_message(format!("Record #{} {}.", index, verb)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(index_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let index = parse_index(&index_str)?;
    state.store.delete(index).await?;
    Ok(success_message(format!("Deleted record of subscriber #{}", index)))
}
