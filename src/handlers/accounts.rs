//! Account CRUD handlers: list, create, read, update, delete.
//!
//! Bodies are extracted as `Result<Json<Value>, JsonRejection>` so a wrong
//! content type is rejected (415) before the body is parsed, and parse
//! failures (400) are rendered through the service error body.

use crate::error::AppError;
use crate::model::{Account, AccountData};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.store.find_all().await?;
    Ok(Json(accounts))
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let data = AccountData::from_value(&body)?;
    let account = state.store.create(&data).await?;
    tracing::info!(id = account.id, "account created");
    let location = format!("/accounts/{}", account.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(account),
    ))
}

pub async fn read_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("account {id} was not found")))?;
    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(body) = payload?;
    let data = AccountData::from_value(&body)?;
    let account = state.store.update(id, &data).await?;
    tracing::info!(id, "account updated");
    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    tracing::info!(id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}
