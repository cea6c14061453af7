use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    borrows::{dto::BorrowView, repo_types::BorrowRecord, services},
    db::parse_id,
    error::ApiError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/borrows", get(list_borrows))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/borrow/:book_id", post(borrow_book))
        .route("/return/:record_id", post(return_book))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, role = %auth.role))]
pub async fn list_borrows(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<BorrowView>>, ApiError> {
    let db = state.read().await?;
    Ok(Json(services::list_for(&db, &auth)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn borrow_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(book_id): Path<String>,
) -> Result<(StatusCode, Json<BorrowRecord>), ApiError> {
    let book_id = parse_id(&book_id).ok_or_else(|| ApiError::not_found("Book not found"))?;
    let record = state
        .mutate(|db| services::borrow_book(db, book_id, auth.id, OffsetDateTime::now_utc()))
        .await?;
    info!(record_id = %record.id, book_id = %record.book_id, borrower = %auth.email, "book borrowed");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn return_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(record_id): Path<String>,
) -> Result<Json<BorrowRecord>, ApiError> {
    let record_id =
        parse_id(&record_id).ok_or_else(|| ApiError::not_found("Record not found"))?;
    let record = state
        .mutate(|db| services::return_book(db, record_id, &auth, OffsetDateTime::now_utc()))
        .await?;
    info!(record_id = %record.id, book_id = %record.book_id, returned_by = %auth.email, "book returned");
    Ok(Json(record))
}
