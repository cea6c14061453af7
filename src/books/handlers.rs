use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::{AuthUser, Librarian},
    books::{
        dto::{CreateBookRequest, UpdateBookRequest},
        repo_types::Book,
        services,
    },
    db::parse_id,
    error::{ApiError, ApiJson},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/books", get(list_books))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/books", post(create_book))
        .route("/books/:id", put(update_book).delete(delete_book))
}

#[instrument(skip(state, _auth))]
pub async fn list_books(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.read().await?.books))
}

#[instrument(skip(state, librarian, body), fields(user_id = %librarian.0.id))]
pub async fn create_book(
    State(state): State<AppState>,
    librarian: Librarian,
    ApiJson(body): ApiJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let book = state
        .mutate(|db| services::create_book(db, body, OffsetDateTime::now_utc()))
        .await?;
    info!(book_id = %book.id, title = %book.title, copies = book.copies_total, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

#[instrument(skip(state, librarian, body), fields(user_id = %librarian.0.id))]
pub async fn update_book(
    State(state): State<AppState>,
    librarian: Librarian,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateBookRequest>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Not found"))?;
    let book = state
        .mutate(|db| services::update_book(db, id, body, OffsetDateTime::now_utc()))
        .await?;
    info!(book_id = %book.id, copies_total = book.copies_total, copies_available = book.copies_available, "book updated");
    Ok(Json(book))
}

#[instrument(skip(state, librarian), fields(user_id = %librarian.0.id))]
pub async fn delete_book(
    State(state): State<AppState>,
    librarian: Librarian,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::not_found("Not found"))?;
    let book = state.mutate(|db| services::delete_book(db, id)).await?;
    info!(book_id = %book.id, title = %book.title, "book deleted");
    Ok(Json(book))
}
