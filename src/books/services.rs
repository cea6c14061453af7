use time::OffsetDateTime;
use uuid::Uuid;

use crate::books::dto::{CreateBookRequest, UpdateBookRequest};
use crate::books::repo_types::Book;
use crate::db::Database;
use crate::error::ApiError;

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn create_book(
    db: &mut Database,
    req: CreateBookRequest,
    now: OffsetDateTime,
) -> Result<Book, ApiError> {
    let (Some(title), Some(author)) = (non_blank(req.title), non_blank(req.author)) else {
        return Err(ApiError::bad_request("title and author required"));
    };
    let copies = match req.copies {
        None | Some(0) => 1,
        Some(n) if n < 0 => return Err(ApiError::bad_request("copies must be a positive number")),
        Some(n) => n,
    };

    let book = Book {
        id: Uuid::new_v4(),
        title,
        author,
        isbn: req.isbn.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        copies_total: copies,
        copies_available: copies,
        created_at: now,
        updated_at: now,
    };
    db.books.push(book.clone());
    Ok(book)
}

/// Applies a partial update. A new `copiesTotal` shifts `copiesAvailable` by
/// the same delta, floored at zero.
pub fn update_book(
    db: &mut Database,
    id: Uuid,
    req: UpdateBookRequest,
    now: OffsetDateTime,
) -> Result<Book, ApiError> {
    let book = Book::find_mut(db, id).ok_or_else(|| ApiError::not_found("Not found"))?;
    if matches!(req.copies_total, Some(n) if n < 0) {
        return Err(ApiError::bad_request("copiesTotal must not be negative"));
    }

    if let Some(total) = req.copies_total {
        let delta = total - book.copies_total;
        book.copies_total = total;
        book.copies_available = (book.copies_available + delta).max(0);
    }
    if let Some(title) = req.title {
        book.title = title;
    }
    if let Some(author) = req.author {
        book.author = author;
    }
    if let Some(isbn) = req.isbn {
        book.isbn = isbn;
    }
    if let Some(description) = req.description {
        book.description = description;
    }
    book.updated_at = now;
    Ok(book.clone())
}

pub fn delete_book(db: &mut Database, id: Uuid) -> Result<Book, ApiError> {
    let idx = Book::position(db, id).ok_or_else(|| ApiError::not_found("Not found"))?;
    if Book::has_open_borrows(db, id) {
        return Err(ApiError::bad_request("Book has active borrow records"));
    }
    Ok(db.books.remove(idx))
}
