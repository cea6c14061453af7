use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::auth::repo_types::User;
use crate::books::repo_types::Book;
use crate::borrows::dto::BorrowView;
use crate::borrows::repo_types::BorrowRecord;
use crate::db::Database;
use crate::error::ApiError;

pub const LOAN_PERIOD: Duration = Duration::days(14);

/// Librarians see every record; everyone else sees their own.
pub fn list_for(db: &Database, caller: &AuthUser) -> Vec<BorrowView> {
    db.borrows
        .iter()
        .filter(|r| caller.is_librarian() || r.user_id == caller.id)
        .map(|r| BorrowView {
            record: r.clone(),
            book: db.books.iter().find(|b| b.id == r.book_id).cloned(),
            user: User::find_by_id(db, r.user_id).map(|u| u.email.clone()),
        })
        .collect()
}

pub fn borrow_book(
    db: &mut Database,
    book_id: Uuid,
    user_id: Uuid,
    now: OffsetDateTime,
) -> Result<BorrowRecord, ApiError> {
    let book = Book::find_mut(db, book_id).ok_or_else(|| ApiError::not_found("Book not found"))?;
    if book.copies_available <= 0 {
        return Err(ApiError::bad_request("No copies available"));
    }
    book.copies_available -= 1;

    let record = BorrowRecord {
        id: Uuid::new_v4(),
        book_id,
        user_id,
        borrowed_at: now,
        due_at: now + LOAN_PERIOD,
        returned_at: None,
    };
    db.borrows.push(record.clone());
    Ok(record)
}

pub fn return_book(
    db: &mut Database,
    record_id: Uuid,
    caller: &AuthUser,
    now: OffsetDateTime,
) -> Result<BorrowRecord, ApiError> {
    let record = db
        .borrows
        .iter_mut()
        .find(|r| r.id == record_id)
        .ok_or_else(|| ApiError::not_found("Record not found"))?;
    if record.user_id != caller.id && !caller.is_librarian() {
        return Err(ApiError::Forbidden);
    }
    if !record.is_open() {
        return Err(ApiError::bad_request("Already returned"));
    }
    record.returned_at = Some(now);
    let record = record.clone();

    // The book may have been removed since; the record still closes.
    if let Some(book) = Book::find_mut(db, record.book_id) {
        if book.copies_available < book.copies_total {
            book.copies_available += 1;
        }
    }
    Ok(record)
}
