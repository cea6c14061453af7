use uuid::Uuid;

use crate::books::repo_types::Book;
use crate::db::Database;

impl Book {
    pub fn position(db: &Database, id: Uuid) -> Option<usize> {
        db.books.iter().position(|b| b.id == id)
    }

    pub fn find_mut(db: &mut Database, id: Uuid) -> Option<&mut Book> {
        db.books.iter_mut().find(|b| b.id == id)
    }

    /// True while any unreturned borrow points at this book.
    pub fn has_open_borrows(db: &Database, id: Uuid) -> bool {
        db.borrows.iter().any(|r| r.book_id == id && r.is_open())
    }
}
