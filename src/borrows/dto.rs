use serde::Serialize;

use crate::books::repo_types::Book;
use crate::borrows::repo_types::BorrowRecord;

/// A borrow record joined with its book and the borrower's email.
#[derive(Debug, Clone, Serialize)]
pub struct BorrowView {
    #[serde(flatten)]
    pub record: BorrowRecord,
    pub book: Option<Book>,
    pub user: Option<String>,
}
