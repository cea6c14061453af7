use axum::{extract::State, Json};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{auth::extractors::AuthUser, db::Database, error::ApiError, state::AppState};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_books: usize,
    pub available_count: i64,
    pub borrowed_count: usize,
    pub my_borrowed: usize,
}

pub fn compute(db: &Database, user_id: Uuid) -> Stats {
    let open = || db.borrows.iter().filter(|r| r.is_open());
    Stats {
        total_books: db.books.len(),
        available_count: db.books.iter().map(|b| b.copies_available).sum(),
        borrowed_count: open().count(),
        my_borrowed: open().filter(|r| r.user_id == user_id).count(),
    }
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Stats>, ApiError> {
    let db = state.read().await?;
    Ok(Json(compute(&db, auth.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::repo_types::Book;
    use crate::borrows::repo_types::BorrowRecord;
    use time::{Duration, OffsetDateTime};

    fn book(available: i64) -> Book {
        let now = OffsetDateTime::now_utc();
        Book {
            id: Uuid::new_v4(),
            title: "T".into(),
            author: "A".into(),
            isbn: String::new(),
            description: String::new(),
            copies_total: 5,
            copies_available: available,
            created_at: now,
            updated_at: now,
        }
    }

    fn record(book_id: Uuid, user_id: Uuid, returned: bool) -> BorrowRecord {
        let now = OffsetDateTime::now_utc();
        BorrowRecord {
            id: Uuid::new_v4(),
            book_id,
            user_id,
            borrowed_at: now,
            due_at: now + Duration::days(14),
            returned_at: returned.then_some(now),
        }
    }

    #[test]
    fn counts_match_records() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let a = book(2);
        let b = book(0);
        let db = Database {
            borrows: vec![
                record(a.id, me, false),
                record(a.id, me, true),
                record(b.id, other, false),
                record(b.id, me, false),
            ],
            books: vec![a, b],
            ..Default::default()
        };

        assert_eq!(
            compute(&db, me),
            Stats {
                total_books: 2,
                available_count: 2,
                borrowed_count: 3,
                my_borrowed: 2,
            }
        );
    }

    #[test]
    fn empty_database_is_all_zero() {
        let stats = compute(&Database::default(), Uuid::new_v4());
        assert_eq!(stats.total_books + stats.borrowed_count + stats.my_borrowed, 0);
        assert_eq!(stats.available_count, 0);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("myBorrowed").is_some());
    }
}
