use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};
use crate::auth::services::hash_password;
use crate::books::repo_types::Book;
use crate::borrows::repo_types::BorrowRecord;
use crate::config::SeedConfig;
use crate::storage::Store;

/// The whole persisted dataset. Loaded and written as one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub borrows: Vec<BorrowRecord>,
}

/// Path ids that are not UUIDs can never match a stored record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Seeds the two default accounts when no users exist, then rewrites the file.
pub async fn bootstrap(store: &dyn Store, seed: &SeedConfig) -> anyhow::Result<()> {
    let mut db = store.load().await.context("load data file")?;

    if db.users.is_empty() {
        db.users = vec![
            User {
                id: Uuid::new_v4(),
                name: "Libby Librarian".into(),
                email: "librarian@example.com".into(),
                role: Role::Librarian,
                password_hash: hash_password(&seed.librarian_password)?,
            },
            User {
                id: Uuid::new_v4(),
                name: "Bora Borrower".into(),
                email: "borrower@example.com".into(),
                role: Role::Borrower,
                password_hash: hash_password(&seed.borrower_password)?,
            },
        ];
        info!("seeded default librarian and borrower accounts");
    }

    store.save(&db).await.context("write data file")?;
    Ok(())
}
