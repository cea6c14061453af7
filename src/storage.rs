use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::error::Category;
use tracing::{debug, warn};

use crate::db::Database;

/// Whole-document persistence: every load reads everything, every save
/// rewrites everything.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self) -> anyhow::Result<Database>;
    async fn save(&self, db: &Database) -> anyhow::Result<()>;
}

/// Pretty-printed JSON document on the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "db.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self) -> anyhow::Result<Database> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file missing; starting empty");
                return Ok(Database::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        match serde_json::from_str(&raw) {
            Ok(db) => Ok(db),
            // Only text that is not JSON at all falls back to empty; a
            // well-formed document with unexpected values must not be
            // overwritten by the next save.
            Err(e) if matches!(e.classify(), Category::Syntax | Category::Eof) => {
                warn!(path = %self.path.display(), error = %e, "data file unreadable; starting empty");
                Ok(Database::default())
            }
            Err(e) => Err(e).with_context(|| format!("decode {}", self.path.display())),
        }
    }

    async fn save(&self, db: &Database) -> anyhow::Result<()> {
        let body = serde_json::to_vec_pretty(db).context("serialize database")?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        debug!(path = %self.path.display(), "data file written");
        Ok(())
    }
}

/// Keeps the document in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: tokio::sync::RwLock<Database>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new(db: Database) -> Self {
        Self {
            inner: tokio::sync::RwLock::new(db),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> anyhow::Result<Database> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, db: &Database) -> anyhow::Result<()> {
        *self.inner.write().await = db.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::repo_types::Book;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("library_desk_{}_{}", tag, Uuid::new_v4()))
            .join("db.json")
    }

    fn sample_book() -> Book {
        let now = OffsetDateTime::now_utc();
        Book {
            id: Uuid::new_v4(),
            title: "The Left Hand of Darkness".into(),
            author: "Ursula K. Le Guin".into(),
            isbn: "978-0441478125".into(),
            description: String::new(),
            copies_total: 3,
            copies_available: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let store = JsonFileStore::new(temp_file("missing"));
        let db = store.load().await.expect("load");
        assert!(db.users.is_empty() && db.books.is_empty() && db.borrows.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_books() {
        let path = temp_file("roundtrip");
        let store = JsonFileStore::new(&path);
        let book = sample_book();
        let db = Database {
            books: vec![book.clone()],
            ..Default::default()
        };
        store.save(&db).await.expect("save");

        let loaded = store.load().await.expect("load");
        assert_eq!(loaded.books, vec![book]);
        assert!(!store.temp_path().exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"copiesAvailable\": 3"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = temp_file("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let db = JsonFileStore::new(&path).load().await.expect("load");
        assert!(db.books.is_empty());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn type_mismatch_is_an_error_and_file_survives_writes() {
        let path = temp_file("mismatch");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let raw = r#"{
          "users": [],
          "books": [
            { "id": "6f1c8f8e-2b1c-4b5e-8f3a-0a0a0a0a0a0a", "title": "Emma", "author": "Jane Austen",
              "isbn": "", "description": "", "copiesTotal": null, "copiesAvailable": 1,
              "createdAt": "2024-05-01T10:00:00.000Z", "updatedAt": "2024-05-01T10:00:00.000Z" }
          ],
          "borrows": []
        }"#;
        std::fs::write(&path, raw).unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().await.is_err());

        let state = crate::state::AppState::with_store(std::sync::Arc::new(store));
        assert!(state.mutate(|_| Ok(())).await.is_err());

        let after = std::fs::read_to_string(&path).unwrap();
        assert!(after.contains("Emma"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
