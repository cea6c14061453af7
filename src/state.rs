use crate::config::AppConfig;
use crate::db::Database;
use crate::error::ApiError;
use crate::storage::{JsonFileStore, Store};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(JsonFileStore::new(config.data_file.clone())) as Arc<dyn Store>;
        Ok(Self::from_parts(config, store))
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn Store>) -> Self {
        Self {
            config,
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads a snapshot of the whole dataset.
    pub async fn read(&self) -> Result<Database, ApiError> {
        Ok(self.store.load().await?)
    }

    /// Runs one load-mutate-save cycle. Cycles within this process are
    /// serialised; nothing is written when `f` fails.
    pub async fn mutate<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Database) -> Result<T, ApiError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut db = self.store.load().await?;
        let out = f(&mut db)?;
        self.store.save(&db).await?;
        Ok(out)
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::with_store(Arc::new(crate::storage::MemoryStore::default()))
    }

    #[cfg(test)]
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let config = Arc::new(AppConfig {
            data_file: "unused.json".into(),
            static_dir: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            seed: crate::config::SeedConfig {
                librarian_password: "librarian123".into(),
                borrower_password: "borrower123".into(),
            },
        });
        Self::from_parts(config, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_mutation_writes_nothing() {
        let state = AppState::fake();
        let res: Result<(), ApiError> = state
            .mutate(|db| {
                db.users.clear();
                db.books.push(crate::books::repo_types::Book {
                    id: uuid::Uuid::new_v4(),
                    title: "Ghost".into(),
                    author: "Nobody".into(),
                    isbn: String::new(),
                    description: String::new(),
                    copies_total: 1,
                    copies_available: 1,
                    created_at: time::OffsetDateTime::now_utc(),
                    updated_at: time::OffsetDateTime::now_utc(),
                });
                Err(ApiError::bad_request("nope"))
            })
            .await;
        assert!(res.is_err());
        assert!(state.read().await.unwrap().books.is_empty());
    }

    #[tokio::test]
    async fn concurrent_mutations_do_not_lose_updates() {
        let state = AppState::fake();
        state
            .mutate(|db| {
                db.books.push(crate::books::repo_types::Book {
                    id: uuid::Uuid::new_v4(),
                    title: "Counter".into(),
                    author: "Anon".into(),
                    isbn: String::new(),
                    description: String::new(),
                    copies_total: 0,
                    copies_available: 0,
                    created_at: time::OffsetDateTime::now_utc(),
                    updated_at: time::OffsetDateTime::now_utc(),
                });
                Ok(())
            })
            .await
            .unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let state = state.clone();
                tokio::spawn(async move {
                    state
                        .mutate(|db| {
                            db.books[0].copies_total += 1;
                            Ok(())
                        })
                        .await
                })
            })
            .collect();
        for t in tasks {
            t.await.unwrap().unwrap();
        }
        assert_eq!(state.read().await.unwrap().books[0].copies_total, 20);
    }
}
