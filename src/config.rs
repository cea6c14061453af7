use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Passwords given to the two bootstrap accounts when the user list is empty.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub librarian_password: String,
    pub borrower_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "library-desk".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "library-desk-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(120),
        };
        let seed = SeedConfig {
            librarian_password: std::env::var("SEED_LIBRARIAN_PASSWORD")
                .unwrap_or_else(|_| "librarian123".into()),
            borrower_password: std::env::var("SEED_BORROWER_PASSWORD")
                .unwrap_or_else(|_| "borrower123".into()),
        };
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("db.json"));
        let static_dir = std::env::var("STATIC_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Ok(Self {
            data_file,
            static_dir,
            jwt,
            seed,
        })
    }
}
