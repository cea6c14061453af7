mod app;
mod auth;
mod books;
mod borrows;
mod config;
mod db;
mod error;
mod state;
mod stats;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "library_desk=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init()?;
    tracing::info!(data_file = %app_state.config.data_file.display(), "using data file");

    db::bootstrap(app_state.store.as_ref(), &app_state.config.seed).await?;

    if let Some(dir) = &app_state.config.static_dir {
        tracing::info!(static_dir = %dir.display(), "serving front end");
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
