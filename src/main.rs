use std::time::Duration;

use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use gazette_backend::{cache::PageCache, config::settings::Settings, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::new();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    info!("database connected");

    sqlx::migrate!().run(&pool).await?;

    let page_cache = PageCache::new(Duration::from_secs(settings.index_cache_ttl_secs));

    let app_state = AppState {
        pool,
        settings: settings.clone(),
        page_cache,
    };

    let app = router(app_state);

    info!("Server running on http://localhost:{}", settings.port);

    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
