use std::sync::Arc;
use std::time::Duration;

use bookmatch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, InMemoryPreferenceStore, PreferenceStore, RedisPreferenceStore},
    models::Catalog,
};
use tracing_subscriber::EnvFilter;

/// How often idle sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookmatch_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };

    let store: Arc<dyn PreferenceStore> = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            Arc::new(RedisPreferenceStore::connect(client).await?)
        }
        None => {
            tracing::warn!("REDIS_URL not set, preferences will not survive a restart");
            Arc::new(InMemoryPreferenceStore::new())
        }
    };

    if config.recommendation_seed.is_some() {
        tracing::info!("Recommendation sampling is seeded and repeatable");
    }

    let session_ttl = config.session_idle_ttl();
    let state =
        AppState::new(catalog, store, config.recommendation_seed).with_session_ttl(session_ttl);
    let sweep_every = SESSION_SWEEP_INTERVAL.min(session_ttl.max(Duration::from_secs(1)));
    state.spawn_session_sweeper(sweep_every);

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
