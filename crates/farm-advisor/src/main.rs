mod config;
mod error;
mod loader;
mod routes;

use std::sync::Arc;

use advisor_core::advisor::Advisor;
use advisor_core::store::EntryStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting farm advisor");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        knowledge = %config.knowledge_path.display(),
        listen = %config.listen_addr,
        history_capacity = config.history_capacity,
        "configuration loaded"
    );

    // 2. Read and validate the knowledge base
    let knowledge = loader::load_knowledge(&config.knowledge_path)?;
    let (store, report) = EntryStore::load(knowledge.records);
    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        categories = store.categories().len(),
        fingerprint = %knowledge.fingerprint,
        "knowledge base loaded"
    );

    // 3. Build the advisor and serve
    let advisor = Arc::new(Advisor::new(
        store,
        knowledge.fallbacks,
        config.history_capacity,
    ));
    let state = AppState {
        advisor,
        knowledge_path: config.knowledge_path.clone(),
        fingerprint: Arc::new(tokio::sync::RwLock::new(knowledge.fingerprint)),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(addr = %config.listen_addr, "farm advisor listening");
    axum::serve(listener, app).await?;

    Ok(())
}
