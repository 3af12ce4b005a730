use calorie_tracker::{
    ledger::trace_change, router, AppState, CalorieLedger, Config, FileStore, PersistenceStore,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store = FileStore::open(&config.data_path)?;
    info!("using data file {}", store.path().display());

    let mut ledger =
        CalorieLedger::with_default_limit(PersistenceStore::new(store), config.default_calorie_limit);
    ledger.subscribe(trace_change);
    ledger.initialize()?;

    let app = router(AppState::new(ledger));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
