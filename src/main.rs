use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cluster_broker::config::{Config, InventoryKind};
use cluster_broker::db::Store;
use cluster_broker::events::{EventSink, TracingSink};
use cluster_broker::matcher::Matcher;
use cluster_broker::refresher::RegistryRefresher;
use cluster_broker::registry::{InventorySource, RegistryHandle, StaticInventory};
use cluster_broker::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cluster_broker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting ClusterBroker");
    tracing::info!("Inventory: {:?}", cfg.inventory_source);
    tracing::info!("Memory policy: {}", cfg.memory_policy);
    tracing::info!("Listen: {}", cfg.listen_addr);

    let events: Arc<dyn EventSink> = Arc::new(TracingSink);

    // Initialize inventory source
    let inventory: Arc<dyn InventorySource> = match cfg.inventory_source {
        InventoryKind::Static => Arc::new(StaticInventory::demo()),
        InventoryKind::Sqlite => {
            let store = Store::with_pool_size(&cfg.db_path, cfg.db_max_connections).await?;
            tracing::info!(
                "Database initialized: {} (pool_size={})",
                cfg.db_path,
                cfg.db_max_connections
            );
            Arc::new(store)
        }
    };

    // Load the first registry snapshot
    let registry =
        RegistryHandle::load(inventory.as_ref(), cfg.inventory_timeout(), events.clone()).await?;

    // Start periodic refresh
    let mut refresher = cfg.refresh_interval().map(|every| {
        let mut r = RegistryRefresher::new(
            registry.clone(),
            inventory.clone(),
            every,
            cfg.inventory_timeout(),
        );
        r.start();
        r
    });

    let matcher = Matcher::new(cfg.memory_policy, events.clone());

    // Create app state
    let state = Arc::new(AppState {
        config: cfg.clone(),
        registry,
        matcher,
        inventory,
        events,
    });

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("ClusterBroker listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(r) = refresher.as_mut() {
        r.stop();
    }
    tracing::info!("ClusterBroker shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
