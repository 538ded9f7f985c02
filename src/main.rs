use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursereq::api::router;
use coursereq::db::memory::MemoryStore;
use coursereq::notify::{NoopNotifier, NotificationSink, NotifyConfig, WebhookNotifier};
use coursereq::services::UserService;
use coursereq::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "coursereq=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = MemoryStore::new();
    let collections = store.collections();

    // Users and courses are provisioned out-of-band; a seed file stands
    // in for that process.
    if let Ok(seed_file) = std::env::var("SEED_FILE") {
        store.seed_from_file(Path::new(&seed_file)).await?;
        info!("seeded directory store from {}", seed_file);
    }

    let notifier: Arc<dyn NotificationSink> = match NotifyConfig::new_from_env() {
        Ok(config) => Arc::new(WebhookNotifier::new(
            config,
            UserService::new(collections.clone()),
        )?),
        Err(e) => {
            warn!("notifications disabled: {}", e);
            Arc::new(NoopNotifier)
        }
    };

    let state = AppState {
        collections,
        notifier,
    };

    let app = router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
