//! HTTP server for tallyd

use crate::config::DaemonConfig;
use crate::routes;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tally_common::LedgerDb;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// The ledger store. Short synchronous calls behind one lock; SQLite
    /// serializes writers anyway.
    pub ledger: Mutex<LedgerDb>,
    pub config: DaemonConfig,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(ledger: LedgerDb, config: DaemonConfig) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            config,
            start_time: Instant::now(),
        }
    }
}

/// Build the full API router (shared with the route tests)
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::token_routes())
        .merge(routes::shop_routes())
        .merge(routes::admin_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("  Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
