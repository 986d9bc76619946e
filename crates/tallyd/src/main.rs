//! Tally Daemon - token ledger service
//!
//! Owns the ledger database and serves the token, shop, and admin API
//! consumed by tallyctl and the web frontends.

use anyhow::Result;
use tallyd::config::DaemonConfig;
use tallyd::server::{self, AppState};
use tally_common::LedgerDb;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Tally Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = DaemonConfig::load();
    let ledger = LedgerDb::open_at(&config.db_path)?;
    info!("Ledger database ready at {}", config.db_path);

    if !config.admin_enabled() {
        info!("No admin token configured; admin routes disabled");
    }

    server::run(AppState::new(ledger, config)).await
}
