//! Sync command - force a full wallet resync from the daemon.

use crate::commands::fetch_state;
use crate::config::ClientConfig;
use crate::wallet::Wallet;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let Some(client) = config.client() else {
        bail!("sync needs an account token; the wallet is in local mode");
    };

    let mut wallet = Wallet::load();
    let dropped = wallet.pending_count();

    match fetch_state(&client).await {
        Ok((balance, transactions)) => {
            wallet.resync(balance, transactions);
            wallet.save()?;
            println!(
                "  Synced: {} tokens, {} transactions cached",
                wallet.balance.to_string().bold(),
                wallet.entries.len()
            );
            if dropped > 0 {
                println!("  Reconciled {} pending entr(ies) against the server.", dropped);
            }
        }
        Err(e) => {
            wallet.mark_local();
            let _ = wallet.save();
            println!("  {} {}", "sync failed:".yellow(), e);
            println!("  Keeping cached state ({} tokens).", wallet.balance);
        }
    }

    Ok(())
}
