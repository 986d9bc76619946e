//! Balance command - current token balance, live when possible.

use crate::commands::{refresh_wallet, THIN_SEP};
use crate::config::ClientConfig;
use crate::wallet::{SyncMode, Wallet};
use anyhow::Result;
use owo_colors::OwoColorize;

pub async fn run(config: &ClientConfig, json: bool) -> Result<()> {
    let mut wallet = Wallet::load();
    refresh_wallet(config, &mut wallet).await;
    let _ = wallet.save();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "balance": wallet.balance,
                "mode": wallet.mode,
                "pending": wallet.pending_count(),
            })
        );
        return Ok(());
    }

    println!();
    println!("{}", "  Tally Wallet".bold());
    println!("{}", THIN_SEP);

    println!("  Balance:   {} tokens", wallet.balance.to_string().bold());

    let mode = match wallet.mode {
        SyncMode::Synced => "synced".green().to_string(),
        SyncMode::Local => "local".yellow().to_string(),
    };
    println!("  Mode:      {}", mode);

    if wallet.pending_count() > 0 {
        println!("  Pending:   {} unconfirmed", wallet.pending_count());
    }
    println!();

    Ok(())
}
