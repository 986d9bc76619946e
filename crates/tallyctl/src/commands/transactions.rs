//! Transactions command - recent ledger history, cached or live.

use crate::commands::{format_signed, refresh_wallet, THIN_SEP};
use crate::config::ClientConfig;
use crate::wallet::{EntryState, Wallet};
use anyhow::Result;
use owo_colors::OwoColorize;

pub async fn run(config: &ClientConfig, limit: usize) -> Result<()> {
    let mut wallet = Wallet::load();
    refresh_wallet(config, &mut wallet).await;
    let _ = wallet.save();

    println!();
    println!("{}", "  Recent Transactions".bold());
    println!("{}", THIN_SEP);

    if wallet.entries.is_empty() {
        println!("  No transactions yet.");
        println!();
        return Ok(());
    }

    for entry in wallet.entries.iter().take(limit) {
        let tx = &entry.transaction;
        let amount = if tx.amount >= 0 {
            format_signed(tx.amount).green().to_string()
        } else {
            format_signed(tx.amount).red().to_string()
        };
        let marker = match entry.state {
            EntryState::Confirmed => "",
            EntryState::Pending => " (pending)",
            EntryState::RolledBack => " (rolled back)",
        };
        println!(
            "  {}  {:>8}  {}{}",
            tx.format_created_at(),
            amount,
            tx.reason,
            marker.dimmed()
        );
    }
    println!();

    Ok(())
}
