//! Shop commands - browse the catalog, buy, and list purchases.

use crate::commands::THIN_SEP;
use crate::config::ClientConfig;
use crate::wallet::{EntryState, Wallet, WalletEntry};
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use tally_common::ItemKind;

pub async fn run_list(config: &ClientConfig) -> Result<()> {
    let client = config.public_client();
    let resp = match client.shop_items().await {
        Ok(resp) => resp,
        Err(e) => {
            println!("  Shop unavailable: {}", e.to_string().yellow());
            return Ok(());
        }
    };

    println!();
    println!("{}", "  Shop".bold());
    println!("{}", THIN_SEP);

    if resp.items.is_empty() {
        println!("  Nothing for sale right now.");
        println!();
        return Ok(());
    }

    for item in &resp.items {
        let stock = match item.stock {
            -1 => "unlimited".to_string(),
            0 => "sold out".red().to_string(),
            n => format!("{} left", n),
        };
        let kind = match item.kind {
            ItemKind::Permanent => " [one per account]",
            ItemKind::Consumable => "",
        };
        println!(
            "  {:<38} {:>5} tokens  ({}){}",
            item.name,
            item.price,
            stock,
            kind.dimmed()
        );
        if !item.description.is_empty() {
            println!("    {}", item.description.dimmed());
        }
        println!("    id: {}", item.id.dimmed());
    }
    println!();

    Ok(())
}

pub async fn run_buy(config: &ClientConfig, item: &str) -> Result<()> {
    let Some(client) = config.client() else {
        bail!("buying needs an account token; the wallet is in local mode");
    };

    match client.purchase(item).await {
        Ok(resp) => {
            println!(
                "  Bought {} for {} tokens",
                resp.purchase.item_name.bold(),
                resp.purchase.tokens_spent
            );
            println!("  Balance: {} tokens", resp.balance.to_string().bold());

            // fold the confirmed debit into the cache
            let mut wallet = Wallet::load();
            wallet.balance = resp.balance;
            wallet.entries.insert(
                0,
                WalletEntry {
                    state: EntryState::Confirmed,
                    transaction: resp.transaction,
                },
            );
            let _ = wallet.save();
        }
        Err(e) => {
            println!("  {}", e.to_string().yellow());
        }
    }

    Ok(())
}

pub async fn run_purchases(config: &ClientConfig) -> Result<()> {
    let Some(client) = config.client() else {
        bail!("purchase history needs an account token; the wallet is in local mode");
    };

    let resp = client.my_purchases().await?;

    println!();
    println!("{}", "  Purchases".bold());
    println!("{}", THIN_SEP);

    if resp.purchases.is_empty() {
        println!("  No purchases yet.");
    }
    for purchase in &resp.purchases {
        println!(
            "  {}  {:<38} {} tokens",
            chrono::DateTime::from_timestamp(purchase.created_at, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            purchase.item_name,
            purchase.tokens_spent
        );
    }
    println!();

    Ok(())
}
