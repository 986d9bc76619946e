//! Admin commands - circulation stats, shop stats, manual awards.
//!
//! All of these hit admin routes and need the admin token from the config
//! file.

use crate::client::TallydClient;
use crate::commands::{format_signed, THIN_SEP};
use crate::config::ClientConfig;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;

fn admin_client(config: &ClientConfig) -> Result<TallydClient> {
    match config.admin_client() {
        Some(client) => Ok(client),
        None => bail!("admin commands need admin_token in the config file"),
    }
}

pub async fn run_stats(config: &ClientConfig) -> Result<()> {
    let client = admin_client(config)?;
    let resp = client.admin_stats().await?;
    let stats = resp.stats;

    println!();
    println!("{}", "  Token Circulation".bold());
    println!("{}", THIN_SEP);
    println!();

    println!("{}", "[CIRCULATION]".cyan());
    println!("  In circulation:  {}", stats.total_circulation);
    println!("  Total earned:    {}", stats.total_earned);
    println!("  Total spent:     {}", stats.total_spent);
    println!("  Transactions:    {}", stats.total_transactions);
    println!("  Accounts:        {}", stats.active_accounts);
    println!();

    println!("{}", "[TOP EARNERS]".cyan());
    if stats.top_earners.is_empty() {
        println!("  n/a");
    }
    for earner in &stats.top_earners {
        println!("  {:<24} {}", earner.account, earner.earned);
    }
    println!();

    println!("{}", "[LAST 7 DAYS]".cyan());
    for day in &stats.daily_activity {
        println!(
            "  {}  +{:<7} -{:<7} {} tx",
            day.date, day.awarded, day.redeemed, day.transactions
        );
    }
    println!();

    println!("{}", "[RECENT]".cyan());
    if stats.recent_transactions.is_empty() {
        println!("  n/a");
    }
    for tx in &stats.recent_transactions {
        println!(
            "  {}  {:>8}  {:<16} {}",
            tx.format_created_at(),
            format_signed(tx.amount),
            tx.account,
            tx.reason
        );
    }
    println!();

    Ok(())
}

pub async fn run_shop_stats(config: &ClientConfig) -> Result<()> {
    let client = admin_client(config)?;
    let resp = client.shop_admin_stats().await?;
    let stats = resp.stats;

    println!();
    println!("{}", "  Shop Statistics".bold());
    println!("{}", THIN_SEP);
    println!();

    println!("{}", "[CATALOG]".cyan());
    println!("  Items:           {} ({} active)", stats.total_items, stats.active_items);
    println!("  Purchases:       {}", stats.total_purchases);
    println!("  Tokens spent:    {}", stats.tokens_spent);
    println!();

    println!("{}", "[TOP ITEMS]".cyan());
    if stats.top_items.is_empty() {
        println!("  n/a");
    }
    for item in &stats.top_items {
        println!("  {:<38} {} sold", item.name, item.purchases);
    }
    println!();

    Ok(())
}

pub async fn run_award(
    config: &ClientConfig,
    account: &str,
    amount: i64,
    reason: &str,
) -> Result<()> {
    let client = admin_client(config)?;
    let resp = client.award_user(account, amount, reason).await?;

    println!(
        "  +{} tokens to {} ({}) - new balance {}",
        amount,
        account.bold(),
        reason,
        resp.balance
    );
    Ok(())
}

pub async fn run_transactions(config: &ClientConfig, account: &str) -> Result<()> {
    let client = admin_client(config)?;
    let resp = client.user_transactions(account).await?;

    println!();
    println!("{}", format!("  Transactions for {}", account).bold());
    println!("{}", THIN_SEP);

    if resp.transactions.is_empty() {
        println!("  No transactions.");
    }
    for tx in &resp.transactions {
        println!(
            "  {}  {:>8}  {}",
            tx.format_created_at(),
            format_signed(tx.amount),
            tx.reason
        );
    }
    println!();

    Ok(())
}
