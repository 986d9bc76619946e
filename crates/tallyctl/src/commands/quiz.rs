//! Quiz command - record a quiz score and collect the reward.
//!
//! The token amount comes from the shared reward rules, so the optimistic
//! wallet entry matches what the daemon will grant. XP and level only exist
//! server-side and are shown when the call succeeds.

use crate::config::ClientConfig;
use crate::wallet::Wallet;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use tally_common::rewards;
use tally_common::TransactionKind;

pub async fn run(config: &ClientConfig, percentage: u32) -> Result<()> {
    if percentage > 100 {
        bail!("percentage must be between 0 and 100");
    }

    let tokens = rewards::tokens_for_quiz(percentage);

    let mut wallet = Wallet::load();
    let pending_id = wallet.apply_pending(
        &config.account_name(),
        TransactionKind::Award,
        tokens,
        "Quiz completed",
    );
    wallet.save()?;

    match config.client() {
        None => {
            wallet.confirm_local(&pending_id);
            wallet.save()?;
            println!(
                "  Quiz at {}%: +{} tokens [local]",
                percentage,
                tokens.to_string().green().bold()
            );
        }
        Some(client) => match client.quiz(percentage).await {
            Ok(resp) => {
                wallet.confirm(&pending_id, resp.transaction, resp.balance);
                wallet.save()?;
                println!(
                    "  Quiz at {}%: +{} tokens, +{} XP (level {})",
                    percentage,
                    resp.tokens_earned.to_string().green().bold(),
                    resp.xp_earned,
                    resp.level
                );
            }
            Err(e) => {
                wallet.mark_local();
                wallet.save()?;
                eprintln!("  {} {}", "not confirmed:".yellow(), e);
            }
        },
    }

    println!("  Balance: {} tokens", wallet.balance.to_string().bold());
    Ok(())
}
