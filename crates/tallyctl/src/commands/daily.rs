//! Daily command - claim the daily login reward.
//!
//! The claim itself is server-side state (one per calendar day, streak
//! bookkeeping), so this command needs a configured account token.

use crate::commands::fetch_state;
use crate::config::ClientConfig;
use crate::wallet::Wallet;
use anyhow::Result;
use owo_colors::OwoColorize;

pub async fn run(config: &ClientConfig) -> Result<()> {
    let Some(client) = config.client() else {
        println!("  Daily rewards need an account token; the wallet is in local mode.");
        return Ok(());
    };

    match client.daily().await {
        Ok(resp) => {
            println!(
                "  +{} tokens! Streak: {} day(s) (longest {})",
                resp.tokens_earned.to_string().green().bold(),
                resp.streak.current,
                resp.streak.longest
            );
            println!("  Balance: {} tokens", resp.balance.to_string().bold());

            // fold the confirmed claim into the cache
            let mut wallet = Wallet::load();
            if let Ok((balance, transactions)) = fetch_state(&client).await {
                wallet.resync(balance, transactions);
            } else {
                wallet.balance = resp.balance;
            }
            let _ = wallet.save();
        }
        Err(e) => {
            println!("  {}", e.to_string().yellow());
        }
    }

    Ok(())
}
