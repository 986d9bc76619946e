//! Award and redeem commands - the optimistic mutation path.
//!
//! The wallet is updated immediately; the network call (when a token is
//! configured) replaces the optimistic entry with the server-confirmed
//! transaction. A failed redeem resyncs from the daemon so the wallet never
//! keeps an overspend the server refused.

use crate::commands::fetch_state;
use crate::config::ClientConfig;
use crate::wallet::Wallet;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use tally_common::TransactionKind;

pub async fn run_award(config: &ClientConfig, amount: i64, reason: String) -> Result<()> {
    if amount <= 0 {
        bail!("amount must be a positive number of tokens");
    }

    let mut wallet = Wallet::load();
    let pending_id = wallet.apply_pending(
        &config.account_name(),
        TransactionKind::Award,
        amount,
        &reason,
    );
    wallet.save()?;

    match config.client() {
        None => {
            wallet.confirm_local(&pending_id);
            wallet.save()?;
            println!("  +{} tokens ({}) [local]", amount, reason);
        }
        Some(client) => match client.award(amount, &reason, None).await {
            Ok(resp) => {
                wallet.confirm(&pending_id, resp.transaction, resp.balance);
                wallet.save()?;
                println!("  +{} tokens ({})", amount, reason);
            }
            Err(e) => {
                // keep the optimistic entry; the next sync reconciles it
                wallet.mark_local();
                wallet.save()?;
                eprintln!("  {} {}", "not confirmed:".yellow(), e);
            }
        },
    }

    println!("  Balance: {} tokens", wallet.balance.to_string().bold());
    Ok(())
}

pub async fn run_redeem(config: &ClientConfig, amount: i64, reason: String) -> Result<()> {
    if amount <= 0 {
        bail!("amount must be a positive number of tokens");
    }

    let mut wallet = Wallet::load();
    if amount > wallet.balance {
        bail!(
            "insufficient tokens: balance is {}, tried to spend {}",
            wallet.balance,
            amount
        );
    }

    let pending_id = wallet.apply_pending(
        &config.account_name(),
        TransactionKind::Redeem,
        -amount,
        &reason,
    );
    wallet.save()?;

    match config.client() {
        None => {
            wallet.confirm_local(&pending_id);
            wallet.save()?;
            println!("  -{} tokens ({}) [local]", amount, reason);
        }
        Some(client) => match client.redeem(amount, &reason, None).await {
            Ok(resp) => {
                wallet.confirm(&pending_id, resp.transaction, resp.balance);
                wallet.save()?;
                println!("  -{} tokens ({})", amount, reason);
            }
            Err(e) => {
                eprintln!("  {} {}", "redeem failed:".yellow(), e);
                // undo the optimistic guess with a full resync; if the
                // daemon is gone too, roll back just this entry
                match fetch_state(&client).await {
                    Ok((balance, transactions)) => wallet.resync(balance, transactions),
                    Err(_) => {
                        wallet.rollback(&pending_id);
                        wallet.mark_local();
                    }
                }
                wallet.save()?;
            }
        },
    }

    println!("  Balance: {} tokens", wallet.balance.to_string().bold());
    Ok(())
}
