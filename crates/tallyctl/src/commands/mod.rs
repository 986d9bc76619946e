//! Command implementations for tallyctl.
//!
//! Every command works against the local wallet first and only talks to the
//! daemon when an account token is configured; a daemon outage degrades to
//! cached state instead of failing the command.

pub mod admin;
pub mod balance;
pub mod daily;
pub mod mutate;
pub mod quiz;
pub mod shop;
pub mod sync;
pub mod transactions;

use crate::client::TallydClient;
use crate::config::ClientConfig;
use crate::wallet::Wallet;
use anyhow::Result;
use tally_common::Transaction;

pub(crate) const THIN_SEP: &str = "------------------------------------------------------------";

/// Fetch the authoritative balance and history in one go
pub(crate) async fn fetch_state(client: &TallydClient) -> Result<(i64, Vec<Transaction>)> {
    let balance = client.balance().await?;
    let transactions = client.transactions().await?;
    Ok((balance.balance, transactions.transactions))
}

/// Try to refresh the wallet from the daemon. On failure the cached state
/// stands and the wallet drops to Local mode.
pub(crate) async fn refresh_wallet(config: &ClientConfig, wallet: &mut Wallet) {
    if let Some(client) = config.client() {
        match fetch_state(&client).await {
            Ok((balance, transactions)) => wallet.resync(balance, transactions),
            Err(_) => wallet.mark_local(),
        }
    }
}

/// "+25" / "-10" for display
pub(crate) fn format_signed(amount: i64) -> String {
    if amount >= 0 {
        format!("+{}", amount)
    } else {
        amount.to_string()
    }
}
