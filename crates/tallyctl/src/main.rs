//! Tally CLI - wallet client for the tally daemon.

use anyhow::Result;
use clap::Parser;
use tallyctl::cli::{AdminCommands, Cli, Commands, ShopCommands};
use tallyctl::commands;
use tallyctl::config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load();
    if let Some(server) = cli.server {
        config.server = server;
    }

    match cli.command {
        Commands::Balance { json } => commands::balance::run(&config, json).await,
        Commands::Transactions { limit } => commands::transactions::run(&config, limit).await,
        Commands::Award { amount, reason } => {
            commands::mutate::run_award(&config, amount, reason).await
        }
        Commands::Redeem { amount, reason } => {
            commands::mutate::run_redeem(&config, amount, reason).await
        }
        Commands::Daily => commands::daily::run(&config).await,
        Commands::Quiz { percentage } => commands::quiz::run(&config, percentage).await,
        Commands::Shop { action } => match action {
            ShopCommands::List => commands::shop::run_list(&config).await,
            ShopCommands::Buy { item } => commands::shop::run_buy(&config, &item).await,
            ShopCommands::Purchases => commands::shop::run_purchases(&config).await,
        },
        Commands::Sync => commands::sync::run(&config).await,
        Commands::Admin { action } => match action {
            AdminCommands::Stats => commands::admin::run_stats(&config).await,
            AdminCommands::ShopStats => commands::admin::run_shop_stats(&config).await,
            AdminCommands::Award {
                account,
                amount,
                reason,
            } => commands::admin::run_award(&config, &account, amount, &reason).await,
            AdminCommands::Transactions { account } => {
                commands::admin::run_transactions(&config, &account).await
            }
        },
    }
}
