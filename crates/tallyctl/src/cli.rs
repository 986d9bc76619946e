//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Keeps argument parsing separate
//! from execution logic.

use clap::{Parser, Subcommand};

/// Tally wallet CLI
#[derive(Parser)]
#[command(name = "tallyctl")]
#[command(about = "Tally - token wallet for learning rewards", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Daemon base URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the token balance
    Balance {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show recent transactions
    Transactions {
        /// How many entries to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Record earned tokens (e.g. a finished learning activity)
    Award {
        amount: i64,
        reason: String,
    },

    /// Spend tokens
    Redeem {
        amount: i64,
        reason: String,
    },

    /// Claim the daily login reward
    Daily,

    /// Record a quiz score and collect the reward
    Quiz {
        /// Score as a percentage, 0..=100
        percentage: u32,
    },

    /// Browse and buy from the shop
    Shop {
        #[command(subcommand)]
        action: ShopCommands,
    },

    /// Re-sync the local wallet from the daemon
    Sync,

    /// Admin commands (require the admin token)
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

/// Shop subcommands
#[derive(Subcommand)]
pub enum ShopCommands {
    /// List items for sale
    List,
    /// Buy an item by id
    Buy { item: String },
    /// Show your purchase history
    Purchases,
}

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// Token circulation statistics
    Stats,
    /// Shop statistics
    ShopStats,
    /// Award tokens to any account
    Award {
        account: String,
        amount: i64,
        reason: String,
    },
    /// List a target account's transactions
    Transactions { account: String },
}
