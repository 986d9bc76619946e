//! Tally CLI - wallet client for the tally daemon.
//!
//! Works in two modes: Synced against a running tallyd, or Local with only
//! the wallet file when no account token is configured or the daemon is
//! unreachable.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod wallet;
