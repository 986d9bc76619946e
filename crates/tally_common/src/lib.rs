//! Tally Common - Shared types, reward rules, and the ledger store
//!
//! Everything the daemon and the CLI wallet agree on lives here:
//! wire types, the pure reward rules, and the SQLite-backed ledger.

pub mod error;
pub mod ledger_db;
pub mod rewards;
pub mod types;

pub use error::*;
pub use ledger_db::*;
pub use types::*;
