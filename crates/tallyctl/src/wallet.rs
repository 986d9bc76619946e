//! Local wallet cache - the client-side mirror of the ledger.
//!
//! The wallet file holds balance plus recent transactions and survives
//! without any daemon. Mutations are optimistic: they land here first as
//! `pending` entries and are replaced by the server-confirmed transaction
//! when the network call succeeds. A failed redeem triggers a full resync
//! from the daemon; only if that also fails is the pending entry rolled
//! back locally.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tally_common::{Transaction, TransactionKind};
use uuid::Uuid;

/// Whether the wallet mirrors a server account or stands alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// No account token, or the daemon was unreachable
    Local,
    /// Server state replaced local state at `last_sync`
    Synced,
}

/// Confirmation state of a cached transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Applied optimistically, not yet acknowledged by the daemon
    Pending,
    /// Server-confirmed (or server-fetched)
    Confirmed,
    /// Optimistic guess undone after a failed redeem with no resync
    RolledBack,
}

/// One cached transaction with its confirmation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletEntry {
    pub state: EntryState,
    pub transaction: Transaction,
}

/// The wallet file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: i64,
    /// Newest first
    pub entries: Vec<WalletEntry>,
    pub mode: SyncMode,
    /// Unix seconds of the last successful server sync
    #[serde(default)]
    pub last_sync: Option<i64>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            balance: 0,
            entries: Vec::new(),
            mode: SyncMode::Local,
            last_sync: None,
        }
    }
}

impl Wallet {
    /// Default wallet file location
    pub fn path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tally/wallet.json")
    }

    /// Load from the default path
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load from a specific path (for testing); any unreadable or corrupt
    /// file degrades to an empty Local wallet
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save to the default path
    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::path())
    }

    /// Save atomically (temp file + rename) so the wallet is never half
    /// written
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    // ========================================================================
    // Reconciliation state machine
    // ========================================================================

    /// Apply a mutation optimistically. `amount` is already signed
    /// (negative for redemptions). Returns the pending entry's id.
    pub fn apply_pending(
        &mut self,
        account: &str,
        kind: TransactionKind,
        amount: i64,
        reason: &str,
    ) -> String {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            account: account.to_string(),
            amount,
            kind,
            reason: reason.to_string(),
            meta: None,
            created_at: chrono::Utc::now().timestamp(),
        };
        let id = transaction.id.clone();

        self.balance += amount;
        self.entries.insert(
            0,
            WalletEntry {
                state: EntryState::Pending,
                transaction,
            },
        );
        id
    }

    /// Replace a pending entry with the server-confirmed transaction and
    /// adopt the authoritative balance.
    pub fn confirm(&mut self, pending_id: &str, confirmed: Transaction, server_balance: i64) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.transaction.id == pending_id)
        {
            Some(entry) => {
                entry.state = EntryState::Confirmed;
                entry.transaction = confirmed;
            }
            None => {
                // pending entry lost (e.g. wallet rewritten); keep the
                // confirmed transaction anyway
                self.entries.insert(
                    0,
                    WalletEntry {
                        state: EntryState::Confirmed,
                        transaction: confirmed,
                    },
                );
            }
        }
        self.balance = server_balance;
    }

    /// Settle a pending entry without a server round trip. In Local mode
    /// there is no daemon to ask; the wallet entry is the record of truth.
    pub fn confirm_local(&mut self, pending_id: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.transaction.id == pending_id && e.state == EntryState::Pending)
        {
            entry.state = EntryState::Confirmed;
        }
    }

    /// Undo one optimistic entry. Only pending entries roll back; confirmed
    /// history is immutable.
    pub fn rollback(&mut self, pending_id: &str) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.transaction.id == pending_id && e.state == EntryState::Pending)
        {
            entry.state = EntryState::RolledBack;
            self.balance -= entry.transaction.amount;
        }
    }

    /// Replace everything with server truth and enter Synced mode. Pending
    /// guesses are dropped: the server either recorded them (they arrive in
    /// `transactions`) or never saw them.
    pub fn resync(&mut self, server_balance: i64, transactions: Vec<Transaction>) {
        self.balance = server_balance;
        self.entries = transactions
            .into_iter()
            .map(|transaction| WalletEntry {
                state: EntryState::Confirmed,
                transaction,
            })
            .collect();
        self.mode = SyncMode::Synced;
        self.last_sync = Some(chrono::Utc::now().timestamp());
    }

    /// Note that the daemon could not be reached; cached state stands
    pub fn mark_local(&mut self) {
        self.mode = SyncMode::Local;
    }

    /// Entries still waiting for server confirmation
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Pending)
            .count()
    }
}
