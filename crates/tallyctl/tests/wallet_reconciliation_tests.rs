//! Wallet Reconciliation Tests
//!
//! Tests that verify the client cache state machine end to end:
//!
//! 1. Optimistic mutations confirm against server responses
//! 2. Failed redeems resync to server truth (or roll back offline)
//! 3. The wallet file survives restarts and corruption

use tallyctl::wallet::{EntryState, SyncMode, Wallet};
use tally_common::{Transaction, TransactionKind};
use tempfile::TempDir;

fn server_tx(id: &str, amount: i64, reason: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        account: "kid".to_string(),
        amount,
        kind: if amount >= 0 {
            TransactionKind::Award
        } else {
            TransactionKind::Redeem
        },
        reason: reason.to_string(),
        meta: None,
        created_at: 1_700_000_000,
    }
}

// ============================================================================
// Optimistic update lifecycle
// ============================================================================

#[test]
fn test_optimistic_award_then_server_confirmation() {
    let mut wallet = Wallet::default();

    // optimistic apply is immediate
    let pending = wallet.apply_pending("kid", TransactionKind::Award, 25, "Quiz completed");
    assert_eq!(wallet.balance, 25);
    assert_eq!(wallet.pending_count(), 1);

    // server answers with its own transaction and an authoritative balance
    // (here including a daily claim the client had not seen yet)
    wallet.confirm(&pending, server_tx("srv-1", 25, "Quiz completed"), 30);

    assert_eq!(wallet.balance, 30);
    assert_eq!(wallet.pending_count(), 0);
    assert_eq!(wallet.entries.len(), 1);
    assert_eq!(wallet.entries[0].transaction.id, "srv-1");
}

#[test]
fn test_failed_redeem_resyncs_to_server_truth() {
    let mut wallet = Wallet::default();
    wallet.balance = 50;

    let _pending = wallet.apply_pending("kid", TransactionKind::Redeem, -20, "Sticker pack");
    assert_eq!(wallet.balance, 30);

    // the daemon rejected the redeem; a full resync replaces the guess
    let server_log = vec![server_tx("srv-1", 50, "Quiz completed")];
    wallet.resync(50, server_log);

    assert_eq!(wallet.balance, 50);
    assert_eq!(wallet.mode, SyncMode::Synced);
    assert_eq!(wallet.pending_count(), 0);
    assert!(wallet
        .entries
        .iter()
        .all(|e| e.state == EntryState::Confirmed));
}

#[test]
fn test_failed_redeem_offline_rolls_back_single_entry() {
    let mut wallet = Wallet::default();
    wallet.balance = 50;

    let keep = wallet.apply_pending("kid", TransactionKind::Award, 5, "Daily login reward");
    let doomed = wallet.apply_pending("kid", TransactionKind::Redeem, -20, "Sticker pack");
    assert_eq!(wallet.balance, 35);

    // redeem failed and the resync failed too: only the redeem reverts
    wallet.rollback(&doomed);
    wallet.mark_local();

    assert_eq!(wallet.balance, 55);
    assert_eq!(wallet.mode, SyncMode::Local);
    assert_eq!(wallet.pending_count(), 1);
    assert!(wallet
        .entries
        .iter()
        .any(|e| e.transaction.id == keep && e.state == EntryState::Pending));
}

#[test]
fn test_local_mode_without_token() {
    let mut wallet = Wallet::default();

    let a = wallet.apply_pending("local", TransactionKind::Award, 10, "Reading practice");
    wallet.confirm_local(&a);
    let b = wallet.apply_pending("local", TransactionKind::Redeem, -4, "Screen time");
    wallet.confirm_local(&b);

    assert_eq!(wallet.balance, 6);
    assert_eq!(wallet.mode, SyncMode::Local);
    assert_eq!(wallet.pending_count(), 0);
    assert_eq!(wallet.entries.len(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_wallet_file_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tally/wallet.json");

    let mut wallet = Wallet::default();
    wallet.apply_pending("kid", TransactionKind::Award, 25, "Quiz completed");
    wallet.save_to(&path).unwrap();

    let reloaded = Wallet::load_from(&path);
    assert_eq!(reloaded.balance, 25);
    assert_eq!(reloaded.entries.len(), 1);
    assert_eq!(reloaded.entries[0].state, EntryState::Pending);
    assert_eq!(reloaded.mode, SyncMode::Local);
}

#[test]
fn test_corrupt_wallet_degrades_to_empty() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wallet.json");
    std::fs::write(&path, "{not json").unwrap();

    let wallet = Wallet::load_from(&path);
    assert_eq!(wallet.balance, 0);
    assert!(wallet.entries.is_empty());
    assert_eq!(wallet.mode, SyncMode::Local);
}

#[test]
fn test_missing_wallet_starts_empty() {
    let tmp = TempDir::new().unwrap();
    let wallet = Wallet::load_from(&tmp.path().join("nope.json"));
    assert_eq!(wallet.balance, 0);
    assert_eq!(wallet.mode, SyncMode::Local);
}

#[test]
fn test_resync_after_reload_reconciles_pending() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("wallet.json");

    // session 1: offline optimistic award, never confirmed
    let mut wallet = Wallet::default();
    wallet.apply_pending("kid", TransactionKind::Award, 25, "Quiz completed");
    wallet.save_to(&path).unwrap();

    // session 2: the daemon is reachable again; server truth wins
    let mut wallet = Wallet::load_from(&path);
    assert_eq!(wallet.pending_count(), 1);
    wallet.resync(30, vec![server_tx("srv-1", 30, "Quiz completed")]);
    wallet.save_to(&path).unwrap();

    let reloaded = Wallet::load_from(&path);
    assert_eq!(reloaded.balance, 30);
    assert_eq!(reloaded.pending_count(), 0);
    assert_eq!(reloaded.mode, SyncMode::Synced);
}
