//! Ledger Database - SQLite-backed token ledger
//!
//! Stores accounts, the append-only transaction log, shop items, and
//! purchases for:
//! - Balance and history display in `tallyctl balance` / `tallyctl transactions`
//! - Circulation aggregates in the admin stats endpoints
//!
//! Schema:
//! - accounts: XP, level, streak fields (no balance column)
//! - transactions: signed amounts, one row per balance mutation
//! - shop_items, purchases: catalog and join records
//!
//! Balance is derived: `SUM(transactions.amount)` per account. Every ledger
//! operation commits in a single SQLite transaction, so a failure can never
//! leave a balance without its log entry or a purchase without its debit.

use crate::error::{LedgerError, LedgerResult};
use crate::rewards;
use crate::types::{
    CreateItemRequest, DailyActivity, ItemKind, Purchase, ShopItem, ShopStats, StreakInfo,
    TokenStats, TopEarner, TopItem, Transaction, TransactionKind, UpdateItemRequest,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Default ledger database path
pub const LEDGER_DB_PATH: &str = "/var/lib/tally/ledger.db";

/// How many transactions the history endpoints return at most
pub const TRANSACTION_HISTORY_LIMIT: usize = 200;

/// Result of a daily claim
#[derive(Debug, Clone)]
pub struct DailyClaim {
    pub balance: i64,
    pub tokens_earned: i64,
    pub streak: StreakInfo,
    pub transaction: Transaction,
}

/// Result of a quiz completion
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub balance: i64,
    pub tokens_earned: i64,
    pub xp_earned: u32,
    pub level: u32,
    pub transaction: Transaction,
}

/// Result of a shop purchase
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub balance: i64,
    pub purchase: Purchase,
    pub transaction: Transaction,
}

/// SQLite-backed ledger store
pub struct LedgerDb {
    conn: Connection,
}

impl LedgerDb {
    /// Open or create the ledger database at the default path
    pub fn open() -> LedgerResult<Self> {
        Self::open_at(LEDGER_DB_PATH)
    }

    /// Open at a specific path (for testing or daemon config overrides)
    pub fn open_at<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path_ref)?;

        // WAL mode for concurrent reads while the daemon writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                created_at INTEGER NOT NULL,
                xp INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 1,
                streak_current INTEGER NOT NULL DEFAULT 0,
                streak_longest INTEGER NOT NULL DEFAULT 0,
                last_claim_date TEXT
            );

            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                account TEXT NOT NULL,
                amount INTEGER NOT NULL,
                kind TEXT NOT NULL,
                reason TEXT NOT NULL,
                meta TEXT,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tx_account ON transactions(account);
            CREATE INDEX IF NOT EXISTS idx_tx_created ON transactions(created_at);
            CREATE INDEX IF NOT EXISTS idx_tx_account_created ON transactions(account, created_at);

            CREATE TABLE IF NOT EXISTS shop_items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                price INTEGER NOT NULL,
                stock INTEGER NOT NULL DEFAULT -1,
                kind TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS purchases (
                id TEXT PRIMARY KEY,
                account TEXT NOT NULL,
                item_id TEXT NOT NULL,
                item_name TEXT NOT NULL,
                tokens_spent INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_purchases_account ON purchases(account);
            CREATE INDEX IF NOT EXISTS idx_purchases_item ON purchases(item_id);
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Current unix timestamp
    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    // ========================================================================
    // Accounts and balances
    // ========================================================================

    /// Create the account row if it does not exist yet. Accounts are
    /// implicit: the first ledger operation creates them.
    fn ensure_account(conn: &Connection, account: &str) -> LedgerResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO accounts (id, created_at) VALUES (?1, ?2)",
            params![account, Self::now()],
        )?;
        Ok(())
    }

    fn balance_of(conn: &Connection, account: &str) -> LedgerResult<i64> {
        let balance = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE account = ?1",
            params![account],
            |row| row.get(0),
        )?;
        Ok(balance)
    }

    /// Derived balance for an account (0 for accounts never seen)
    pub fn balance(&self, account: &str) -> LedgerResult<i64> {
        Self::balance_of(&self.conn, account)
    }

    /// True once any ledger operation has touched the account
    pub fn account_exists(&self, account: &str) -> LedgerResult<bool> {
        let row: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM accounts WHERE id = ?1",
                params![account],
                |row| row.get(0),
            )
            .optional()?;
        Ok(row.is_some())
    }

    /// Most recent transactions first
    pub fn transactions(&self, account: &str, limit: usize) -> LedgerResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account, amount, kind, reason, meta, created_at
             FROM transactions
             WHERE account = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![account, limit as i64], Self::row_to_transaction)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    // ========================================================================
    // Ledger operations
    // ========================================================================

    /// Grant tokens to an account. Rejects non-positive amounts.
    pub fn award(
        &self,
        account: &str,
        amount: i64,
        reason: &str,
        meta: Option<serde_json::Value>,
    ) -> LedgerResult<(i64, Transaction)> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let tx = self.conn.unchecked_transaction()?;
        Self::ensure_account(&tx, account)?;
        let record = Self::append_entry(&tx, account, amount, TransactionKind::Award, reason, meta)?;
        let balance = Self::balance_of(&tx, account)?;
        tx.commit()?;

        Ok((balance, record))
    }

    /// Spend tokens. Rejects non-positive amounts and overdrafts; the
    /// balance check and the log append commit together.
    pub fn redeem(
        &self,
        account: &str,
        amount: i64,
        reason: &str,
        meta: Option<serde_json::Value>,
    ) -> LedgerResult<(i64, Transaction)> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let tx = self.conn.unchecked_transaction()?;
        Self::ensure_account(&tx, account)?;

        let balance = Self::balance_of(&tx, account)?;
        if amount > balance {
            return Err(LedgerError::InsufficientBalance {
                balance,
                requested: amount,
            });
        }

        let record =
            Self::append_entry(&tx, account, -amount, TransactionKind::Redeem, reason, meta)?;
        let balance = Self::balance_of(&tx, account)?;
        tx.commit()?;

        Ok((balance, record))
    }

    /// Claim the daily login reward. One claim per calendar date; the
    /// comparison is date-only, never elapsed hours.
    pub fn claim_daily(&self, account: &str, today: NaiveDate) -> LedgerResult<DailyClaim> {
        let today_str = today.format("%Y-%m-%d").to_string();

        let tx = self.conn.unchecked_transaction()?;
        Self::ensure_account(&tx, account)?;

        let (streak_current, streak_longest, last_claim_date): (u32, u32, Option<String>) = tx
            .query_row(
                "SELECT streak_current, streak_longest, last_claim_date
                 FROM accounts WHERE id = ?1",
                params![account],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)? as u32,
                        row.get::<_, i64>(1)? as u32,
                        row.get(2)?,
                    ))
                },
            )?;

        if last_claim_date.as_deref() == Some(today_str.as_str()) {
            return Err(LedgerError::AlreadyClaimedToday);
        }

        let last_claim = last_claim_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        let (current, longest) =
            rewards::advance_streak(streak_current, streak_longest, last_claim, today);

        tx.execute(
            "UPDATE accounts
             SET streak_current = ?1, streak_longest = ?2, last_claim_date = ?3
             WHERE id = ?4",
            params![current as i64, longest as i64, today_str, account],
        )?;

        let record = Self::append_entry(
            &tx,
            account,
            rewards::DAILY_CLAIM_TOKENS,
            TransactionKind::Award,
            "Daily login reward",
            Some(serde_json::json!({ "streak": current })),
        )?;
        let balance = Self::balance_of(&tx, account)?;
        tx.commit()?;

        Ok(DailyClaim {
            balance,
            tokens_earned: rewards::DAILY_CLAIM_TOKENS,
            streak: StreakInfo {
                current,
                longest,
                last_claim_date: Some(today_str),
            },
            transaction: record,
        })
    }

    /// Record a finished quiz: tokens go through the ledger, XP and level
    /// land on the account row with no matching transaction (XP is not
    /// currency and stays unaudited).
    pub fn complete_quiz(&self, account: &str, percentage: u32) -> LedgerResult<QuizOutcome> {
        if percentage > 100 {
            return Err(LedgerError::InvalidPercentage);
        }

        let tokens = rewards::tokens_for_quiz(percentage);
        let xp_earned = rewards::xp_for_quiz(percentage);

        let tx = self.conn.unchecked_transaction()?;
        Self::ensure_account(&tx, account)?;

        let record = Self::append_entry(
            &tx,
            account,
            tokens,
            TransactionKind::Award,
            "Quiz completed",
            Some(serde_json::json!({ "percentage": percentage })),
        )?;

        let xp: u32 = tx.query_row(
            "SELECT xp FROM accounts WHERE id = ?1",
            params![account],
            |row| Ok(row.get::<_, i64>(0)? as u32),
        )?;
        let new_xp = xp + xp_earned;
        let level = rewards::level_for_xp(new_xp);
        tx.execute(
            "UPDATE accounts SET xp = ?1, level = ?2 WHERE id = ?3",
            params![new_xp as i64, level as i64, account],
        )?;

        let balance = Self::balance_of(&tx, account)?;
        tx.commit()?;

        Ok(QuizOutcome {
            balance,
            tokens_earned: tokens,
            xp_earned,
            level,
            transaction: record,
        })
    }

    fn append_entry(
        conn: &Connection,
        account: &str,
        amount: i64,
        kind: TransactionKind,
        reason: &str,
        meta: Option<serde_json::Value>,
    ) -> LedgerResult<Transaction> {
        let record = Transaction {
            id: Uuid::new_v4().to_string(),
            account: account.to_string(),
            amount,
            kind,
            reason: reason.to_string(),
            meta,
            created_at: Self::now(),
        };

        let meta_text = record.meta.as_ref().map(|m| m.to_string());
        conn.execute(
            "INSERT INTO transactions (id, account, amount, kind, reason, meta, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.account,
                record.amount,
                record.kind.as_str(),
                record.reason,
                meta_text,
                record.created_at
            ],
        )?;

        Ok(record)
    }

    fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
        let kind_text: String = row.get(3)?;
        let meta_text: Option<String> = row.get(5)?;
        Ok(Transaction {
            id: row.get(0)?,
            account: row.get(1)?,
            amount: row.get(2)?,
            kind: TransactionKind::parse(&kind_text).unwrap_or(TransactionKind::Award),
            reason: row.get(4)?,
            meta: meta_text.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(6)?,
        })
    }

    // ========================================================================
    // Shop
    // ========================================================================

    /// Shop catalog; the public endpoint lists active items only
    pub fn list_items(&self, include_inactive: bool) -> LedgerResult<Vec<ShopItem>> {
        let sql = if include_inactive {
            "SELECT id, name, description, price, stock, kind, active, created_at
             FROM shop_items ORDER BY created_at DESC"
        } else {
            "SELECT id, name, description, price, stock, kind, active, created_at
             FROM shop_items WHERE active = 1 ORDER BY created_at DESC"
        };

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], Self::row_to_item)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn get_item(&self, item_id: &str) -> LedgerResult<ShopItem> {
        Self::item_of(&self.conn, item_id)
    }

    fn item_of(conn: &Connection, item_id: &str) -> LedgerResult<ShopItem> {
        conn.query_row(
            "SELECT id, name, description, price, stock, kind, active, created_at
             FROM shop_items WHERE id = ?1",
            params![item_id],
            Self::row_to_item,
        )
        .optional()?
        .ok_or_else(|| LedgerError::ItemNotFound(item_id.to_string()))
    }

    fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShopItem> {
        let kind_text: String = row.get(5)?;
        Ok(ShopItem {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            stock: row.get(4)?,
            kind: ItemKind::parse(&kind_text).unwrap_or(ItemKind::Consumable),
            active: row.get::<_, i64>(6)? != 0,
            created_at: row.get(7)?,
        })
    }

    pub fn create_item(&self, req: &CreateItemRequest) -> LedgerResult<ShopItem> {
        if req.price <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let item = ShopItem {
            id: Uuid::new_v4().to_string(),
            name: req.name.clone(),
            description: req.description.clone(),
            price: req.price,
            stock: req.stock,
            kind: req.kind,
            active: true,
            created_at: Self::now(),
        };

        self.conn.execute(
            "INSERT INTO shop_items (id, name, description, price, stock, kind, active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
            params![
                item.id,
                item.name,
                item.description,
                item.price,
                item.stock,
                item.kind.as_str(),
                item.created_at
            ],
        )?;

        Ok(item)
    }

    pub fn update_item(&self, item_id: &str, req: &UpdateItemRequest) -> LedgerResult<ShopItem> {
        let current = self.get_item(item_id)?;

        let updated = ShopItem {
            id: current.id,
            name: req.name.clone().unwrap_or(current.name),
            description: req.description.clone().unwrap_or(current.description),
            price: req.price.unwrap_or(current.price),
            stock: req.stock.unwrap_or(current.stock),
            kind: req.kind.unwrap_or(current.kind),
            active: req.active.unwrap_or(current.active),
            created_at: current.created_at,
        };

        if updated.price <= 0 {
            return Err(LedgerError::InvalidAmount);
        }

        self.conn.execute(
            "UPDATE shop_items
             SET name = ?1, description = ?2, price = ?3, stock = ?4, kind = ?5, active = ?6
             WHERE id = ?7",
            params![
                updated.name,
                updated.description,
                updated.price,
                updated.stock,
                updated.kind.as_str(),
                updated.active as i64,
                updated.id
            ],
        )?;

        Ok(updated)
    }

    /// Soft delete: the item disappears from the public catalog but keeps
    /// its purchase history intact.
    pub fn deactivate_item(&self, item_id: &str) -> LedgerResult<ShopItem> {
        self.update_item(
            item_id,
            &UpdateItemRequest {
                active: Some(false),
                ..Default::default()
            },
        )
    }

    /// Buy an item. All checks plus the debit, the purchase row, and the
    /// stock decrement commit atomically; two racing buyers cannot oversell
    /// the last unit.
    pub fn purchase(&self, account: &str, item_id: &str) -> LedgerResult<PurchaseOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        Self::ensure_account(&tx, account)?;

        let item = Self::item_of(&tx, item_id)?;
        if !item.active {
            return Err(LedgerError::ItemNotFound(item_id.to_string()));
        }
        if !item.in_stock() {
            return Err(LedgerError::OutOfStock(item.name));
        }

        if item.kind == ItemKind::Permanent {
            let owned: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM purchases WHERE account = ?1 AND item_id = ?2",
                    params![account, item_id],
                    |row| row.get(0),
                )
                .optional()?;
            if owned.is_some() {
                return Err(LedgerError::AlreadyOwned(item.name));
            }
        }

        let balance = Self::balance_of(&tx, account)?;
        if item.price > balance {
            return Err(LedgerError::InsufficientBalance {
                balance,
                requested: item.price,
            });
        }

        let record = Self::append_entry(
            &tx,
            account,
            -item.price,
            TransactionKind::Redeem,
            &format!("Purchased {}", item.name),
            Some(serde_json::json!({ "item_id": item.id })),
        )?;

        let purchase = Purchase {
            id: Uuid::new_v4().to_string(),
            account: account.to_string(),
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            tokens_spent: item.price,
            created_at: Self::now(),
        };
        tx.execute(
            "INSERT INTO purchases (id, account, item_id, item_name, tokens_spent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                purchase.id,
                purchase.account,
                purchase.item_id,
                purchase.item_name,
                purchase.tokens_spent,
                purchase.created_at
            ],
        )?;

        if item.stock > 0 {
            tx.execute(
                "UPDATE shop_items SET stock = stock - 1 WHERE id = ?1",
                params![item.id],
            )?;
        }

        let balance = Self::balance_of(&tx, account)?;
        tx.commit()?;

        Ok(PurchaseOutcome {
            balance,
            purchase,
            transaction: record,
        })
    }

    /// Purchase history for an account, newest first
    pub fn purchases_for(&self, account: &str) -> LedgerResult<Vec<Purchase>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account, item_id, item_name, tokens_spent, created_at
             FROM purchases
             WHERE account = ?1
             ORDER BY created_at DESC, rowid DESC",
        )?;

        let rows = stmt.query_map(params![account], |row| {
            Ok(Purchase {
                id: row.get(0)?,
                account: row.get(1)?,
                item_id: row.get(2)?,
                item_name: row.get(3)?,
                tokens_spent: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    // ========================================================================
    // Admin aggregates
    // ========================================================================

    /// Circulation overview with a 7-day activity window ending on `today`
    pub fn token_stats(&self, today: NaiveDate) -> LedgerResult<TokenStats> {
        let (earned, spent, circulation, count): (i64, i64, i64, u64) = self.conn.query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0 END), 0),
                COALESCE(SUM(amount), 0),
                COUNT(*)
             FROM transactions",
            [],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get::<_, i64>(3)? as u64,
                ))
            },
        )?;

        let active_accounts: u64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT account) FROM transactions",
            [],
            |row| Ok(row.get::<_, i64>(0)? as u64),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT account, SUM(amount) AS earned
             FROM transactions
             WHERE amount > 0
             GROUP BY account
             ORDER BY earned DESC
             LIMIT 5",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TopEarner {
                account: row.get(0)?,
                earned: row.get(1)?,
            })
        })?;
        let mut top_earners = Vec::new();
        for row in rows {
            top_earners.push(row?);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, account, amount, kind, reason, meta, created_at
             FROM transactions
             ORDER BY created_at DESC, rowid DESC
             LIMIT 10",
        )?;
        let rows = stmt.query_map([], Self::row_to_transaction)?;
        let mut recent_transactions = Vec::new();
        for row in rows {
            recent_transactions.push(row?);
        }

        Ok(TokenStats {
            total_circulation: circulation,
            total_earned: earned,
            total_spent: spent,
            total_transactions: count,
            active_accounts,
            top_earners,
            recent_transactions,
            daily_activity: self.daily_activity(today)?,
        })
    }

    /// Per-day buckets for the last 7 calendar days, oldest first. Days
    /// with no activity appear as zeros.
    fn daily_activity(&self, today: NaiveDate) -> LedgerResult<Vec<DailyActivity>> {
        let start = today - chrono::Duration::days(6);
        let since = start
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0);

        let mut stmt = self.conn.prepare(
            "SELECT date(created_at, 'unixepoch') AS day,
                    COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0 END), 0),
                    COUNT(*)
             FROM transactions
             WHERE created_at >= ?1
             GROUP BY day",
        )?;

        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)? as u64,
            ))
        })?;

        let mut by_day: HashMap<String, (i64, i64, u64)> = HashMap::new();
        for row in rows {
            let (day, awarded, redeemed, count) = row?;
            by_day.insert(day, (awarded, redeemed, count));
        }

        let mut buckets = Vec::with_capacity(7);
        for offset in 0..7 {
            let date = start + chrono::Duration::days(offset);
            let key = date.format("%Y-%m-%d").to_string();
            let (awarded, redeemed, transactions) =
                by_day.get(&key).copied().unwrap_or((0, 0, 0));
            buckets.push(DailyActivity {
                date: key,
                awarded,
                redeemed,
                transactions,
            });
        }
        Ok(buckets)
    }

    /// Shop-side aggregates for the admin dashboard
    pub fn shop_stats(&self) -> LedgerResult<ShopStats> {
        let (total_items, active_items): (u64, u64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(active), 0) FROM shop_items",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)? as u64,
                    row.get::<_, i64>(1)? as u64,
                ))
            },
        )?;

        let (total_purchases, tokens_spent): (u64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(tokens_spent), 0) FROM purchases",
            [],
            |row| Ok((row.get::<_, i64>(0)? as u64, row.get(1)?)),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT item_id, item_name, COUNT(*) AS cnt
             FROM purchases
             GROUP BY item_id
             ORDER BY cnt DESC
             LIMIT 5",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TopItem {
                item_id: row.get(0)?,
                name: row.get(1)?,
                purchases: row.get::<_, i64>(2)? as u64,
            })
        })?;
        let mut top_items = Vec::new();
        for row in rows {
            top_items.push(row?);
        }

        Ok(ShopStats {
            total_items,
            active_items,
            total_purchases,
            tokens_spent,
            top_items,
        })
    }
}
