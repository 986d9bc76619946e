//! Wire and domain types shared between tallyd and tallyctl.
//!
//! Every HTTP body the daemon speaks is defined here so the client never
//! hand-parses JSON. Response envelopes carry the `success` flag the API
//! promises on every route.

use serde::{Deserialize, Serialize};

// ============================================================================
// Transactions
// ============================================================================

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Tokens granted to an account (positive amount)
    Award,
    /// Tokens spent by an account (negative amount)
    Redeem,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Award => "award",
            Self::Redeem => "redeem",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "award" => Some(Self::Award),
            "redeem" => Some(Self::Redeem),
            _ => None,
        }
    }
}

/// One immutable ledger entry. Never updated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account: String,
    /// Signed token amount: positive for awards, negative for redemptions
    pub amount: i64,
    pub kind: TransactionKind,
    pub reason: String,
    /// Optional structured context (quiz percentage, item id, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    /// Creation time (unix seconds)
    pub created_at: i64,
}

impl Transaction {
    /// Creation time formatted for display
    pub fn format_created_at(&self) -> String {
        chrono::DateTime::from_timestamp(self.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ============================================================================
// Streaks
// ============================================================================

/// Consecutive-day claim state for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakInfo {
    pub current: u32,
    pub longest: u32,
    /// Date of the last daily claim (YYYY-MM-DD), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_claim_date: Option<String>,
}

// ============================================================================
// Shop
// ============================================================================

/// Whether owning an item once blocks buying it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Can be bought any number of times
    Consumable,
    /// One per account; a second purchase is rejected
    Permanent,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumable => "consumable",
            Self::Permanent => "permanent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "consumable" => Some(Self::Consumable),
            "permanent" => Some(Self::Permanent),
            _ => None,
        }
    }
}

/// A purchasable shop entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in tokens
    pub price: i64,
    /// Remaining stock; -1 means unlimited
    pub stock: i64,
    pub kind: ItemKind,
    pub active: bool,
    pub created_at: i64,
}

impl ShopItem {
    /// Unlimited stock or at least one unit left
    pub fn in_stock(&self) -> bool {
        self.stock != 0
    }
}

/// Join record linking an account, a shop item, and the tokens spent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub account: String,
    pub item_id: String,
    pub item_name: String,
    pub tokens_spent: i64,
    pub created_at: i64,
}

// ============================================================================
// Request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardRequest {
    pub amount: i64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub amount: i64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Score as an integer percentage, 0..=100
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    /// -1 = unlimited
    #[serde(default = "default_stock")]
    pub stock: i64,
    #[serde(default = "default_item_kind")]
    pub kind: ItemKind,
}

fn default_stock() -> i64 {
    -1
}

fn default_item_kind() -> ItemKind {
    ItemKind::Consumable
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ItemKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// ============================================================================
// Response envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub success: bool,
    pub transactions: Vec<Transaction>,
}

/// Shared shape of award and redeem responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub balance: i64,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyClaimResponse {
    pub success: bool,
    pub balance: i64,
    pub tokens_earned: i64,
    pub streak: StreakInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub balance: i64,
    pub tokens_earned: i64,
    pub xp_earned: u32,
    pub level: u32,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopListResponse {
    pub success: bool,
    pub items: Vec<ShopItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: ShopItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub balance: i64,
    pub purchase: Purchase,
    pub transaction: Transaction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasesResponse {
    pub success: bool,
    pub purchases: Vec<Purchase>,
}

/// Error body every failed request carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// Admin statistics
// ============================================================================

/// One account in the top-earners table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopEarner {
    pub account: String,
    pub earned: i64,
}

/// Activity bucket for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyActivity {
    /// YYYY-MM-DD
    pub date: String,
    pub awarded: i64,
    pub redeemed: i64,
    pub transactions: u64,
}

/// Circulation overview for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStats {
    /// Sum of every transaction amount = sum of all balances
    pub total_circulation: i64,
    pub total_earned: i64,
    pub total_spent: i64,
    pub total_transactions: u64,
    pub active_accounts: u64,
    pub top_earners: Vec<TopEarner>,
    pub recent_transactions: Vec<Transaction>,
    /// Last 7 calendar days, oldest first, zero-filled
    pub daily_activity: Vec<DailyActivity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStatsResponse {
    pub success: bool,
    pub stats: TokenStats,
}

/// One item in the top-sellers table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopItem {
    pub item_id: String,
    pub name: String,
    pub purchases: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopStats {
    pub total_items: u64,
    pub active_items: u64,
    pub total_purchases: u64,
    pub tokens_spent: i64,
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopStatsResponse {
    pub success: bool,
    pub stats: ShopStats,
}
