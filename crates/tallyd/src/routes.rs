//! API routes for tallyd
//!
//! Route groups mirror the API surface: token ledger, shop, admin, health.
//! Every failure leaves through [`ApiError`], so the wire always carries the
//! structured `{ success: false, message }` body.

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tally_common::{
    AwardRequest, BalanceResponse, CreateItemRequest, DailyClaimResponse, ErrorResponse,
    HealthResponse, ItemResponse, LedgerError, MutationResponse, PurchaseResponse,
    PurchasesResponse, QuizRequest, QuizResponse, RedeemRequest, ShopListResponse,
    ShopStatsResponse, TokenStatsResponse, TransactionsResponse, UpdateItemRequest,
};
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Error envelope
// ============================================================================

/// An error ready for the wire: status code plus the message the caller
/// is allowed to see.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    fn forbidden(message: &str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        if err.is_internal() {
            // Details stay in the log; the caller gets a generic message
            error!("Ledger failure: {}", err);
            return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            success: false,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

// ============================================================================
// Auth helpers
// ============================================================================

/// Pull the bearer token out of the Authorization header. Session handling
/// lives outside this service; the token names the calling account.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;

    if token.is_empty() {
        return Err(ApiError::unauthorized("empty bearer token"));
    }
    Ok(token.to_string())
}

fn caller_account(headers: &HeaderMap) -> Result<String, ApiError> {
    bearer_token(headers)
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = bearer_token(headers)?;
    if !state.config.admin_enabled() || token != state.config.admin_token {
        return Err(ApiError::forbidden("admin access required"));
    }
    Ok(())
}

// ============================================================================
// Token Routes
// ============================================================================

pub fn token_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/tokens/balance", get(get_balance))
        .route("/api/tokens/transactions", get(get_transactions))
        .route("/api/tokens/award", post(post_award))
        .route("/api/tokens/redeem", post(post_redeem))
        .route("/api/tokens/daily", post(post_daily))
        .route("/api/tokens/quiz", post(post_quiz))
}

async fn get_balance(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<BalanceResponse>, ApiError> {
    let account = caller_account(&headers)?;
    let ledger = state.ledger.lock().await;
    let balance = ledger.balance(&account)?;

    Ok(Json(BalanceResponse {
        success: true,
        balance,
    }))
}

async fn get_transactions(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let account = caller_account(&headers)?;
    let ledger = state.ledger.lock().await;
    let transactions = ledger.transactions(&account, state.config.transactions_limit)?;

    Ok(Json(TransactionsResponse {
        success: true,
        transactions,
    }))
}

async fn post_award(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<AwardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let account = caller_account(&headers)?;

    let ledger = state.ledger.lock().await;
    let (balance, transaction) = ledger.award(&account, req.amount, &req.reason, req.meta)?;
    info!("  +{} tokens to {} ({})", req.amount, account, req.reason);

    Ok(Json(MutationResponse {
        success: true,
        balance,
        transaction,
    }))
}

async fn post_redeem(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let account = caller_account(&headers)?;

    let ledger = state.ledger.lock().await;
    let (balance, transaction) = ledger.redeem(&account, req.amount, &req.reason, req.meta)?;
    info!("  -{} tokens from {} ({})", req.amount, account, req.reason);

    Ok(Json(MutationResponse {
        success: true,
        balance,
        transaction,
    }))
}

async fn post_daily(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<DailyClaimResponse>, ApiError> {
    let account = caller_account(&headers)?;
    let today = chrono::Utc::now().date_naive();

    let ledger = state.ledger.lock().await;
    let claim = ledger.claim_daily(&account, today)?;
    info!(
        "  Daily claim by {} (streak {})",
        account, claim.streak.current
    );

    Ok(Json(DailyClaimResponse {
        success: true,
        balance: claim.balance,
        tokens_earned: claim.tokens_earned,
        streak: claim.streak,
    }))
}

async fn post_quiz(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<QuizRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let account = caller_account(&headers)?;

    let ledger = state.ledger.lock().await;
    let outcome = ledger.complete_quiz(&account, req.percentage)?;
    info!(
        "  Quiz at {}% by {}: +{} tokens, +{} XP (level {})",
        req.percentage, account, outcome.tokens_earned, outcome.xp_earned, outcome.level
    );

    Ok(Json(QuizResponse {
        success: true,
        balance: outcome.balance,
        tokens_earned: outcome.tokens_earned,
        xp_earned: outcome.xp_earned,
        level: outcome.level,
        transaction: outcome.transaction,
    }))
}

// ============================================================================
// Admin Routes (token side)
// ============================================================================

pub fn admin_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/tokens/award-user/:id", post(admin_award_user))
        .route("/api/tokens/user/:id", get(admin_user_transactions))
        .route("/api/tokens/admin/stats", get(admin_token_stats))
}

async fn admin_award_user(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<AwardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    let (balance, transaction) = ledger.award(&id, req.amount, &req.reason, req.meta)?;
    info!("  Admin award: +{} tokens to {}", req.amount, id);

    Ok(Json(MutationResponse {
        success: true,
        balance,
        transaction,
    }))
}

async fn admin_user_transactions(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TransactionsResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    if !ledger.account_exists(&id)? {
        return Err(LedgerError::AccountNotFound(id).into());
    }
    let transactions = ledger.transactions(&id, state.config.transactions_limit)?;

    Ok(Json(TransactionsResponse {
        success: true,
        transactions,
    }))
}

async fn admin_token_stats(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<TokenStatsResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let today = chrono::Utc::now().date_naive();

    let ledger = state.ledger.lock().await;
    let stats = ledger.token_stats(today)?;

    Ok(Json(TokenStatsResponse {
        success: true,
        stats,
    }))
}

// ============================================================================
// Shop Routes
// ============================================================================

pub fn shop_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/shop", get(list_shop).post(admin_create_item))
        .route(
            "/api/shop/:id",
            put(admin_update_item).delete(admin_delete_item),
        )
        .route("/api/shop/:id/purchase", post(purchase_item))
        .route("/api/shop/my-purchases", get(my_purchases))
        .route("/api/shop/admin/stats", get(admin_shop_stats))
}

/// Public catalog: active items only, no token needed to browse
async fn list_shop(
    State(state): State<AppStateArc>,
) -> Result<Json<ShopListResponse>, ApiError> {
    let ledger = state.ledger.lock().await;
    let items = ledger.list_items(false)?;

    Ok(Json(ShopListResponse {
        success: true,
        items,
    }))
}

async fn purchase_item(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let account = caller_account(&headers)?;

    let ledger = state.ledger.lock().await;
    let outcome = ledger.purchase(&account, &id)?;
    info!(
        "  {} bought {} for {} tokens",
        account, outcome.purchase.item_name, outcome.purchase.tokens_spent
    );

    Ok(Json(PurchaseResponse {
        success: true,
        balance: outcome.balance,
        purchase: outcome.purchase,
        transaction: outcome.transaction,
    }))
}

async fn my_purchases(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<PurchasesResponse>, ApiError> {
    let account = caller_account(&headers)?;

    let ledger = state.ledger.lock().await;
    let purchases = ledger.purchases_for(&account)?;

    Ok(Json(PurchasesResponse {
        success: true,
        purchases,
    }))
}

async fn admin_create_item(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    let item = ledger.create_item(&req)?;
    info!("  Shop item created: {} ({} tokens)", item.name, item.price);

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

async fn admin_update_item(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    let item = ledger.update_item(&id, &req)?;

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// Soft delete: purchase history survives, the catalog entry goes away
async fn admin_delete_item(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ItemResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    let item = ledger.deactivate_item(&id)?;
    info!("  Shop item deactivated: {}", item.name);

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

async fn admin_shop_stats(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
) -> Result<Json<ShopStatsResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let ledger = state.ledger.lock().await;
    let stats = ledger.shop_stats()?;

    Ok(Json(ShopStatsResponse {
        success: true,
        stats,
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/api/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
