//! API route tests
//!
//! Drive the full axum router in-process with tower's oneshot and assert the
//! wire contract: success envelopes on the happy paths, structured
//! `{ success: false, message }` bodies on every failure.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tally_common::LedgerDb;
use tallyd::config::DaemonConfig;
use tallyd::server::{router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "test-admin-token";
const USER_TOKEN: &str = "kid";

// ============================================================================
// Harness
// ============================================================================

fn test_state() -> (TempDir, Arc<AppState>) {
    let tmp = TempDir::new().unwrap();
    let db = LedgerDb::open_at(tmp.path().join("ledger.db")).unwrap();
    let config = DaemonConfig {
        admin_token: ADMIN_TOKEN.to_string(),
        ..Default::default()
    };
    (tmp, Arc::new(AppState::new(db, config)))
}

async fn send(
    state: &Arc<AppState>,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn award(state: &Arc<AppState>, token: &str, amount: i64) -> Value {
    let (status, body) = send(
        state,
        Method::POST,
        "/api/tokens/award",
        Some(token),
        Some(json!({ "amount": amount, "reason": "Quiz completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "award failed: {}", body);
    body
}

// ============================================================================
// Token routes
// ============================================================================

#[tokio::test]
async fn test_balance_requires_bearer_token() {
    let (_tmp, state) = test_state();

    let (status, body) = send(&state, Method::GET, "/api/tokens/balance", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_award_and_redeem_flow() {
    let (_tmp, state) = test_state();

    let body = award(&state, USER_TOKEN, 40).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["balance"], json!(40));
    assert_eq!(body["transaction"]["amount"], json!(40));
    assert_eq!(body["transaction"]["kind"], json!("award"));

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/redeem",
        Some(USER_TOKEN),
        Some(json!({ "amount": 15, "reason": "Sticker pack" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(25));
    assert_eq!(body["transaction"]["amount"], json!(-15));

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/tokens/transactions",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let transactions = body["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    // newest first
    assert_eq!(transactions[0]["amount"], json!(-15));
}

#[tokio::test]
async fn test_redeem_insufficient_balance_is_rejected() {
    let (_tmp, state) = test_state();
    award(&state, USER_TOKEN, 20).await;

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/redeem",
        Some(USER_TOKEN),
        Some(json!({ "amount": 30, "reason": "Too expensive" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("insufficient tokens"));

    // no state change
    let (_, body) = send(
        &state,
        Method::GET,
        "/api/tokens/balance",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(body["balance"], json!(20));
}

#[tokio::test]
async fn test_award_rejects_non_positive_amount() {
    let (_tmp, state) = test_state();

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/award",
        Some(USER_TOKEN),
        Some(json!({ "amount": 0, "reason": "nothing" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_daily_claim_once_per_day() {
    let (_tmp, state) = test_state();

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/daily",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(5));
    assert_eq!(body["tokens_earned"], json!(5));
    assert_eq!(body["streak"]["current"], json!(1));

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/daily",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already claimed"));
}

#[tokio::test]
async fn test_quiz_reward_tiers_over_http() {
    let (_tmp, state) = test_state();

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/quiz",
        Some(USER_TOKEN),
        Some(json!({ "percentage": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokens_earned"], json!(25));
    assert_eq!(body["xp_earned"], json!(50));
    assert_eq!(body["level"], json!(1));

    let (_, body) = send(
        &state,
        Method::POST,
        "/api/tokens/quiz",
        Some(USER_TOKEN),
        Some(json!({ "percentage": 59 })),
    )
    .await;
    assert_eq!(body["tokens_earned"], json!(5));
    assert_eq!(body["balance"], json!(30));
}

// ============================================================================
// Admin routes
// ============================================================================

#[tokio::test]
async fn test_admin_routes_reject_non_admin_token() {
    let (_tmp, state) = test_state();

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/tokens/admin/stats",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(
        &state,
        Method::POST,
        "/api/tokens/award-user/kid",
        Some(USER_TOKEN),
        Some(json!({ "amount": 10, "reason": "Bonus" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_award_and_user_lookup() {
    let (_tmp, state) = test_state();

    let (status, body) = send(
        &state,
        Method::POST,
        "/api/tokens/award-user/kid",
        Some(ADMIN_TOKEN),
        Some(json!({ "amount": 10, "reason": "Manual bonus" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(10));

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/tokens/user/kid",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/tokens/user/nobody",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_admin_stats_shape() {
    let (_tmp, state) = test_state();
    award(&state, "kid", 25).await;
    award(&state, "sibling", 5).await;

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/tokens/admin/stats",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let stats = &body["stats"];
    assert_eq!(stats["total_earned"], json!(30));
    assert_eq!(stats["total_spent"], json!(0));
    assert_eq!(stats["total_circulation"], json!(30));
    assert_eq!(stats["active_accounts"], json!(2));
    assert_eq!(stats["daily_activity"].as_array().unwrap().len(), 7);
    assert_eq!(stats["top_earners"][0]["account"], json!("kid"));
}

// ============================================================================
// Shop routes
// ============================================================================

async fn create_item(state: &Arc<AppState>, price: i64, stock: i64) -> String {
    let (status, body) = send(
        state,
        Method::POST,
        "/api/shop",
        Some(ADMIN_TOKEN),
        Some(json!({ "name": "Golden badge", "price": price, "stock": stock })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create item failed: {}", body);
    body["item"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_shop_purchase_flow() {
    let (_tmp, state) = test_state();
    let item_id = create_item(&state, 30, 1).await;

    // catalog is public
    let (status, body) = send(&state, Method::GET, "/api/shop", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // balance 20 < price 30 -> rejected, nothing recorded
    award(&state, USER_TOKEN, 20).await;
    let (status, body) = send(
        &state,
        Method::POST,
        &format!("/api/shop/{}/purchase", item_id),
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("insufficient tokens"));

    // top up and buy the single unit
    award(&state, USER_TOKEN, 20).await;
    let (status, body) = send(
        &state,
        Method::POST,
        &format!("/api/shop/{}/purchase", item_id),
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], json!(10));
    assert_eq!(body["purchase"]["tokens_spent"], json!(30));

    // stock exhausted: a second buyer is turned away
    award(&state, "sibling", 50).await;
    let (status, body) = send(
        &state,
        Method::POST,
        &format!("/api/shop/{}/purchase", item_id),
        Some("sibling"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("out of stock"));

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/shop/my-purchases",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["purchases"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shop_admin_crud_and_stats() {
    let (_tmp, state) = test_state();
    let item_id = create_item(&state, 10, -1).await;

    let (status, body) = send(
        &state,
        Method::PUT,
        &format!("/api/shop/{}", item_id),
        Some(ADMIN_TOKEN),
        Some(json!({ "price": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["price"], json!(12));

    award(&state, USER_TOKEN, 50).await;
    let (status, _) = send(
        &state,
        Method::POST,
        &format!("/api/shop/{}/purchase", item_id),
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &state,
        Method::GET,
        "/api/shop/admin/stats",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total_purchases"], json!(1));
    assert_eq!(body["stats"]["tokens_spent"], json!(12));

    // delete deactivates; the catalog empties but purchases survive
    let (status, _) = send(
        &state,
        Method::DELETE,
        &format!("/api/shop/{}", item_id),
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&state, Method::GET, "/api/shop", None, None).await;
    assert!(body["items"].as_array().unwrap().is_empty());

    let (_, body) = send(
        &state,
        Method::GET,
        "/api/shop/my-purchases",
        Some(USER_TOKEN),
        None,
    )
    .await;
    assert_eq!(body["purchases"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_shop_create_requires_admin() {
    let (_tmp, state) = test_state();

    let (status, _) = send(
        &state,
        Method::POST,
        "/api/shop",
        Some(USER_TOKEN),
        Some(json!({ "name": "Nope", "price": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let (_tmp, state) = test_state();

    let (status, body) = send(&state, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert!(body["version"].is_string());
}
