//! HTTP client for communicating with tallyd.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tally_common::{
    AwardRequest, BalanceResponse, DailyClaimResponse, ErrorResponse, MutationResponse,
    PurchaseResponse, PurchasesResponse, QuizRequest, QuizResponse, RedeemRequest,
    ShopListResponse, ShopStatsResponse, TokenStatsResponse, TransactionsResponse,
};

/// Client for the tallyd HTTP API
pub struct TallydClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TallydClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut request = self.http.get(format!("{}{}", self.base_url, path));
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        Self::decode(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let mut request = self.http.post(format!("{}{}", self.base_url, path));
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::decode(request.send().await?).await
    }

    /// Decode a response, turning the daemon's `{ success: false, message }`
    /// body into an error the caller can show as-is.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => format!("daemon returned HTTP {}", status),
        };
        Err(anyhow!(message))
    }

    // ========================================================================
    // Token routes
    // ========================================================================

    pub async fn balance(&self) -> Result<BalanceResponse> {
        self.get_json("/api/tokens/balance").await
    }

    pub async fn transactions(&self) -> Result<TransactionsResponse> {
        self.get_json("/api/tokens/transactions").await
    }

    pub async fn award(
        &self,
        amount: i64,
        reason: &str,
        meta: Option<serde_json::Value>,
    ) -> Result<MutationResponse> {
        let req = AwardRequest {
            amount,
            reason: reason.to_string(),
            meta,
        };
        self.post_json("/api/tokens/award", Some(&req)).await
    }

    pub async fn redeem(
        &self,
        amount: i64,
        reason: &str,
        meta: Option<serde_json::Value>,
    ) -> Result<MutationResponse> {
        let req = RedeemRequest {
            amount,
            reason: reason.to_string(),
            meta,
        };
        self.post_json("/api/tokens/redeem", Some(&req)).await
    }

    pub async fn daily(&self) -> Result<DailyClaimResponse> {
        self.post_json::<DailyClaimResponse>("/api/tokens/daily", None::<&()>)
            .await
    }

    pub async fn quiz(&self, percentage: u32) -> Result<QuizResponse> {
        let req = QuizRequest { percentage };
        self.post_json("/api/tokens/quiz", Some(&req)).await
    }

    // ========================================================================
    // Shop routes
    // ========================================================================

    pub async fn shop_items(&self) -> Result<ShopListResponse> {
        self.get_json("/api/shop").await
    }

    pub async fn purchase(&self, item_id: &str) -> Result<PurchaseResponse> {
        self.post_json::<PurchaseResponse>(
            &format!("/api/shop/{}/purchase", item_id),
            None::<&()>,
        )
        .await
    }

    pub async fn my_purchases(&self) -> Result<PurchasesResponse> {
        self.get_json("/api/shop/my-purchases").await
    }

    // ========================================================================
    // Admin routes
    // ========================================================================

    pub async fn admin_stats(&self) -> Result<TokenStatsResponse> {
        self.get_json("/api/tokens/admin/stats").await
    }

    pub async fn shop_admin_stats(&self) -> Result<ShopStatsResponse> {
        self.get_json("/api/shop/admin/stats").await
    }

    pub async fn award_user(
        &self,
        account: &str,
        amount: i64,
        reason: &str,
    ) -> Result<MutationResponse> {
        let req = AwardRequest {
            amount,
            reason: reason.to_string(),
            meta: None,
        };
        self.post_json(&format!("/api/tokens/award-user/{}", account), Some(&req))
            .await
    }

    pub async fn user_transactions(&self, account: &str) -> Result<TransactionsResponse> {
        self.get_json(&format!("/api/tokens/user/{}", account)).await
    }
}
