//! Low-level HTTP client: `AposteiHttp`.
//!
//! One method per backend read. Returns wire types (conversion to domain types
//! happens at the client boundary). Queries use the table API's filter syntax
//! (`column=eq.value`).

use crate::domain::poll::wire::PollRow;
use crate::domain::stake::wire::BetRow;
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::network::REST_PATH;
use crate::shared::{PollId, UserId};

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const BET_COLUMNS: &str = "id,poll_id,user_id,option_chosen,amount,status,created_at";

/// Low-level HTTP client for the Apostei backend.
pub struct AposteiHttp {
    base_url: String,
    client: Client,
    /// Public project key, sent on every request.
    api_key: Option<String>,
    /// Signed-in user's access token. NEVER exposed publicly.
    access_token: Arc<RwLock<Option<String>>>,
}

impl AposteiHttp {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            api_key,
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = Arc::new(RwLock::new(token));
        self
    }

    pub(crate) async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Set or clear the user's access token.
    pub(crate) async fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write().await = token;
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PATH, table)
    }

    // ── Polls ────────────────────────────────────────────────────────────

    pub async fn get_poll(&self, poll_id: &PollId) -> Result<PollRow, HttpError> {
        let url = format!(
            "{}?id=eq.{}&select=*",
            self.table_url("polls"),
            urlencoding::encode(poll_id.as_str())
        );
        let rows: Vec<PollRow> = self.get(&url, RetryPolicy::Idempotent).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| HttpError::NotFound(format!("Poll not found: {}", poll_id)))
    }

    pub async fn get_open_polls(&self, limit: Option<u32>) -> Result<Vec<PollRow>, HttpError> {
        let mut url = format!(
            "{}?status=eq.open&order=created_at.desc&select=*",
            self.table_url("polls")
        );
        if let Some(l) = limit {
            url = format!("{}&limit={}", url, l);
        }
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Bets ─────────────────────────────────────────────────────────────

    /// Open bet rows of one poll: the live pool snapshot.
    pub async fn get_open_bets(&self, poll_id: &PollId) -> Result<Vec<BetRow>, HttpError> {
        let url = format!(
            "{}?poll_id=eq.{}&status=eq.open&select={}",
            self.table_url("simple_bets"),
            urlencoding::encode(poll_id.as_str()),
            BET_COLUMNS
        );
        self.get(&url, RetryPolicy::Idempotent).await
    }

    /// A user's bet rows, newest first.
    pub async fn get_user_bets(
        &self,
        user_id: &UserId,
        open_only: bool,
    ) -> Result<Vec<BetRow>, HttpError> {
        let mut url = format!(
            "{}?user_id=eq.{}&order=created_at.desc&select={}",
            self.table_url("simple_bets"),
            urlencoding::encode(user_id.as_str()),
            BET_COLUMNS
        );
        if open_only {
            url.push_str("&status=eq.open");
        }
        self.get(&url, RetryPolicy::Idempotent).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str, retry: RetryPolicy) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, retry).await
    }

    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let Some(config) = retry.config() else {
            return self.do_request(&method, url).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(&method, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if config.should_retry(&e) && attempt < config.max_retries {
                        let delay = config.delay_after(&e, attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Retrying request to {}",
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned>(
        &self,
        method: &reqwest::Method,
        url: &str,
    ) -> Result<T, HttpError> {
        let mut req = self
            .client
            .request(method.clone(), url)
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            req = req.header("apikey", key);
        }
        if let Some(token) = self.access_token().await.or_else(|| self.api_key.clone()) {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after_ms);
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 | 403 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// `Retry-After` in whole seconds, as milliseconds.
fn parse_retry_after_ms(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().map(|s| s.saturating_mul(1000))
}

impl Clone for AposteiHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            access_token: self.access_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = AposteiHttp::new("http://localhost:54321/", None).unwrap();
        assert_eq!(http.base_url(), "http://localhost:54321");
        assert_eq!(
            http.table_url("polls"),
            "http://localhost:54321/rest/v1/polls"
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after_ms("3"), Some(3000));
        assert_eq!(parse_retry_after_ms(" 1 "), Some(1000));
        assert_eq!(parse_retry_after_ms("Wed, 21 Oct 2026 07:28:00 GMT"), None);
    }

    #[tokio::test]
    async fn test_access_token_is_shared_between_clones() {
        let http = AposteiHttp::new("http://localhost:54321", Some("anon".to_string())).unwrap();
        let clone = http.clone();
        http.set_access_token(Some("jwt".to_string())).await;
        assert_eq!(clone.access_token.read().await.as_deref(), Some("jwt"));
    }
}
