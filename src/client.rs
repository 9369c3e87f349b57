//! High-level client: `AposteiClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared cache state, and accessor methods.

use crate::domain::poll::client::Polls;
use crate::domain::poll::Poll;
use crate::domain::pool::client::Pools;
use crate::domain::position::client::Positions;
use crate::domain::stake::Stake;
use crate::error::SdkError;
use crate::http::AposteiHttp;
use crate::repository::StakeRepository;
use crate::shared::PollId;

use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Re-export sub-client types for convenience.
pub use crate::domain::poll::client::Polls as PollsClient;
pub use crate::domain::pool::client::Pools as PoolsClient;
pub use crate::domain::position::client::Positions as PositionsClient;

/// The primary entry point for the Apostei SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.polls()`, `client.pools()`, `client.positions()`.
pub struct AposteiClient {
    pub(crate) http: AposteiHttp,
    /// Poll cache: id → (Poll, fetched_at)
    pub(crate) poll_cache: Arc<RwLock<HashMap<PollId, (Poll, Instant)>>>,
    /// Pool snapshot cache: poll id → (open stakes, fetched_at)
    pub(crate) stake_cache: Arc<RwLock<HashMap<PollId, (Vec<Stake>, Instant)>>>,
    pub(crate) poll_cache_ttl: Duration,
    /// Kept short: pools move with every bet.
    pub(crate) pool_cache_ttl: Duration,
}

impl AposteiClient {
    pub fn builder() -> AposteiClientBuilder {
        AposteiClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn polls(&self) -> Polls<'_> {
        Polls { client: self }
    }

    pub fn pools(&self) -> Pools<'_> {
        Pools { client: self }
    }

    pub fn positions(&self) -> Positions<'_> {
        Positions { client: self }
    }

    /// Sign in as a user (`Some`) or fall back to the anonymous key (`None`).
    pub async fn set_access_token(&self, token: Option<String>) {
        self.http.set_access_token(token).await;
    }

    /// Clear all HTTP caches.
    pub async fn clear_all_caches(&self) {
        self.poll_cache.write().await.clear();
        self.stake_cache.write().await.clear();
    }
}

impl StakeRepository for AposteiClient {
    async fn open_stakes(&self, poll_id: &PollId) -> Result<Vec<Stake>, SdkError> {
        self.pools().snapshot(poll_id).await
    }
}

impl Clone for AposteiClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            poll_cache: self.poll_cache.clone(),
            stake_cache: self.stake_cache.clone(),
            poll_cache_ttl: self.poll_cache_ttl,
            pool_cache_ttl: self.pool_cache_ttl,
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct AposteiClientBuilder {
    base_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
    poll_cache_ttl: Duration,
    pool_cache_ttl: Duration,
}

impl Default for AposteiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            api_key: None,
            access_token: None,
            poll_cache_ttl: Duration::from_secs(60),
            pool_cache_ttl: Duration::from_secs(5),
        }
    }
}

impl AposteiClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Public (anonymous) project key.
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Pre-set a signed-in user's access token on construction.
    pub fn access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn poll_cache_ttl(mut self, ttl: Duration) -> Self {
        self.poll_cache_ttl = ttl;
        self
    }

    /// Zero disables pool snapshot caching.
    pub fn pool_cache_ttl(mut self, ttl: Duration) -> Self {
        self.pool_cache_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<AposteiClient, SdkError> {
        if self.base_url.trim().is_empty() {
            return Err(SdkError::Validation("base_url must not be empty".to_string()));
        }
        let http =
            AposteiHttp::new(&self.base_url, self.api_key)?.with_access_token(self.access_token);
        Ok(AposteiClient {
            http,
            poll_cache: Arc::new(RwLock::new(HashMap::new())),
            stake_cache: Arc::new(RwLock::new(HashMap::new())),
            poll_cache_ttl: self.poll_cache_ttl,
            pool_cache_ttl: self.pool_cache_ttl,
        })
    }
}
