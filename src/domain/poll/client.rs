//! Polls sub-client: fetch, list, cache.

use crate::client::AposteiClient;
use crate::domain::poll::{Poll, PollValidationError};
use crate::error::SdkError;
use crate::shared::PollId;
use std::time::Instant;

/// Sub-client for poll operations.
pub struct Polls<'a> {
    pub(crate) client: &'a AposteiClient,
}

impl<'a> Polls<'a> {
    /// Get a poll by id. Uses TTL cache.
    pub async fn get(&self, poll_id: &PollId) -> Result<Poll, SdkError> {
        {
            let cache = self.client.poll_cache.read().await;
            if let Some((poll, fetched_at)) = cache.get(poll_id) {
                if fetched_at.elapsed() < self.client.poll_cache_ttl {
                    return Ok(poll.clone());
                }
            }
        }

        let row = self.client.http.get_poll(poll_id).await?;
        let poll: Poll = row
            .try_into()
            .map_err(|e: PollValidationError| SdkError::Validation(e.to_string()))?;
        self.cache_poll(&poll).await;
        Ok(poll)
    }

    /// Open polls, newest first. Rows that fail validation are skipped.
    pub async fn open(&self, limit: Option<u32>) -> Result<Vec<Poll>, SdkError> {
        let rows = self.client.http.get_open_polls(limit).await?;
        let mut polls = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match Poll::try_from(row) {
                Ok(poll) => {
                    self.cache_poll(&poll).await;
                    polls.push(poll);
                }
                Err(e) => tracing::warn!(poll_id = %id, "Skipping invalid poll: {}", e),
            }
        }
        Ok(polls)
    }

    /// Invalidate a cached poll.
    pub async fn invalidate(&self, poll_id: &PollId) {
        self.client.poll_cache.write().await.remove(poll_id);
    }

    pub async fn clear_cache(&self) {
        self.client.poll_cache.write().await.clear();
    }

    async fn cache_poll(&self, poll: &Poll) {
        self.client
            .poll_cache
            .write()
            .await
            .insert(poll.id.clone(), (poll.clone(), Instant::now()));
    }
}
