//! Pools sub-client: live pool snapshots, quotes and odds.

use crate::client::AposteiClient;
use crate::domain::pool::{estimate_in_pool, Estimate, Pool, PoolConvention};
use crate::domain::stake::{open_stakes, Stake};
use crate::error::SdkError;
use crate::shared::{OptionId, PollId};
use rust_decimal::Decimal;
use std::time::Instant;

/// Sub-client for pool operations.
pub struct Pools<'a> {
    pub(crate) client: &'a AposteiClient,
}

impl<'a> Pools<'a> {
    /// Every open stake of a poll. Uses a short TTL cache; a zero TTL always
    /// refetches.
    pub async fn snapshot(&self, poll_id: &PollId) -> Result<Vec<Stake>, SdkError> {
        if let Some(stakes) = self.cached_snapshot(poll_id).await {
            return Ok(stakes);
        }

        let rows = self.client.http.get_open_bets(poll_id).await?;
        let stakes = open_stakes(rows);
        tracing::debug!(poll_id = %poll_id, stakes = stakes.len(), "fetched pool snapshot");

        self.cache_snapshot(poll_id, &stakes).await;
        Ok(stakes)
    }

    /// Current pool of a poll, listing every option even without volume.
    pub async fn pool(&self, poll_id: &PollId) -> Result<Pool, SdkError> {
        let poll = self.client.polls().get(poll_id).await?;
        let stakes = self.snapshot(poll_id).await?;
        Ok(poll.pool(&stakes))
    }

    /// Estimate a new bet. The poll must be open and offer `option`.
    pub async fn quote(
        &self,
        poll_id: &PollId,
        option: &OptionId,
        amount: Decimal,
    ) -> Result<Estimate, SdkError> {
        let poll = self.client.polls().get(poll_id).await?;
        if !poll.has_option(option) {
            return Err(SdkError::Validation(format!(
                "Option {} is not part of poll {}",
                option, poll_id
            )));
        }
        if !poll.is_open() {
            return Err(SdkError::Validation(format!(
                "Poll {} is not accepting bets ({})",
                poll_id, poll.status
            )));
        }
        let stakes = self.snapshot(poll_id).await?;
        Ok(estimate_in_pool(
            amount,
            option,
            &poll.pool(&stakes),
            PoolConvention::ExcludesCandidate,
        ))
    }

    /// Estimate a placed position of `amount` on `option`, already in the pool.
    pub async fn position_return(
        &self,
        poll_id: &PollId,
        option: &OptionId,
        amount: Decimal,
    ) -> Result<Estimate, SdkError> {
        let stakes = self.snapshot(poll_id).await?;
        Ok(estimate_in_pool(
            amount,
            option,
            &Pool::from_stakes(&stakes),
            PoolConvention::IncludesCandidate,
        ))
    }

    /// Implied probability and decimal odds of every option of a poll.
    pub async fn odds(
        &self,
        poll_id: &PollId,
    ) -> Result<Vec<(OptionId, Decimal, Option<Decimal>)>, SdkError> {
        let pool = self.pool(poll_id).await?;
        Ok(pool
            .probabilities()
            .into_iter()
            .map(|(option, probability)| {
                let odds = pool.decimal_odds(&option);
                (option, probability, odds)
            })
            .collect())
    }

    /// Drop a cached snapshot, e.g. right after placing a bet.
    pub async fn invalidate(&self, poll_id: &PollId) {
        self.client.stake_cache.write().await.remove(poll_id);
    }

    pub async fn clear_cache(&self) {
        self.client.stake_cache.write().await.clear();
    }

    async fn cached_snapshot(&self, poll_id: &PollId) -> Option<Vec<Stake>> {
        let ttl = self.client.pool_cache_ttl;
        if ttl.is_zero() {
            return None;
        }
        self.client
            .stake_cache
            .read()
            .await
            .get(poll_id)
            .filter(|(_, fetched_at)| fetched_at.elapsed() < ttl)
            .map(|(stakes, _)| stakes.clone())
    }

    async fn cache_snapshot(&self, poll_id: &PollId, stakes: &[Stake]) {
        if self.client.pool_cache_ttl.is_zero() {
            return;
        }
        self.client
            .stake_cache
            .write()
            .await
            .insert(poll_id.clone(), (stakes.to_vec(), Instant::now()));
    }
}
