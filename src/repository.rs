//! Stake repository: where pool snapshots come from.
//!
//! The estimator never fetches anything itself. Callers obtain a snapshot of a
//! poll's open stakes through a `StakeRepository` and hand it over; the HTTP
//! client implements the trait, and `InMemoryStakes` serves tests and offline
//! previews.

use crate::domain::pool::{estimate, Estimate, PoolConvention};
use crate::domain::stake::Stake;
use crate::error::SdkError;
use crate::shared::{OptionId, PollId};

use async_lock::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Source of open-stake snapshots, one poll at a time.
#[allow(async_fn_in_trait)]
pub trait StakeRepository {
    /// Every open stake of `poll_id`. Unknown polls yield an empty snapshot
    /// or a not-found error, depending on the source.
    async fn open_stakes(&self, poll_id: &PollId) -> Result<Vec<Stake>, SdkError>;
}

/// Fetch a snapshot and estimate a hypothetical bet against it.
pub async fn quote<R: StakeRepository>(
    repo: &R,
    poll_id: &PollId,
    option: &OptionId,
    amount: Decimal,
) -> Result<Estimate, SdkError> {
    let stakes = repo.open_stakes(poll_id).await?;
    Ok(estimate(
        amount,
        option,
        &stakes,
        PoolConvention::ExcludesCandidate,
    ))
}

/// In-memory snapshots keyed by poll.
#[derive(Debug, Default)]
pub struct InMemoryStakes {
    polls: RwLock<HashMap<PollId, Vec<Stake>>>,
}

impl InMemoryStakes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot of a poll.
    pub async fn replace(&self, poll_id: PollId, stakes: Vec<Stake>) {
        self.polls.write().await.insert(poll_id, stakes);
    }

    /// Append one stake to a poll's snapshot.
    pub async fn push(&self, poll_id: PollId, stake: Stake) {
        self.polls.write().await.entry(poll_id).or_default().push(stake);
    }

    pub async fn clear(&self) {
        self.polls.write().await.clear();
    }
}

impl StakeRepository for InMemoryStakes {
    async fn open_stakes(&self, poll_id: &PollId) -> Result<Vec<Stake>, SdkError> {
        Ok(self
            .polls
            .read()
            .await
            .get(poll_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_from_in_memory_snapshot() {
        tokio_test::block_on(async {
            let repo = InMemoryStakes::new();
            let poll = PollId::from("p1");
            repo.replace(
                poll.clone(),
                vec![Stake::new("A", Decimal::from(800))],
            )
            .await;
            repo.push(poll.clone(), Stake::new("B", Decimal::from(100)))
                .await;

            let est = quote(&repo, &poll, &OptionId::from("B"), Decimal::from(100))
                .await
                .unwrap();
            assert_eq!(est.payout, Decimal::from(500));
        });
    }

    #[test]
    fn test_unknown_poll_is_empty_snapshot() {
        tokio_test::block_on(async {
            let repo = InMemoryStakes::new();
            let stakes = repo.open_stakes(&PollId::from("missing")).await.unwrap();
            assert!(stakes.is_empty());

            let est = quote(&repo, &PollId::from("missing"), &OptionId::from("A"), Decimal::from(20))
                .await
                .unwrap();
            assert_eq!(est.payout, Decimal::from(20));
        });
    }
}
