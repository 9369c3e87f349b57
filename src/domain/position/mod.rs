//! Position domain: a user's open stakes per poll option, and the portfolio.
//!
//! A position is the sum of one user's open rows on one option of one poll.
//! Its return is estimated against the raw pool snapshot, which already holds
//! those rows exactly once, so no row is ever filtered out or re-added.

#[cfg(feature = "http")]
pub mod client;

use crate::domain::poll::{Outcome, Poll};
use crate::domain::pool::{estimate, estimate_in_pool, top_up_return, Estimate, PoolConvention};
use crate::domain::stake::{Bet, Stake};
use crate::error::SdkError;
use crate::shared::{non_negative, OptionId, PollId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Position ────────────────────────────────────────────────────────────────

/// A user's aggregate open stake on one option of one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub poll_id: PollId,
    pub option_id: OptionId,
    pub amount: Decimal,
    /// Number of rows merged into this position.
    pub bet_count: usize,
}

impl Position {
    /// Projected return if the option wins, against a snapshot that includes
    /// this position.
    pub fn estimate(&self, pool_stakes: &[Stake]) -> Estimate {
        estimate(
            self.amount,
            &self.option_id,
            pool_stakes,
            PoolConvention::IncludesCandidate,
        )
    }

    /// Projected return after adding `additional` to this position.
    pub fn top_up(&self, additional: Decimal, pool_stakes: &[Stake]) -> Decimal {
        top_up_return(self.amount, additional, &self.option_id, pool_stakes)
    }
}

/// Merge a user's open bets into one position per (poll, option).
///
/// Bets of other users and non-open bets are ignored. Output is ordered by
/// poll then option.
pub fn positions_from_bets<'a>(
    user_id: &UserId,
    bets: impl IntoIterator<Item = &'a Bet>,
) -> Vec<Position> {
    let mut merged: BTreeMap<(PollId, OptionId), (Decimal, usize)> = BTreeMap::new();
    for bet in bets {
        if &bet.user_id != user_id || !bet.status.is_open() {
            continue;
        }
        let entry = merged
            .entry((bet.poll_id.clone(), bet.stake.option_id.clone()))
            .or_insert((Decimal::ZERO, 0));
        entry.0 = entry.0.saturating_add(non_negative(bet.stake.amount));
        entry.1 += 1;
    }
    merged
        .into_iter()
        .map(|((poll_id, option_id), (amount, bet_count))| Position {
            poll_id,
            option_id,
            amount,
            bet_count,
        })
        .collect()
}

// ─── PositionView ────────────────────────────────────────────────────────────

/// A position with its projection, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionView {
    pub position: Position,
    pub poll_title: Option<String>,
    pub outcome: Outcome,
    pub estimate: Estimate,
    /// Implied probability of the position's option in the snapshot.
    pub probability: Decimal,
}

impl PositionView {
    /// Evaluate a position against a pool snapshot, without poll details.
    pub fn evaluate(position: Position, pool_stakes: &[Stake]) -> Self {
        let pool = crate::domain::pool::Pool::from_stakes(pool_stakes);
        let estimate = estimate_in_pool(
            position.amount,
            &position.option_id,
            &pool,
            PoolConvention::IncludesCandidate,
        );
        let probability = pool.implied_probability(&position.option_id);
        Self {
            position,
            poll_title: None,
            outcome: Outcome::Pending,
            estimate,
            probability,
        }
    }

    /// Evaluate a position in a known poll; resolution overrides projection.
    pub fn evaluate_in_poll(position: Position, poll: &Poll, pool_stakes: &[Stake]) -> Self {
        let pool = poll.pool(pool_stakes);
        let estimate = estimate_in_pool(
            position.amount,
            &position.option_id,
            &pool,
            PoolConvention::IncludesCandidate,
        );
        let probability = pool.implied_probability(&position.option_id);
        let outcome = poll.outcome_for(&position.option_id);
        Self {
            position,
            poll_title: Some(poll.title.clone()),
            outcome,
            estimate,
            probability,
        }
    }

    /// Evaluate against the result of a poll lookup. A poll that is gone or
    /// no longer validates falls back to the snapshot alone; other errors
    /// propagate.
    pub fn evaluate_fetched(
        position: Position,
        poll: Result<Poll, SdkError>,
        pool_stakes: &[Stake],
    ) -> Result<Self, SdkError> {
        match poll {
            Ok(poll) => Ok(Self::evaluate_in_poll(position, &poll, pool_stakes)),
            Err(e) if e.is_not_found() || matches!(e, SdkError::Validation(_)) => {
                tracing::warn!(poll_id = %position.poll_id, error = %e, "poll unavailable");
                Ok(Self::evaluate(position, pool_stakes))
            }
            Err(e) => Err(e),
        }
    }

    /// What the position is expected to pay out given its outcome so far.
    pub fn projected_payout(&self) -> Decimal {
        match self.outcome {
            Outcome::Pending | Outcome::Won => self.estimate.payout,
            Outcome::Lost => Decimal::ZERO,
            Outcome::Void => self.position.amount,
        }
    }

    pub fn projected_profit(&self) -> Decimal {
        self.projected_payout() - self.position.amount
    }
}

// ─── Portfolio ───────────────────────────────────────────────────────────────

/// All of a user's open positions with totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: UserId,
    pub positions: Vec<PositionView>,
    pub total_staked: Decimal,
    pub total_payout: Decimal,
    pub total_profit: Decimal,
}

impl Portfolio {
    pub fn build(user_id: UserId, positions: Vec<PositionView>) -> Self {
        let mut total_staked = Decimal::ZERO;
        let mut total_payout = Decimal::ZERO;
        for view in &positions {
            total_staked = total_staked.saturating_add(view.position.amount);
            total_payout = total_payout.saturating_add(view.projected_payout());
        }
        Self {
            user_id,
            positions,
            total_staked,
            total_payout,
            total_profit: total_payout - total_staked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::poll::wire::{PollOptionRow, PollRow};
    use crate::domain::stake::BetStatus;
    use crate::error::HttpError;
    use chrono::Utc;

    fn bet(id: &str, user: &str, poll: &str, option: &str, amount: i64, status: BetStatus) -> Bet {
        Bet {
            id: id.to_string(),
            poll_id: poll.into(),
            user_id: user.into(),
            stake: Stake::new(option, Decimal::from(amount)),
            status,
            created_at: None,
        }
    }

    fn poll(status: &str, winner: Option<&str>) -> Poll {
        Poll::try_from(PollRow {
            id: "p1".into(),
            title: Some("Vai chover?".to_string()),
            description: None,
            category: None,
            options: vec![
                PollOptionRow {
                    id: "A".to_string(),
                    label: None,
                },
                PollOptionRow {
                    id: "B".to_string(),
                    label: None,
                },
            ],
            status: status.to_string(),
            winning_option: winner.map(str::to_string),
            closes_at: None,
            created_at: Utc::now(),
        })
        .unwrap()
    }

    #[test]
    fn test_positions_merge_rows_per_option() {
        let bets = vec![
            bet("1", "u1", "p1", "A", 30, BetStatus::Open),
            bet("2", "u1", "p1", "A", 20, BetStatus::Open),
            bet("3", "u1", "p1", "B", 10, BetStatus::Open),
            bet("4", "u2", "p1", "A", 99, BetStatus::Open),
            bet("5", "u1", "p2", "A", 5, BetStatus::Closed),
        ];
        let positions = positions_from_bets(&UserId::from("u1"), &bets);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].option_id.as_str(), "A");
        assert_eq!(positions[0].amount, Decimal::from(50));
        assert_eq!(positions[0].bet_count, 2);
        assert_eq!(positions[1].option_id.as_str(), "B");
    }

    #[test]
    fn test_position_counted_once_in_raw_snapshot() {
        // u1 has two rows on A totalling 50; the raw pool holds them once.
        let bets = vec![
            bet("1", "u1", "p1", "A", 25, BetStatus::Open),
            bet("2", "u1", "p1", "A", 25, BetStatus::Open),
            bet("3", "u2", "p1", "A", 50, BetStatus::Open),
            bet("4", "u3", "p1", "B", 100, BetStatus::Open),
        ];
        let snapshot: Vec<Stake> = bets.iter().map(Stake::from).collect();
        let position = positions_from_bets(&UserId::from("u1"), &bets).remove(0);
        let view = PositionView::evaluate(position, &snapshot);
        assert_eq!(view.estimate.payout, Decimal::from(100));
        assert_eq!(view.probability, Decimal::ONE / Decimal::TWO);
    }

    #[test]
    fn test_top_up_preview() {
        let snapshot = vec![Stake::new("A", Decimal::from(900)), Stake::new("B", Decimal::from(100))];
        let position = Position {
            poll_id: "p1".into(),
            option_id: "B".into(),
            amount: Decimal::from(100),
            bet_count: 1,
        };
        assert_eq!(position.estimate(&snapshot).payout, Decimal::from(1000));
        assert_eq!(position.top_up(Decimal::from(100), &snapshot), Decimal::from(1100));
    }

    #[test]
    fn test_resolution_overrides_projection() {
        let snapshot = vec![Stake::new("A", Decimal::from(50)), Stake::new("B", Decimal::from(50))];
        let position = Position {
            poll_id: "p1".into(),
            option_id: "A".into(),
            amount: Decimal::from(50),
            bet_count: 1,
        };

        let pending = PositionView::evaluate_in_poll(position.clone(), &poll("open", None), &snapshot);
        assert_eq!(pending.projected_payout(), Decimal::from(100));

        let lost = PositionView::evaluate_in_poll(position.clone(), &poll("resolved", Some("B")), &snapshot);
        assert_eq!(lost.outcome, Outcome::Lost);
        assert_eq!(lost.projected_payout(), Decimal::ZERO);
        assert_eq!(lost.projected_profit(), Decimal::from(-50));

        let void = PositionView::evaluate_in_poll(position, &poll("cancelled", None), &snapshot);
        assert_eq!(void.projected_payout(), Decimal::from(50));
        assert_eq!(void.poll_title.as_deref(), Some("Vai chover?"));
    }

    #[test]
    fn test_portfolio_totals() {
        let snapshot = vec![Stake::new("A", Decimal::from(100)), Stake::new("B", Decimal::from(100))];
        let a = Position {
            poll_id: "p1".into(),
            option_id: "A".into(),
            amount: Decimal::from(100),
            bet_count: 1,
        };
        let b = Position {
            option_id: "B".into(),
            ..a.clone()
        };
        let portfolio = Portfolio::build(
            UserId::from("u1"),
            vec![
                PositionView::evaluate(a, &snapshot),
                PositionView::evaluate(b, &snapshot),
            ],
        );
        assert_eq!(portfolio.total_staked, Decimal::from(200));
        assert_eq!(portfolio.total_payout, Decimal::from(400));
        assert_eq!(portfolio.total_profit, Decimal::from(200));
        assert!(!portfolio.is_empty());
    }

    #[test]
    fn test_unavailable_poll_falls_back_to_snapshot() {
        let snapshot = vec![Stake::new("A", Decimal::from(50)), Stake::new("B", Decimal::from(50))];
        let position = Position {
            poll_id: "p1".into(),
            option_id: "A".into(),
            amount: Decimal::from(50),
            bet_count: 1,
        };

        let resolved = PositionView::evaluate_fetched(
            position.clone(),
            Ok(poll("resolved", Some("B"))),
            &snapshot,
        )
        .unwrap();
        assert_eq!(resolved.outcome, Outcome::Lost);

        let missing: Result<Poll, SdkError> = Err(HttpError::NotFound("p1".to_string()).into());
        let view = PositionView::evaluate_fetched(position.clone(), missing, &snapshot).unwrap();
        assert_eq!(view.outcome, Outcome::Pending);
        assert_eq!(view.poll_title, None);
        assert_eq!(view.projected_payout(), Decimal::from(100));

        let invalid = Err(SdkError::Validation("no title".to_string()));
        let view = PositionView::evaluate_fetched(position.clone(), invalid, &snapshot).unwrap();
        assert_eq!(view.estimate.payout, Decimal::from(100));

        let denied: Result<Poll, SdkError> = Err(HttpError::Unauthorized.into());
        let err = PositionView::evaluate_fetched(position, denied, &snapshot).unwrap_err();
        assert!(matches!(err, SdkError::Http(HttpError::Unauthorized)));
    }
}
