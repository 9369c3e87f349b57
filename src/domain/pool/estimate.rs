//! Parimutuel return estimator.
//!
//! Winners take back their stake plus a share of the losing pool proportional
//! to their share of the winning pool:
//!
//! ```text
//! winnings = losing_pool * stake / winning_pool
//! payout   = stake + winnings
//! ```
//!
//! Results are a projection over a snapshot ("retorno potencial"). The
//! backend settles against its own pool, which may differ by then.
//!
//! No function here panics or errors: invalid inputs are clamped and
//! degenerate pools fall back to returning the stake unchanged.

use super::Pool;
use crate::domain::stake::Stake;
use crate::shared::{non_negative, OptionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether the supplied pool already contains the stake being estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolConvention {
    /// Hypothetical bet: the stake is added to its option's bucket first.
    ExcludesCandidate,
    /// Placed bet: the pool already holds the stake exactly once.
    IncludesCandidate,
}

/// Projected outcome of one stake if its option wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub stake: Decimal,
    /// Total received if the option wins (stake + winnings).
    pub payout: Decimal,
    pub profit: Decimal,
    /// Pool figures the estimate was computed against (post-bet).
    pub total_pool: Decimal,
    pub winning_pool: Decimal,
    pub losing_pool: Decimal,
    /// Fraction of the winning pool owned by the stake.
    pub share: Decimal,
}

impl Estimate {
    fn break_even(stake: Decimal, total_pool: Decimal, winning_pool: Decimal) -> Self {
        Self {
            stake,
            payout: stake,
            profit: Decimal::ZERO,
            total_pool,
            winning_pool,
            losing_pool: non_negative(total_pool.checked_sub(winning_pool).unwrap_or_default()),
            share: Decimal::ZERO,
        }
    }

    /// `profit / stake`; zero for a zero stake.
    pub fn rate_of_return(&self) -> Decimal {
        self.profit.checked_div(self.stake).unwrap_or(Decimal::ZERO)
    }

    /// `payout / stake`; one for a zero stake.
    pub fn multiplier(&self) -> Decimal {
        self.payout.checked_div(self.stake).unwrap_or(Decimal::ONE)
    }
}

/// Estimate a stake against an already aggregated pool.
pub fn estimate_in_pool(
    amount: Decimal,
    option: &OptionId,
    pool: &Pool,
    convention: PoolConvention,
) -> Estimate {
    let stake = non_negative(amount);

    let post_bet;
    let pool = match convention {
        PoolConvention::ExcludesCandidate => {
            post_bet = pool.with_stake(option, stake);
            &post_bet
        }
        PoolConvention::IncludesCandidate => pool,
    };

    let total_pool = pool.total();
    let winning_pool = pool.volume(option);

    if pool.is_saturated() {
        tracing::warn!(option = %option, "pool volume overflowed, estimating break-even");
        return Estimate::break_even(stake, total_pool, winning_pool);
    }
    if stake.is_zero() || winning_pool <= Decimal::ZERO {
        return Estimate::break_even(stake, total_pool, winning_pool);
    }
    if stake > winning_pool {
        tracing::debug!(
            option = %option,
            stake = %stake,
            winning_pool = %winning_pool,
            "stake exceeds its own bucket; the pool snapshot probably does not include it"
        );
    }

    let losing_pool = non_negative(total_pool - winning_pool);
    let share = stake.checked_div(winning_pool).unwrap_or(Decimal::ZERO);

    // Multiply before dividing to keep the fraction exact where possible.
    let winnings = losing_pool
        .checked_mul(stake)
        .and_then(|v| v.checked_div(winning_pool))
        .or_else(|| losing_pool.checked_mul(share));

    let Some(payout) = winnings.and_then(|w| stake.checked_add(w)) else {
        tracing::warn!(option = %option, "payout overflowed, estimating break-even");
        return Estimate::break_even(stake, total_pool, winning_pool);
    };

    let estimate = Estimate {
        stake,
        payout,
        profit: payout - stake,
        total_pool,
        winning_pool,
        losing_pool,
        share,
    };
    tracing::trace!(option = %option, stake = %stake, payout = %payout, "estimated return");
    estimate
}

/// Estimate a stake against a stake snapshot, with the convention explicit.
pub fn estimate(
    amount: Decimal,
    option: &OptionId,
    stakes: &[Stake],
    convention: PoolConvention,
) -> Estimate {
    estimate_in_pool(amount, option, &Pool::from_stakes(stakes), convention)
}

/// Payout of a hypothetical new bet, not yet part of `stakes`.
pub fn potential_return(amount: Decimal, option: &OptionId, stakes: &[Stake]) -> Decimal {
    estimate(amount, option, stakes, PoolConvention::ExcludesCandidate).payout
}

/// Payout of a placed bet already counted in `stakes`.
pub fn existing_position_return(amount: Decimal, option: &OptionId, stakes: &[Stake]) -> Decimal {
    estimate(amount, option, stakes, PoolConvention::IncludesCandidate).payout
}

/// Payout of an existing position (already in `stakes`) after adding more to it.
pub fn top_up_return(
    existing: Decimal,
    additional: Decimal,
    option: &OptionId,
    stakes: &[Stake],
) -> Decimal {
    let additional = non_negative(additional);
    let pool = Pool::from_stakes(stakes).with_stake(option, additional);
    let combined = non_negative(existing).saturating_add(additional);
    estimate_in_pool(combined, option, &pool, PoolConvention::IncludesCandidate).payout
}
