//! Pool domain: stakes of one poll aggregated by option, odds display.
//!
//! A `Pool` is rebuilt from a stake snapshot on every call and never shared
//! between calls. Its figures are display mirrors of the backend's odds; the
//! authoritative pool lives server-side and may have moved since the snapshot.

#[cfg(feature = "http")]
pub mod client;
pub mod estimate;

pub use estimate::{
    estimate, estimate_in_pool, existing_position_return, potential_return, top_up_return,
    Estimate, PoolConvention,
};

use crate::domain::stake::Stake;
use crate::shared::{non_negative, OptionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Pool ────────────────────────────────────────────────────────────────────

/// Sum of stake amounts grouped by option.
///
/// Deserialization replays every bucket through `add`, so negative buckets
/// clamp to zero and the overflow flag is restored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PoolBuckets")]
pub struct Pool {
    buckets: BTreeMap<OptionId, Decimal>,
    /// Set when a sum exceeded `Decimal::MAX`; figures are then unreliable.
    #[serde(skip)]
    saturated: bool,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a stake snapshot. Negative amounts count as zero.
    pub fn from_stakes<'a>(stakes: impl IntoIterator<Item = &'a Stake>) -> Self {
        let mut pool = Self::new();
        for stake in stakes {
            pool.add(&stake.option_id, stake.amount);
        }
        pool
    }

    /// Aggregate a snapshot, listing every known option even with no volume.
    pub fn with_options<'a>(
        options: impl IntoIterator<Item = OptionId>,
        stakes: impl IntoIterator<Item = &'a Stake>,
    ) -> Self {
        let mut pool = Self::new();
        for option in options {
            pool.buckets.entry(option).or_insert(Decimal::ZERO);
        }
        for stake in stakes {
            pool.add(&stake.option_id, stake.amount);
        }
        pool
    }

    /// Add an amount to an option's bucket, creating it if absent.
    pub fn add(&mut self, option: &OptionId, amount: Decimal) {
        let amount = non_negative(amount);
        let bucket = self.buckets.entry(option.clone()).or_insert(Decimal::ZERO);
        match bucket.checked_add(amount) {
            Some(sum) => *bucket = sum,
            None => {
                *bucket = Decimal::MAX;
                self.saturated = true;
            }
        }
    }

    /// A copy of this pool with one more stake on `option`.
    pub fn with_stake(&self, option: &OptionId, amount: Decimal) -> Self {
        let mut pool = self.clone();
        pool.add(option, amount);
        pool
    }

    /// Volume staked on `option` (zero for unknown options).
    pub fn volume(&self, option: &OptionId) -> Decimal {
        self.buckets.get(option).copied().unwrap_or(Decimal::ZERO)
    }

    /// Volume across all options.
    pub fn total(&self) -> Decimal {
        let mut total = Decimal::ZERO;
        for amount in self.buckets.values() {
            match total.checked_add(*amount) {
                Some(sum) => total = sum,
                None => return Decimal::MAX,
            }
        }
        total
    }

    /// True if any sum in this pool overflowed.
    pub fn is_saturated(&self) -> bool {
        self.saturated || self.total() == Decimal::MAX
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionId> {
        self.buckets.keys()
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&OptionId, &Decimal)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Share of the pool staked on `option`, in `[0, 1]`.
    ///
    /// An empty pool splits evenly across the known options. Each share is
    /// carried at full `Decimal` precision, so thirds and the like sum to
    /// slightly under one; use `probabilities` for a set that sums to one.
    pub fn implied_probability(&self, option: &OptionId) -> Decimal {
        let total = self.total();
        if total.is_zero() {
            if !self.buckets.contains_key(option) {
                return Decimal::ZERO;
            }
            return Decimal::ONE
                .checked_div(Decimal::from(self.buckets.len()))
                .unwrap_or(Decimal::ZERO);
        }
        self.volume(option)
            .checked_div(total)
            .unwrap_or(Decimal::ZERO)
    }

    /// Decimal odds `total / bucket`: the payout multiplier a marginal stake
    /// on `option` would get. `None` while nobody has staked on it.
    pub fn decimal_odds(&self, option: &OptionId) -> Option<Decimal> {
        let volume = self.volume(option);
        if volume.is_zero() {
            return None;
        }
        self.total().checked_div(volume)
    }

    /// Implied probabilities of every option, in option order.
    ///
    /// The rounding remainder goes to the last option so the list sums to
    /// exactly one.
    pub fn probabilities(&self) -> Vec<(OptionId, Decimal)> {
        let mut probabilities: Vec<(OptionId, Decimal)> = self
            .buckets
            .keys()
            .map(|option| (option.clone(), self.implied_probability(option)))
            .collect();
        let assigned: Decimal = probabilities.iter().map(|(_, p)| *p).sum();
        if let Some((_, last)) = probabilities.last_mut() {
            if !assigned.is_zero() {
                *last += Decimal::ONE - assigned;
            }
        }
        probabilities
    }
}

#[derive(Deserialize)]
struct PoolBuckets {
    buckets: BTreeMap<OptionId, Decimal>,
}

impl From<PoolBuckets> for Pool {
    fn from(source: PoolBuckets) -> Self {
        let mut pool = Pool::new();
        for (option, amount) in &source.buckets {
            pool.add(option, *amount);
        }
        pool
    }
}

impl<'a> FromIterator<&'a Stake> for Pool {
    fn from_iter<I: IntoIterator<Item = &'a Stake>>(iter: I) -> Self {
        Pool::from_stakes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn stake(option: &str, amount: i64) -> Stake {
        Stake::new(option, Decimal::from(amount))
    }

    fn opt(s: &str) -> OptionId {
        OptionId::from(s)
    }

    #[test]
    fn test_from_stakes_groups_by_option() {
        let stakes = vec![stake("A", 50), stake("A", 50), stake("B", 100)];
        let pool = Pool::from_stakes(&stakes);
        assert_eq!(pool.volume(&opt("A")), Decimal::from(100));
        assert_eq!(pool.volume(&opt("B")), Decimal::from(100));
        assert_eq!(pool.volume(&opt("C")), Decimal::ZERO);
        assert_eq!(pool.total(), Decimal::from(200));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_negative_stake_counts_as_zero() {
        let stakes = vec![
            Stake {
                option_id: opt("A"),
                amount: Decimal::from(-40),
            },
            stake("B", 10),
        ];
        let pool: Pool = stakes.iter().collect();
        assert_eq!(pool.volume(&opt("A")), Decimal::ZERO);
        assert_eq!(pool.total(), Decimal::from(10));
    }

    #[test]
    fn test_with_stake_does_not_mutate_original() {
        let stakes = vec![stake("A", 100)];
        let pool = Pool::from_stakes(&stakes);
        let after = pool.with_stake(&opt("B"), Decimal::from(100));
        assert_eq!(pool.total(), Decimal::from(100));
        assert_eq!(after.total(), Decimal::from(200));
    }

    #[test]
    fn test_implied_probability() {
        let stakes = vec![stake("A", 900), stake("B", 100)];
        let pool = Pool::from_stakes(&stakes);
        assert_eq!(pool.implied_probability(&opt("A")), Decimal::from_str("0.9").unwrap());
        assert_eq!(pool.implied_probability(&opt("B")), Decimal::from_str("0.1").unwrap());
        assert_eq!(pool.implied_probability(&opt("C")), Decimal::ZERO);
    }

    #[test]
    fn test_implied_probability_empty_pool_splits_evenly() {
        let pool = Pool::with_options(vec![opt("Sim"), opt("Não")], &Vec::<Stake>::new());
        assert_eq!(pool.implied_probability(&opt("Sim")), Decimal::from_str("0.5").unwrap());
        assert_eq!(pool.implied_probability(&opt("Talvez")), Decimal::ZERO);
        assert_eq!(Pool::new().implied_probability(&opt("Sim")), Decimal::ZERO);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let stakes = vec![stake("A", 30), stake("B", 50), stake("C", 20)];
        let pool = Pool::from_stakes(&stakes);
        let sum: Decimal = pool.probabilities().iter().map(|(_, p)| *p).sum();
        assert_eq!(sum, Decimal::ONE);
    }

    #[test]
    fn test_probabilities_sum_to_one_with_thirds() {
        let empty = Pool::with_options(vec![opt("A"), opt("B"), opt("C")], &Vec::<Stake>::new());
        let shares = empty.probabilities();
        assert_eq!(shares.iter().map(|(_, p)| *p).sum::<Decimal>(), Decimal::ONE);
        assert!(shares[2].1 >= shares[0].1);
        assert_ne!(
            empty.implied_probability(&opt("A")) * Decimal::from(3),
            Decimal::ONE
        );

        let stakes = vec![stake("A", 10), stake("B", 10), stake("C", 10)];
        let even = Pool::from_stakes(&stakes);
        assert_eq!(
            even.probabilities().iter().map(|(_, p)| *p).sum::<Decimal>(),
            Decimal::ONE
        );
    }

    #[test]
    fn test_decimal_odds() {
        let stakes = vec![stake("A", 900), stake("B", 100)];
        let pool = Pool::with_options(vec![opt("C")], &stakes);
        assert_eq!(pool.decimal_odds(&opt("B")), Some(Decimal::from(10)));
        assert_eq!(pool.decimal_odds(&opt("C")), None);
    }

    #[test]
    fn test_overflow_saturates() {
        let stakes = vec![
            Stake::new("A", Decimal::MAX),
            Stake::new("A", Decimal::MAX),
        ];
        let pool = Pool::from_stakes(&stakes);
        assert!(pool.is_saturated());
        assert_eq!(pool.volume(&opt("A")), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_restores_invariants() {
        let pool = Pool::from_stakes(&[stake("A", 30), stake("B", 70)]);
        let json = serde_json::to_string(&pool).unwrap();
        let back: Pool = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pool);

        let crafted: Pool =
            serde_json::from_str(r#"{"buckets": {"A": "-10", "B": "5"}}"#).unwrap();
        assert_eq!(crafted.volume(&opt("A")), Decimal::ZERO);
        assert_eq!(crafted.total(), Decimal::from(5));

        let max = Decimal::MAX.to_string();
        let overflowing = format!(r#"{{"buckets": {{"A": "{max}", "B": "{max}"}}}}"#);
        let saturated: Pool = serde_json::from_str(&overflowing).unwrap();
        assert!(saturated.is_saturated());
    }
}
