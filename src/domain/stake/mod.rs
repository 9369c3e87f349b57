//! Stake domain: wagers contributing to a poll's pool.

mod convert;
pub mod wire;

pub use convert::{bets_from_rows, open_stakes};

use crate::shared::{non_negative, OptionId, PollId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Stake ───────────────────────────────────────────────────────────────────

/// One wager's contribution to a pool: an option and a non-negative amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub option_id: OptionId,
    pub amount: Decimal,
}

impl Stake {
    /// Build a stake, clamping a negative amount to zero.
    pub fn new(option_id: impl Into<OptionId>, amount: Decimal) -> Self {
        Self {
            option_id: option_id.into(),
            amount: non_negative(amount),
        }
    }
}

// ─── BetStatus ───────────────────────────────────────────────────────────────

/// Lifecycle of a bet row. Only `Open` bets are part of a live pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    #[default]
    Open,
    /// Closed early by the bettor.
    Closed,
    Won,
    Lost,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl BetStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, BetStatus::Open)
    }
}

// ─── Bet ─────────────────────────────────────────────────────────────────────

/// A validated bet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub poll_id: PollId,
    pub user_id: UserId,
    pub stake: Stake,
    pub status: BetStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Bet> for Stake {
    fn from(bet: &Bet) -> Self {
        bet.stake.clone()
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StakeValidationError {
    Multiple(String, Vec<StakeValidationError>),
    MissingOption,
    /// Amount missing or not a finite numeric (e.g. Postgres `'NaN'`).
    InvalidAmount,
    NegativeAmount(Decimal),
}

impl fmt::Display for StakeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StakeValidationError::Multiple(id, errors) => {
                writeln!(f, "Bet validation errors ({id}):")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            StakeValidationError::MissingOption => write!(f, "Missing chosen option"),
            StakeValidationError::InvalidAmount => write!(f, "Amount is not a finite number"),
            StakeValidationError::NegativeAmount(v) => {
                write!(f, "Amount must not be negative, got {}", v)
            }
        }
    }
}

impl std::error::Error for StakeValidationError {}
