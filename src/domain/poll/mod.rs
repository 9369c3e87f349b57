//! Poll domain: polls ("enquetes"), their options, status and outcome.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::domain::pool::Pool;
use crate::domain::stake::Stake;
use crate::shared::{OptionId, PollId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── PollStatus ──────────────────────────────────────────────────────────────

/// Poll lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollStatus {
    Open,
    Closed,
    Resolved,
    Cancelled,
}

impl PollStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PollStatus::Open => "open",
            PollStatus::Closed => "closed",
            PollStatus::Resolved => "resolved",
            PollStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "open" | "active" => Some(PollStatus::Open),
            "closed" => Some(PollStatus::Closed),
            "resolved" => Some(PollStatus::Resolved),
            "cancelled" | "canceled" => Some(PollStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for PollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// How a poll ended for one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Not resolved yet.
    Pending,
    Won,
    Lost,
    /// Cancelled: stakes are refunded.
    Void,
}

// ─── Poll ────────────────────────────────────────────────────────────────────

/// A selectable option of a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: OptionId,
    pub label: String,
}

/// A validated poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub options: Vec<PollOption>,
    pub status: PollStatus,
    pub winning_option: Option<OptionId>,
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    /// Accepting bets right now.
    pub fn is_open(&self) -> bool {
        self.is_open_at(Utc::now())
    }

    /// Accepting bets at `now`: open status and not past the closing time.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PollStatus::Open && self.closes_at.map_or(true, |closes| now < closes)
    }

    pub fn option(&self, id: &OptionId) -> Option<&PollOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    pub fn has_option(&self, id: &OptionId) -> bool {
        self.option(id).is_some()
    }

    pub fn option_ids(&self) -> impl Iterator<Item = &OptionId> {
        self.options.iter().map(|o| &o.id)
    }

    /// Outcome of a stake on `option` given the poll's current state.
    pub fn outcome_for(&self, option: &OptionId) -> Outcome {
        match (self.status, &self.winning_option) {
            (PollStatus::Cancelled, _) => Outcome::Void,
            (PollStatus::Resolved, Some(winner)) if winner == option => Outcome::Won,
            (PollStatus::Resolved, Some(_)) => Outcome::Lost,
            _ => Outcome::Pending,
        }
    }

    /// Pool over a stake snapshot, listing every option of this poll.
    pub fn pool<'a>(&self, stakes: impl IntoIterator<Item = &'a Stake>) -> Pool {
        Pool::with_options(self.option_ids().cloned(), stakes)
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PollValidationError {
    Multiple(String, Vec<PollValidationError>),
    MissingTitle,
    TooFewOptions(usize),
    BlankOption,
    DuplicateOption(String),
    InvalidStatus(String),
    UnknownWinningOption(String),
    MissingWinningOption,
}

impl fmt::Display for PollValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollValidationError::Multiple(id, errors) => {
                writeln!(f, "Poll validation errors ({id}):")?;
                for err in errors {
                    writeln!(f, "  - {}", err)?;
                }
                Ok(())
            }
            PollValidationError::MissingTitle => write!(f, "Missing title"),
            PollValidationError::TooFewOptions(n) => {
                write!(f, "A poll needs at least two options, got {}", n)
            }
            PollValidationError::BlankOption => write!(f, "Blank option id"),
            PollValidationError::DuplicateOption(id) => write!(f, "Duplicate option: {}", id),
            PollValidationError::InvalidStatus(s) => write!(f, "Invalid status: {}", s),
            PollValidationError::UnknownWinningOption(id) => {
                write!(f, "Winning option is not an option of the poll: {}", id)
            }
            PollValidationError::MissingWinningOption => {
                write!(f, "Resolved poll without a winning option")
            }
        }
    }
}

impl std::error::Error for PollValidationError {}
