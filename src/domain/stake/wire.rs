//! Wire types for bet rows (`simple_bets` table, REST).

use super::BetStatus;
use crate::shared::{serde_util, PollId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw bet row as returned by the backend.
///
/// `option_chosen` and `amount` are the only fields the estimator needs; the
/// rest identify the row for positions and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BetRow {
    pub id: String,
    pub poll_id: PollId,
    pub user_id: UserId,
    pub option_chosen: String,
    /// `None` when the backend sent something other than a finite numeric.
    #[serde(default, deserialize_with = "serde_util::decimal_flexible::lenient::deserialize")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub status: BetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
