//! Wire types for poll rows (`polls` table, REST).

use crate::shared::PollId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One option as stored in the poll's `options` JSON column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollOptionRow {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Raw poll row as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollRow {
    pub id: PollId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub options: Vec<PollOptionRow>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_option: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
