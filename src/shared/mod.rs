//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend sends, so they can be used directly in wire types
//! without conversion overhead.

pub mod fmt;
pub mod serde_util;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── OptionId ────────────────────────────────────────────────────────────────

/// Identifier of one option of a poll (the backend's `option_chosen`).
///
/// Compared byte-for-byte: `"Sim"` and `"sim"` are different buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(String);

impl OptionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OptionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OptionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for OptionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OptionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(OptionId(s))
    }
}

// ─── PollId / UserId ─────────────────────────────────────────────────────────

/// Poll ("enquete") identifier, a UUID string on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(String);

impl PollId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PollId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PollId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PollId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Account identifier of a bettor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ─── Amounts ─────────────────────────────────────────────────────────────────

/// Clamp a money amount to zero if negative.
pub fn non_negative(amount: Decimal) -> Decimal {
    if amount.is_sign_negative() {
        Decimal::ZERO
    } else {
        amount
    }
}

/// Convert a UI-supplied `f64` into a money amount.
///
/// Non-finite, negative and out-of-range values become zero, so a half-typed
/// input field never reaches the estimator as garbage.
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() || value <= 0.0 {
        if !value.is_finite() {
            tracing::warn!(value, "non-finite amount treated as zero");
        }
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::warn!(value, "amount out of decimal range treated as zero");
        Decimal::ZERO
    })
}
