//! # Apostei SDK
//!
//! A Rust SDK for the Apostei prediction market: validated poll and bet
//! types, parimutuel return estimates, and an HTTP client for the backend.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: Types, pool aggregation, return estimator (always available, no I/O)
//! 2. **Repository**: `StakeRepository`, the seam pool snapshots come through
//! 3. **HTTP API**: `AposteiHttp` with per-request retry policies
//! 4. **High-Level Client**: `AposteiClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apostei_sdk::prelude::*;
//!
//! let client = AposteiClient::builder()
//!     .base_url("https://project.supabase.co")
//!     .api_key("anon-key")
//!     .build()?;
//!
//! let poll_id = PollId::from("poll_id");
//! let quote = client.pools().quote(&poll_id, &OptionId::from("sim"), Decimal::from(50)).await?;
//! println!("{}", display_money(&quote.payout));
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and display formatting used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Repository ──────────────────────────────────────────────────────

/// Pool snapshot sources.
pub mod repository;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `AposteiClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{OptionId, PollId, UserId};

    // Display formatting
    pub use crate::shared::fmt::money::{
        abbr_money, display_money, display_multiplier, display_percent, display_profit,
        round_money,
    };

    // Domain types: poll
    pub use crate::domain::poll::{Outcome, Poll, PollOption, PollStatus, PollValidationError};

    // Domain types: stake
    pub use crate::domain::stake::{Bet, BetStatus, Stake, StakeValidationError};

    // Domain types: pool + estimator
    pub use crate::domain::pool::{
        estimate, estimate_in_pool, existing_position_return, potential_return, top_up_return,
        Estimate, Pool, PoolConvention,
    };

    // Domain types: position + portfolio
    pub use crate::domain::position::{positions_from_bets, Portfolio, Position, PositionView};

    // Repository
    pub use crate::repository::{quote, InMemoryStakes, StakeRepository};

    // Errors
    pub use crate::error::{HttpError, SdkError};

    // Network
    pub use crate::network::DEFAULT_API_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AposteiClient, AposteiClientBuilder, PollsClient, PoolsClient, PositionsClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    pub use rust_decimal::Decimal;
}
