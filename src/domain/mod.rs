//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types (validated, business-logic-ready)
//! - `wire.rs`: Raw serde structs matching backend rows
//! - `convert.rs`: `TryFrom` conversions with validation
//! - `client.rs`: Sub-client with HTTP methods and caching

pub mod poll;
pub mod pool;
pub mod position;
pub mod stake;
