//! HTTP client layer: `AposteiHttp` with per-request retry policies.

pub mod client;
pub mod retry;

pub use client::AposteiHttp;
pub use retry::{RetryConfig, RetryPolicy};
