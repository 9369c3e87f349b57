//! Network URL constants for the Apostei SDK.

/// Default backend base URL (local development stack).
pub const DEFAULT_API_URL: &str = "http://localhost:54321";

/// REST path prefix of the table API.
pub const REST_PATH: &str = "/rest/v1";
