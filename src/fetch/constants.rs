//! Timeout defaults for the fetch layer.

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout for page and PDF fetches (20 seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 20;

/// Timeout for the router's DOI redirect probe (15 seconds).
pub const DOI_REDIRECT_TIMEOUT_SECS: u64 = 15;
