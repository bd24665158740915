//! Shared User-Agent string for every outbound request.
//!
//! Several publishers reject clients that do not look like a browser, so the
//! fetch client sends a browser-style identity by default. The tool name and
//! version are appended as a product token so traffic stays attributable.

/// Browser portion of the default User-Agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default User-Agent for fetch requests.
#[must_use]
pub fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("{BROWSER_USER_AGENT} paper-downloader/{version}")
}
