//! Browser-less login against the identity provider.
//!
//! The booking service delegates sign-in to a hosted identity provider that
//! expects a browser: it hands out a transaction state in HTML, protects each
//! form post with a rotating CSRF cookie and returns an authorization code via
//! redirect. [`AuthFlow`] walks those pages with a cookie-aware HTTP client and
//! exchanges the code for tokens.

mod flow;

pub use flow::{AuthFlow, CSRF_COOKIE, REFRESH_COOKIE};
pub(crate) use flow::{cookie_value, ensure_success, response_cookie};

/// Tokens produced by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokens {
    /// `Authorization` header value, always prefixed with "Bearer "
    pub bearer_token: String,
    /// Token accepted by the refresh endpoint
    pub refresh_token: String,
}

/// Build the `Authorization` header value for an access token
pub fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}
