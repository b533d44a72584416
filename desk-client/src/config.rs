//! Client configuration

use std::path::PathBuf;

/// Desk sharing service
pub const DEFAULT_SHARE_URL: &str = "https://share.parkanizer.com";

/// Identity provider tenant hosting the login pages
pub const DEFAULT_LOGIN_URL: &str = "https://login.parkanizer.com/loginparkanizer.onmicrosoft.com";

/// Sign-in policy of the identity provider
pub const DEFAULT_POLICY: &str = "B2C_1A_Parkanizer_Login";

/// Client configuration for talking to the booking service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Booking service base URL (e.g., "https://share.parkanizer.com")
    pub share_url: String,

    /// Identity provider base URL, without the policy segment
    pub login_url: String,

    /// Identity provider policy name
    pub policy: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Where the bearer/refresh token pair is persisted between runs
    pub secret_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new configuration for the given booking service
    pub fn new(share_url: impl Into<String>) -> Self {
        Self {
            share_url: share_url.into().trim_end_matches('/').to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            policy: DEFAULT_POLICY.to_string(),
            timeout: 30,
            secret_path: None,
        }
    }

    /// Set the identity provider base URL
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the identity provider policy
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist secrets to this file
    pub fn with_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secret_path = Some(path.into());
        self
    }

    /// REST API root of the booking service
    pub fn api_url(&self) -> String {
        format!("{}/api", self.share_url)
    }

    /// Where the identity provider sends the browser back with the code
    pub fn callback_uri(&self) -> String {
        format!("{}/callback", self.share_url)
    }

    /// Policy-scoped identity provider root
    pub fn policy_url(&self) -> String {
        format!("{}/{}", self.login_url, self.policy)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_URL)
    }
}
