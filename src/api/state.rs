//! Site configuration shared by handlers and guards.

use secrecy::{ExposeSecret, SecretString};

const DEFAULT_SECRET_CODE: &str = "tirebouchon";
const DEFAULT_SESSION_TTL_SECONDS: i64 = 12 * 60 * 60;
const DEFAULT_PROTECTED_PREFIX: &str = "/espace-membres";

/// Destination of every auth redirect that needs a sign-in.
pub const SIGN_IN_PATH: &str = "/sign-in";
/// Sign-up page; validation failures land back here.
pub const SIGN_UP_PATH: &str = "/sign-up";
/// Members landing page, also the default entitlement fallback.
pub const MEMBERS_PATH: &str = "/espace-membres";
pub const FORGOT_PASSWORD_PATH: &str = "/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/espace-membres/reset-password";

#[derive(Clone, Debug)]
pub struct SiteConfig {
    site_url: String,
    secret_code: SecretString,
    protected_prefixes: Vec<String>,
    session_ttl_seconds: i64,
}

impl SiteConfig {
    #[must_use]
    pub fn new(site_url: String) -> Self {
        Self {
            site_url,
            secret_code: SecretString::from(DEFAULT_SECRET_CODE.to_string()),
            protected_prefixes: vec![DEFAULT_PROTECTED_PREFIX.to_string()],
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_secret_code(mut self, secret_code: SecretString) -> Self {
        self.secret_code = secret_code;
        self
    }

    #[must_use]
    pub fn with_protected_prefixes(mut self, prefixes: Vec<String>) -> Self {
        if !prefixes.is_empty() {
            self.protected_prefixes = prefixes;
        }
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Whether a submitted code opens the troupe's door. Pure function of
    /// the input; resubmitting the same code always classifies the same way.
    #[must_use]
    pub fn secret_code_matches(&self, candidate: &str) -> bool {
        candidate == self.secret_code.expose_secret()
    }

    /// Whether a request path requires an authenticated session.
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    // Only mark cookies secure when the site is served over HTTPS.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.site_url.starts_with("https://")
    }
}
