//! # Coulisses
//!
//! `coulisses` is the members-only backstage of the troupe's public website.
//! The marketing pages stay in the site shell; this service owns everything
//! that needs a session or a secret.
//!
//! ## Sign-up
//!
//! Membership is invitation-by-passphrase: the sign-up form requires the
//! troupe's shared secret code on top of the usual credentials. Validation
//! short-circuits field by field and every outcome, success or failure, is
//! delivered as a typed redirect message back to the form. Credentials and
//! profile rows live in a hosted identity/data provider; the service never
//! stores them itself.
//!
//! ## Guard stages
//!
//! Two independent, stackable stages protect member content:
//!
//! - **Session guard:** runs on every request, resolves the cookie-borne
//!   session through the provider (refreshing a stale pair once), and sends
//!   unauthenticated requests to protected prefixes back to sign-in.
//! - **Subscription gate:** on entitlement-gated routes, requires an active
//!   subscription row and falls back to the members landing page otherwise.
//!
//! "Not signed in" and "signed in but not entitled" therefore stay
//! distinguishable all the way into tests.
//!
//! ## Form retention
//!
//! The sign-up form survives validation round-trips through a durable
//! client-side snapshot ([`form_cache`]). Secret fields are kept in memory
//! only and never written to the store.

pub mod api;
pub mod cli;
pub mod form_cache;
pub mod provider;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
