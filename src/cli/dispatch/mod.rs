//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action executed by the binary.

use crate::cli::actions::Action;
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        site_url: matches
            .get_one::<String>("site-url")
            .cloned()
            .unwrap_or_else(|| "http://localhost:3000".to_string()),
        secret_code: matches
            .get_one::<String>("secret-code")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --secret-code"))?,
        protected_prefixes: matches
            .get_many::<String>("protected-prefix")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
    })
}
