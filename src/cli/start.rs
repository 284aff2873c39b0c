use crate::cli::{actions::Action, commands, dispatch, globals::GlobalArgs, telemetry};
use anyhow::Result;
use secrecy::SecretString;

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Start the CLI: parse arguments, initialize telemetry, and build the
/// action plus the provider credentials.
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action
/// dispatch fails
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>("verbosity")
            .copied()
            .unwrap_or(0),
    );

    telemetry::init(verbosity_level)?;

    let mut globals = GlobalArgs::new(
        matches
            .get_one::<String>("provider-url")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-url"))?,
    );
    let provider_key = matches
        .get_one::<String>("provider-key")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing required argument: --provider-key"))?;
    globals.set_key(SecretString::from(provider_key));

    let action = dispatch::handler(&matches)?;

    Ok((action, globals))
}
