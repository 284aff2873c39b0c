use crate::api;
use crate::api::state::SiteConfig;
use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            site_url,
            secret_code,
            protected_prefixes,
        } => {
            let config = SiteConfig::new(site_url)
                .with_secret_code(SecretString::from(secret_code))
                .with_protected_prefixes(protected_prefixes);

            api::new(port, globals, config).await?;
        }
    }

    Ok(())
}
