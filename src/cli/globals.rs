use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(provider_url: String) -> Self {
        Self {
            provider_url,
            provider_key: SecretString::default(),
        }
    }

    pub fn set_key(&mut self, key: SecretString) {
        self.provider_key = key;
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("provider_url", &self.provider_url)
            .field("provider_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let url = "https://project.supabase.co".to_string();
        let args = GlobalArgs::new(url);
        assert_eq!(args.provider_url, "https://project.supabase.co");
        assert_eq!(args.provider_key.expose_secret(), "");
    }

    #[test]
    fn test_set_key() {
        let mut args = GlobalArgs::new("https://project.supabase.co".to_string());
        args.set_key(SecretString::from("anon-key".to_string()));
        assert_eq!(args.provider_key.expose_secret(), "anon-key");
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut args = GlobalArgs::new("https://project.supabase.co".to_string());
        args.set_key(SecretString::from("anon-key".to_string()));
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("anon-key"));
        assert!(rendered.contains("***"));
    }
}
