pub mod server;

/// Actions the binary can execute.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        site_url: String,
        secret_code: String,
        protected_prefixes: Vec<String>,
    },
}
