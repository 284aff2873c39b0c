use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("coulisses")
        .about("Members area and authentication gateway for the troupe's website")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("COULISSES_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Identity and data provider endpoint, example: https://project.supabase.co")
                .env("COULISSES_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new("provider-key")
                .long("provider-key")
                .help("Provider public (anon) key")
                .env("COULISSES_PROVIDER_KEY")
                .required(true),
        )
        .arg(
            Arg::new("site-url")
                .long("site-url")
                .help("Public URL of the site shell, used for CORS and cookie flags")
                .default_value("http://localhost:3000")
                .env("COULISSES_SITE_URL"),
        )
        .arg(
            Arg::new("secret-code")
                .long("secret-code")
                .help("Shared troupe passphrase required to sign up")
                .default_value("tirebouchon")
                .env("COULISSES_SECRET_CODE"),
        )
        .arg(
            Arg::new("protected-prefix")
                .long("protected-prefix")
                .help("Path prefix requiring an authenticated session (repeatable)")
                .default_value("/espace-membres")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("COULISSES_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
