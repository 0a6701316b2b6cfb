use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
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

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    Command::new("billdesk")
        .about("Utility bill management")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("BILLDESK_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("dist")
                .short('d')
                .long("dist")
                .help("Directory holding the compiled web bundle (index.html, wasm, js)")
                .default_value("dist")
                .env("BILLDESK_DIST"),
        )
        .arg(
            Arg::new("api-base-url")
                .long("api-base-url")
                .help("Bill service base URL published to the browser, example: https://bills.tld")
                .env("BILLDESK_API_BASE_URL"),
        )
        .arg(
            Arg::new("firebase-api-key")
                .long("firebase-api-key")
                .help("Firebase web API key published to the browser")
                .env("BILLDESK_FIREBASE_API_KEY"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("BILLDESK_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "billdesk");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Utility bill management"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("BILLDESK_PORT", None::<&str>),
                ("BILLDESK_DIST", None),
                ("BILLDESK_API_BASE_URL", None),
                ("BILLDESK_FIREBASE_API_KEY", None),
                ("BILLDESK_LOG_LEVEL", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["billdesk"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
                assert_eq!(
                    matches.get_one::<String>("dist").map(String::as_str),
                    Some("dist")
                );
                assert!(matches.get_one::<String>("api-base-url").is_none());
                assert!(matches.get_one::<String>("firebase-api-key").is_none());
            },
        );
    }

    #[test]
    fn test_check_args() {
        temp_env::with_vars([("BILLDESK_LOG_LEVEL", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "billdesk",
                "--port",
                "9090",
                "--dist",
                "/srv/billdesk",
                "--api-base-url",
                "https://bills.tld",
                "--firebase-api-key",
                "web-key",
            ]);

            assert_eq!(matches.get_one::<u16>("port").copied(), Some(9090));
            assert_eq!(
                matches.get_one::<String>("dist").map(String::as_str),
                Some("/srv/billdesk")
            );
            assert_eq!(
                matches.get_one::<String>("api-base-url").map(String::as_str),
                Some("https://bills.tld")
            );
            assert_eq!(
                matches.get_one::<String>("firebase-api-key").map(String::as_str),
                Some("web-key")
            );
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("BILLDESK_PORT", Some("443")),
                ("BILLDESK_DIST", Some("/var/www")),
                ("BILLDESK_API_BASE_URL", Some("https://bills.tld")),
                ("BILLDESK_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["billdesk"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("dist").map(String::as_str),
                    Some("/var/www")
                );
                assert_eq!(
                    matches.get_one::<String>("api-base-url").map(String::as_str),
                    Some("https://bills.tld")
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("BILLDESK_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["billdesk"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_usize {
            temp_env::with_vars([("BILLDESK_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["billdesk".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }
}
