use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Command-line surface of the recorder.
///
/// Every flag is optional; anything not given falls back to the configuration file and then
/// to the defaults documented on [`Config`](super::config::Config). Credentials can also come
/// from the environment so they stay out of shell history.
///
/// Unknown flags make clap print the usage and exit with status 2.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "twitch-recorder")]
#[command(version)]
#[command(about = "Watches a Twitch channel and records every live session")]
pub struct Arguments {
    /// TOML configuration file (defaults to `config.toml` when it exists)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Channel login to monitor
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Quality selector passed to the capture tool, e.g. `best` or `720p60`
    #[arg(short = 'q', long)]
    pub quality: Option<String>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(short = 'l', long = "log", visible_alias = "logging", value_name = "LEVEL", value_parser = parse_level)]
    pub log_level: Option<LevelFilter>,

    /// Move finished captures instead of repackaging them with the transcoder
    #[arg(long = "disable-ffmpeg", visible_alias = "disable-processing", action = clap::ArgAction::SetTrue)]
    pub disable_processing: bool,

    /// Application client id
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Application client secret
    #[arg(long, env = "TWITCH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Webhook receiving start/stop/error notifications
    #[arg(long, env = "DISCORD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,
}

impl Arguments {
    pub fn from_args() -> Self {
        Arguments::parse()
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse::<LevelFilter>()
        .map_err(|_| format!("invalid log level: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_short_and_long_flags() {
        let arguments = Arguments::try_parse_from([
            "twitch-recorder",
            "-u",
            "somechannel",
            "--quality",
            "720p60",
            "-l",
            "DEBUG",
            "--disable-ffmpeg",
        ])
        .unwrap_or_else(|e| panic!("{}", e));

        assert_eq!(arguments.username.as_deref(), Some("somechannel"));
        assert_eq!(arguments.quality.as_deref(), Some("720p60"));
        assert_eq!(arguments.log_level, Some(LevelFilter::Debug));
        assert!(arguments.disable_processing);
        assert_eq!(arguments.config_file, None);
    }

    #[test]
    #[serial]
    fn test_aliases() {
        let arguments = Arguments::try_parse_from([
            "twitch-recorder",
            "--logging",
            "warn",
            "--disable-processing",
        ])
        .unwrap_or_else(|e| panic!("{}", e));

        assert_eq!(arguments.log_level, Some(LevelFilter::Warn));
        assert!(arguments.disable_processing);
    }

    #[test]
    #[serial]
    fn test_unknown_flag_is_rejected() {
        let err = Arguments::try_parse_from(["twitch-recorder", "--frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    #[serial]
    fn test_invalid_log_level() {
        let err = Arguments::try_parse_from(["twitch-recorder", "-l", "loud"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    #[serial]
    fn test_credentials_from_environment() {
        std::env::set_var("TWITCH_CLIENT_ID", "env-id");
        std::env::set_var("TWITCH_CLIENT_SECRET", "env-secret");

        let from_env = Arguments::try_parse_from(["twitch-recorder"]).unwrap();
        let from_flag =
            Arguments::try_parse_from(["twitch-recorder", "--client-id", "flag-id"]).unwrap();

        std::env::remove_var("TWITCH_CLIENT_ID");
        std::env::remove_var("TWITCH_CLIENT_SECRET");

        assert_eq!(from_env.client_id.as_deref(), Some("env-id"));
        assert_eq!(from_env.client_secret.as_deref(), Some("env-secret"));
        assert_eq!(from_flag.client_id.as_deref(), Some("flag-id"));
    }
}
