use super::arguments::Arguments;
use crate::error_handling::types::ConfigError;
use crate::storage::recording_layout::RecordingLayout;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Application configuration structure that defines all runtime parameters.
///
/// A `Config` is assembled once at startup and handed to the controller by value; nothing
/// reads settings from a global afterwards. Values are layered in this order, later layers
/// winning:
///
/// 1. the defaults documented on each field,
/// 2. a TOML file (`--config <FILE>`, or `config.toml` when present),
/// 3. environment variables and command-line flags (see [`Arguments`]).
///
/// # Examples
///
/// ```
/// use twitch_recorder::configuration::config::Config;
///
/// let config = Config::from_toml_str(r#"
///     username = "somechannel"
///     client_id = "abc"
///     client_secret = "def"
///     check_interval = 30
/// "#).unwrap();
/// assert_eq!(config.poll_interval_secs, 30);
/// assert_eq!(config.quality, "best");
/// ```
///
/// # Fields Overview
///
/// - `username`: channel login to watch
/// - `quality`: quality selector passed to the capture tool
/// - `poll_interval_secs` / `error_backoff_secs` / `request_timeout_secs`: timing knobs
/// - `client_id` / `client_secret` / `oauth_token`: API credentials
/// - `webhook_url`: where lifecycle notifications go
/// - `root_path` / `recorded_path` / `processed_path`: storage locations
/// - `disable_processing`: move captures instead of running the transcoder
/// - `ffmpeg_path` / `streamlink_path` / `streamlink_args`: external tools
/// - `api_base_url` / `id_base_url`: platform endpoints
/// - `log_file`: secondary log sink
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel login to monitor.
    ///
    /// Required. Also used as the per-channel subdirectory under the storage paths and as the
    /// prefix of every capture filename.
    pub username: String,

    /// Quality selector handed to the capture tool, e.g. `best`, `720p60`, `audio_only`.
    ///
    /// Default: `best`
    pub quality: String,

    /// Seconds to sleep between two status checks.
    ///
    /// Bounds how late the start of a stream can be detected. Must be greater than zero.
    ///
    /// Default: `15`. Legacy key: `check_interval`
    #[serde(alias = "check_interval")]
    pub poll_interval_secs: u64,

    /// Seconds to wait after an unrecoverable status check before the process exits.
    ///
    /// Gives the error notification a chance to be delivered.
    ///
    /// Default: `2`
    pub error_backoff_secs: u64,

    /// Timeout applied to every HTTP request (status check, token refresh, webhook).
    ///
    /// Default: `15`
    pub request_timeout_secs: u64,

    /// Application client id, sent as the `Client-ID` header.
    ///
    /// Required.
    pub client_id: String,

    /// Application client secret used for the client-credentials grant.
    ///
    /// Required unless `oauth_token` is set; without it an expired token cannot be renewed.
    pub client_secret: String,

    /// Pre-issued access token used as the initial credential.
    ///
    /// When absent the recorder fetches a token at startup. An empty string counts as absent.
    ///
    /// Default: none
    pub oauth_token: Option<String>,

    /// Webhook receiving Discord-style embeds for start, stop and error events.
    ///
    /// When absent (or empty) notifications are only logged.
    ///
    /// Default: none. Legacy key: `discord_webhook_url`
    #[serde(alias = "discord_webhook_url")]
    pub webhook_url: Option<String>,

    /// Storage root. Raw captures go to `<root_path>/recorded/<username>` and finished files
    /// to `<root_path>/processed/<username>` unless overridden below.
    ///
    /// Default: `./downloads`
    pub root_path: PathBuf,

    /// Override for the raw capture directory (the channel subdirectory is still appended).
    ///
    /// Default: none
    pub recorded_path: Option<PathBuf>,

    /// Override for the processed directory (the channel subdirectory is still appended).
    ///
    /// Default: none
    pub processed_path: Option<PathBuf>,

    /// When `true`, finished captures are moved as-is instead of being repackaged by the
    /// transcoder.
    ///
    /// Default: `false`. Legacy key: `disable_ffmpeg`
    #[serde(alias = "disable_ffmpeg")]
    pub disable_processing: bool,

    /// Transcoder executable.
    ///
    /// Default: `ffmpeg`
    pub ffmpeg_path: String,

    /// Capture tool executable.
    ///
    /// Default: `streamlink`
    pub streamlink_path: String,

    /// Extra flags placed before the stream URL on the capture tool's command line.
    ///
    /// Default: `["--twitch-disable-ads"]`
    pub streamlink_args: Vec<String>,

    /// Base URL of the streams API.
    ///
    /// Default: `https://api.twitch.tv`
    pub api_base_url: String,

    /// Base URL of the identity (token) endpoint.
    ///
    /// Default: `https://id.twitch.tv`
    pub id_base_url: String,

    /// File receiving a copy of every log line. `None` logs to the console only.
    ///
    /// Default: `twitch-recorder.log`
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            quality: String::from("best"),
            poll_interval_secs: 15,
            error_backoff_secs: 2,
            request_timeout_secs: 15,
            client_id: String::new(),
            client_secret: String::new(),
            oauth_token: None,
            webhook_url: None,
            root_path: PathBuf::from("./downloads"),
            recorded_path: None,
            processed_path: None,
            disable_processing: false,
            ffmpeg_path: String::from("ffmpeg"),
            streamlink_path: String::from("streamlink"),
            streamlink_args: vec![String::from("--twitch-disable-ads")],
            api_base_url: String::from("https://api.twitch.tv"),
            id_base_url: String::from("https://id.twitch.tv"),
            log_file: Some(PathBuf::from("twitch-recorder.log")),
        }
    }
}

impl Config {
    /// Configuration file this run reads: `--config` when given, `config.toml` when it
    /// exists, none otherwise.
    pub fn source(arguments: &Arguments) -> Option<PathBuf> {
        match &arguments.config_file {
            Some(path) => Some(path.clone()),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            None => None,
        }
    }

    /// Builds the configuration for this run from the parsed command line.
    ///
    /// Reads the file chosen by [`Config::source`], layers the flags on top and validates the
    /// result. Logs nothing: it runs before the logger is installed, since the log file
    /// location is part of the configuration.
    pub fn load(arguments: &Arguments) -> Result<Self, ConfigError> {
        let mut config = match Self::source(arguments) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_arguments(arguments);
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides file values with whatever was given on the command line or in the
    /// environment.
    pub fn apply_arguments(&mut self, arguments: &Arguments) {
        if let Some(username) = &arguments.username {
            self.username = username.clone();
        }
        if let Some(quality) = &arguments.quality {
            self.quality = quality.clone();
        }
        if let Some(client_id) = &arguments.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(client_secret) = &arguments.client_secret {
            self.client_secret = client_secret.clone();
        }
        if let Some(webhook_url) = &arguments.webhook_url {
            self.webhook_url = Some(webhook_url.clone());
        }
        if arguments.disable_processing {
            self.disable_processing = true;
        }
    }

    /// Checks that the values needed to run are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "username (use --username or set it in the configuration file)".into(),
            ));
        }
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingField("client_id".into()));
        }
        if self.client_secret.trim().is_empty() && self.oauth_token().is_none() {
            return Err(ConfigError::MissingField(
                "client_secret (required unless oauth_token is set)".into(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::NotInRange(
                "poll_interval_secs must be greater than 0".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::NotInRange(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured seed token, with empty strings treated as unset.
    pub fn oauth_token(&self) -> Option<&str> {
        self.oauth_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// The configured webhook, with empty strings treated as unset.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Raw and processed directories for the monitored channel.
    pub fn layout(&self) -> RecordingLayout {
        let recorded_root = self
            .recorded_path
            .clone()
            .unwrap_or_else(|| self.root_path.join("recorded"));
        let processed_root = self
            .processed_path
            .clone()
            .unwrap_or_else(|| self.root_path.join("processed"));
        RecordingLayout::new(recorded_root, processed_root, &self.username)
    }
}
