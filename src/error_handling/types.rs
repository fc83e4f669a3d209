use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    MissingField(String),
    NotInRange(String),
    LoggingError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::MissingField(e) => write!(f, "Missing configuration value: {}", e),
            ConfigError::NotInRange(e) => write!(f, "Value out of range: {}", e),
            ConfigError::LoggingError(e) => write!(f, "Logging setup error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlError(err.to_string())
    }
}

/// Failure to obtain an access token from the identity endpoint.
#[derive(Debug)]
pub enum AuthError {
    /// The endpoint could not be reached (DNS, connect, timeout).
    Unreachable(String),
    /// The endpoint answered with a non-success HTTP status.
    Rejected(u16),
    /// The body did not contain an `access_token`.
    MalformedResponse(String),
    ClientBuild(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Unreachable(e) => write!(f, "Identity endpoint unreachable: {}", e),
            AuthError::Rejected(code) => write!(f, "Identity endpoint rejected request: HTTP {}", code),
            AuthError::MalformedResponse(e) => write!(f, "Malformed token response: {}", e),
            AuthError::ClientBuild(e) => write!(f, "HTTP client setup failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug)]
pub enum CaptureError {
    SpawnFailed(std::io::Error),
    WaitFailed(std::io::Error),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::SpawnFailed(e) => write!(f, "Capture process spawn failed: {}", e),
            CaptureError::WaitFailed(e) => write!(f, "Capture process wait failed: {}", e),
        }
    }
}

impl std::error::Error for CaptureError {}

#[derive(Debug)]
pub enum ProcessingError {
    IoError(std::io::Error),
    TranscoderSpawn(std::io::Error),
    /// The transcoder exited with a non-zero status (`None` when killed by a signal).
    TranscoderFailed(Option<i32>),
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::IoError(e) => write!(f, "Processing IO error: {}", e),
            ProcessingError::TranscoderSpawn(e) => write!(f, "Transcoder spawn failed: {}", e),
            ProcessingError::TranscoderFailed(Some(code)) => {
                write!(f, "Transcoder exited with status {}", code)
            }
            ProcessingError::TranscoderFailed(None) => {
                write!(f, "Transcoder terminated by signal")
            }
        }
    }
}

impl std::error::Error for ProcessingError {}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::IoError(err)
    }
}

#[derive(Debug)]
pub enum NotifyError {
    ClientBuild(String),
    Delivery(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::ClientBuild(e) => write!(f, "Webhook client setup failed: {}", e),
            NotifyError::Delivery(e) => write!(f, "Webhook delivery failed: {}", e),
        }
    }
}

impl std::error::Error for NotifyError {}

#[derive(Debug)]
pub enum ControllerError {
    Authentication(AuthError),
    /// The status check could not complete; the run is over.
    StatusCheckFailed(String),
    InitializationFailed(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::Authentication(e) => write!(f, "Authentication error: {}", e),
            ControllerError::StatusCheckFailed(e) => write!(f, "Status check failed: {}", e),
            ControllerError::InitializationFailed(e) => write!(f, "Initialization failed: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<AuthError> for ControllerError {
    fn from(err: AuthError) -> Self {
        ControllerError::Authentication(err)
    }
}
