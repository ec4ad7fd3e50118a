use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringBackendConfig,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = AppEnvironment::from_str(&var("APP_ENV", "development"));

        let host = var("APP_HOST", "127.0.0.1");
        let port = var("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var("APP_LOG_LEVEL", "info");
        let format = LogFormat::from_str(&var("APP_LOG_FORMAT", "compact"))?;

        let scoring = match var("APP_SCORING_BACKEND", "heuristic")
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "heuristic" | "mock" => ScoringBackendConfig::Heuristic {
                latency: millis(&var("APP_SCORING_LATENCY_MS", "600"), "APP_SCORING_LATENCY_MS")?,
            },
            "remote" => {
                let endpoint = lookup("APP_SCORING_REMOTE_URL")
                    .map(|url| url.trim().to_string())
                    .filter(|url| !url.is_empty())
                    .ok_or(ConfigError::MissingRemoteEndpoint)?;
                ScoringBackendConfig::Remote(RemoteScoringConfig {
                    endpoint,
                    timeout: millis(
                        &var("APP_SCORING_REMOTE_TIMEOUT_MS", "8000"),
                        "APP_SCORING_REMOTE_TIMEOUT_MS",
                    )?,
                    api_key: lookup("APP_SCORING_REMOTE_API_KEY").filter(|key| !key.is_empty()),
                })
            }
            other => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            scoring,
        })
    }
}

fn millis(raw: &str, key: &'static str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDuration { key })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output style of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Which implementation sits behind the scoring boundary.
#[derive(Debug, Clone)]
pub enum ScoringBackendConfig {
    /// Local heuristic with an artificial delay before each answer.
    Heuristic { latency: Duration },
    Remote(RemoteScoringConfig),
}

#[derive(Debug, Clone)]
pub struct RemoteScoringConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub api_key: Option<String>,
}

impl RemoteScoringConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(8),
            api_key: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDuration { key: &'static str },
    InvalidLogFormat(String),
    UnknownBackend(String),
    MissingRemoteEndpoint,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDuration { key } => {
                write!(f, "{key} must be a whole number of milliseconds")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT '{value}' must be 'compact' or 'json'")
            }
            ConfigError::UnknownBackend(value) => {
                write!(
                    f,
                    "APP_SCORING_BACKEND '{value}' must be 'heuristic' or 'remote'"
                )
            }
            ConfigError::MissingRemoteEndpoint => {
                write!(f, "APP_SCORING_REMOTE_URL is required for the remote backend")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
