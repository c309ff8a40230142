use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::workflows::underwriting::{FaultInjection, OpenAiSettings, RetryPolicy};

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
    pub advisory: AdvisoryConfig,
    pub fault_sentinel: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origins = env::var("APP_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => raw.parse()?,
            Err(_) => LogFormat::Compact,
        };

        let fault_sentinel = optional_var("APP_FAULT_SENTINEL");

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            telemetry: TelemetryConfig { log_level, format },
            advisory: AdvisoryConfig::from_env()?,
            fault_sentinel,
        })
    }

    /// Fault injection is never armed in production, whatever the environment says.
    pub fn fault_injection(&self) -> FaultInjection {
        match (&self.fault_sentinel, self.environment) {
            (Some(_), AppEnvironment::Production) | (None, _) => FaultInjection::disabled(),
            (Some(sentinel), _) => FaultInjection::on_applicant(sentinel.clone()),
        }
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_origins: Vec<String>,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidLogFormat(other.to_string())),
        }
    }
}

/// Advisory model connection and retry settings.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    /// Caller deadline for a whole consultation, retries included.
    pub deadline: Option<Duration>,
}

impl AdvisoryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = OpenAiSettings::new(String::new());
        let default_retry = RetryPolicy::default();

        let max_attempts = parse_var("ADVISORY_MAX_ATTEMPTS", default_retry.max_attempts)?;
        let base_ms = parse_var(
            "ADVISORY_BACKOFF_BASE_MS",
            default_retry.base_delay.as_millis() as u64,
        )?;
        let max_ms = parse_var(
            "ADVISORY_BACKOFF_MAX_MS",
            default_retry.max_delay.as_millis() as u64,
        )?;
        let timeout_secs = parse_var(
            "ADVISORY_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?;
        let deadline = match optional_var("ADVISORY_DEADLINE_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                ConfigError::InvalidNumber {
                    variable: "ADVISORY_DEADLINE_SECS",
                    value: raw.clone(),
                }
            })?)),
            None => None,
        };

        Ok(Self {
            api_key: optional_var("OPENAI_API_KEY"),
            base_url: optional_var("ADVISORY_BASE_URL").unwrap_or(defaults.base_url),
            model: optional_var("ADVISORY_MODEL").unwrap_or(defaults.model),
            request_timeout: Duration::from_secs(timeout_secs),
            retry: RetryPolicy::new(
                max_attempts,
                Duration::from_millis(base_ms),
                Duration::from_millis(max_ms),
            ),
            deadline,
        })
    }

    /// Connection settings for the chat model; requires an API key.
    pub fn openai_settings(&self) -> Result<OpenAiSettings, ConfigError> {
        let api_key = self.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
        let mut settings = OpenAiSettings::new(api_key);
        settings.base_url = self.base_url.clone();
        settings.model = self.model.clone();
        settings.request_timeout = self.request_timeout;
        Ok(settings)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match optional_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
            variable: name,
            value: raw,
        }),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
    InvalidLogFormat(String),
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a non-negative integer (found '{value}')")
            }
            ConfigError::InvalidLogFormat(value) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (found '{value}')")
            }
            ConfigError::MissingApiKey => {
                write!(f, "OPENAI_API_KEY is required to consult the advisory model")
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
