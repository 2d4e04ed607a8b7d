use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::ApiKey;

pub const BASE_URL_VAR: &str = "WGAI_SERVER_URL";
pub const PHASE1_KEY_VAR: &str = "WGAI_API_KEY_PHASE1";
pub const PHASE2_KEY_VAR: &str = "WGAI_API_KEY_PHASE2";
pub const TIMEOUT_VAR: &str = "WGAI_TIMEOUT_SECS";
pub const LOG_MAX_FILES_VAR: &str = "APP_LOG_MAX_FILES";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_MAX_FILES: usize = 5;

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

/// Top-level configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub partner: PartnerConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_dir = env::var("APP_LOG_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let log_max_files = match env::var(LOG_MAX_FILES_VAR) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => return Err(ConfigError::InvalidLogRetention),
            },
            Err(_) => DEFAULT_LOG_MAX_FILES,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_dir,
                log_max_files,
            },
            partner: PartnerConfig::from_env()?,
        })
    }
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

/// Log filtering and optional file output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// Daily log files kept in `log_dir`; older ones are deleted on rotation.
    pub log_max_files: usize,
}

/// Partner API location, per-phase credentials and the outbound timeout ceiling.
#[derive(Debug, Clone)]
pub struct PartnerConfig {
    pub base_url: String,
    pub phase1_key: ApiKey,
    pub phase2_key: ApiKey,
    pub timeout: Duration,
}

impl PartnerConfig {
    /// Build the partner settings, rejecting absent or blank values and base URLs that are not
    /// absolute `http`/`https` URLs.
    pub fn new(
        base_url: impl Into<String>,
        phase1_key: impl Into<String>,
        phase2_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base_url = required(BASE_URL_VAR, Some(base_url.into()))?;
        let phase1_key = required(PHASE1_KEY_VAR, Some(phase1_key.into()))?;
        let phase2_key = required(PHASE2_KEY_VAR, Some(phase2_key.into()))?;
        let base_url = checked_base_url(base_url)?;

        Ok(Self {
            base_url,
            phase1_key: ApiKey::new(phase1_key),
            phase2_key: ApiKey::new(phase2_key),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = required(BASE_URL_VAR, env::var(BASE_URL_VAR).ok())?;
        let phase1_key = required(PHASE1_KEY_VAR, env::var(PHASE1_KEY_VAR).ok())?;
        let phase2_key = required(PHASE2_KEY_VAR, env::var(PHASE2_KEY_VAR).ok())?;

        let timeout = match env::var(TIMEOUT_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout),
            },
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self::new(base_url, phase1_key, phase2_key)?.with_timeout(timeout))
    }
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn checked_base_url(value: String) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: value.clone(),
        reason,
    };
    let url = reqwest::Url::parse(&value).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidPort,
    InvalidTimeout,
    InvalidLogRetention,
    InvalidBaseUrl { value: String, reason: String },
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} is not configured"),
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "{TIMEOUT_VAR} must be a positive number of seconds")
            }
            ConfigError::InvalidLogRetention => {
                write!(f, "{LOG_MAX_FILES_VAR} must be a positive number of files")
            }
            ConfigError::InvalidBaseUrl { value, reason } => {
                write!(f, "{BASE_URL_VAR} '{value}' is not a usable URL: {reason}")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Missing(_)
            | ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::InvalidLogRetention
            | ConfigError::InvalidBaseUrl { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
