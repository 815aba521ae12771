use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::matching::MatchingConfig;

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
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("REUNITE_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("REUNITE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("REUNITE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("REUNITE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let mut matching = MatchingConfig::default();
        if let Some(floor) = read_env_i32("REUNITE_MIN_SCORE_REPORT_TO_FINDING")? {
            matching.report_to_findings.min_total_score = floor;
        }
        if let Some(floor) = read_env_i32("REUNITE_MIN_SCORE_FINDING_TO_REPORT")? {
            matching.finding_to_reports.min_total_score = floor;
        }
        if let Some(limit) = read_env_i32("REUNITE_MAX_MATCHES")? {
            if limit < 1 {
                return Err(ConfigError::InvalidInteger {
                    name: "REUNITE_MAX_MATCHES",
                });
            }
            matching.max_ranked_matches = limit as usize;
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            matching,
        })
    }
}

fn read_env_i32(name: &'static str) -> Result<Option<i32>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidInteger { name }),
        Err(_) => Ok(None),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidInteger { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "REUNITE_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "REUNITE_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidInteger { name } => {
                write!(f, "{name} must be a valid integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidInteger { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
