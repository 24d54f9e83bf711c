use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::admin::WarningThresholds;

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything the service reads from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&text_var("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: text_var("APP_LOG_LEVEL", "info"),
            },
            intake: IntakeConfig::from_env()?,
            admin: AdminConfig::from_env()?,
        })
    }
}

fn text_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn number_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// HTTP binding. `localhost` is accepted as an alias for the loopback address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = text_var("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: text_var("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// `log_level` is an `EnvFilter` directive; `RUST_LOG` overrides it.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Wizard behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Applicants younger than this skip the partner step.
    pub adult_age: u32,
}

impl IntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            adult_age: number_var("INTAKE_ADULT_AGE", Self::default().adult_age)?,
        })
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { adult_age: 18 }
    }
}

/// Dashboard display knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdminConfig {
    pub warnings: WarningThresholds,
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = WarningThresholds::default();
        let expired = number_var("ADMIN_EXPIRED_AFTER_DAYS", defaults.expired_after_days)?;
        let approaching = number_var(
            "ADMIN_APPROACHING_AFTER_DAYS",
            defaults.approaching_after_days,
        )?;

        if expired > approaching {
            return Err(ConfigError::InvertedThresholds {
                expired,
                approaching,
            });
        }

        Ok(Self {
            warnings: WarningThresholds {
                expired_after_days: expired,
                approaching_after_days: approaching,
            },
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvertedThresholds { expired: i64, approaching: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be 'localhost' or an IPv4/IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a number (found '{value}')")
            }
            ConfigError::InvertedThresholds {
                expired,
                approaching,
            } => write!(
                f,
                "ADMIN_EXPIRED_AFTER_DAYS ({expired}) must not exceed ADMIN_APPROACHING_AFTER_DAYS ({approaching})"
            ),
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
