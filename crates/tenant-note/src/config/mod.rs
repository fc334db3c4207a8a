use crate::regions::GradeHashScheme;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_LISTING_COUNT: usize = 100;
pub const DEFAULT_REGION_DATA_PATH: &str = "./data/seoul_hybrid_data.json";

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
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = match env::var("APP_LOG_ANSI") {
            Ok(raw) => parse_flag("APP_LOG_ANSI", &raw)?,
            Err(_) => false,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            pipeline: PipelineConfig::from_env()?,
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

/// Log filter and output styling.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Listing generation and region data sources.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub listing_count: usize,
    /// Fixed generator seed; `None` draws one at startup.
    pub listing_seed: Option<u64>,
    pub region_data_path: PathBuf,
    pub region_hash: GradeHashScheme,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            listing_count: DEFAULT_LISTING_COUNT,
            listing_seed: None,
            region_data_path: PathBuf::from(DEFAULT_REGION_DATA_PATH),
            region_hash: GradeHashScheme::default(),
        }
    }
}

impl PipelineConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let listing_count = match env::var("APP_LISTING_COUNT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidListingCount { value: raw })?,
            Err(_) => defaults.listing_count,
        };

        let listing_seed = match env::var("APP_LISTING_SEED") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed { value: raw })?,
            ),
            Err(_) => None,
        };

        let region_data_path = env::var("APP_REGION_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.region_data_path);

        let region_hash = match env::var("APP_REGION_HASH") {
            Ok(raw) => GradeHashScheme::from_token(&raw)
                .ok_or(ConfigError::InvalidRegionHash { value: raw })?,
            Err(_) => defaults.region_hash,
        };

        Ok(Self {
            listing_count,
            listing_seed,
            region_data_path,
            region_hash,
        })
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidListingCount { value: String },
    InvalidSeed { value: String },
    InvalidRegionHash { value: String },
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidListingCount { value } => {
                write!(f, "APP_LISTING_COUNT must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidSeed { value } => {
                write!(f, "APP_LISTING_SEED must be a u64, got '{value}'")
            }
            ConfigError::InvalidRegionHash { value } => {
                write!(f, "APP_REGION_HASH must be 'fnv1a' or 'char_sum', got '{value}'")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidListingCount { .. }
            | ConfigError::InvalidSeed { .. }
            | ConfigError::InvalidRegionHash { .. }
            | ConfigError::InvalidFlag { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_ANSI",
            "APP_LISTING_COUNT",
            "APP_LISTING_SEED",
            "APP_REGION_DATA_PATH",
            "APP_REGION_HASH",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.ansi);
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_pipeline_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LISTING_COUNT", "250");
        env::set_var("APP_LISTING_SEED", "42");
        env::set_var("APP_REGION_DATA_PATH", "/srv/regions.json");
        env::set_var("APP_REGION_HASH", "char_sum");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.pipeline.listing_count, 250);
        assert_eq!(config.pipeline.listing_seed, Some(42));
        assert_eq!(
            config.pipeline.region_data_path,
            PathBuf::from("/srv/regions.json")
        );
        assert_eq!(config.pipeline.region_hash, GradeHashScheme::CharSum);
        reset_env();
    }

    #[test]
    fn rejects_invalid_pipeline_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        env::set_var("APP_LISTING_COUNT", "-3");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidListingCount { .. })
        ));
        env::remove_var("APP_LISTING_COUNT");

        env::set_var("APP_REGION_HASH", "sha256");
        let err = AppConfig::load().expect_err("unknown hash rejected");
        assert!(err.to_string().contains("sha256"));
        env::remove_var("APP_REGION_HASH");

        env::set_var("APP_LOG_ANSI", "sometimes");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { name: "APP_LOG_ANSI", .. })
        ));
        reset_env();
    }
}
