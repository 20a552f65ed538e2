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
    pub engine: EngineSettings,
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

        let engine = EngineSettings::load()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Knobs for the matching engines and their recurring ticks.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Minimum skill-match percentage before Auto-Apply submits an application.
    pub auto_apply_threshold: u8,
    pub auto_apply_interval_secs: u64,
    pub talent_radar_interval_secs: u64,
}

impl EngineSettings {
    fn load() -> Result<Self, ConfigError> {
        let auto_apply_threshold = env::var("APP_AUTO_APPLY_THRESHOLD")
            .unwrap_or_else(|_| "80".to_string())
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidThreshold)?;
        if auto_apply_threshold == 0 || auto_apply_threshold > 100 {
            return Err(ConfigError::InvalidThreshold);
        }

        let auto_apply_interval_secs =
            parse_interval("APP_AUTO_APPLY_INTERVAL_SECS", "900")?;
        let talent_radar_interval_secs =
            parse_interval("APP_TALENT_RADAR_INTERVAL_SECS", "1800")?;

        Ok(Self {
            auto_apply_threshold,
            auto_apply_interval_secs,
            talent_radar_interval_secs,
        })
    }

    pub fn auto_apply_interval(&self) -> Duration {
        Duration::from_secs(self.auto_apply_interval_secs)
    }

    pub fn talent_radar_interval(&self) -> Duration {
        Duration::from_secs(self.talent_radar_interval_secs)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_apply_threshold: 80,
            auto_apply_interval_secs: 900,
            talent_radar_interval_secs: 1800,
        }
    }
}

fn parse_interval(variable: &'static str, default: &str) -> Result<u64, ConfigError> {
    let secs = env::var(variable)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidInterval { variable })?;
    if secs == 0 {
        return Err(ConfigError::InvalidInterval { variable });
    }
    Ok(secs)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold,
    InvalidInterval { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold => {
                write!(f, "APP_AUTO_APPLY_THRESHOLD must be between 1 and 100")
            }
            ConfigError::InvalidInterval { variable } => {
                write!(f, "{variable} must be a positive number of seconds")
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
