use chrono::Duration;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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

/// Which storefront branding the pages are rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitePreset {
    DarsCapital,
    Classic,
}

impl SitePreset {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dars_capital" | "dars" => Ok(Self::DarsCapital),
            "classic" => Ok(Self::Classic),
            other => Err(ConfigError::UnknownSiteProfile(other.to_string())),
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub backend: BackendConfig,
    pub admin: AdminConfig,
    pub site: SitePreset,
    pub seed_csv: Option<PathBuf>,
    pub cors: CorsConfig,
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

        let base_url = env::var("APP_BACKEND_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{port}"));
        let base_url = BackendConfig::normalize(&base_url)?;
        let token_path = env::var("APP_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".estate-admin-token"));

        let username = env::var("APP_ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let password = env::var("APP_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
        let token_ttl_minutes = env::var("APP_ADMIN_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "720".to_string())
            .parse::<u32>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidTokenTtl)?;

        let site = SitePreset::parse(
            &env::var("APP_SITE_PROFILE").unwrap_or_else(|_| "dars_capital".to_string()),
        )?;

        let seed_csv = env::var("APP_SEED_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let cors = CorsConfig::parse(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            backend: BackendConfig {
                base_url,
                token_path,
            },
            admin: AdminConfig {
                username,
                password,
                token_ttl_minutes,
            },
            site,
            seed_csv,
            cors,
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

/// Where storefront pages find the listings API, and where the admin token is kept.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub token_path: PathBuf,
}

impl BackendConfig {
    fn normalize(raw: &str) -> Result<String, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(trimmed.to_string())
        } else {
            Err(ConfigError::InvalidBackendUrl(raw.to_string()))
        }
    }
}

/// Origins allowed to call the service from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfig {
    AnyOrigin,
    Origins(Vec<String>),
}

impl CorsConfig {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();
        if origins.is_empty() || origins.contains(&"*") {
            return Ok(Self::AnyOrigin);
        }

        origins
            .into_iter()
            .map(|origin| {
                let origin = origin.trim_end_matches('/');
                if origin.starts_with("http://") || origin.starts_with("https://") {
                    Ok(origin.to_string())
                } else {
                    Err(ConfigError::InvalidCorsOrigin(origin.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Origins)
    }
}

/// Credentials and token lifetime for the admin panel.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub token_ttl_minutes: u32,
}

impl AdminConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.token_ttl_minutes))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidBackendUrl(String),
    InvalidTokenTtl,
    UnknownSiteProfile(String),
    InvalidCorsOrigin(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidBackendUrl(value) => {
                write!(f, "APP_BACKEND_URL must be an http(s) URL, got '{value}'")
            }
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_ADMIN_TOKEN_TTL_MINUTES must be a positive integer")
            }
            ConfigError::UnknownSiteProfile(value) => write!(
                f,
                "APP_SITE_PROFILE must be 'dars_capital' or 'classic', got '{value}'"
            ),
            ConfigError::InvalidCorsOrigin(value) => write!(
                f,
                "APP_CORS_ORIGINS entries must be http(s) origins or '*', got '{value}'"
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
