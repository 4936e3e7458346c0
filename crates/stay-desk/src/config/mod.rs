use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

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

/// Top-level configuration for the booking desk.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
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
        let data_dir = env::var("STAY_DESK_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig::new(data_dir),
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the property data: JSON configuration plus uploaded CSV sheets.
///
/// The layout under `root` is fixed:
///
/// ```text
/// config/rules.json
/// config/restricted_periods.json
/// config/long_weekends.json
/// config/tariff.json
/// uploads/rooms.csv                      (or "Room Classification List.csv")
/// uploads/bookings.csv
/// ```
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub root: PathBuf,
}

impl DataConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn rules_path(&self) -> PathBuf {
        self.config_dir().join("rules.json")
    }

    pub fn restricted_periods_path(&self) -> PathBuf {
        self.config_dir().join("restricted_periods.json")
    }

    pub fn long_weekends_path(&self) -> PathBuf {
        self.config_dir().join("long_weekends.json")
    }

    pub fn tariff_path(&self) -> PathBuf {
        self.config_dir().join("tariff.json")
    }

    /// Room sheets in the order they are tried.
    pub fn room_sources(&self) -> Vec<PathBuf> {
        let uploads = self.uploads_dir();
        vec![
            uploads.join("rooms.csv"),
            uploads.join("Room Classification List.csv"),
        ]
    }

    pub fn bookings_path(&self) -> PathBuf {
        self.uploads_dir().join("bookings.csv")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
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
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("STAY_DESK_DATA_DIR");
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
        assert_eq!(config.data.root(), Path::new("data"));
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "eighty");
        let error = AppConfig::load().expect_err("port must be numeric");
        assert!(matches!(error, ConfigError::InvalidPort));
        reset_env();
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
    fn data_paths_follow_fixed_layout() {
        let data = DataConfig::new("/srv/stay");
        assert_eq!(
            data.tariff_path(),
            PathBuf::from("/srv/stay/config/tariff.json")
        );
        assert_eq!(
            data.room_sources()[1],
            PathBuf::from("/srv/stay/uploads/Room Classification List.csv")
        );
        assert_eq!(
            data.bookings_path(),
            PathBuf::from("/srv/stay/uploads/bookings.csv")
        );
    }
}
