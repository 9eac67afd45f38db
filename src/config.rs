use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
}

/// Enrollment/attendance policy constants. The source system treats the
/// confirmation windows as independent values with no documented
/// rationale, so they stay independent and overridable here.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Minimum distinct-present-dates / total-sessions ratio for
    /// evaluation eligibility.
    pub attendance_ratio: f64,
    /// How early before session start self-service confirmation opens.
    pub self_confirm_early_minutes: i64,
    /// How long after session end instructors may still confirm.
    pub instructor_confirm_hours: i64,
    /// How far back administrative backfill may reach, in whole days.
    pub backfill_max_days: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            attendance_ratio: 0.75,
            self_confirm_early_minutes: 30,
            instructor_confirm_hours: 48,
            backfill_max_days: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let db_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MAX_CONNECTIONS")?),
            Err(_) => Some(10),
        };
        let db_min_connections = match env::var("DATABASE_MIN_CONNECTIONS") {
            Ok(val) => Some(val.parse().context("Failed to parse DATABASE_MIN_CONNECTIONS")?),
            Err(_) => Some(1),
        };

        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name =
            env::var("APP_NAME").unwrap_or_else(|_| "Enrollment Backend".to_string());

        let defaults = PolicyConfig::default();
        let policy = PolicyConfig {
            attendance_ratio: env_or("ATTENDANCE_RATIO", defaults.attendance_ratio)?,
            self_confirm_early_minutes: env_or(
                "SELF_CONFIRM_EARLY_MINUTES",
                defaults.self_confirm_early_minutes,
            )?,
            instructor_confirm_hours: env_or(
                "INSTRUCTOR_CONFIRM_HOURS",
                defaults.instructor_confirm_hours,
            )?,
            backfill_max_days: env_or("BACKFILL_MAX_DAYS", defaults.backfill_max_days)?,
        };

        Ok(Config {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: db_url,
                max_connections: db_max_connections,
                min_connections: db_min_connections,
            },
            app: AppConfig {
                name: app_name,
                environment,
            },
            policy,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    #[allow(unused)]
    pub fn is_development(&self) -> bool {
        self.app.environment == Environment::Development
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}")),
        Err(_) => Ok(default),
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Global config instance, initialized once at startup.
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}

pub fn try_get() -> Option<&'static Config> {
    CONFIG.get()
}

/// Policy constants with config overrides when initialized; defaults
/// otherwise (tests exercise the pure logic without env setup).
pub fn policy() -> PolicyConfig {
    try_get().map_or_else(PolicyConfig::default, |c| c.policy.clone())
}
