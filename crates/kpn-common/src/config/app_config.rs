//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub storage: StorageConfig,
    /// Required when the storage backend is Postgres
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub governance: GovernanceConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where engine state lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process-local store; state is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

/// JWT configuration
///
/// Tokens are minted by the web layer in front of the engine; the engine
/// only verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Governance engine tuning
#[derive(Debug, Clone, Deserialize)]
pub struct GovernanceConfig {
    /// An APPROVED review escalates the report immediately
    #[serde(default = "default_auto_escalate")]
    pub auto_escalate: bool,
    /// Days of audit history folded into a standing recomputation
    #[serde(default = "default_standing_window_days")]
    pub standing_window_days: i64,
    /// Persist the seed catalog at startup
    #[serde(default = "default_seed_on_startup")]
    pub seed_on_startup: bool,
    /// Seat an approved President under this name when the top seat is empty
    #[serde(default)]
    pub president_name: Option<String>,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            auto_escalate: default_auto_escalate(),
            standing_window_days: default_standing_window_days(),
            seed_on_startup: default_seed_on_startup(),
            president_name: None,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Shortest standing window that still spans a full inactivity period
pub const MIN_STANDING_WINDOW_DAYS: i64 = 30;

// Default value functions
fn default_app_name() -> String {
    "kpn-governance".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_auto_escalate() -> bool {
    true
}

fn default_standing_window_days() -> i64 {
    90
}

fn default_seed_on_startup() -> bool {
    true
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let storage = StorageConfig {
            backend: vars.parse_or("KPN_STORAGE", StorageBackend::default)?,
        };

        let database = match vars.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: vars.parse_or("DATABASE_RUN_MIGRATIONS", default_run_migrations)?,
            }),
            None if storage.backend == StorageBackend::Postgres => {
                return Err(ConfigError::MissingVar("DATABASE_URL"))
            }
            None => None,
        };

        let governance = GovernanceConfig {
            auto_escalate: vars.parse_or("GOVERNANCE_AUTO_ESCALATE", default_auto_escalate)?,
            standing_window_days: vars
                .parse_or("GOVERNANCE_STANDING_WINDOW_DAYS", default_standing_window_days)?,
            seed_on_startup: vars.parse_or("GOVERNANCE_SEED_ON_STARTUP", default_seed_on_startup)?,
            president_name: vars.get("GOVERNANCE_PRESIDENT_NAME").map(|s| s.trim().to_string()),
        };
        if governance.standing_window_days < MIN_STANDING_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue(
                "GOVERNANCE_STANDING_WINDOW_DAYS",
                format!(
                    "{} is shorter than {MIN_STANDING_WINDOW_DAYS} days",
                    governance.standing_window_days
                ),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars.parse_or("APP_ENV", default_env)?,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars
                    .parse::<u16>("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            storage,
            database,
            jwt: JwtConfig {
                secret: vars.get("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: vars
                    .parse_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            governance,
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: vars.parse_or("WORKER_ID", || 0)?,
            },
        })
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidValue(key, format!("{raw:?}: {e}")))
            })
            .transpose()
    }

    fn parse_or<T>(&self, key: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse(key)?.unwrap_or_else(default))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("API_PORT", "8080"),
        ("JWT_SECRET", "secret"),
        ("KPN_STORAGE", "memory"),
    ];

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_minimal_memory_config() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.database.is_none());
        assert!(config.governance.auto_escalate);
        assert_eq!(config.governance.standing_window_days, 90);
        assert_eq!(config.app.name, "kpn-governance");
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.governance.president_name.is_none());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = load(&[("API_PORT", "8080"), ("JWT_SECRET", "s")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("DATABASE_URL")));

        let config = load(&[
            ("API_PORT", "8080"),
            ("JWT_SECRET", "s"),
            ("DATABASE_URL", "postgres://localhost/kpn"),
        ])
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.unwrap().max_connections, 20);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let mut pairs = MINIMAL.to_vec();
        pairs.push(("GOVERNANCE_AUTO_ESCALATE", "sometimes"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::InvalidValue("GOVERNANCE_AUTO_ESCALATE", _))
        ));

        let mut pairs = MINIMAL.to_vec();
        pairs.push(("GOVERNANCE_STANDING_WINDOW_DAYS", "14"));
        assert!(matches!(
            load(&pairs),
            Err(ConfigError::InvalidValue("GOVERNANCE_STANDING_WINDOW_DAYS", _))
        ));

        let pairs = [("API_PORT", "eighty"), ("JWT_SECRET", "s"), ("KPN_STORAGE", "memory")];
        assert!(matches!(load(&pairs), Err(ConfigError::InvalidValue("API_PORT", _))));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend([
            ("GOVERNANCE_AUTO_ESCALATE", "false"),
            ("CORS_ALLOWED_ORIGINS", "https://kpn.ng, https://admin.kpn.ng"),
            ("APP_ENV", "production"),
            ("GOVERNANCE_PRESIDENT_NAME", "  Ngozi Adeyemi "),
        ]);
        let config = load(&pairs).unwrap();
        assert!(!config.governance.auto_escalate);
        assert_eq!(config.governance.president_name.as_deref(), Some("Ngozi Adeyemi"));
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert!(config.app.env.is_production());
    }
}
