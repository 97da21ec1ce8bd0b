//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    GovernanceConfig, JwtConfig, RateLimitConfig, ServerConfig, SnowflakeConfig, StorageBackend,
    StorageConfig, MIN_STANDING_WINDOW_DAYS,
};
