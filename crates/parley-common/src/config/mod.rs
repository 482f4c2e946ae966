//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, RedisConfig, ServerConfig,
    SnowflakeConfig,
};
