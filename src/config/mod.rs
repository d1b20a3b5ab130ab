//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, LogFormat, LoggingConfig, ProviderConfig, ServerConfig,
    API_KEY_ENV_VAR,
};
