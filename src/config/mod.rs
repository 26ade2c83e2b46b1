//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ConvertConfig, CorsConfig, LogFormat, LoggingConfig, ResolverConfig, ServerConfig,
    UploadsConfig,
};
