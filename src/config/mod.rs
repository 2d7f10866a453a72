mod app_config;
mod s3_config;

pub use app_config::{
    AppConfig, AuthConfig, BackendConfig, CorsConfig, DatabaseConfig, Environment, S3Config,
    ServerConfig,
};
pub use s3_config::*;
