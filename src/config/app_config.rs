use crate::error::{AppError, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub environment: Environment,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct S3Config {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    pub assets_url: String,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("assets_url", &self.assets_url)
            .finish_non_exhaustive()
    }
}

/// Where photos and product documents end up.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    Cloud {
        database: DatabaseConfig,
        s3: S3Config,
    },
    /// Process-local stores, for local runs without cloud credentials. Photos
    /// are served back under `/assets`.
    Memory { assets_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Staging,
    Main,
}

impl Environment {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staging" => Ok(Environment::Staging),
            "main" | "production" => Ok(Environment::Main),
            other => Err(AppError::ConfigError(format!(
                "Invalid APP_ENV value: {}",
                other
            ))),
        }
    }

    /// Object key prefix under which product photos are stored.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Environment::Staging => "products-staging",
            Environment::Main => "products-main",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| AppError::ConfigError("Invalid PORT value".to_string()))?;

        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                max_body_size: env::var("MAX_BODY_SIZE")
                    .unwrap_or_else(|_| "10485760".to_string())
                    .parse()
                    .map_err(|_| AppError::ConfigError("Invalid MAX_BODY_SIZE value".to_string()))?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("FRONTEND_URL")?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            auth: AuthConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| AppError::ConfigError("JWT_SECRET not set".to_string()))?,
            },
            environment: Environment::parse(
                &env::var("APP_ENV").unwrap_or_else(|_| "main".to_string()),
            )?,
            backend: backend_from_env(port)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn backend_from_env(port: u16) -> Result<BackendConfig> {
    let backend = env::var("BACKEND").unwrap_or_else(|_| "cloud".to_string());

    match backend.trim().to_ascii_lowercase().as_str() {
        "cloud" => Ok(BackendConfig::Cloud {
            database: DatabaseConfig {
                url: env::var("DB_URL")?,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_MAX_CONNECTIONS value".to_string())
                    })?,
                acquire_timeout_secs: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::ConfigError("Invalid DB_ACQUIRE_TIMEOUT_SECS value".to_string())
                    })?,
            },
            s3: S3Config {
                access_key_id: env::var("AWS_ACCESS_KEY_ID")
                    .map_err(|_| AppError::ConfigError("AWS_ACCESS_KEY_ID not set".to_string()))?,
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").map_err(|_| {
                    AppError::ConfigError("AWS_SECRET_ACCESS_KEY not set".to_string())
                })?,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                bucket: env::var("S3_BUCKET")
                    .map_err(|_| AppError::ConfigError("S3_BUCKET not set".to_string()))?,
                assets_url: trim_url(
                    env::var("ASSETS_URL")
                        .map_err(|_| AppError::ConfigError("ASSETS_URL not set".to_string()))?,
                ),
            },
        }),
        "memory" => Ok(BackendConfig::Memory {
            assets_url: trim_url(
                env::var("ASSETS_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{}/assets", port)),
            ),
        }),
        other => Err(AppError::ConfigError(format!(
            "Invalid BACKEND value: {}",
            other
        ))),
    }
}

fn trim_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
