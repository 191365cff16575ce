// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an [`AppConfig`], which is then passed explicitly to
//! the components that need it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the database file | `./data` |
//! | `APP_ENV` | `production` or `development` | `production` |
//! | `JWT_SECRET` | HMAC secret for session tokens | Required in production |
//! | `TOKEN_TTL_DAYS` | Session token lifetime in days | `15` |
//! | `CLOUDINARY_CLOUD_NAME` | Media host cloud name | Optional |
//! | `CLOUDINARY_API_KEY` | Media host API key | Optional |
//! | `CLOUDINARY_API_SECRET` | Media host API secret | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

use chrono::Duration;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// The database file [`DATABASE_FILE`] is created inside it.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the deployment environment.
pub const APP_ENV_ENV: &str = "APP_ENV";

/// Environment variable name for the session token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the session token lifetime (days).
pub const TOKEN_TTL_DAYS_ENV: &str = "TOKEN_TTL_DAYS";

pub const CLOUDINARY_CLOUD_NAME_ENV: &str = "CLOUDINARY_CLOUD_NAME";
pub const CLOUDINARY_API_KEY_ENV: &str = "CLOUDINARY_API_KEY";
pub const CLOUDINARY_API_SECRET_ENV: &str = "CLOUDINARY_API_SECRET";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "chirp.redb";

/// Session lifetime when `TOKEN_TTL_DAYS` is unset.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 15;

/// Signing secret used only when `APP_ENV=development` and no secret is set.
const DEVELOPMENT_JWT_SECRET: &str = "chirp-development-secret-do-not-deploy";

/// Configuration errors raised at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Credentials for the Cloudinary media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Process-wide configuration, loaded once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub environment: Environment,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// `None` disables image uploads.
    pub cloudinary: Option<CloudinaryConfig>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = match var(APP_ENV_ENV).as_deref() {
            None | Some("production") => Environment::Production,
            Some("development") => Environment::Development,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: APP_ENV_ENV,
                    value: other.to_string(),
                })
            }
        };

        let port = match var(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = match (var(JWT_SECRET_ENV), environment) {
            (Some(secret), _) => secret,
            (None, Environment::Development) => DEVELOPMENT_JWT_SECRET.to_string(),
            (None, Environment::Production) => return Err(ConfigError::Missing(JWT_SECRET_ENV)),
        };

        let token_ttl_days = match var(TOKEN_TTL_DAYS_ENV) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(days) if days > 0 => days,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: TOKEN_TTL_DAYS_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_DAYS,
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        let cloudinary = match (
            var(CLOUDINARY_CLOUD_NAME_ENV),
            var(CLOUDINARY_API_KEY_ENV),
            var(CLOUDINARY_API_SECRET_ENV),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            host: var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: PathBuf::from(var(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            environment,
            jwt_secret,
            token_ttl: Duration::days(token_ttl_days),
            cloudinary,
            log_format,
        })
    }

    /// Path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether session cookies carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Whether the built-in development signing secret is in use.
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}
