use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderName;

/// Header carrying the caller identity when no other verifier is configured.
pub const DEFAULT_IDENTITY_HEADER: &str = "user-id";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where track and album metadata lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataBackend {
    Postgres { database_url: String },
    /// Process-local store; contents are lost on restart.
    Memory,
}

/// Where uploaded audio is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectStoreConfig {
    /// Files under `dir`, served by this server at `/media`.
    Local { dir: PathBuf, public_base_url: String },
    S3 { bucket: String, public_base_url: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the backend credentials have defaults suitable for
/// local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, uploads included (default: 50 MiB).
    pub max_upload_bytes: usize,
    /// Header the placeholder identity verifier reads (default: `user-id`).
    pub identity_header: HeaderName,
    /// Delete the stored audio when the track insert fails (default: `false`).
    pub compensate_orphaned_blobs: bool,
    pub log_format: LogFormat,
    pub metadata: MetadataBackend,
    pub object_store: ObjectStoreConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `MAX_UPLOAD_BYTES`          | `52428800`                 |
    /// | `IDENTITY_HEADER`           | `user-id`                  |
    /// | `COMPENSATE_ORPHANED_BLOBS` | `false`                    |
    /// | `LOG_FORMAT`                | `pretty` (`json`)          |
    /// | `METADATA_BACKEND`          | `postgres` (`memory`)      |
    /// | `DATABASE_URL`              | required for `postgres`    |
    /// | `OBJECT_STORE_BACKEND`      | `local` (`s3`)             |
    /// | `LOCAL_STORAGE_DIR`         | `storage`                  |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:{PORT}`  |
    /// | `S3_BUCKET`                 | required for `s3`          |
    /// | `S3_PUBLIC_BASE_URL`        | required for `s3`          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let max_upload_bytes: usize = parse_or(&lookup, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?;
        let compensate_orphaned_blobs: bool =
            parse_or(&lookup, "COMPENSATE_ORPHANED_BLOBS", false)?;

        let header_raw =
            lookup("IDENTITY_HEADER").unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.into());
        let identity_header =
            HeaderName::from_str(&header_raw).map_err(|e| ConfigError::Invalid {
                var: "IDENTITY_HEADER",
                value: header_raw.clone(),
                reason: e.to_string(),
            })?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(invalid("LOG_FORMAT", other, "expected pretty or json")),
        };

        let metadata = match lookup("METADATA_BACKEND").as_deref() {
            None | Some("postgres") => MetadataBackend::Postgres {
                database_url: required(&lookup, "DATABASE_URL")?,
            },
            Some("memory") => MetadataBackend::Memory,
            Some(other) => {
                return Err(invalid("METADATA_BACKEND", other, "expected postgres or memory"))
            }
        };

        let object_store = match lookup("OBJECT_STORE_BACKEND").as_deref() {
            None | Some("local") => {
                let base = lookup("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{port}"));
                ObjectStoreConfig::Local {
                    dir: lookup("LOCAL_STORAGE_DIR")
                        .unwrap_or_else(|| "storage".into())
                        .into(),
                    public_base_url: format!("{}/media", base.trim_end_matches('/')),
                }
            }
            Some("s3") => ObjectStoreConfig::S3 {
                bucket: required(&lookup, "S3_BUCKET")?,
                public_base_url: required(&lookup, "S3_PUBLIC_BASE_URL")?,
            },
            Some(other) => {
                return Err(invalid("OBJECT_STORE_BACKEND", other, "expected local or s3"))
            }
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            identity_header,
            compensate_orphaned_blobs,
            log_format,
            metadata,
            object_store,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing { var })
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
