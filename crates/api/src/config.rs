//! Process configuration from `VINTRADE_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use vintrade_catalog::RetentionPolicy;
use vintrade_infra::PdfTableConverter;
use vintrade_observability::LogFormat;

pub const BIND: &str = "VINTRADE_BIND";
pub const DATA_DIR: &str = "VINTRADE_DATA_DIR";
pub const UPLOAD_DIR: &str = "VINTRADE_UPLOAD_DIR";
pub const PDF_CONVERTER: &str = "VINTRADE_PDF_CONVERTER";
pub const RETENTION: &str = "VINTRADE_RETENTION";
pub const LOG_FORMAT: &str = "VINTRADE_LOG_FORMAT";
pub const MAX_BODY_BYTES: &str = "VINTRADE_MAX_BODY_BYTES";

/// Request body ceiling for uploads and imports (50 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{var}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub upload_dir: Option<PathBuf>,
    pub pdf_converter: Option<PdfTableConverter>,
    pub retention: RetentionPolicy,
    pub log_format: LogFormat,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: None,
            upload_dir: None,
            pdf_converter: None,
            retention: RetentionPolicy::KeepAll,
            log_format: LogFormat::Json,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(bind) = get(BIND) {
            config.bind = bind.parse().map_err(|e| ConfigError {
                var: BIND,
                message: format!("{bind:?} is not a socket address ({e})"),
            })?;
        }
        config.data_dir = get(DATA_DIR).map(PathBuf::from);
        config.upload_dir = get(UPLOAD_DIR).map(PathBuf::from);
        config.pdf_converter = get(PDF_CONVERTER)
            .as_deref()
            .and_then(PdfTableConverter::from_command_line);
        if let Some(retention) = get(RETENTION) {
            config.retention = retention.parse().map_err(|e: vintrade_core::DomainError| ConfigError {
                var: RETENTION,
                message: e.to_string(),
            })?;
        }
        if let Some(format) = get(LOG_FORMAT) {
            config.log_format = format.parse().map_err(|message| ConfigError {
                var: LOG_FORMAT,
                message,
            })?;
        }
        if let Some(limit) = get(MAX_BODY_BYTES) {
            config.max_body_bytes = limit
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError {
                    var: MAX_BODY_BYTES,
                    message: format!("{limit:?} is not a positive byte count"),
                })?;
        }
        Ok(config)
    }
}
