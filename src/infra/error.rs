use std::path::PathBuf;

use thiserror::Error;

use crate::domain::calendar::InvalidCalendarZone;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid [grouping] section: {0}")]
    InvalidTimezone(#[from] InvalidCalendarZone),
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("failed to read transcript at {path}: {source}")]
    TranscriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse transcript at {path}: {source}")]
    TranscriptParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("transcript at {path} is inconsistent: {reason}")]
    TranscriptInvalid { path: PathBuf, reason: String },
}
