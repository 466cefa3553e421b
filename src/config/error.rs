//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
///
/// All of these are fatal and are raised before any descriptor is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error(
        "cloud storage not supported. Supported cloud storages: \
         (awsS3|googleGcs|azureBlobStorage|openStackSwift)"
    )]
    UnsupportedStorage(String),

    #[error("cloud storage {driver} require {field}")]
    MissingCredential {
        driver: &'static str,
        field: &'static str,
    },

    #[error("error no publication type was specified")]
    NoPublicationMode,

    #[error("publish-looking-path and publish-looking-file are mutually exclusive")]
    ConflictingPublicationMode,

    #[error("Config validation error: {0}")]
    Validation(String),
}
