use std::path::PathBuf;

use thiserror::Error;

/// A static resource (tile-code table, floor document) could not be read or
/// understood. Fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {message}")]
    Parse { what: String, message: String },
    #[error("failed to parse {what} at {path_in_doc}: {message}")]
    ParseAt {
        what: String,
        path_in_doc: String,
        message: String,
    },
    #[error("invalid tile key '{key}' in {what}: expected \"y,x\"")]
    InvalidTileKey { what: String, key: String },
}

/// Saving or restoring the snapshot slot failed. Logged, never fatal.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save slot io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}
