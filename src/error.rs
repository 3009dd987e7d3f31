use std::path::PathBuf;

use kumitate_core::{CodecError, PuzzleInfo, RestoreError};

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to render TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key {0:?}")]
    InvalidKey(String),

    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("stored value for {key:?} is not valid base64: {source}")]
    Base64 {
        key: String,
        source: base64::DecodeError,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("snapshot does not fit the layout: {0}")]
    Restore(#[from] RestoreError),

    #[error("snapshot is for puzzle {found:?}, session is {expected:?}")]
    Mismatch {
        expected: PuzzleInfo,
        found: PuzzleInfo,
    },
}
