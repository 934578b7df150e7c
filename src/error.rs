//! Error types shared by the resolver and the renderer.

use crate::config::ConfigDiagnostics;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = StyleError> = std::result::Result<T, E>;

/// Every condition the resolver or renderer can hand to a [`LogSink`].
///
/// [`LogSink`]: crate::sink::LogSink
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("alias `{alias}` refers to a non-existent file ({target})")]
    Resolution { alias: String, target: String },

    #[error("alias is undefined")]
    UndefinedAlias,

    #[error("invalid alias `{0}`")]
    InvalidAlias(String),

    #[error("alias `{alias}` refers to a URI ({url}), cannot inline")]
    UriInline { alias: String, url: String },

    #[error("alias `{alias}` refers to an empty file ({})", .path.display())]
    EmptyFile { alias: String, path: PathBuf },

    #[error("IO error when reading `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    // NOTE: No #[from] here - we don't want source() which causes duplicate output
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

impl StyleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
