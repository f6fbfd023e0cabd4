//! # Avatar Error Types
//!
//! Configuration is the only fallible input of the avatar builder. Once a
//! builder exists, every build succeeds: odd glyphs are handled as policy.

use thiserror::Error;

/// Errors that can occur while preparing an avatar build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvatarError {
    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file is not valid TOML for [`crate::AvatarConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),

    /// A configuration or glyph file could not be read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

impl From<toml::de::Error> for AvatarError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}

/// Result type for avatar operations.
pub type AvatarResult<T> = Result<T, AvatarError>;
