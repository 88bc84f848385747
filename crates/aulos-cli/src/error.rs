//! Error types for the command-line renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a patch or writing audio.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to write a WAV file
    #[error("failed to write WAV '{path}': {source}")]
    WriteWav {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: hound::Error,
    },

    /// A phrase event cannot be scheduled
    #[error("invalid phrase event {index}: {reason}")]
    InvalidPhrase {
        /// Position of the event in the `[[phrase]]` array.
        index: usize,
        /// Why the event was rejected.
        reason: String,
    },

    /// A render setting is out of range
    #[error("invalid render setting '{name}': {reason}")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl CliError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a WAV write error.
    pub fn write_wav(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        CliError::WriteWav {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid phrase error.
    pub fn invalid_phrase(index: usize, reason: impl Into<String>) -> Self {
        CliError::InvalidPhrase {
            index,
            reason: reason.into(),
        }
    }

    /// Create an invalid setting error.
    pub fn invalid_setting(name: &'static str, reason: impl Into<String>) -> Self {
        CliError::InvalidSetting {
            name,
            reason: reason.into(),
        }
    }
}
