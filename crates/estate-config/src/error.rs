// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading console configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a configuration file, permission table or route catalog was refused.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("{} does not exist", .path.display())]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("{} cannot be read: {source}", .path.display())]
    Io {
        /// The unreadable file.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The file extension names no format we read.
    #[error("no configuration format for extension {format}")]
    UnsupportedFormat {
        /// The extension found.
        format: String,
    },

    /// Content that does not deserialize, before a path is known.
    #[error("{message}")]
    Syntax {
        /// Parser message.
        message: String,
    },

    /// Content of a file that does not deserialize.
    #[error("{} is not valid: {message}", .path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An environment override holds an unusable value.
    #[error("environment variable {name}: {message}")]
    EnvVar {
        /// Full variable name.
        name: String,
        /// What was expected.
        message: String,
    },

    /// A value deserialized but is out of range.
    #[error("{field} {message}")]
    Validation {
        /// Dotted key of the value.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The permission table or route catalog is unusable.
    #[error("access control: {0}")]
    Access(#[from] estate_core::CoreError),
}

impl ConfigError {
    /// [`ConfigError::FileNotFound`].
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// [`ConfigError::Io`].
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// [`ConfigError::UnsupportedFormat`].
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// [`ConfigError::Syntax`] from any parser error.
    pub fn syntax(message: impl ToString) -> Self {
        Self::Syntax {
            message: message.to_string(),
        }
    }

    /// [`ConfigError::Parse`].
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// [`ConfigError::EnvVar`].
    pub fn env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// [`ConfigError::Validation`]. `field` is the dotted key, e.g. `backend.base_url`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Attaches `path` to a [`ConfigError::Syntax`]; other errors pass through.
    pub fn at(self, path: &Path) -> Self {
        match self {
            Self::Syntax { message } => Self::parse(path, message),
            other => other,
        }
    }
}
