//! Error types for nexdeploy

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for nexdeploy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for "nothing to deploy" conditions.
pub const EXIT_NOTHING_TO_DO: i32 = 1;

/// Exit code for configuration and input-file errors.
pub const EXIT_CONFIG: i32 = 2;

/// Main error type for nexdeploy
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration value
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse config file {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// The definition document does not exist
    #[error("Document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    /// Undecodable input under the strict decode policy
    #[error("Failed to decode {} at line {line}: {message}", path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The deploy executable could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The scan produced no deploy target
    #[error("No -O target to deploy (no relative path found in <Services>)")]
    NoTargets,

    /// No deployable source file was found for any target
    #[error("No -FILE target to deploy (no .xfdl/.xjs file found under the source base)")]
    NoFiles,

    /// The deploy executable exited with a non-zero code
    #[error("{program} failed with exit code {code}")]
    ProcessFailed { program: String, code: i32 },

    /// Moving a generated artifact failed
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config { .. }
            | Error::ConfigParse { .. }
            | Error::DocumentNotFound { .. }
            | Error::Decode { .. }
            | Error::Spawn { .. } => EXIT_CONFIG,
            Error::NoTargets | Error::NoFiles => EXIT_NOTHING_TO_DO,
            Error::ProcessFailed { code, .. } => *code,
            Error::Relocate { .. } | Error::Io { .. } => 1,
        }
    }
}
