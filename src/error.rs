//! Error types for dotazure operations.
//!
//! This module defines [`DotazureError`], the error type returned by project
//! resolution and environment loading, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - "Not found" failures (no project, no `.azure` layout) are a recoverable
//!   class; see [`DotazureError::is_not_found`]. The loader turns them into
//!   "nothing loaded" instead of an error.
//! - Misconfiguration (no default environment, malformed files) always
//!   surfaces to the caller.
//! - I/O failures carry the [`Stage`] they happened in.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The step of resolution or loading an I/O failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the process's current directory.
    CurrentDirectory,
    /// Validating an explicit starting directory.
    CheckingDirectory,
    /// Ascending parent directories looking for `azure.yaml`.
    SearchingProject,
    /// Checking the `.azure` directory.
    CheckingConfig,
    /// Reading `.azure/config.json`.
    ReadingConfig,
    /// Reading `.azure/<environment>/.env`.
    ReadingEnvFile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CurrentDirectory => "getting current directory",
            Self::CheckingDirectory => "checking starting directory",
            Self::SearchingProject => "searching for project file",
            Self::CheckingConfig => "checking config directory",
            Self::ReadingConfig => "reading config file",
            Self::ReadingEnvFile => "reading environment file",
        };
        f.write_str(s)
    }
}

/// Core error type for dotazure operations.
#[derive(Debug, Error)]
pub enum DotazureError {
    /// No `azure.yaml` exists from the starting directory up to the root.
    #[error("no project exists above {start}; to create a new project, run `azd init`")]
    NoProject { start: PathBuf },

    /// The `.azure` directory or its `config.json` is missing.
    #[error("config not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// `config.json` parsed but does not name a default environment.
    #[error("'{path}' does not define `defaultEnvironment`")]
    NoEnvironmentName { path: PathBuf },

    /// A caller-supplied option was rejected.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// I/O failure, tagged with the step that failed.
    #[error("{stage}: {path}: {source}")]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `config.json` is not valid JSON or has the wrong shape.
    #[error("deserializing config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An environment file contains a malformed line.
    ///
    /// Only the byte index is kept; the line itself may hold a secret.
    #[error("parsing environment file {path}: invalid syntax at position {index}")]
    EnvFileParse { path: PathBuf, index: usize },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DotazureError {
    /// Creates an I/O error for the given stage and path.
    pub fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "nothing there yet" rather than a failure.
    ///
    /// True for [`NoProject`](Self::NoProject),
    /// [`ConfigNotFound`](Self::ConfigNotFound), and I/O errors of kind
    /// [`io::ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NoProject { .. } | Self::ConfigNotFound { .. } => true,
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type alias for dotazure operations.
pub type Result<T> = std::result::Result<T, DotazureError>;
