//! Error types for Stencil operations.
//!
//! This module defines [`StencilError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `StencilError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `StencilError::Other`) for collaborator failures
//! - All errors should provide actionable messages for users
//!
//! Failures are reported through [`report`], which prints one line and, when
//! verbose output is on, the full detail.

use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Stencil operations.
#[derive(Debug, Error)]
pub enum StencilError {
    /// Arguments handed to a command did not have the expected shape.
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// The dispatching host is older than the command supports.
    #[error("Unsupported runtime: {runtime} {current} is below the minimum {required}")]
    UnsupportedRuntime {
        runtime: String,
        current: String,
        required: String,
    },

    /// A command lifecycle step was not provided by the implementation.
    #[error("Command implementations must provide `{operation}`")]
    NotImplemented { operation: &'static str },

    /// The command name is not in the command table.
    #[error("Unknown command: {name} (available: {})", available.join(", "))]
    UnknownCommand {
        name: String,
        available: Vec<String>,
    },

    /// The registry could not be queried.
    #[error("Registry unavailable while looking up '{name}': {message}")]
    RegistryUnavailable { name: String, message: String },

    /// The registry has no published version of the artifact.
    #[error("No published version of '{name}'")]
    NoPublishedVersion { name: String },

    /// The install collaborator reported a failure.
    #[error("Failed to install {name}@{version}: {message}")]
    InstallFailed {
        name: String,
        version: String,
        message: String,
    },

    /// The artifact implementing a command could not be made available.
    #[error("Artifact '{name}' is unavailable: {source}")]
    ArtifactUnavailable {
        name: String,
        #[source]
        source: Box<StencilError>,
    },

    /// A package manifest exists but cannot be read.
    #[error("Invalid package manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    /// The child process could not be started.
    #[error("Failed to start '{program}': {message}")]
    ChildProcessError { program: String, message: String },

    /// The current user has no home directory.
    #[error("The current user's home directory does not exist")]
    HomeNotFound,

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// No project template matches the requested kind.
    #[error("No project templates available")]
    NoTemplates,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Stencil operations.
pub type Result<T> = std::result::Result<T, StencilError>;

/// Log a failure the way every terminal handler does.
///
/// The message is always logged. With `verbose` the debug representation and
/// the chain of underlying causes are logged as well.
pub fn report(err: &StencilError, verbose: bool) {
    tracing::error!("{}", err);
    if verbose {
        tracing::error!("{:#?}", err);
        let mut source = err.source();
        while let Some(cause) = source {
            tracing::error!("caused by: {}", cause);
            source = cause.source();
        }
    }
}
