//! Stencil - a pluggable project scaffolding CLI.
//!
//! The `stencil` front end knows only command names. Each command is
//! implemented by an independently published artifact that is installed
//! into a versioned local cache and run in its own process.
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing, startup checks and the run loop
//! - [`config`] - Settings from flags, environment, `~/.env` and `config.yml`
//! - [`registry`] - Published-version lookups
//! - [`cache`] - Versioned artifact cache and entry-point resolution
//! - [`dispatch`] - Command-to-artifact mapping and child process launch
//! - [`command`] - The contract command implementations run under
//! - [`shell`] - Program execution and privilege handling
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`updates`] - Self-update check
//! - [`logging`] - Tracing setup
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use stencil::cache::cache_entry_path;
//! use stencil::dispatch::artifact_for;
//!
//! let artifact = artifact_for("init").unwrap();
//! let entry = cache_entry_path(Path::new("/store"), artifact, "1.2.0");
//! assert_eq!(
//!     entry,
//!     Path::new("/store/_@stencil_command-init@1.2.0@@stencil/command-init")
//! );
//! ```

pub mod cache;
pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod registry;
pub mod shell;
pub mod ui;
pub mod updates;

pub use error::{report, Result, StencilError};
