//! Versioned artifact cache.
//!
//! Command implementations are independently published artifacts. This
//! module owns the store directory protocol and decides when an artifact has
//! to be installed or updated; the install itself is delegated to an
//! [`Installer`].
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use stencil::cache::cache_entry_path;
//!
//! let entry = cache_entry_path(Path::new("/store"), "@stencil/command-init", "1.0.0");
//! assert!(entry.ends_with("_@stencil_command-init@1.0.0@@stencil/command-init"));
//! ```
//!
//! There is no eviction: entries accumulate until removed by hand.

pub mod artifact;
pub mod installer;
pub mod manifest;
pub mod store;

pub use artifact::{store_layout, Artifact, ArtifactRef};
pub use installer::{CommandInstaller, InstallRequest, Installer, DEFAULT_INSTALL_COMMAND};
pub use manifest::{entry_file, find_package_dir, PackageManifest, MANIFEST_FILE};
pub use store::{cache_entry_path, sanitize_name, LATEST};

/// Get the default cache home, `~/.stencil`.
pub fn default_cache_home() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(crate::config::DEFAULT_CLI_HOME))
}
