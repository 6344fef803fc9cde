//! Self-update check.
//!
//! At startup Stencil asks the registry whether a newer release of itself
//! exists and prints an upgrade hint. The check never blocks a command.

use std::path::Path;

use crate::error::Result;
use crate::registry::VersionResolver;

/// Current version of Stencil.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name Stencil is published under.
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// How Stencil was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Installed via cargo install.
    Cargo,
    /// Installed from the package registry.
    Registry,
}

impl InstallMethod {
    /// Detect the install method from the running executable.
    pub fn detect() -> Self {
        let Ok(exe) = std::env::current_exe() else {
            return Self::Registry;
        };
        let cargo_home = std::env::var_os("CARGO_HOME")
            .map(std::path::PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".cargo")));
        Self::from_paths(&exe, cargo_home.as_deref())
    }

    fn from_paths(exe: &Path, cargo_home: Option<&Path>) -> Self {
        match cargo_home {
            Some(cargo_home) if exe.starts_with(cargo_home.join("bin")) => Self::Cargo,
            _ => Self::Registry,
        }
    }

    /// Command that upgrades `package`.
    pub fn update_command(&self, package: &str) -> String {
        match self {
            Self::Cargo => format!("cargo install {} --force", package),
            Self::Registry => format!("npm install -g {}", package),
        }
    }
}

/// A newer release is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Package name.
    pub package: String,
    /// Running version.
    pub current: String,
    /// Newest published version.
    pub latest: String,
}

impl UpdateInfo {
    /// One-line notice with the upgrade command.
    pub fn notice(&self, method: InstallMethod) -> String {
        format!(
            "Stencil {} is available (current: {}). Run `{}` to upgrade.",
            self.latest,
            self.current,
            method.update_command(&self.package)
        )
    }
}

/// Newest release of `package` above `current`, if any.
pub fn check_for_update(
    resolver: &VersionResolver,
    package: &str,
    current: &str,
) -> Result<Option<UpdateInfo>> {
    let latest = resolver.latest_version_satisfying(current, package, None)?;
    Ok(latest.map(|latest| UpdateInfo {
        package: package.to_string(),
        current: current.to_string(),
        latest,
    }))
}
