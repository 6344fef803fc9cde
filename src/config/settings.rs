//! Runtime settings.
//!
//! Settings are assembled once at startup from flags, the process
//! environment, `~/.env` and `<cache home>/config.yml`, then passed by
//! reference to everything that needs them. Nothing below the front end
//! reads the process environment.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_INSTALL_COMMAND;
use crate::error::{Result, StencilError};
use crate::registry::default_registry;

use super::env_file::EnvFileParser;

/// Cache home directory name, relative to the user home.
pub const DEFAULT_CLI_HOME: &str = ".stencil";

/// Name of the optional YAML config file inside the cache home.
pub const CONFIG_FILE: &str = "config.yml";

/// Environment variables read by [`Settings::load`].
pub mod vars {
    /// Cache home, relative to the user home.
    pub const CLI_HOME: &str = "CLI_HOME";
    /// Local override path for command artifacts.
    pub const LOCAL_PATH: &str = "STENCIL_LOCAL_PATH";
    /// `verbose` turns on debug output.
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Registry address.
    pub const REGISTRY: &str = "STENCIL_REGISTRY";
    /// Install command template.
    pub const INSTALL_COMMAND: &str = "STENCIL_INSTALL_COMMAND";
    /// Program used to run entry files.
    pub const RUNTIME: &str = "STENCIL_RUNTIME";
    /// Any truthy value disables the self-update check.
    pub const NO_UPDATE_CHECK: &str = "STENCIL_NO_UPDATE_CHECK";
}

/// Contents of `<cache home>/config.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Registry address.
    pub registry: Option<String>,
    /// Install command template.
    pub install_command: Option<String>,
    /// Program used to run entry files.
    pub runtime: Option<String>,
    /// Whether to check for a newer Stencil at startup.
    pub update_check: Option<bool>,
}

impl FileConfig {
    /// Load the file if present.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| StencilError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Inputs gathered by the front end.
#[derive(Debug, Clone, Default)]
pub struct SettingsSources {
    /// The user's home directory.
    pub home_dir: Option<PathBuf>,
    /// Snapshot of the process environment.
    pub env: HashMap<String, String>,
    /// `--local-path`, when given.
    pub local_path: Option<PathBuf>,
    /// `--debug`.
    pub debug: bool,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The user's home directory.
    pub home_dir: PathBuf,
    /// Root of Stencil's own files, `~/.stencil` by default.
    pub cache_home: PathBuf,
    /// Read command artifacts from here instead of the cache.
    pub local_path: Option<PathBuf>,
    /// Verbose diagnostics.
    pub debug: bool,
    /// Registry address.
    pub registry: String,
    /// Install command template.
    pub install_command: String,
    /// Program used to run entry files, if they are not executables.
    pub runtime: Option<String>,
    /// Check for a newer Stencil at startup.
    pub update_check: bool,
}

impl Settings {
    /// Settings rooted at `cache_home` with every other value defaulted.
    pub fn with_cache_home(cache_home: impl Into<PathBuf>) -> Self {
        let cache_home = cache_home.into();
        Self {
            home_dir: cache_home
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cache_home.clone()),
            cache_home,
            local_path: None,
            debug: false,
            registry: default_registry(false).to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            runtime: None,
            update_check: true,
        }
    }

    /// Assemble settings from every source.
    ///
    /// Priority, highest first: flags, process environment, `~/.env`,
    /// `config.yml`, defaults.
    pub fn load(sources: SettingsSources) -> Result<Self> {
        let home_dir = sources
            .home_dir
            .filter(|home| home.is_dir())
            .ok_or(StencilError::HomeNotFound)?;

        let dotenv = EnvFileParser::load_optional(&home_dir.join(".env"))?;
        let env = EnvFileParser::merge(dotenv, &sources.env);
        let lookup = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let cache_home = home_dir.join(lookup(vars::CLI_HOME).unwrap_or(DEFAULT_CLI_HOME));
        let file = FileConfig::load_optional(&cache_home.join(CONFIG_FILE))?;

        let registry = lookup(vars::REGISTRY)
            .map(str::to_string)
            .or(file.registry)
            .unwrap_or_else(|| default_registry(false).to_string());

        let install_command = lookup(vars::INSTALL_COMMAND)
            .map(str::to_string)
            .or(file.install_command)
            .unwrap_or_else(|| DEFAULT_INSTALL_COMMAND.to_string());

        let runtime = lookup(vars::RUNTIME)
            .map(str::to_string)
            .or(file.runtime);

        let update_check =
            !lookup(vars::NO_UPDATE_CHECK).is_some_and(is_truthy) && file.update_check.unwrap_or(true);

        let debug = sources.debug || lookup(vars::LOG_LEVEL) == Some("verbose");

        let local_path = sources
            .local_path
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| lookup(vars::LOCAL_PATH).map(PathBuf::from));

        Ok(Self {
            home_dir,
            cache_home,
            local_path,
            debug,
            registry,
            install_command,
            runtime,
            update_check,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
