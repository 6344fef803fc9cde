//! The install collaborator.
//!
//! The cache decides *when* an artifact must be installed; *how* is delegated
//! to an [`Installer`]. [`CommandInstaller`] runs an external installer
//! program from a configurable command template.

use anyhow::{bail, Result};
use std::path::Path;

use crate::shell::{self, CommandOptions};

/// Everything an installer needs to materialize one artifact version.
#[derive(Debug, Clone, Copy)]
pub struct InstallRequest<'a> {
    /// Directory the artifact should end up usable from.
    pub root: &'a Path,
    /// Shared store holding versioned entries, if the artifact is cached.
    pub store_dir: Option<&'a Path>,
    /// Registry to install from.
    pub registry: &'a str,
    /// Artifact name.
    pub name: &'a str,
    /// Concrete version to install.
    pub version: &'a str,
}

/// Materializes artifacts on disk.
pub trait Installer {
    /// Install one artifact version.
    fn install(&self, request: &InstallRequest<'_>) -> Result<()>;
}

/// Default install command template.
///
/// The store layout `_{escaped}@{version}@{name}` is the one this installer
/// produces under `--storeDir`.
pub const DEFAULT_INSTALL_COMMAND: &str =
    "npminstall --root {root} --storeDir {store} --registry {registry} {name}@{version}";

/// Installer that runs an external program.
///
/// The template is split on whitespace and each token has its placeholders
/// (`{root}`, `{store}`, `{registry}`, `{name}`, `{version}`) replaced, so
/// paths containing spaces stay single arguments.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    template: String,
}

impl CommandInstaller {
    /// Create an installer from a command template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Expand the template into program and arguments.
    pub fn command_line(&self, request: &InstallRequest<'_>) -> Vec<String> {
        let root = request.root.to_string_lossy();
        let store = request
            .store_dir
            .map(|s| s.to_string_lossy())
            .unwrap_or_else(|| root.clone());

        self.template
            .split_whitespace()
            .map(|token| {
                token
                    .replace("{root}", &root)
                    .replace("{store}", &store)
                    .replace("{registry}", request.registry)
                    .replace("{name}", request.name)
                    .replace("{version}", request.version)
            })
            .collect()
    }
}

impl Default for CommandInstaller {
    fn default() -> Self {
        Self::new(DEFAULT_INSTALL_COMMAND)
    }
}

impl Installer for CommandInstaller {
    fn install(&self, request: &InstallRequest<'_>) -> Result<()> {
        let line = self.command_line(request);
        let Some((program, args)) = line.split_first() else {
            bail!("install command is empty");
        };

        let options = CommandOptions {
            cwd: Some(request.root.to_path_buf()),
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        };

        std::fs::create_dir_all(request.root)?;
        let result = shell::run(program, args, &options)?;
        tracing::debug!(
            "{} finished in {:?} with code {}",
            program,
            result.duration,
            result.exit_code
        );

        if !result.success {
            let detail = result.stderr.trim();
            if detail.is_empty() {
                bail!("{} exited with code {}", program, result.exit_code);
            }
            bail!("{} exited with code {}: {}", program, result.exit_code, detail);
        }

        Ok(())
    }
}
