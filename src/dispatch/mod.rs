//! Command dispatch.
//!
//! The front end only knows command names. The dispatcher maps a name to
//! its artifact, makes sure the artifact is on disk (from the cache, or a
//! local override directory), and starts the artifact's entry file in a
//! child process with a [`DispatchPayload`]. The child's exit code becomes
//! the front end's exit code.

pub mod launcher;
pub mod payload;

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::cache::{store_layout, Artifact, ArtifactRef, Installer, LATEST};
use crate::command::RuntimeInfo;
use crate::config::Settings;
use crate::error::{Result, StencilError};
use crate::registry::VersionResolver;
use crate::ui::UserInterface;

pub use launcher::{Launcher, ProcessLauncher};
pub use payload::{strip_options, DispatchPayload, PAYLOAD_FLAG, PAYLOAD_SCHEMA};

/// Logical command names and the artifacts implementing them.
pub const COMMAND_TABLE: &[(&str, &str)] = &[("init", "@stencil/command-init")];

/// Artifact implementing `command`.
pub fn artifact_for(command: &str) -> Result<&'static str> {
    COMMAND_TABLE
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, artifact)| *artifact)
        .ok_or_else(|| StencilError::UnknownCommand {
            name: command.to_string(),
            available: COMMAND_TABLE.iter().map(|(n, _)| n.to_string()).collect(),
        })
}

/// One command invocation from the front end.
#[derive(Debug, Clone, Default)]
pub struct DispatchRequest {
    /// Logical command name.
    pub command: String,
    /// Positional arguments.
    pub argv: Vec<String>,
    /// Options as parsed, before stripping.
    pub options: Map<String, Value>,
    /// Working directory for the command process.
    pub cwd: PathBuf,
}

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command process ran and exited with this code.
    Exited(i32),
    /// The artifact has no entry file; nothing was started.
    NothingToRun,
}

impl DispatchOutcome {
    /// Exit code for the front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::NothingToRun => 0,
        }
    }
}

/// Resolves commands to artifacts and runs them.
pub struct Dispatcher<'a> {
    settings: &'a Settings,
    resolver: &'a VersionResolver,
    installer: &'a dyn Installer,
    launcher: &'a dyn Launcher,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher from its collaborators.
    pub fn new(
        settings: &'a Settings,
        resolver: &'a VersionResolver,
        installer: &'a dyn Installer,
        launcher: &'a dyn Launcher,
    ) -> Self {
        Self {
            settings,
            resolver,
            installer,
            launcher,
        }
    }

    /// Run `request` and report how it ended.
    pub fn dispatch(
        &self,
        request: &DispatchRequest,
        ui: &mut dyn UserInterface,
    ) -> Result<DispatchOutcome> {
        let name = artifact_for(&request.command)?;
        tracing::debug!("Command {} is served by {}", request.command, name);

        let mut artifact = Artifact::new(self.reference(name), self.resolver, self.installer);
        if artifact.is_cached() {
            self.materialize(&mut artifact, ui)
                .map_err(|e| StencilError::ArtifactUnavailable {
                    name: name.to_string(),
                    source: Box::new(e),
                })?;
        }

        let Some(entry) = artifact.entry_file_path()? else {
            tracing::debug!("{} has no entry file, nothing to run", name);
            return Ok(DispatchOutcome::NothingToRun);
        };

        let payload = DispatchPayload::new(
            RuntimeInfo::current(),
            &request.argv,
            strip_options(&request.options),
            &request.command,
        )
        .encode()?;

        let code = self.launcher.launch(&entry, &payload, &request.cwd)?;
        Ok(DispatchOutcome::Exited(code))
    }

    fn reference(&self, name: &str) -> ArtifactRef {
        match &self.settings.local_path {
            Some(local) => {
                tracing::debug!("Using local override {}", local.display());
                ArtifactRef::local(name, LATEST, local)
            }
            None => {
                let (target, store) = store_layout(&self.settings.cache_home);
                ArtifactRef::cached(name, LATEST, target, store)
            }
        }
    }

    fn materialize(&self, artifact: &mut Artifact<'_>, ui: &mut dyn UserInterface) -> Result<()> {
        let name = artifact.name().to_string();

        if artifact.exists()? {
            let mut spinner = ui.start_spinner(&format!("Checking for updates to {}", name));
            match artifact.update() {
                Ok(()) => {
                    spinner.finish_success(&format!("{}@{} is ready", name, artifact.version()));
                    Ok(())
                }
                Err(e) => {
                    spinner.finish_error(&format!("Updating {} failed", name));
                    Err(e)
                }
            }
        } else {
            let mut spinner = ui.start_spinner(&format!("Installing {}", name));
            match artifact.install() {
                Ok(()) => {
                    spinner.finish_success(&format!("Installed {}@{}", name, artifact.version()));
                    Ok(())
                }
                Err(e) => {
                    spinner.finish_error(&format!("Installing {} failed", name));
                    Err(e)
                }
            }
        }
    }
}
