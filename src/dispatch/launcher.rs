//! Starting command processes.

use std::path::Path;

use crate::config::vars;
use crate::error::Result;
use crate::shell::{self, CommandOptions};

use super::payload::PAYLOAD_FLAG;

/// Starts a command's entry file and waits for it.
pub trait Launcher {
    /// Run `entry` with `payload` in `cwd` and return its exit code.
    fn launch(&self, entry: &Path, payload: &str, cwd: &Path) -> Result<i32>;
}

/// Launches entry files as child processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher {
    runtime: Option<String>,
    verbose: bool,
}

impl ProcessLauncher {
    /// Run entry files through `runtime` when given, directly otherwise.
    pub fn new(runtime: Option<String>, verbose: bool) -> Self {
        Self { runtime, verbose }
    }

    /// Program and arguments for one launch.
    pub fn command_line(&self, entry: &Path, payload: &str) -> (String, Vec<String>) {
        let entry = entry.to_string_lossy().into_owned();
        let tail = [PAYLOAD_FLAG.to_string(), payload.to_string()];
        match &self.runtime {
            Some(runtime) => (runtime.clone(), std::iter::once(entry).chain(tail).collect()),
            None => (entry, tail.to_vec()),
        }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, entry: &Path, payload: &str, cwd: &Path) -> Result<i32> {
        let (program, args) = self.command_line(entry, payload);

        let mut options = CommandOptions {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        };
        if self.verbose {
            options
                .env
                .insert(vars::LOG_LEVEL.to_string(), "verbose".to_string());
        }

        tracing::debug!("Launching {} in {}", program, cwd.display());
        let result = shell::run(&program, &args, &options)?;
        tracing::debug!(
            "{} exited with code {} after {:?}",
            program,
            result.exit_code,
            result.duration
        );
        Ok(result.exit_code)
    }
}
