//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::dispatch::DispatchRequest;

/// Stencil - scaffold projects from published templates.
#[derive(Debug, Parser)]
#[command(name = "stencil")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "Example call:\n    $ stencil init my-app")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Run command artifacts from this directory instead of the cache
    #[arg(long, global = true, env = "STENCIL_LOCAL_PATH", value_name = "DIR")]
    pub local_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new project
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Any other command is looked up by the dispatcher
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InitArgs {
    /// Name of the project to create
    pub project_name: Option<String>,

    /// Initialize even if the current directory is not empty
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl Cli {
    /// Options every dispatched command receives.
    fn global_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("debug".to_string(), Value::Bool(self.debug));
        if let Some(local) = &self.local_path {
            options.insert(
                "localPath".to_string(),
                Value::String(local.to_string_lossy().into_owned()),
            );
        }
        options
    }

    /// The dispatch request for this invocation, if it runs a command artifact.
    pub fn dispatch_request(&self, cwd: PathBuf) -> Option<DispatchRequest> {
        let mut options = self.global_options();

        let (command, argv) = match self.command.as_ref()? {
            Commands::Init(args) => {
                options.insert("force".to_string(), Value::Bool(args.force));
                ("init".to_string(), args.project_name.iter().cloned().collect())
            }
            Commands::External(words) => {
                let (command, argv) = words.split_first()?;
                (command.clone(), argv.to_vec())
            }
            Commands::Completions(_) => return None,
        };

        Some(DispatchRequest {
            command,
            argv,
            options,
            cwd,
        })
    }
}
