//! Command-line front end.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`prepare`] - Startup checks and settings
//! - [`completions`] - Shell completion scripts
//!
//! [`run`] ties them to the dispatcher.

pub mod args;
pub mod completions;
pub mod prepare;

pub use args::{Cli, Commands, CompletionsArgs, InitArgs};

use clap::CommandFactory;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::cache::CommandInstaller;
use crate::dispatch::{Dispatcher, ProcessLauncher};
use crate::error::Result;
use crate::registry::{HttpRegistry, VersionResolver};
use crate::ui::{create_ui, OutputMode};

/// Run one invocation and return the process exit code.
///
/// `env` is the process environment and `home_dir` the user's home; both
/// are read once by the caller.
pub fn run(cli: &Cli, env: HashMap<String, String>, home_dir: Option<PathBuf>) -> Result<i32> {
    let cwd = std::env::current_dir()?;

    let request = match &cli.command {
        None => {
            Cli::command().print_help()?;
            return Ok(0);
        }
        Some(Commands::Completions(args)) => {
            completions::generate(args.shell, &mut std::io::stdout());
            return Ok(0);
        }
        Some(_) => match cli.dispatch_request(cwd) {
            Some(request) => request,
            None => {
                Cli::command().print_help()?;
                return Ok(0);
            }
        },
    };

    let settings = prepare::prepare(cli, env, home_dir)?;
    let mut ui = create_ui(true, OutputMode::from_debug(settings.debug));

    let resolver = VersionResolver::new(Box::new(HttpRegistry::new()?), &settings.registry);
    if settings.update_check {
        prepare::check_update(&resolver, ui.as_mut());
    }

    let installer = CommandInstaller::new(&settings.install_command);
    let launcher = ProcessLauncher::new(settings.runtime.clone(), settings.debug);
    let dispatcher = Dispatcher::new(&settings, &resolver, &installer, &launcher);

    let outcome = dispatcher.dispatch(&request, ui.as_mut())?;
    tracing::debug!("Dispatch finished: {:?}", outcome);
    Ok(outcome.exit_code())
}
