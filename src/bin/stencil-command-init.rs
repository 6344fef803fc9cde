//! Entry executable of the `init` command artifact.
//!
//! Started by the dispatcher as `stencil-command-init --payload <json>`.

use clap::Parser;

use stencil::command::{run_payload, EntryRegistry, PluginContext};
use stencil::config::vars;
use stencil::logging;
use stencil::ui::{create_ui, OutputMode};

/// Run a Stencil command from a dispatch payload.
#[derive(Debug, Parser)]
#[command(name = "stencil-command-init", version, about)]
struct Args {
    /// Dispatch payload (JSON)
    #[arg(long, value_name = "JSON")]
    payload: String,
}

fn main() {
    let args = Args::parse();
    let verbose = std::env::var(vars::LOG_LEVEL).is_ok_and(|v| v == "verbose");
    logging::init(verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            tracing::error!("Cannot read the working directory: {}", e);
            std::process::exit(1);
        }
    };

    let mut ui = create_ui(true, OutputMode::from_debug(verbose));
    let code = run_payload(
        &EntryRegistry::builtin(),
        &args.payload,
        &PluginContext { cwd },
        ui.as_mut(),
        verbose,
    );
    std::process::exit(code);
}
