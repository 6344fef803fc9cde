//! Stencil CLI entry point.

use clap::Parser;
use std::collections::HashMap;

use stencil::cli::{self, Cli};
use stencil::config::vars;
use stencil::{logging, report};

fn main() {
    let cli = Cli::parse();
    let env: HashMap<String, String> = std::env::vars().collect();
    let verbose = cli.debug || env.get(vars::LOG_LEVEL).is_some_and(|v| v == "verbose");
    logging::init(verbose);

    tracing::debug!("Stencil starting with args: {:?}", cli);

    let code = match cli::run(&cli, env, dirs::home_dir()) {
        Ok(code) => code,
        Err(e) => {
            report(&e, verbose);
            1
        }
    };
    std::process::exit(code);
}
