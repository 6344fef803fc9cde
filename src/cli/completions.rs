//! Shell completions generation.
//!
//! The `stencil completions` command generates shell completion scripts.

use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use super::args::Cli;

/// Write the completion script for `shell` to `out`.
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "stencil", out);
}
