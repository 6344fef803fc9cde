//! Configuration loading.
//!
//! Settings come from, in priority order:
//! 1. Command line flags (`--debug`, `--local-path`)
//! 2. Process environment
//! 3. `~/.env`
//! 4. `<cache home>/config.yml`
//! 5. Built-in defaults

pub mod env_file;
pub mod settings;

pub use env_file::EnvFileParser;
pub use settings::{
    vars, FileConfig, Settings, SettingsSources, CONFIG_FILE, DEFAULT_CLI_HOME,
};
