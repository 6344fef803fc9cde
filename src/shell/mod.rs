//! Process execution and platform queries.

pub mod command;
pub mod platform;

pub use command::{exit_code, run, CommandOptions, CommandResult};
pub use platform::{drop_privileges, is_ci, is_elevated, PrivilegeDrop};
