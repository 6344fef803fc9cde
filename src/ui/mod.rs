//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use stencil::ui::{create_ui, OutputMode, Prompt, UserInterface};
//!
//! // Non-interactive mode answers prompts from defaults
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! let answer = ui
//!     .prompt(&Prompt::input("version", "Version").with_default("1.0.0"))
//!     .unwrap();
//! assert_eq!(answer.as_string(), "1.0.0");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, StencilTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// Checks an answer; the error is shown to the user.
pub type Validator = fn(&str) -> std::result::Result<(), String>;

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for overrides and mocks).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
    /// Answer check, applied to input prompts.
    pub validate: Option<Validator>,
}

impl Prompt {
    fn new(key: &str, question: &str, prompt_type: PromptType) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            prompt_type,
            default: None,
            validate: None,
        }
    }

    /// Yes/no question.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self::new(key, question, PromptType::Confirm).with_default(default.to_string())
    }

    /// Free-form text question.
    pub fn input(key: &str, question: &str) -> Self {
        Self::new(key, question, PromptType::Input)
    }

    /// Pick one of `options`.
    pub fn select(key: &str, question: &str, options: Vec<PromptOption>) -> Self {
        Self::new(key, question, PromptType::Select { options })
    }

    /// Set the default answer.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the answer check.
    pub fn with_validator(mut self, validate: Validator) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Run the answer check, if any.
    pub fn check(&self, answer: &str) -> std::result::Result<(), String> {
        match self.validate {
            Some(validate) => validate(answer),
            None => Ok(()),
        }
    }

    /// Turn a textual answer into a result of the right shape.
    ///
    /// Select answers must name one of the option values.
    pub fn answer_from_str(&self, answer: &str) -> std::result::Result<PromptResult, String> {
        match &self.prompt_type {
            PromptType::Confirm => parse_bool(answer)
                .map(PromptResult::Bool)
                .ok_or_else(|| format!("expected yes or no, got '{}'", answer)),
            PromptType::Input => {
                self.check(answer)?;
                Ok(PromptResult::String(answer.to_string()))
            }
            PromptType::Select { options } => options
                .iter()
                .find(|o| o.value == answer)
                .map(|o| PromptResult::String(o.value.clone()))
                .ok_or_else(|| format!("'{}' is not one of the choices", answer)),
        }
    }
}

/// Read a yes/no answer.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    /// Create an option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool if this is a Bool result.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(_) => None,
        }
    }
}
