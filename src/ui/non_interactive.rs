//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{Result, StencilError};

use super::theme::StencilTheme;
use super::{OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "STENCIL_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `STENCIL_PROMPT_<KEY>` variables, then from the
/// prompt default. Answers go through the same checks as interactive input.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: StencilTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: StencilTheme::plain(),
        }
    }

    fn override_for(&self, key: &str) -> Option<&String> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, key.to_uppercase());
        self.env_overrides.get(&env_key)
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .override_for(&prompt.key)
            .or(prompt.default.as_ref())
            .ok_or_else(|| StencilError::InvalidArguments {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (no default value)",
                    prompt.key
                ),
            })?;

        prompt
            .answer_from_str(answer)
            .map_err(|message| StencilError::InvalidArguments {
                message: format!("{}: {}", prompt.key, message),
            })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            eprintln!("{}", message);
        }
        Box::new(NoopSpinner {
            theme: self.theme.clone(),
            quiet: !self.mode.shows_status(),
        })
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that only prints the final line.
struct NoopSpinner {
    theme: StencilTheme,
    quiet: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", self.theme.format_success(msg));
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{PromptOption, PromptType};

    fn ui(overrides: &[(&str, &str)]) -> NonInteractiveUI {
        NonInteractiveUI::with_overrides(
            OutputMode::Normal,
            overrides
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn lowercase_only(value: &str) -> std::result::Result<(), String> {
        if value.chars().all(|c| c.is_ascii_lowercase()) {
            Ok(())
        } else {
            Err("lowercase only".to_string())
        }
    }

    #[test]
    fn non_interactive_is_not_interactive() {
        assert!(!ui(&[]).is_interactive());
    }

    #[test]
    fn prompt_uses_default() {
        let result = ui(&[])
            .prompt(&Prompt::input("version", "Version").with_default("1.0.0"))
            .unwrap();
        assert_eq!(result.as_string(), "1.0.0");
    }

    #[test]
    fn prompt_fails_without_default() {
        let err = ui(&[])
            .prompt(&Prompt::input("name", "Name"))
            .unwrap_err();
        assert!(err.to_string().contains("non-interactive"));
    }

    #[test]
    fn prompt_uses_env_override() {
        let result = ui(&[("STENCIL_PROMPT_NAME", "override")])
            .prompt(&Prompt::input("name", "Name").with_default("default"))
            .unwrap();
        assert_eq!(result.as_string(), "override");
    }

    #[test]
    fn confirm_yields_bool() {
        let result = ui(&[])
            .prompt(&Prompt::confirm("continue", "Continue?", false))
            .unwrap();
        assert_eq!(result.as_bool(), Some(false));

        let result = ui(&[("STENCIL_PROMPT_CONTINUE", "yes")])
            .prompt(&Prompt::confirm("continue", "Continue?", false))
            .unwrap();
        assert_eq!(result.as_bool(), Some(true));
    }

    #[test]
    fn override_is_validated() {
        let prompt = Prompt::input("name", "Name").with_validator(lowercase_only);
        let err = ui(&[("STENCIL_PROMPT_NAME", "Upper")])
            .prompt(&prompt)
            .unwrap_err();
        assert!(err.to_string().contains("lowercase only"));
    }

    #[test]
    fn select_override_must_match_option() {
        let prompt = Prompt {
            key: "template".to_string(),
            question: "Template".to_string(),
            prompt_type: PromptType::Select {
                options: vec![PromptOption::new("Basic", "basic")],
            },
            default: Some("basic".to_string()),
            validate: None,
        };

        assert_eq!(ui(&[]).prompt(&prompt).unwrap().as_string(), "basic");
        assert!(ui(&[("STENCIL_PROMPT_TEMPLATE", "fancy")])
            .prompt(&prompt)
            .is_err());
    }

    #[test]
    fn output_mode_preserved() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Quiet, HashMap::new());
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
    }

    #[test]
    fn noop_spinner_methods() {
        let mut spinner = ui(&[]).start_spinner("Installing");
        spinner.set_message("still installing");
        spinner.finish_success("done");
    }
}
