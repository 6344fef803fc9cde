//! Interactive prompts.

use console::Term;
use dialoguer::{Confirm, Input, Select};

use crate::error::{Result, StencilError};

use super::{parse_bool, Prompt, PromptOption, PromptResult, PromptType};

/// Convert dialoguer errors to StencilError.
fn map_dialoguer_err(e: dialoguer::Error) -> StencilError {
    StencilError::Io(e.into())
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_deref()
        .and_then(parse_bool)
        .unwrap_or(true);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let mut input = Input::<String>::new().with_prompt(&prompt.question);

    if let Some(validate) = prompt.validate {
        input = input.validate_with(move |value: &String| validate(value));
    }
    if let Some(default) = &prompt.default {
        input = input.default(default.clone());
    }

    let result = input.interact_on(term).map_err(map_dialoguer_err)?;
    Ok(PromptResult::String(result))
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    if options.is_empty() {
        return Err(StencilError::InvalidArguments {
            message: format!("no choices available for '{}'", prompt.key),
        });
    }

    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(options[selection].value.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_select_is_rejected_before_drawing() {
        let prompt = Prompt::select("template", "Template", vec![]);
        let err = prompt_user(&prompt, &Term::stdout()).unwrap_err();
        assert!(matches!(err, StencilError::InvalidArguments { .. }));
    }
}
