//! `PromptEngine` rendered with cliclack

use crate::error::{Error, Result};
use crate::prompt::{Answers, PromptEngine, Question, QuestionKind};
use serde_json::Value;

/// Interactive prompt engine for the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct CliclackPrompter;

impl CliclackPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_error(e: std::io::Error) -> Error {
    Error::Prompt(e.to_string())
}

fn hint(choice: &crate::prompt::Choice) -> String {
    choice
        .description
        .clone()
        .or_else(|| choice.short.clone())
        .unwrap_or_default()
}

impl PromptEngine for CliclackPrompter {
    fn ask(&mut self, question: &Question, _answers: &Answers) -> Result<Value> {
        match question.kind {
            QuestionKind::List => {
                if question.choices.is_empty() {
                    return Ok(question.fallback_answer());
                }
                let mut select = cliclack::select(&question.message);
                for (idx, choice) in question.choices.iter().enumerate() {
                    select = select.item(idx, &choice.name, hint(choice));
                }
                if let Some(initial) = question
                    .default
                    .as_ref()
                    .and_then(|d| question.choices.iter().position(|c| &c.value == d))
                {
                    select = select.initial_value(initial);
                }
                let idx: usize = select.interact().map_err(prompt_error)?;
                Ok(question.choices[idx].value.clone())
            }
            QuestionKind::Checkbox => {
                if question.choices.is_empty() {
                    return Ok(Value::Array(Vec::new()));
                }
                let mut multi = cliclack::multiselect(&question.message).required(false);
                for (idx, choice) in question.choices.iter().enumerate() {
                    multi = multi.item(idx, &choice.name, hint(choice));
                }
                let checked: Vec<usize> = question
                    .choices
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.checked)
                    .map(|(idx, _)| idx)
                    .collect();
                multi = multi.initial_values(checked);
                let picked: Vec<usize> = multi.interact().map_err(prompt_error)?;
                Ok(Value::Array(
                    picked
                        .into_iter()
                        .map(|idx| question.choices[idx].value.clone())
                        .collect(),
                ))
            }
            QuestionKind::Confirm => {
                let initial = question
                    .default
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let confirmed: bool = cliclack::confirm(&question.message)
                    .initial_value(initial)
                    .interact()
                    .map_err(prompt_error)?;
                Ok(Value::Bool(confirmed))
            }
            QuestionKind::Input => {
                let mut input = cliclack::input(&question.message).required(false);
                if let Some(default) = question.default.as_ref().and_then(Value::as_str) {
                    input = input.default_input(default).placeholder(default);
                }
                let text: String = input.interact().map_err(prompt_error)?;
                Ok(Value::String(text))
            }
        }
    }
}
