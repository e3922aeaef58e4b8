//! Prompt engines: render an ordered question list, return the answer map

use super::question::{Answers, Question};
use crate::error::Result;
use serde_json::{Map, Value};
use tracing::debug;

/// Renders questions one by one
///
/// `prompt` walks the sequence in order, skipping questions whose visibility predicate
/// is false for the answers collected so far.
pub trait PromptEngine: Send {
    /// Ask a single visible question
    fn ask(&mut self, question: &Question, answers: &Answers) -> Result<Value>;

    /// Ask every visible question in order
    fn prompt(&mut self, questions: &[Question]) -> Result<Answers> {
        let mut answers = Answers::new();
        for question in questions {
            if !question.is_visible(&answers) {
                continue;
            }
            let value = self.ask(question, &answers)?;
            answers.insert(question.name.clone(), value);
        }
        debug!("Answers: {:?}", answers);
        Ok(answers)
    }
}

/// Answers from a fixed script; unscripted questions take their fallback answer
///
/// Used for non-interactive runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    script: Map<String, Value>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(script: Map<String, Value>) -> Self {
        Self {
            script,
            asked: Vec::new(),
        }
    }

    /// Script from a JSON object; anything else yields an empty script
    pub fn from_json(script: Value) -> Self {
        match script {
            Value::Object(map) => Self::new(map),
            _ => Self::default(),
        }
    }

    /// Names of the questions that were shown, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl PromptEngine for ScriptedPrompter {
    fn ask(&mut self, question: &Question, _answers: &Answers) -> Result<Value> {
        self.asked.push(question.name.clone());
        Ok(self
            .script
            .get(&question.name)
            .cloned()
            .unwrap_or_else(|| question.fallback_answer()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::question::Choice;
    use serde_json::json;

    #[test]
    fn test_scripted_prompter_skips_hidden_questions() {
        let questions = vec![
            Question::confirm("save", "Save?"),
            Question::input("saveName", "Name?").when(|a| a.is_truthy("save")),
            Question::list("pm", "Manager?")
                .choice(Choice::new("npm", "npm"))
                .choice(Choice::new("yarn", "yarn")),
        ];

        let mut prompter = ScriptedPrompter::from_json(json!({ "save": false }));
        let answers = prompter.prompt(&questions).unwrap();

        assert_eq!(prompter.asked(), &["save".to_string(), "pm".to_string()]);
        assert_eq!(answers.get("pm"), Some(&json!("npm")));
        assert!(answers.get("saveName").is_none());
    }

    #[test]
    fn test_scripted_prompter_uses_script() {
        let questions = vec![
            Question::confirm("save", "Save?"),
            Question::input("saveName", "Name?").when(|a| a.is_truthy("save")),
        ];
        let mut prompter = ScriptedPrompter::from_json(json!({ "save": true, "saveName": "mine" }));
        let answers = prompter.prompt(&questions).unwrap();
        assert_eq!(answers.get_str("saveName"), Some("mine"));
    }
}
