//! Question and answer model for interactive sessions

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Visibility predicate evaluated against the answers collected so far
pub type Predicate = Arc<dyn Fn(&Answers) -> bool + Send + Sync>;

/// How a question is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Pick one choice
    List,
    /// Pick any number of choices
    Checkbox,
    /// Yes / no
    Confirm,
    /// Free text
    Input,
}

/// A selectable option of a list or checkbox question
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub name: String,
    pub value: Value,
    pub short: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    /// Pre-selected in checkbox questions
    pub checked: bool,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            short: None,
            description: None,
            link: None,
            checked: false,
        }
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = Some(short.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }
}

/// A single interactive question
#[derive(Clone)]
pub struct Question {
    pub name: String,
    pub kind: QuestionKind,
    pub message: String,
    pub description: Option<String>,
    pub choices: Vec<Choice>,
    pub when: Option<Predicate>,
    pub default: Option<Value>,
}

impl Question {
    pub fn new(name: impl Into<String>, kind: QuestionKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
            description: None,
            choices: Vec::new(),
            when: None,
            default: None,
        }
    }

    pub fn list(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, QuestionKind::List, message)
    }

    pub fn checkbox(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, QuestionKind::Checkbox, message)
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, QuestionKind::Confirm, message)
    }

    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, QuestionKind::Input, message)
    }

    pub fn choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choices(mut self, choices: impl IntoIterator<Item = Choice>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn when(mut self, predicate: impl Fn(&Answers) -> bool + Send + Sync + 'static) -> Self {
        self.when = Some(Arc::new(predicate));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Whether the question is shown given the answers so far
    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.when.as_ref().map_or(true, |when| when(answers))
    }

    /// Answer used when nobody answers: the explicit default, else a kind-specific fallback
    pub fn fallback_answer(&self) -> Value {
        if let Some(default) = &self.default {
            return default.clone();
        }
        match self.kind {
            QuestionKind::Confirm => Value::Bool(false),
            QuestionKind::Input => Value::String(String::new()),
            QuestionKind::List => self
                .choices
                .first()
                .map(|c| c.value.clone())
                .unwrap_or(Value::Null),
            QuestionKind::Checkbox => Value::Array(
                self.choices
                    .iter()
                    .filter(|c| c.checked)
                    .map(|c| c.value.clone())
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("choices", &self.choices.len())
            .field("when", &self.when.as_ref().map(|_| "<predicate>"))
            .field("default", &self.default)
            .finish()
    }
}

/// Answers collected during a session, keyed by question name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers(Map<String, Value>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// JavaScript-style truthiness of an answer
    pub fn is_truthy(&self, name: &str) -> bool {
        match self.0.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(_) => true,
        }
    }

    /// String entries of a list answer
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.0
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the `features` checklist includes `feature`
    pub fn has_feature(&self, feature: &str) -> bool {
        self.get_list("features").iter().any(|f| f == feature)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Answers {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
