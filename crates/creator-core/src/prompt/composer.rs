//! Composition of the interactive question sequence from feature prompt modules
//!
//! Feature modules register through `PromptModuleApi` during construction; `build` then
//! freezes everything into a `PromptComposer` whose question sequence never changes.

use super::question::{Answers, Choice, Predicate, Question};
use crate::preset::Preset;
use crate::runtime::PackageManager;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Answer value of the preset question that selects manual mode
pub const MANUAL_PRESET: &str = "__manual__";

/// Callback turning answers into plugin entries of a manual preset
pub type CompletionCallback = Arc<dyn Fn(&Answers, &mut Preset) + Send + Sync>;

/// A feature prompt module: registers choices, questions, and callbacks
pub type PromptModule = fn(&mut PromptModuleApi);

/// Whether the user chose to select features manually
pub fn is_manual_mode(answers: &Answers) -> bool {
    answers.get_str("preset") == Some(MANUAL_PRESET)
}

/// Registration surface handed to each feature prompt module
#[derive(Default)]
pub struct PromptModuleApi {
    feature_choices: Vec<Choice>,
    injected: Vec<Question>,
    callbacks: Vec<CompletionCallback>,
}

impl PromptModuleApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the feature checklist
    pub fn inject_feature(&mut self, choice: Choice) {
        self.feature_choices.push(choice);
    }

    /// Add a question shown after the feature checklist (manual mode only)
    pub fn inject_prompt(&mut self, question: Question) {
        self.injected.push(question);
    }

    /// Register a callback run on a fresh manual preset once the session ends
    pub fn on_prompt_complete(
        &mut self,
        callback: impl Fn(&Answers, &mut Preset) + Send + Sync + 'static,
    ) {
        self.callbacks.push(Arc::new(callback));
    }

    /// Run every module against this registration surface
    pub fn with_modules(mut self, modules: &[PromptModule]) -> Self {
        for module in modules {
            module(&mut self);
        }
        self
    }

    /// Freeze into a composer
    ///
    /// `presets` are the choices of the preset question (manual mode is appended);
    /// `package_managers` are offered in the outro when non-empty.
    pub fn build(self, presets: Vec<Choice>, package_managers: Vec<PackageManager>) -> PromptComposer {
        let preset_prompt = Question::list("preset", "Please pick a preset:")
            .choices(presets)
            .choice(Choice::new("Manually select features", MANUAL_PRESET));

        let feature_prompt = Question::checkbox(
            "features",
            "Check the features needed for your project:",
        )
        .choices(self.feature_choices)
        .when(is_manual_mode);

        let injected = self.injected.into_iter().map(manual_only).collect();

        PromptComposer {
            preset_prompt,
            feature_prompt,
            injected,
            outro: outro_prompts(&package_managers),
            callbacks: self.callbacks,
        }
    }
}

/// Restrict a plugin-injected question to manual mode
fn manual_only(mut question: Question) -> Question {
    let original: Option<Predicate> = question.when.take();
    question.when = Some(Arc::new(move |answers: &Answers| {
        is_manual_mode(answers) && original.as_ref().map_or(true, |when| when(answers))
    }));
    question
}

fn outro_prompts(package_managers: &[PackageManager]) -> Vec<Question> {
    let mut outro = vec![
        Question::list(
            "useConfigFiles",
            "Where do you prefer placing config for Babel, ESLint, etc.?",
        )
        .choice(Choice::new("In dedicated config files", "files"))
        .choice(Choice::new("In package.json", "pkg"))
        .when(is_manual_mode),
        Question::confirm("save", "Save this as a preset for future projects?")
            .default(false)
            .when(is_manual_mode),
        Question::input("saveName", "Save preset as:").when(|a| a.is_truthy("save")),
    ];

    if !package_managers.is_empty() {
        outro.push(
            Question::list(
                "packageManager",
                "Pick the package manager to use when installing dependencies:",
            )
            .choices(package_managers.iter().map(|pm| {
                Choice::new(format!("Use {}", pm.display_name()), pm.bin())
                    .short(pm.display_name())
            })),
        );
    }

    outro
}

/// Frozen question sequence plus the completion callbacks of every feature module
pub struct PromptComposer {
    preset_prompt: Question,
    feature_prompt: Question,
    injected: Vec<Question>,
    outro: Vec<Question>,
    callbacks: Vec<CompletionCallback>,
}

impl PromptComposer {
    /// Preset choice, feature checklist, injected questions, then outro questions
    pub fn compose_final(&self) -> Vec<Question> {
        let mut questions = Vec::with_capacity(2 + self.injected.len() + self.outro.len());
        questions.push(self.preset_prompt.clone());
        questions.push(self.feature_prompt.clone());
        questions.extend(self.injected.iter().cloned());
        questions.extend(self.outro.iter().cloned());
        debug!(
            "Composed prompts: {:?}",
            questions.iter().map(|q| q.name.as_str()).collect::<Vec<_>>()
        );
        questions
    }

    /// Let every registered module fill in the manual preset
    pub fn complete(&self, answers: &Answers, preset: &mut Preset) {
        for callback in &self.callbacks {
            callback(answers, preset);
        }
    }

    pub fn feature_choices(&self) -> &[Choice] {
        &self.feature_prompt.choices
    }
}

impl fmt::Debug for PromptComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptComposer")
            .field("features", &self.feature_prompt.choices.len())
            .field("injected", &self.injected.len())
            .field("outro", &self.outro.len())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Package managers offered in the outro: none when a preference is stored or only npm exists
pub fn package_manager_choices(
    saved: Option<PackageManager>,
    has_yarn: bool,
    has_pnpm: bool,
) -> Vec<PackageManager> {
    if saved.is_some() || !(has_yarn || has_pnpm) {
        return Vec::new();
    }
    let mut choices = Vec::new();
    if has_yarn {
        choices.push(PackageManager::Yarn);
    }
    if has_pnpm {
        choices.push(PackageManager::Pnpm);
    }
    choices.push(PackageManager::Npm);
    choices
}
