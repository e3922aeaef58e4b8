//! Interactive question sequences
//!
//! This module provides:
//! - The question/answer model (`Question`, `Choice`, `Answers`)
//! - `PromptModuleApi` / `PromptComposer`: feature modules contribute choices, questions,
//!   and completion callbacks that are frozen into one ordered sequence
//! - `PromptEngine`: the rendering seam, with a scripted implementation

pub mod composer;
pub mod engine;
pub mod question;

pub use composer::{
    is_manual_mode, package_manager_choices, CompletionCallback, PromptComposer, PromptModule,
    PromptModuleApi, MANUAL_PRESET,
};
pub use engine::{PromptEngine, ScriptedPrompter};
pub use question::{Answers, Choice, Predicate, Question, QuestionKind};
