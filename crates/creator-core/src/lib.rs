//! Creator Core - Preset-driven, plugin-composable project creation
//!
//! This library turns a project name plus a preset into a populated project directory.
//! It is designed to be used by CLI binaries that share the same creation pipeline but
//! differ in product configuration (plugin names, built-in presets, feature prompts).
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Presets, prompt composition, plugin expansion,
//!   file generation, toolchain and repository operations
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `Creator` for custom UIs
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use creator_core::{CreateOptions, Creator, ProjectTarget, ScriptedPrompter};
//!
//! let target = ProjectTarget::resolve(&cwd, "demo");
//! let creator = Creator::new(MyConfig, target, &[]).with_registry(my_plugins());
//! let options = CreateOptions { use_default: true, ..CreateOptions::default() };
//! let report = creator.create(&options, None, &mut ScriptedPrompter::default()).await?;
//! ```

pub mod config;
pub mod creator;
pub mod directory;
pub mod error;
pub mod events;
pub mod generator;
pub mod manifest;
pub mod plugin;
pub mod preset;
pub mod product;
pub mod prompt;
pub mod runtime;
pub mod versions;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{CreatorEnv, OptionsStore, SavedOptions};
pub use creator::{CreateOptions, CreationReport, Creator, GitOption};
pub use directory::{validate_project_name, DirectoryAction, ProjectTarget};
pub use error::{Error, Result};
pub use events::{CreationEvent, EventSink, NoopSink, RecordingSink};
pub use generator::{GenerateOptions, Generator, GeneratorApi, LogKind};
pub use manifest::Manifest;
pub use plugin::{PluginGenerator, PluginPrompts, PluginRegistry, PluginResolver, PromptProvider};
pub use preset::{PluginOptions, Preset, PresetResolver};
pub use product::ProductConfig;
pub use prompt::{
    Answers, Choice, PromptEngine, PromptModule, PromptModuleApi, Question, ScriptedPrompter,
};
pub use runtime::{Installer, PackageManager, Toolchain};

#[cfg(feature = "tui")]
pub use tui::{run, CreateArgs};
