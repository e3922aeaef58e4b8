//! Presets: the declarative bundle of plugin selections a project is created from
//!
//! - `types`: the `Preset` / `PluginOptions` model, validation, and pure transforms
//! - `fetcher`: loading presets from local files and remote repositories
//! - `resolver`: picking the preset for a creation run

pub mod fetcher;
pub mod resolver;
pub mod types;

pub use fetcher::{load_local_preset, RemotePresetFetcher, RemotePresetRef};
pub use resolver::{preset_choices, PresetResolver};
pub use types::{short_plugin_id, PluginOptions, Preset};
