//! Plugin capabilities and their expansion into an ordered generator list

pub mod expander;
pub mod registry;

pub use expander::{expand_plugins, sort_core_first, PluginDescriptor};
pub use registry::{
    NoopGenerator, PluginGenerator, PluginPrompts, PluginRegistry, PluginResolver, PromptProvider,
};
