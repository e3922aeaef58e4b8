//! Turns a preset's plugin map into the ordered descriptor list consumed by the generator

use super::registry::{NoopGenerator, PluginGenerator, PluginResolver};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::preset::PluginOptions;
use crate::prompt::PromptEngine;
use colored::Colorize;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One plugin ready to be applied
#[derive(Clone)]
pub struct PluginDescriptor {
    pub id: String,
    pub apply: Arc<dyn PluginGenerator>,
    pub options: PluginOptions,
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Plugin ids with the core service moved to the front; everything else keeps its order
pub fn sort_core_first<'a>(ids: impl IntoIterator<Item = &'a String>, core_service_id: &str) -> Vec<&'a String> {
    let mut ids: Vec<&String> = ids.into_iter().collect();
    ids.sort_by_key(|id| id.as_str() != core_service_id);
    ids
}

/// Resolve every plugin of `raw` into a descriptor
///
/// Plugins without a registered generator get a no-op one. Plugins whose options ask for
/// prompts and that provide questions run a dedicated prompt session; its answers replace
/// the plugin's options. `quiet` suppresses the session heading.
pub fn expand_plugins(
    raw: &IndexMap<String, PluginOptions>,
    pkg: &Manifest,
    core_service_id: &str,
    resolver: &dyn PluginResolver,
    prompter: &mut dyn PromptEngine,
    quiet: bool,
) -> Result<Vec<PluginDescriptor>> {
    let mut plugins = Vec::with_capacity(raw.len());

    for id in sort_core_first(raw.keys(), core_service_id) {
        let apply: Arc<dyn PluginGenerator> = resolver
            .load_generator(id)
            .unwrap_or_else(|| Arc::new(NoopGenerator));

        let mut options = raw[id.as_str()].clone();
        if options.wants_prompts() {
            if let Some(prompts) = resolver.load_prompts(id) {
                let questions = prompts
                    .questions(pkg)
                    .map_err(|e| Error::plugin(id.as_str(), e))?;
                if !quiet {
                    println!("\n{}", prompt_heading(id, &options).cyan());
                }
                options = PluginOptions::from_map(prompter.prompt(&questions)?.into_map());
            }
        }

        plugins.push(PluginDescriptor {
            id: id.clone(),
            apply,
            options,
        });
    }

    debug!("Expanded plugins: {:?}", plugins);
    Ok(plugins)
}

/// Heading printed above a plugin's prompt session
fn prompt_heading(id: &str, options: &PluginOptions) -> String {
    if options.is_preset_marker() {
        "Preset options:".to_string()
    } else {
        id.to_string()
    }
}
