//! Explicit registry of plugin capabilities
//!
//! Each plugin id maps to an optional generator and an optional prompt source. The
//! pipeline only talks to the `PluginResolver` trait, so products can register statically
//! linked plugins or discover them some other way.

use crate::generator::GeneratorApi;
use crate::manifest::Manifest;
use crate::preset::PluginOptions;
use crate::prompt::Question;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A plugin's generator entry point
pub trait PluginGenerator: Send + Sync {
    fn apply(
        &self,
        api: &mut GeneratorApi<'_>,
        options: &PluginOptions,
        root_options: &Map<String, Value>,
    ) -> anyhow::Result<()>;
}

impl<F> PluginGenerator for F
where
    F: Fn(&mut GeneratorApi<'_>, &PluginOptions, &Map<String, Value>) -> anyhow::Result<()>
        + Send
        + Sync,
{
    fn apply(
        &self,
        api: &mut GeneratorApi<'_>,
        options: &PluginOptions,
        root_options: &Map<String, Value>,
    ) -> anyhow::Result<()> {
        self(api, options, root_options)
    }
}

/// Stand-in for plugins that contribute no generator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopGenerator;

impl PluginGenerator for NoopGenerator {
    fn apply(
        &self,
        _api: &mut GeneratorApi<'_>,
        _options: &PluginOptions,
        _root_options: &Map<String, Value>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Object form of a plugin prompt source
pub trait PromptProvider: Send + Sync {
    fn get_prompts(&self, pkg: &Manifest) -> anyhow::Result<Vec<Question>>;
}

/// The three shapes a plugin's follow-up questions may take
#[derive(Clone)]
pub enum PluginPrompts {
    List(Vec<Question>),
    Fn(Arc<dyn Fn(&Manifest) -> Vec<Question> + Send + Sync>),
    Provider(Arc<dyn PromptProvider>),
}

impl PluginPrompts {
    /// Normalize to a question list for this project
    pub fn questions(&self, pkg: &Manifest) -> anyhow::Result<Vec<Question>> {
        match self {
            PluginPrompts::List(questions) => Ok(questions.clone()),
            PluginPrompts::Fn(build) => Ok(build(pkg)),
            PluginPrompts::Provider(provider) => provider.get_prompts(pkg),
        }
    }
}

impl fmt::Debug for PluginPrompts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginPrompts::List(questions) => f.debug_tuple("List").field(questions).finish(),
            PluginPrompts::Fn(_) => f.write_str("Fn(<prompts>)"),
            PluginPrompts::Provider(_) => f.write_str("Provider(<prompts>)"),
        }
    }
}

/// Resolves plugin capabilities by id
pub trait PluginResolver: Send + Sync {
    /// Generator of `id`, if the plugin has one
    fn load_generator(&self, id: &str) -> Option<Arc<dyn PluginGenerator>>;

    /// Follow-up questions of `id`, if the plugin has any
    fn load_prompts(&self, id: &str) -> Option<PluginPrompts>;
}

/// In-memory `PluginResolver`
#[derive(Clone, Default)]
pub struct PluginRegistry {
    generators: HashMap<String, Arc<dyn PluginGenerator>>,
    prompts: HashMap<String, PluginPrompts>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the generator of `id`
    pub fn generator(mut self, id: impl Into<String>, generator: impl PluginGenerator + 'static) -> Self {
        self.generators.insert(id.into(), Arc::new(generator));
        self
    }

    /// Register the follow-up questions of `id`
    pub fn prompts(mut self, id: impl Into<String>, prompts: PluginPrompts) -> Self {
        self.prompts.insert(id.into(), prompts);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.generators.contains_key(id) || self.prompts.contains_key(id)
    }
}

impl PluginResolver for PluginRegistry {
    fn load_generator(&self, id: &str) -> Option<Arc<dyn PluginGenerator>> {
        self.generators.get(id).cloned()
    }

    fn load_prompts(&self, id: &str) -> Option<PluginPrompts> {
        self.prompts.get(id).cloned()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut generators: Vec<&String> = self.generators.keys().collect();
        generators.sort();
        let mut prompts: Vec<&String> = self.prompts.keys().collect();
        prompts.sort();
        f.debug_struct("PluginRegistry")
            .field("generators", &generators)
            .field("prompts", &prompts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NameProvider;

    impl PromptProvider for NameProvider {
        fn get_prompts(&self, pkg: &Manifest) -> anyhow::Result<Vec<Question>> {
            Ok(vec![Question::input("title", format!("Title for {}?", pkg.name))])
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = PluginRegistry::new()
            .generator("@vue/cli-plugin-babel", NoopGenerator)
            .prompts(
                "vue-cli-plugin-title",
                PluginPrompts::Provider(Arc::new(NameProvider)),
            );

        assert!(registry.load_generator("@vue/cli-plugin-babel").is_some());
        assert!(registry.load_generator("vue-cli-plugin-title").is_none());
        assert!(registry.load_prompts("vue-cli-plugin-title").is_some());
        assert!(registry.contains("vue-cli-plugin-title"));
        assert!(!registry.contains("unknown"));
    }

    #[test]
    fn test_prompt_shapes_normalize() {
        let pkg = Manifest::seed("demo", None).unwrap();

        let list = PluginPrompts::List(vec![Question::confirm("a", "A?")]);
        let build = PluginPrompts::Fn(Arc::new(|pkg: &Manifest| {
            vec![Question::input("b", format!("B for {}?", pkg.name))]
        }));
        let provider = PluginPrompts::Provider(Arc::new(NameProvider));

        assert_eq!(list.questions(&pkg).unwrap()[0].name, "a");
        assert_eq!(build.questions(&pkg).unwrap()[0].message, "B for demo?");
        assert_eq!(provider.questions(&pkg).unwrap()[0].message, "Title for demo?");
    }
}
