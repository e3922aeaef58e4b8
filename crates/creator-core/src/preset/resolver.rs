//! Picks the preset for a creation run
//!
//! First match wins: an explicit preset, a preset name, the default preset, an inline JSON
//! preset, and finally the interactive session.

use super::fetcher::{load_local_preset, looks_like_path, looks_like_remote, RemotePresetFetcher};
use super::types::Preset;
use crate::config::{CreatorEnv, OptionsStore};
use crate::creator::CreateOptions;
use crate::error::{Error, Result};
use crate::events::{CreationEvent, EventSink};
use crate::product::ProductConfig;
use crate::prompt::{Choice, PromptComposer, PromptEngine, MANUAL_PRESET};
use crate::runtime::PackageManager;
use colored::Colorize;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, warn};

/// Choices of the preset question: every saved and built-in preset with its feature summary
pub fn preset_choices<C: ProductConfig>(config: &C, all_presets: &IndexMap<String, Value>) -> Vec<Choice> {
    all_presets
        .iter()
        .map(|(name, raw)| {
            let display = if name.starts_with("Default (") {
                "Default"
            } else {
                name.as_str()
            };
            let label = match serde_json::from_value::<Preset>(raw.clone()) {
                Ok(preset) => format!(
                    "{} ({})",
                    display,
                    preset.format_features(config.core_service_id())
                ),
                Err(_) => display.to_string(),
            };
            Choice::new(label, name.as_str())
        })
        .collect()
}

/// Resolves presets against saved options, built-ins, files, remotes, and the prompt session
pub struct PresetResolver<'a, C: ProductConfig> {
    config: &'a C,
    env: &'a CreatorEnv,
    store: &'a OptionsStore,
    composer: &'a PromptComposer,
    sink: &'a dyn EventSink,
    quiet: bool,
}

impl<'a, C: ProductConfig> PresetResolver<'a, C> {
    pub fn new(
        config: &'a C,
        env: &'a CreatorEnv,
        store: &'a OptionsStore,
        composer: &'a PromptComposer,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            config,
            env,
            store,
            composer,
            sink,
            quiet: false,
        }
    }

    /// Suppress progress output
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Obtain a validated preset for this run
    pub async fn resolve(
        &self,
        options: &CreateOptions,
        explicit: Option<Preset>,
        prompter: &mut dyn PromptEngine,
    ) -> Result<Preset> {
        let preset = if let Some(preset) = explicit {
            preset
        } else if let Some(name) = &options.preset_name {
            self.resolve_by_name(name, options.clone).await?
        } else if options.use_default {
            self.resolve_by_name(self.config.default_preset_name(), false)
                .await?
        } else if let Some(input) = &options.inline_preset {
            let value: Value =
                serde_json::from_str(input).map_err(|source| Error::InvalidInlinePreset {
                    input: input.clone(),
                    source,
                })?;
            Preset::from_value(value)?
        } else {
            self.prompt_and_resolve(prompter, options.clone).await?
        };

        preset.validate()?;
        debug!("Resolved preset: {:?}", preset);
        Ok(preset)
    }

    /// Look a preset up by name: saved or built-in, local file, remote reference
    pub async fn resolve_by_name(&self, name: &str, clone: bool) -> Result<Preset> {
        let saved = self.store.load();
        let all = saved.all_presets(&self.config.default_presets());

        if let Some(raw) = all.get(name) {
            return Preset::from_value(raw.clone());
        }

        if looks_like_path(name) {
            let value = load_local_preset(Path::new(name))
                .await
                .map_err(|source| Error::LocalPreset {
                    path: name.to_string(),
                    source,
                })?;
            return Preset::from_value(value);
        }

        if looks_like_remote(name) {
            let value = self.fetch_remote(name, clone).await?;
            return Preset::from_value(value);
        }

        if name == "default" {
            if let Some(raw) = all.get(self.config.default_preset_name()) {
                return Preset::from_value(raw.clone());
            }
        }

        Err(Error::PresetNotFound {
            name: name.to_string(),
            available: all.keys().cloned().collect(),
        })
    }

    async fn fetch_remote(&self, name: &str, clone: bool) -> Result<Value> {
        if !self.quiet {
            println!("Fetching remote preset {}...", name.cyan());
        }
        self.sink.emit(CreationEvent::FetchRemotePreset);

        let fetched = match RemotePresetFetcher::from_config(self.config, self.env) {
            Ok(fetcher) => fetcher.fetch(name, clone).await,
            Err(e) => Err(e),
        };

        fetched.map_err(|source| {
            error!("Failed fetching remote preset {}: {:#}", name, source);
            Error::RemotePreset {
                name: name.to_string(),
                source,
            }
        })
    }

    async fn prompt_and_resolve(
        &self,
        prompter: &mut dyn PromptEngine,
        clone: bool,
    ) -> Result<Preset> {
        let answers = prompter.prompt(&self.composer.compose_final())?;

        if let Some(pm) = answers
            .get_str("packageManager")
            .and_then(|value| value.parse::<PackageManager>().ok())
        {
            if let Err(e) = self.store.save_package_manager(pm) {
                warn!("Failed to save package manager preference: {}", e);
            }
        }

        let preset = match answers.get_str("preset") {
            Some(name) if name != MANUAL_PRESET => self.resolve_by_name(name, clone).await?,
            _ => {
                let mut preset = Preset {
                    use_config_files: answers.get_str("useConfigFiles") == Some("files"),
                    ..Preset::default()
                };
                self.composer.complete(&answers, &mut preset);
                preset
            }
        };

        preset.validate()?;

        let save_name = answers
            .get_str("saveName")
            .filter(|name| answers.is_truthy("save") && !name.is_empty());
        if let Some(save_name) = save_name {
            match self.store.save_preset(save_name, &preset) {
                Ok(()) => {
                    if !self.quiet {
                        println!(
                            "Preset {} saved in {}",
                            save_name.yellow(),
                            self.store.path().display().to_string().cyan()
                        );
                    }
                }
                Err(e) => {
                    warn!("Failed to save preset {}: {}", save_name, e);
                    if !self.quiet {
                        eprintln!(
                            "{} Preset {} could not be saved: {}",
                            "WARN".yellow(),
                            save_name,
                            e
                        );
                    }
                }
            }
        }

        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::preset::PluginOptions;
    use crate::product::testing::TestProduct;
    use crate::prompt::{Answers, PromptModuleApi, Question, ScriptedPrompter};
    use serde_json::json;

    const ROUTER: &str = "@vue/cli-plugin-router";

    fn router_module(api: &mut PromptModuleApi) {
        api.inject_feature(Choice::new("Router", "router"));
        api.on_prompt_complete(|answers: &Answers, preset: &mut Preset| {
            if answers.has_feature("router") {
                preset.plugins.insert(ROUTER.to_string(), PluginOptions::new());
            }
        });
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        env: CreatorEnv,
        store: OptionsStore,
        composer: PromptComposer,
        sink: RecordingSink,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let store = OptionsStore::new(dir.path().join(".testrc"));
            let all = store.load().all_presets(&TestProduct.default_presets());
            let composer = PromptModuleApi::new()
                .with_modules(&[router_module])
                .build(preset_choices(&TestProduct, &all), vec![PackageManager::Yarn, PackageManager::Npm]);
            Self {
                _dir: dir,
                env: CreatorEnv::for_tests(),
                store,
                composer,
                sink: RecordingSink::new(),
            }
        }

        fn resolver(&self) -> PresetResolver<'_, TestProduct> {
            PresetResolver::new(&TestProduct, &self.env, &self.store, &self.composer, &self.sink)
                .quiet(true)
        }
    }

    fn by_name(name: &str) -> CreateOptions {
        CreateOptions {
            preset_name: Some(name.to_string()),
            ..CreateOptions::default()
        }
    }

    #[tokio::test]
    async fn test_explicit_preset_wins() {
        let fixture = Fixture::new();
        let explicit = Preset {
            plugins: IndexMap::from([(ROUTER.to_string(), PluginOptions::new())]),
            ..Preset::default()
        };
        let mut prompter = ScriptedPrompter::default();
        let preset = fixture
            .resolver()
            .resolve(&by_name("missing"), Some(explicit.clone()), &mut prompter)
            .await
            .unwrap();
        assert_eq!(preset, explicit);
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_default_alias_and_flag() {
        let fixture = Fixture::new();
        let mut prompter = ScriptedPrompter::default();

        let aliased = fixture
            .resolver()
            .resolve(&by_name("default"), None, &mut prompter)
            .await
            .unwrap();
        let flagged = fixture
            .resolver()
            .resolve(
                &CreateOptions {
                    use_default: true,
                    ..CreateOptions::default()
                },
                None,
                &mut prompter,
            )
            .await
            .unwrap();

        assert_eq!(aliased, flagged);
        assert!(aliased.plugins.contains_key("@vue/cli-plugin-babel"));
    }

    #[tokio::test]
    async fn test_unknown_name_is_not_found() {
        let fixture = Fixture::new();
        let err = fixture
            .resolver()
            .resolve(&by_name("nope"), None, &mut ScriptedPrompter::default())
            .await
            .unwrap_err();
        match err {
            Error::PresetNotFound { name, available } => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["Default (Vue 3)".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_saved_preset_by_name() {
        let fixture = Fixture::new();
        let saved = Preset {
            plugins: IndexMap::from([(ROUTER.to_string(), PluginOptions::new())]),
            ..Preset::default()
        };
        fixture.store.save_preset("mine", &saved).unwrap();

        let preset = fixture
            .resolver()
            .resolve(&by_name("mine"), None, &mut ScriptedPrompter::default())
            .await
            .unwrap();
        assert_eq!(preset, saved);
    }

    #[tokio::test]
    async fn test_local_preset_file() {
        let fixture = Fixture::new();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("team.json");
        std::fs::write(&file, r#"{ "plugins": { "@vue/cli-plugin-eslint": { "config": "base" } } }"#)
            .unwrap();

        let preset = fixture
            .resolver()
            .resolve(
                &by_name(file.to_str().unwrap()),
                None,
                &mut ScriptedPrompter::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            preset.plugins["@vue/cli-plugin-eslint"].get("config"),
            Some(&json!("base"))
        );
    }

    #[tokio::test]
    async fn test_missing_local_preset_keeps_cause() {
        let fixture = Fixture::new();
        let err = fixture
            .resolver()
            .resolve(&by_name("./nowhere.json"), None, &mut ScriptedPrompter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LocalPreset { .. }));
        assert!(err.details().iter().any(|line| line.contains("Failed to read")));
    }

    #[tokio::test]
    async fn test_remote_failure_propagates_with_cause() {
        let fixture = Fixture::new();
        let err = fixture
            .resolver()
            .resolve(&by_name("someone/preset"), None, &mut ScriptedPrompter::default())
            .await
            .unwrap_err();

        match &err {
            Error::RemotePreset { name, .. } => assert_eq!(name, "someone/preset"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.details().is_empty());
        assert_eq!(fixture.sink.events(), vec![CreationEvent::FetchRemotePreset]);
    }

    #[tokio::test]
    async fn test_invalid_inline_preset() {
        let fixture = Fixture::new();
        let options = CreateOptions {
            inline_preset: Some("{not valid json".to_string()),
            ..CreateOptions::default()
        };
        let err = fixture
            .resolver()
            .resolve(&options, None, &mut ScriptedPrompter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInlinePreset { .. }));
    }

    #[tokio::test]
    async fn test_inline_preset_is_validated() {
        let fixture = Fixture::new();
        let options = CreateOptions {
            inline_preset: Some(r#"{ "plugins": { "a": { "version": 3 } } }"#.to_string()),
            ..CreateOptions::default()
        };
        let err = fixture
            .resolver()
            .resolve(&options, None, &mut ScriptedPrompter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPreset { .. }));
    }

    #[tokio::test]
    async fn test_interactive_named_preset() {
        let fixture = Fixture::new();
        let mut prompter = ScriptedPrompter::from_json(json!({
            "preset": "Default (Vue 3)",
            "packageManager": "yarn"
        }));
        let preset = fixture
            .resolver()
            .resolve(&CreateOptions::default(), None, &mut prompter)
            .await
            .unwrap();

        assert_eq!(preset.vue_version.as_deref(), Some("3"));
        assert!(!prompter.asked().contains(&"features".to_string()));
        assert_eq!(
            fixture.store.load().package_manager,
            Some(PackageManager::Yarn)
        );
    }

    #[tokio::test]
    async fn test_interactive_manual_preset_is_saved() {
        let fixture = Fixture::new();
        let mut prompter = ScriptedPrompter::from_json(json!({
            "preset": MANUAL_PRESET,
            "features": ["router"],
            "useConfigFiles": "files",
            "save": true,
            "saveName": "routed"
        }));
        let preset = fixture
            .resolver()
            .resolve(&CreateOptions::default(), None, &mut prompter)
            .await
            .unwrap();

        assert!(preset.use_config_files);
        assert_eq!(preset.plugins.keys().collect::<Vec<_>>(), vec![ROUTER]);
        assert!(fixture.store.load().presets.contains_key("routed"));
    }

    #[tokio::test]
    async fn test_manual_preset_without_features_resolves_empty() {
        let fixture = Fixture::new();
        let mut prompter = ScriptedPrompter::from_json(json!({
            "preset": MANUAL_PRESET,
            "features": []
        }));
        let preset = fixture
            .resolver()
            .resolve(&CreateOptions::default(), None, &mut prompter)
            .await
            .unwrap();
        assert!(preset.plugins.is_empty());
    }

    #[test]
    fn test_preset_choices_show_features() {
        let all = IndexMap::from([(
            "Default (Vue 3)".to_string(),
            json!({ "vueVersion": "3", "plugins": { "@vue/cli-plugin-babel": {} } }),
        )]);
        let choices = preset_choices(&TestProduct, &all);
        assert_eq!(choices[0].name, "Default ([Vue 3] babel)");
        assert_eq!(choices[0].value, json!("Default (Vue 3)"));

        let question = Question::list("preset", "Pick").choices(choices);
        assert_eq!(question.fallback_answer(), json!("Default (Vue 3)"));
    }
}
