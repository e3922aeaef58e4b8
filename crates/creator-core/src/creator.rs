//! The creation pipeline
//!
//! `Creator::create` validates the project name, settles the target directory, resolves
//! the preset, and then runs a strictly sequential pipeline:
//!
//! 1. core service injection and legacy field expansion
//! 2. package manager selection
//! 3. version discovery and manifest synthesis (the first write)
//! 4. optional repository init
//! 5. plugin install, generation, additional dependency install
//! 6. completion hooks, README fallback, initial commit, summary
//!
//! Every step is awaited before the next starts. Lifecycle events go to the configured
//! `EventSink`.

use crate::config::{CreatorEnv, OptionsStore};
use crate::directory::{resolve_directory, validate_project_name, DirectoryAction, ProjectTarget};
use crate::error::{Error, Result};
use crate::events::{CreationEvent, EventSink, NoopSink};
use crate::generator::{generate_readme, GenerateOptions, Generator};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::plugin::{expand_plugins, PluginRegistry, PluginResolver};
use crate::preset::{preset_choices, PluginOptions, Preset, PresetResolver};
use crate::product::ProductConfig;
use crate::prompt::{package_manager_choices, PromptComposer, PromptEngine, PromptModule, PromptModuleApi};
use crate::runtime::{git, CommandInstaller, Installer, PackageManager, Toolchain};
use crate::versions::discover_versions;
use colored::Colorize;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Commit message used when none is given
const DEFAULT_COMMIT_MESSAGE: &str = "init";

/// How the repository step behaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GitOption {
    /// Initialize unless the target is already inside a repository
    #[default]
    Default,
    /// Never initialize
    Disabled,
    /// Initialize as by default, committing with this message
    Message(String),
}

impl GitOption {
    /// Interpret a `--git [value]` argument: `false` disables, any other text is the message
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some("true") => GitOption::Default,
            Some("false") => GitOption::Disabled,
            Some(message) => GitOption::Message(message.to_string()),
        }
    }

    pub fn commit_message(&self) -> &str {
        match self {
            GitOption::Message(message) => message,
            _ => DEFAULT_COMMIT_MESSAGE,
        }
    }
}

/// Options of a single creation run
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Saved/built-in preset name, local path, or remote reference
    pub preset_name: Option<String>,
    /// Skip prompts and use the default preset
    pub use_default: bool,
    /// Preset given as a JSON string
    pub inline_preset: Option<String>,
    pub package_manager: Option<PackageManager>,
    /// Initialize a repository even inside an existing one
    pub force_git: bool,
    pub git: GitOption,
    /// Create on top of an existing directory without asking
    pub merge: bool,
    /// Remove an existing directory without asking
    pub force: bool,
    /// Scaffold without the beginner instructions
    pub bare: bool,
    pub skip_get_started: bool,
    /// Fetch remote presets with `git clone`
    pub clone: bool,
}

/// Outcome of a creation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationReport {
    pub action: DirectoryAction,
    /// Unset when the run was aborted before a manager was chosen
    pub package_manager: Option<PackageManager>,
    pub git_initialized: bool,
    pub commit_failed: bool,
    /// Files written by the run, relative to the project directory
    pub files: Vec<String>,
}

impl CreationReport {
    fn aborted() -> Self {
        Self {
            action: DirectoryAction::Abort,
            package_manager: None,
            git_initialized: false,
            commit_failed: false,
            files: Vec::new(),
        }
    }
}

/// devDependency entries for a preset's plugins
///
/// An explicit `version` always wins. First-party plugins without one are pinned to the
/// discovered minor line (`latest` under test/debug); everything else gets `latest`.
/// Preset-marker entries are skipped.
pub fn plugin_dev_dependencies<C: ProductConfig>(
    config: &C,
    plugins: &IndexMap<String, PluginOptions>,
    latest_minor: &str,
    test_or_debug: bool,
) -> IndexMap<String, String> {
    plugins
        .iter()
        .filter(|(_, options)| !options.is_preset_marker())
        .map(|(id, options)| {
            let version = match options.version() {
                Some(version) => version.to_string(),
                None if config.is_first_party(id) && !test_or_debug => format!("~{}", latest_minor),
                None => "latest".to_string(),
            };
            (id.clone(), version)
        })
        .collect()
}

/// Creates one project
pub struct Creator<C: ProductConfig> {
    config: C,
    target: ProjectTarget,
    modules: Vec<PromptModule>,
    registry: Arc<dyn PluginResolver>,
    env: CreatorEnv,
    store: OptionsStore,
    toolchain: Toolchain,
    sink: Arc<dyn EventSink>,
    installer: Arc<dyn Installer>,
    quiet: bool,
}

impl<C: ProductConfig> Creator<C> {
    /// A creator reading its environment, saved options, and toolchain from this machine
    pub fn new(config: C, target: ProjectTarget, modules: &[PromptModule]) -> Self {
        let env = CreatorEnv::from_env(&config);
        let store = OptionsStore::for_product(&config, &env);
        Self {
            config,
            target,
            modules: modules.to_vec(),
            registry: Arc::new(PluginRegistry::new()),
            env,
            store,
            toolchain: Toolchain::detect(),
            sink: Arc::new(NoopSink),
            installer: Arc::new(CommandInstaller),
            quiet: false,
        }
    }

    pub fn with_registry(mut self, registry: impl PluginResolver + 'static) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_env(mut self, env: CreatorEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_store(mut self, store: OptionsStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_installer(mut self, installer: Arc<dyn Installer>) -> Self {
        self.installer = installer;
        self
    }

    /// Suppress progress output
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn target(&self) -> &ProjectTarget {
        &self.target
    }

    pub fn env(&self) -> &CreatorEnv {
        &self.env
    }

    /// Freeze the registered prompt modules into the interactive question sequence
    pub fn composer(&self) -> PromptComposer {
        let saved = self.store.load();
        let all = saved.all_presets(&self.config.default_presets());
        let package_managers = package_manager_choices(
            saved.package_manager,
            self.toolchain.has_yarn(),
            self.toolchain.has_pnpm3_or_later(),
        );
        PromptModuleApi::new()
            .with_modules(&self.modules)
            .build(preset_choices(&self.config, &all), package_managers)
    }

    fn log(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    fn emit(&self, event: CreationEvent) {
        info!("Creation event: {}", event);
        self.sink.emit(event);
    }

    async fn should_init_git(&self, options: &CreateOptions) -> bool {
        if !self.toolchain.has_git() {
            return false;
        }
        if options.force_git {
            return true;
        }
        if options.git == GitOption::Disabled {
            return false;
        }
        !git::has_project_git(&self.target.dir).await
    }

    /// Run the whole pipeline
    pub async fn create(
        &self,
        options: &CreateOptions,
        preset: Option<Preset>,
        prompter: &mut dyn PromptEngine,
    ) -> Result<CreationReport> {
        let name = self.target.name.as_str();
        let context = self.target.dir.as_path();

        validate_project_name(name).into_result(name)?;

        let action = resolve_directory(&self.target, options, prompter, self.quiet).await?;
        if action == DirectoryAction::Abort {
            info!("Creation of {} cancelled", name);
            return Ok(CreationReport::aborted());
        }

        let composer = self.composer();
        let resolver = PresetResolver::new(
            &self.config,
            &self.env,
            &self.store,
            &composer,
            self.sink.as_ref(),
        )
        .quiet(self.quiet);
        let preset = resolver.resolve(options, preset, prompter).await?;

        let service_id = self.config.core_service_id();
        let preset = preset
            .with_core_service(service_id, name, options.bare)
            .with_legacy_fields_expanded(self.config.legacy_router_id(), self.config.legacy_vuex_id());
        preset.validate_expanded()?;

        let pm = PackageManager::select(
            options.package_manager,
            self.store.load().package_manager,
            &self.toolchain,
        );
        debug!("Using package manager {}", pm);

        self.log(format!(
            "✨  Creating project in {}.",
            context.display().to_string().yellow()
        ));
        self.emit(CreationEvent::Creating);

        let versions = discover_versions(&self.config, &self.env).await;
        if let Some(notice) = versions.update_notice(self.config.upgrade_command()) {
            self.log(notice.yellow().to_string());
        }

        tokio::fs::create_dir_all(context).await?;
        let existing = Manifest::read_existing(context).await?;
        let mut pkg = Manifest::seed(name, existing)?;
        let dev_dependencies = plugin_dev_dependencies(
            &self.config,
            &preset.plugins,
            &versions.latest_minor,
            self.env.is_test_or_debug(),
        );
        debug!("Plugin versions: {:?}", dev_dependencies);
        pkg.dev_dependencies.extend(dev_dependencies);
        tokio::fs::write(context.join(MANIFEST_FILE), pkg.to_json_pretty()?).await?;
        let mut files = vec![MANIFEST_FILE.to_string()];

        if let Some((file, contents)) = pm.config_file(&self.toolchain) {
            tokio::fs::write(context.join(file), contents).await?;
            files.push(file.to_string());
        }

        let init_git = self.should_init_git(options).await;
        if init_git {
            self.log("🗃  Initializing git repository...");
            self.emit(CreationEvent::GitInit);
            git::init(context).await?;
        }

        self.log("⚙\u{fe0f}  Installing CLI plugins. This might take a while...\n");
        self.emit(CreationEvent::PluginsInstall);
        if self.env.run_primary_install() {
            self.installer.install(context, pm).await?;
        }

        self.log("🚀  Invoking generators...");
        self.emit(CreationEvent::InvokingGenerators);
        let plugins = expand_plugins(
            &preset.plugins,
            &pkg,
            service_id,
            self.registry.as_ref(),
            prompter,
            self.quiet,
        )?;
        let root_options: Map<String, Value> = preset
            .plugins
            .get(service_id)
            .map(|options| options.as_map().clone())
            .unwrap_or_default();
        let mut generator = Generator::new(context, pkg, plugins).with_root_options(root_options);
        generator
            .generate(GenerateOptions {
                extract_config_files: preset.use_config_files,
            })
            .await?;
        files.extend(generator.files().keys().cloned());

        self.log("📦  Installing additional dependencies...\n");
        self.emit(CreationEvent::DepsInstall);
        if self.env.run_secondary_install() {
            self.installer.install(context, pm).await?;
        }

        self.log("⚓  Running completion hooks...");
        self.emit(CreationEvent::CompletionHooks);
        let (after_invoke, after_any_invoke) = generator.take_hooks();
        for hook in after_invoke.into_iter().chain(after_any_invoke) {
            hook(context.to_path_buf())
                .await
                .map_err(|source| Error::Hook { source })?;
        }

        if !generator.has_file("README.md") {
            self.log("\n📄  Generating README.md...");
            let readme = generate_readme(generator.pkg(), pm, self.config.config_docs_url());
            tokio::fs::write(context.join("README.md"), readme).await?;
            files.push("README.md".to_string());
        }

        let mut commit_failed = false;
        if init_git {
            git::add_all(context).await?;
            if self.env.is_test_or_debug() {
                git::configure_test_identity(context).await?;
            }
            if let Err(e) = git::commit(context, options.git.commit_message()).await {
                warn!("Initial commit failed: {}", e);
                commit_failed = true;
            }
        }

        self.log(format!("\n🎉  Successfully created project {}.", name.yellow()));
        if !options.skip_get_started {
            let steps = self.config.next_steps(context, name, pm);
            let commands: Vec<String> = steps
                .iter()
                .map(|step| format!(" {} {}", "$".dimmed(), step.cyan()))
                .collect();
            self.log(format!(
                "👉  Get started with the following commands:\n\n{}",
                commands.join("\n")
            ));
        }
        self.log("");
        self.emit(CreationEvent::Done);

        if commit_failed && !self.quiet {
            eprintln!(
                "{} Skipped git commit due to missing username and email in git config, or failed to sign commit.\n\
                 You will need to perform the initial commit yourself.\n",
                "WARN".yellow()
            );
        }

        if !self.quiet {
            generator.print_exit_logs();
        }

        Ok(CreationReport {
            action,
            package_manager: Some(pm),
            git_initialized: init_git,
            commit_failed,
            files,
        })
    }
}
