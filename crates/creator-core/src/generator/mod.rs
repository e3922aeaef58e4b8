//! Minimal generation engine
//!
//! Runs each plugin generator against a `GeneratorApi` scoped to that plugin, then writes
//! the manifest and rendered files. Generators may also queue completion hooks and exit
//! logs, which the creation pipeline drains after the secondary install.

pub mod files;
pub mod readme;

use crate::error::{Error, Result};
use crate::manifest::{Manifest, MANIFEST_FILE};
use crate::plugin::PluginDescriptor;
use crate::preset::short_plugin_id;
use colored::Colorize;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use files::write_file_tree;
pub use readme::generate_readme;

/// Completion hook: runs in the project directory once dependencies are installed
pub type Hook = Box<dyn FnOnce(PathBuf) -> BoxFuture<'static, anyhow::Result<()>> + Send>;

/// Manifest sections that may live in dedicated config files, with their file name
const CONFIG_FILES: &[(&str, &str)] = &[
    ("babel", "babel.config.js"),
    ("postcss", "postcss.config.js"),
    ("eslintConfig", ".eslintrc.js"),
    ("jest", "jest.config.js"),
    ("browserslist", ".browserslistrc"),
    ("lint-staged", ".lintstagedrc"),
];

/// Sections always moved out of the manifest
const RESERVED_CONFIG_FILES: &[(&str, &str)] = &[("vue", "vue.config.js")];

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Move config sections out of the manifest into dedicated files
    pub extract_config_files: bool,
}

/// Severity of a message printed after creation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Log,
    Info,
    Done,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitLog {
    pub id: String,
    pub message: String,
    pub kind: LogKind,
}

/// Surface handed to one plugin generator
pub struct GeneratorApi<'a> {
    id: &'a str,
    plugin_ids: &'a [String],
    root_options: &'a Map<String, Value>,
    pkg: &'a mut Manifest,
    files: &'a mut IndexMap<String, String>,
    after_invoke: &'a mut Vec<Hook>,
    after_any_invoke: &'a mut Vec<Hook>,
    exit_logs: &'a mut Vec<ExitLog>,
}

impl<'a> GeneratorApi<'a> {
    /// Id of the plugin being applied
    pub fn id(&self) -> &str {
        self.id
    }

    /// Options of the core service: project name plus every top-level preset choice
    pub fn root_options(&self) -> &Map<String, Value> {
        self.root_options
    }

    /// Whether a plugin takes part in this run, by full or short id
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugin_ids
            .iter()
            .any(|p| p == id || short_plugin_id(p) == id)
    }

    /// Add or replace a file, path relative to the project root
    ///
    /// Fails for paths that would land outside the project directory.
    pub fn render(&mut self, path: &str, content: impl Into<String>) -> anyhow::Result<()> {
        self.files.insert(files::normalize_path(path)?, content.into());
        Ok(())
    }

    /// Deep-merge fields into the project manifest
    pub fn extend_package(&mut self, fields: Value) -> Result<()> {
        match fields {
            Value::Object(map) => self.pkg.extend(map),
            other => Err(Error::Plugin {
                id: self.id.to_string(),
                source: anyhow::anyhow!("extend_package expects an object, got {}", other),
            }),
        }
    }

    /// Manifest as extended so far
    pub fn pkg(&self) -> &Manifest {
        self.pkg
    }

    /// Run after this plugin's dependencies are installed
    pub fn after_invoke<F>(&mut self, hook: F)
    where
        F: FnOnce(PathBuf) -> BoxFuture<'static, anyhow::Result<()>> + Send + 'static,
    {
        self.after_invoke.push(Box::new(hook));
    }

    /// Run after every `after_invoke` hook
    pub fn after_any_invoke<F>(&mut self, hook: F)
    where
        F: FnOnce(PathBuf) -> BoxFuture<'static, anyhow::Result<()>> + Send + 'static,
    {
        self.after_any_invoke.push(Box::new(hook));
    }

    /// Print a message once creation is done
    pub fn exit_log(&mut self, message: impl Into<String>, kind: LogKind) {
        self.exit_logs.push(ExitLog {
            id: self.id.to_string(),
            message: message.into(),
            kind,
        });
    }
}

/// Applies plugin generators and writes the result
pub struct Generator {
    context: PathBuf,
    pkg: Manifest,
    plugins: Vec<PluginDescriptor>,
    root_options: Map<String, Value>,
    files: IndexMap<String, String>,
    after_invoke: Vec<Hook>,
    after_any_invoke: Vec<Hook>,
    exit_logs: Vec<ExitLog>,
}

impl Generator {
    pub fn new(context: impl Into<PathBuf>, pkg: Manifest, plugins: Vec<PluginDescriptor>) -> Self {
        Self {
            context: context.into(),
            pkg,
            plugins,
            root_options: Map::new(),
            files: IndexMap::new(),
            after_invoke: Vec::new(),
            after_any_invoke: Vec::new(),
            exit_logs: Vec::new(),
        }
    }

    /// Options exposed to every generator through `GeneratorApi::root_options`
    pub fn with_root_options(mut self, root_options: Map<String, Value>) -> Self {
        self.root_options = root_options;
        self
    }

    /// Apply every plugin in order, then write the manifest and rendered files
    pub async fn generate(&mut self, options: GenerateOptions) -> Result<()> {
        let plugin_ids: Vec<String> = self.plugins.iter().map(|p| p.id.clone()).collect();

        let Self {
            plugins,
            root_options,
            pkg,
            files,
            after_invoke,
            after_any_invoke,
            exit_logs,
            ..
        } = self;
        let root_options: &Map<String, Value> = root_options;

        for plugin in plugins.iter() {
            debug!("Applying generator of {}", plugin.id);
            let mut api = GeneratorApi {
                id: &plugin.id,
                plugin_ids: &plugin_ids,
                root_options,
                pkg: &mut *pkg,
                files: &mut *files,
                after_invoke: &mut *after_invoke,
                after_any_invoke: &mut *after_any_invoke,
                exit_logs: &mut *exit_logs,
            };
            plugin
                .apply
                .apply(&mut api, &plugin.options, root_options)
                .map_err(|e| Error::plugin(plugin.id.clone(), e))?;
        }

        self.extract_config_files(options.extract_config_files)?;
        self.pkg.sort_dependencies();

        tokio::fs::write(self.context.join(MANIFEST_FILE), self.pkg.to_json_pretty()?).await?;
        write_file_tree(&self.context, &self.files)
            .await
            .map_err(|e| Error::Io(std::io::Error::other(format!("{:#}", e))))?;
        Ok(())
    }

    fn extract_config_files(&mut self, extract_all: bool) -> Result<()> {
        let sections = RESERVED_CONFIG_FILES
            .iter()
            .chain(CONFIG_FILES.iter().filter(|_| extract_all));

        for (key, file) in sections {
            let Some(value) = self.pkg.extra.shift_remove(*key) else {
                continue;
            };
            let content = render_config(file, &value)?;
            debug!("Extracted {} into {}", key, file);
            self.files.insert(file.to_string(), content);
        }
        Ok(())
    }

    /// Rendered files, path relative to the project root
    pub fn files(&self) -> &IndexMap<String, String> {
        &self.files
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn pkg(&self) -> &Manifest {
        &self.pkg
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    /// Drain both hook queues: `(after_invoke, after_any_invoke)`
    pub fn take_hooks(&mut self) -> (Vec<Hook>, Vec<Hook>) {
        (
            std::mem::take(&mut self.after_invoke),
            std::mem::take(&mut self.after_any_invoke),
        )
    }

    pub fn exit_logs(&self) -> &[ExitLog] {
        &self.exit_logs
    }

    pub fn print_exit_logs(&self) {
        for log in &self.exit_logs {
            let message = match log.kind {
                LogKind::Log => log.message.normal(),
                LogKind::Info => log.message.cyan(),
                LogKind::Done => log.message.green(),
                LogKind::Warn => log.message.yellow(),
                LogKind::Error => log.message.red(),
            };
            println!("{} {}", format!("[{}]", short_plugin_id(&log.id)).dimmed(), message);
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("context", &self.context)
            .field("plugins", &self.plugins)
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .field("after_invoke", &self.after_invoke.len())
            .field("after_any_invoke", &self.after_any_invoke.len())
            .finish()
    }
}

fn render_config(file: &str, value: &Value) -> Result<String> {
    if file == ".browserslistrc" {
        if let Some(lines) = value.as_array() {
            let mut out: String = lines
                .iter()
                .filter_map(Value::as_str)
                .map(|line| format!("{}\n", line))
                .collect();
            if out.is_empty() {
                out.push('\n');
            }
            return Ok(out);
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    if file.ends_with(".js") {
        Ok(format!("module.exports = {}\n", json))
    } else {
        Ok(format!("{}\n", json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{NoopGenerator, PluginGenerator};
    use crate::preset::PluginOptions;
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::Arc;

    fn service(
        api: &mut GeneratorApi<'_>,
        _options: &PluginOptions,
        root: &Map<String, Value>,
    ) -> anyhow::Result<()> {
        let name = root
            .get("projectName")
            .and_then(Value::as_str)
            .unwrap_or("app");
        api.render("./src/main.js", format!("// {}\n", name))?;
        api.extend_package(json!({
            "scripts": { "serve": "vue-cli-service serve" },
            "dependencies": { "vue": "^3.2.13", "core-js": "^3.8.3" },
            "browserslist": ["> 1%", "last 2 versions"],
        }))?;
        api.after_invoke(|_dir| async { Ok(()) }.boxed());
        Ok(())
    }

    fn babel(
        api: &mut GeneratorApi<'_>,
        _options: &PluginOptions,
        _root: &Map<String, Value>,
    ) -> anyhow::Result<()> {
        assert!(api.has_plugin("@vue/cli-service"));
        api.extend_package(json!({ "babel": { "presets": ["@vue/cli-plugin-babel/preset"] } }))?;
        api.exit_log("babel configured", LogKind::Done);
        Ok(())
    }

    fn descriptor(id: &str, apply: Arc<dyn PluginGenerator>) -> PluginDescriptor {
        PluginDescriptor {
            id: id.to_string(),
            apply,
            options: PluginOptions::new(),
        }
    }

    fn generator(dir: &Path) -> Generator {
        Generator::new(
            dir,
            Manifest::seed("demo", None).unwrap(),
            vec![
                descriptor("@vue/cli-service", Arc::new(service)),
                descriptor("@vue/cli-plugin-babel", Arc::new(babel)),
                descriptor("@vue/cli-plugin-eslint", Arc::new(NoopGenerator)),
            ],
        )
        .with_root_options(json!({ "projectName": "demo" }).as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn test_generate_writes_manifest_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = generator(dir.path());
        generator.generate(GenerateOptions::default()).await.unwrap();

        assert!(generator.has_file("src/main.js"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/main.js")).unwrap(),
            "// demo\n"
        );

        let pkg: Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert!(pkg["babel"].is_object());
        let deps: Vec<&String> = pkg["dependencies"].as_object().unwrap().keys().collect();
        assert_eq!(deps, vec!["core-js", "vue"]);

        let (after, after_any) = generator.take_hooks();
        assert_eq!(after.len(), 1);
        assert!(after_any.is_empty());
        assert_eq!(generator.exit_logs()[0].id, "@vue/cli-plugin-babel");
    }

    #[tokio::test]
    async fn test_extract_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = generator(dir.path());
        generator
            .generate(GenerateOptions {
                extract_config_files: true,
            })
            .await
            .unwrap();

        assert!(generator.pkg().extra.get("babel").is_none());
        assert!(generator.files()["babel.config.js"].starts_with("module.exports = {"));
        assert_eq!(generator.files()[".browserslistrc"], "> 1%\nlast 2 versions\n");
        assert!(dir.path().join("babel.config.js").exists());
    }

    #[tokio::test]
    async fn test_failing_generator_names_plugin() {
        let dir = tempfile::tempdir().unwrap();
        let failing = |_: &mut GeneratorApi<'_>,
                       _: &PluginOptions,
                       _: &Map<String, Value>|
         -> anyhow::Result<()> { anyhow::bail!("boom") };
        let mut generator = Generator::new(
            dir.path(),
            Manifest::seed("demo", None).unwrap(),
            vec![descriptor("vue-cli-plugin-broken", Arc::new(failing))],
        );

        let err = generator.generate(GenerateOptions::default()).await.unwrap_err();
        match err {
            Error::Plugin { id, .. } => assert_eq!(id, "vue-cli-plugin-broken"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[tokio::test]
    async fn test_render_outside_project_fails_generation() {
        let root = tempfile::tempdir().unwrap();
        let project = root.path().join("demo");
        let escaping = |api: &mut GeneratorApi<'_>,
                        _: &PluginOptions,
                        _: &Map<String, Value>|
         -> anyhow::Result<()> { api.render("../escaped.js", "boom\n") };
        let mut generator = Generator::new(
            &project,
            Manifest::seed("demo", None).unwrap(),
            vec![descriptor("vue-cli-plugin-escape", Arc::new(escaping))],
        );

        let err = generator.generate(GenerateOptions::default()).await.unwrap_err();
        match err {
            Error::Plugin { id, .. } => assert_eq!(id, "vue-cli-plugin-escape"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!root.path().join("escaped.js").exists());
    }
}
