//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each product must implement to configure
//! the creation pipeline: plugin identities, built-in presets, where saved options
//! live, where remote presets come from, and the post-creation instructions.

use crate::preset::Preset;
use crate::runtime::PackageManager;
use indexmap::IndexMap;
use std::path::Path;

/// Configuration trait for different CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name, version)
/// - The core service plugin and first-party plugin naming
/// - Built-in presets
/// - Remote preset and version marker locations
/// - Post-creation instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Version of the running CLI, used as the pinning fallback
    fn cli_version(&self) -> &'static str;

    /// Prefix for environment switches, e.g. `VUE_CLI` for `VUE_CLI_TEST`
    fn env_prefix(&self) -> &'static str;

    /// Id of the core service plugin, always invoked first
    fn core_service_id(&self) -> &'static str;

    /// Whether a plugin is published by the product team (pinned to the discovered minor line)
    fn is_first_party(&self, id: &str) -> bool;

    /// Plugin the legacy `router` preset field expands into
    fn legacy_router_id(&self) -> &'static str;

    /// Plugin the legacy `vuex` preset field expands into
    fn legacy_vuex_id(&self) -> &'static str;

    /// Built-in presets, in display order
    fn default_presets(&self) -> IndexMap<String, Preset>;

    /// Name of the built-in preset selected by `--default` and the `default` alias
    fn default_preset_name(&self) -> &'static str;

    /// File name of the saved options store in the home directory
    fn rc_file_name(&self) -> &'static str;

    /// Base URL for fetching `<owner>/<repo>[/<subpath>]/preset.json`
    fn remote_preset_base_url(&self) -> &'static str;

    /// Base URL used for `git clone` when a remote preset is cloned
    fn remote_clone_base_url(&self) -> &'static str {
        "https://github.com"
    }

    /// Registry document carrying the latest published CLI `version`
    fn version_marker_url(&self) -> &'static str;

    /// Command that starts the development server
    fn serve_command(&self, pm: PackageManager) -> String {
        match pm {
            PackageManager::Yarn => "yarn serve".to_string(),
            PackageManager::Pnpm => "pnpm run serve".to_string(),
            PackageManager::Npm => "npm run serve".to_string(),
        }
    }

    /// Generate the "get started" instructions after project creation
    fn next_steps(&self, dir: &Path, name: &str, pm: PackageManager) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", name));
        }
        steps.push(self.serve_command(pm));

        steps
    }

    /// Configuration reference linked from the generated README
    fn config_docs_url(&self) -> &'static str {
        "https://cli.vuejs.org/config/"
    }

    /// Upgrade command shown in update notices
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A minimal product used by unit and integration tests

    use super::*;
    use crate::preset::PluginOptions;

    #[derive(Clone)]
    pub struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "test-create"
        }

        fn display_name(&self) -> &'static str {
            "Test Create"
        }

        fn cli_version(&self) -> &'static str {
            "5.0.8"
        }

        fn env_prefix(&self) -> &'static str {
            "TEST_CREATE"
        }

        fn core_service_id(&self) -> &'static str {
            "@vue/cli-service"
        }

        fn is_first_party(&self, id: &str) -> bool {
            id.starts_with("@vue/cli-plugin-") || id == "@vue/cli-service"
        }

        fn legacy_router_id(&self) -> &'static str {
            "@vue/cli-plugin-router"
        }

        fn legacy_vuex_id(&self) -> &'static str {
            "@vue/cli-plugin-vuex"
        }

        fn default_presets(&self) -> IndexMap<String, Preset> {
            let mut plugins = IndexMap::new();
            plugins.insert("@vue/cli-plugin-babel".to_string(), PluginOptions::new());
            plugins.insert("@vue/cli-plugin-eslint".to_string(), PluginOptions::new());
            let preset = Preset {
                vue_version: Some("3".to_string()),
                plugins,
                ..Preset::default()
            };
            let mut presets = IndexMap::new();
            presets.insert("Default (Vue 3)".to_string(), preset);
            presets
        }

        fn default_preset_name(&self) -> &'static str {
            "Default (Vue 3)"
        }

        fn rc_file_name(&self) -> &'static str {
            ".testrc"
        }

        fn remote_preset_base_url(&self) -> &'static str {
            "http://127.0.0.1:9/presets"
        }

        fn version_marker_url(&self) -> &'static str {
            "http://127.0.0.1:9/version-marker/latest"
        }

        fn upgrade_command(&self) -> &'static str {
            "cargo install test-create --force"
        }
    }
}
