//! Configuration snapshot for a creation run
//!
//! Everything the pipeline would otherwise read from process-wide state is captured here
//! once and passed explicitly:
//! - `CreatorEnv`: test/debug switches and path overrides from the environment
//! - `SavedOptions` / `OptionsStore`: the user-level saved options file

pub mod options;

use crate::product::ProductConfig;
use std::path::PathBuf;

pub use options::{OptionsStore, SavedOptions};

/// Environment switches, read once through the product's prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatorEnv {
    /// `<PREFIX>_TEST`: running under a test harness
    pub test: bool,
    /// `<PREFIX>_DEBUG`: development mode
    pub debug: bool,
    /// `<PREFIX>_TEST_DO_INSTALL_PLUGIN`: run the primary install even in test/debug mode
    pub do_install_plugin: bool,
    /// `<PREFIX>_TEST_DO_INSTALL_DEPS`: run the secondary install even in test/debug mode
    pub do_install_deps: bool,
    /// `<PREFIX>_CONFIG_PATH`: saved options file override
    pub config_path: Option<PathBuf>,
    /// `<PREFIX>_REMOTE_PRESET_URL`: remote preset base URL override
    pub remote_preset_url: Option<String>,
}

impl CreatorEnv {
    /// Read the switches from the process environment
    pub fn from_env<C: ProductConfig>(config: &C) -> Self {
        Self::from_lookup(config.env_prefix(), |key| std::env::var(key).ok())
    }

    /// Read the switches through an arbitrary lookup
    pub fn from_lookup(prefix: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |suffix: &str| lookup(&format!("{}_{}", prefix, suffix));
        let flag = |suffix: &str| var(suffix).is_some_and(|v| is_truthy(&v));

        Self {
            test: flag("TEST"),
            debug: flag("DEBUG"),
            do_install_plugin: flag("TEST_DO_INSTALL_PLUGIN"),
            do_install_deps: flag("TEST_DO_INSTALL_DEPS"),
            config_path: var("CONFIG_PATH").filter(|v| !v.is_empty()).map(PathBuf::from),
            remote_preset_url: var("REMOTE_PRESET_URL").filter(|v| !v.is_empty()),
        }
    }

    /// A snapshot for test harnesses: no installs, no network version lookups
    pub fn for_tests() -> Self {
        Self {
            test: true,
            ..Self::default()
        }
    }

    pub fn is_test_or_debug(&self) -> bool {
        self.test || self.debug
    }

    /// Gate for the install that follows manifest synthesis
    pub fn run_primary_install(&self) -> bool {
        !self.is_test_or_debug() || self.do_install_plugin
    }

    /// Gate for the install that follows generation; independent of the primary gate
    pub fn run_secondary_install(&self) -> bool {
        !self.is_test_or_debug() || self.do_install_deps
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
