//! User-level saved options (package-manager preference, saved presets)

use crate::config::CreatorEnv;
use crate::error::{Error, Result};
use crate::preset::Preset;
use crate::product::ProductConfig;
use crate::runtime::PackageManager;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PACKAGE_MANAGER_KEY: &str = "packageManager";

/// Contents of the saved options file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<PackageManager>,

    /// Saved presets, kept as raw JSON and validated when selected
    #[serde(default)]
    pub presets: IndexMap<String, Value>,

    /// Unknown keys written by other tools, preserved on save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SavedOptions {
    /// Saved presets overlaid by the built-in ones (built-ins win on name collision)
    pub fn all_presets(&self, defaults: &IndexMap<String, Preset>) -> IndexMap<String, Value> {
        let mut all = self.presets.clone();
        for (name, preset) in defaults {
            all.insert(name.clone(), Value::Object(preset.to_map()));
        }
        all
    }
}

/// Reads and writes the saved options file
#[derive(Debug, Clone)]
pub struct OptionsStore {
    path: PathBuf,
}

impl OptionsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store location for a product: the env override, else `~/<rc_file_name>`
    pub fn for_product<C: ProductConfig>(config: &C, env: &CreatorEnv) -> Self {
        let path = env.config_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(config.rc_file_name())
        });
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved options; a missing file loads as empty, a corrupt one is an error
    pub fn try_load(&self) -> Result<SavedOptions> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SavedOptions::default()),
            Err(e) => return Err(e.into()),
        };
        parse_options(&content).map_err(|source| Error::InvalidOptionsFile {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Load saved options for reading only; any failure loads as empty
    pub fn load(&self) -> SavedOptions {
        self.try_load().unwrap_or_else(|e| {
            warn!("Ignoring options file {}: {}", self.path.display(), e);
            SavedOptions::default()
        })
    }

    /// Write the options file
    pub fn save(&self, options: &SavedOptions) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(options)?;
        std::fs::write(&self.path, content)?;
        debug!("Saved options to {}", self.path.display());
        Ok(())
    }

    /// Persist the package-manager preference
    pub fn save_package_manager(&self, pm: PackageManager) -> Result<()> {
        let mut options = self.try_load()?;
        options.extra.shift_remove(PACKAGE_MANAGER_KEY);
        options.package_manager = Some(pm);
        self.save(&options)
    }

    /// Persist a preset under `name`, replacing any preset of the same name
    pub fn save_preset(&self, name: &str, preset: &Preset) -> Result<()> {
        let mut options = self.try_load()?;
        options
            .presets
            .insert(name.to_string(), Value::Object(preset.to_map()));
        self.save(&options)
    }
}

/// Parse the options file; a package manager this build does not know is kept verbatim
fn parse_options(content: &str) -> serde_json::Result<SavedOptions> {
    let mut fields: Map<String, Value> = serde_json::from_str(content)?;
    let package_manager = fields.shift_remove(PACKAGE_MANAGER_KEY);
    let mut options: SavedOptions = serde_json::from_value(Value::Object(fields))?;

    if let Some(raw) = package_manager {
        match serde_json::from_value::<PackageManager>(raw.clone()) {
            Ok(pm) => options.package_manager = Some(pm),
            Err(_) => {
                debug!("Unknown saved package manager {}", raw);
                options.extra.insert(PACKAGE_MANAGER_KEY.to_string(), raw);
            }
        }
    }
    Ok(options)
}
