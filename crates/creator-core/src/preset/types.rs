//! Preset types, validation, and pure transforms

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// CSS pre-processors a preset may name
const CSS_PREPROCESSORS: &[&str] = &["sass", "dart-sass", "node-sass", "less", "stylus"];

/// Options attached to a single plugin entry of a preset
///
/// Opaque to the pipeline apart from three reserved keys:
/// - `version`: explicit version range, never overwritten by pinning
/// - `prompts`: request a plugin-scoped follow-up prompt session
/// - `_isPreset`: marks the entry as preset-provided; excluded from the manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginOptions(Map<String, Value>);

impl PluginOptions {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Entry carries the `_isPreset` marker
    pub fn is_preset_marker(&self) -> bool {
        self.0
            .get("_isPreset")
            .is_some_and(|v| v.as_bool().unwrap_or(!v.is_null()))
    }

    /// Explicit version range, if any
    pub fn version(&self) -> Option<&str> {
        self.0.get("version").and_then(Value::as_str)
    }

    /// Entry asks for a follow-up prompt session
    pub fn wants_prompts(&self) -> bool {
        self.0
            .get("prompts")
            .is_some_and(|v| v.as_bool().unwrap_or(!v.is_null()))
    }
}

/// A declarative bundle of plugin selections and top-level project choices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default)]
    pub use_config_files: bool,

    #[serde(default)]
    pub plugins: IndexMap<String, PluginOptions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vue_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_preprocessor: Option<String>,

    /// Legacy shorthand for the router plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<bool>,

    /// Legacy shorthand for the store plugin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vuex: Option<bool>,

    /// Legacy shorthand for router history mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_history_mode: Option<bool>,

    /// Any other top-level keys (e.g. `configs`), passed through to the core service
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preset {
    /// Deserialize and validate a preset from arbitrary JSON
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::invalid_preset("preset must be an object"));
        }
        if !value.get("plugins").is_some_and(Value::is_object) {
            return Err(Error::invalid_preset("\"plugins\" is required and must be an object"));
        }
        let preset: Preset =
            serde_json::from_value(value).map_err(|e| Error::invalid_preset(e.to_string()))?;
        preset.validate()?;
        Ok(preset)
    }

    /// Structural validation of option shapes
    ///
    /// An empty plugin map passes: legacy fields and the core service are added later.
    pub fn validate(&self) -> Result<()> {
        for (id, options) in &self.plugins {
            if id.trim().is_empty() || id.trim() != id {
                return Err(Error::invalid_preset(format!("invalid plugin id \"{}\"", id)));
            }
            if options.get("version").is_some_and(|v| !v.is_string()) {
                return Err(Error::invalid_preset(format!(
                    "\"plugins.{}.version\" must be a string",
                    id
                )));
            }
            if options.get("prompts").is_some_and(|v| !v.is_boolean()) {
                return Err(Error::invalid_preset(format!(
                    "\"plugins.{}.prompts\" must be a boolean",
                    id
                )));
            }
        }

        if let Some(css) = &self.css_preprocessor {
            if !CSS_PREPROCESSORS.contains(&css.as_str()) {
                return Err(Error::invalid_preset(format!(
                    "\"cssPreprocessor\" must be one of [{}]",
                    CSS_PREPROCESSORS.join(", ")
                )));
            }
        }

        if let Some(configs) = self.extra.get("configs") {
            if !configs.is_object() {
                return Err(Error::invalid_preset("\"configs\" must be an object"));
            }
        }

        Ok(())
    }

    /// Validation of a preset after core service injection and legacy field expansion
    pub fn validate_expanded(&self) -> Result<()> {
        if self.plugins.is_empty() {
            return Err(Error::invalid_preset("\"plugins\" must contain at least one plugin"));
        }
        self.validate()
    }

    /// The preset as a JSON object
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Add the core service entry, carrying the whole preset body plus `projectName`
    pub fn with_core_service(&self, service_id: &str, project_name: &str, bare: bool) -> Preset {
        let mut options = Map::new();
        options.insert("projectName".to_string(), Value::from(project_name));
        options.extend(self.to_map());
        if bare {
            options.insert("bare".to_string(), Value::Bool(true));
        }

        let mut next = self.clone();
        next.plugins
            .insert(service_id.to_string(), PluginOptions::from_map(options));
        next
    }

    /// Expand the legacy `router`, `routerHistoryMode`, and `vuex` fields into plugin entries
    pub fn with_legacy_fields_expanded(&self, router_id: &str, vuex_id: &str) -> Preset {
        let mut next = self.clone();

        if self.router == Some(true) {
            let entry = next.plugins.entry(router_id.to_string()).or_default();
            if self.router_history_mode == Some(true) {
                entry.insert("historyMode", true);
            }
        }

        if self.vuex == Some(true) {
            next.plugins.entry(vuex_id.to_string()).or_default();
        }

        next
    }

    /// Feature summary shown next to a preset name, e.g. `[Vue 3] babel, eslint`
    pub fn format_features(&self, core_service_id: &str) -> String {
        let mut features: Vec<String> = Vec::new();
        if self.router == Some(true) {
            features.push("vue-router".to_string());
        }
        if self.vuex == Some(true) {
            features.push("vuex".to_string());
        }
        if let Some(css) = &self.css_preprocessor {
            features.push(css.clone());
        }
        features.extend(
            self.plugins
                .keys()
                .filter(|id| id.as_str() != core_service_id)
                .map(|id| short_plugin_id(id).to_string()),
        );

        format!(
            "[Vue {}] {}",
            self.vue_version.as_deref().unwrap_or("2"),
            features.join(", ")
        )
    }
}

/// `@vue/cli-plugin-babel` -> `babel`, `vue-cli-plugin-foo` -> `foo`
pub fn short_plugin_id(id: &str) -> &str {
    match id.rfind("cli-plugin-") {
        Some(idx) => &id[idx + "cli-plugin-".len()..],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROUTER: &str = "@vue/cli-plugin-router";
    const VUEX: &str = "@vue/cli-plugin-vuex";

    #[test]
    fn test_empty_plugins_rejected_only_after_expansion() {
        let preset = Preset::from_value(json!({ "useConfigFiles": true, "plugins": {} })).unwrap();
        let err = preset.validate_expanded().unwrap_err();
        assert!(err.to_string().contains("plugins"));

        let expanded = preset.with_core_service("@vue/cli-service", "demo", false);
        assert!(expanded.validate_expanded().is_ok());
    }

    #[test]
    fn test_legacy_only_preset_is_valid() {
        let preset =
            Preset::from_value(json!({ "router": true, "vuex": true, "plugins": {} })).unwrap();
        let expanded = preset.with_legacy_fields_expanded(ROUTER, VUEX);
        let ids: Vec<&String> = expanded.plugins.keys().collect();
        assert_eq!(ids, vec![ROUTER, VUEX]);
        assert!(expanded.validate_expanded().is_ok());
    }

    #[test]
    fn test_from_value_rejects_missing_plugins() {
        assert!(Preset::from_value(json!({ "useConfigFiles": true })).is_err());
    }

    #[test]
    fn test_from_value_rejects_malformed_shapes() {
        assert!(Preset::from_value(json!({ "plugins": { "a": 1 } })).is_err());
        assert!(Preset::from_value(json!({ "useConfigFiles": "yes", "plugins": { "a": {} } }))
            .is_err());
        assert!(
            Preset::from_value(json!({ "plugins": { "a": { "version": 3 } } })).is_err()
        );
        assert!(Preset::from_value(json!([])).is_err());
    }

    #[test]
    fn test_from_value_rejects_unknown_css_preprocessor() {
        let err = Preset::from_value(json!({
            "plugins": { "@vue/cli-plugin-babel": {} },
            "cssPreprocessor": "postcss-only"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("cssPreprocessor"));
    }

    #[test]
    fn test_from_value_keeps_plugin_order_and_extra_keys() {
        let preset = Preset::from_value(json!({
            "plugins": { "z-plugin": {}, "a-plugin": { "prompts": true } },
            "configs": { "vue": {} }
        }))
        .unwrap();
        let ids: Vec<&String> = preset.plugins.keys().collect();
        assert_eq!(ids, vec!["z-plugin", "a-plugin"]);
        assert!(preset.plugins["a-plugin"].wants_prompts());
        assert!(preset.extra.contains_key("configs"));
    }

    #[test]
    fn test_legacy_router_history_mode_expands() {
        let preset = Preset {
            router: Some(true),
            router_history_mode: Some(true),
            plugins: IndexMap::from([("@vue/cli-plugin-babel".to_string(), PluginOptions::new())]),
            ..Preset::default()
        };
        let expanded = preset.with_legacy_fields_expanded(ROUTER, VUEX);
        assert_eq!(
            expanded.plugins[ROUTER].get("historyMode"),
            Some(&Value::Bool(true))
        );
        assert!(!expanded.plugins.contains_key(VUEX));
        // source preset untouched
        assert!(!preset.plugins.contains_key(ROUTER));
    }

    #[test]
    fn test_legacy_fields_keep_explicit_entry_options() {
        let preset = Preset {
            router: Some(true),
            vuex: Some(true),
            plugins: IndexMap::from([(
                ROUTER.to_string(),
                PluginOptions::new().with("version", "^4.0.0"),
            )]),
            ..Preset::default()
        };
        let expanded = preset.with_legacy_fields_expanded(ROUTER, VUEX);
        assert_eq!(expanded.plugins[ROUTER].version(), Some("^4.0.0"));
        assert!(expanded.plugins[ROUTER].get("historyMode").is_none());
        assert!(expanded.plugins.contains_key(VUEX));
    }

    #[test]
    fn test_core_service_carries_preset_body() {
        let preset = Preset {
            use_config_files: true,
            vue_version: Some("3".to_string()),
            plugins: IndexMap::from([("@vue/cli-plugin-babel".to_string(), PluginOptions::new())]),
            ..Preset::default()
        };
        let injected = preset.with_core_service("@vue/cli-service", "demo", true);
        let service = &injected.plugins["@vue/cli-service"];
        assert_eq!(service.get("projectName"), Some(&json!("demo")));
        assert_eq!(service.get("vueVersion"), Some(&json!("3")));
        assert_eq!(service.get("useConfigFiles"), Some(&json!(true)));
        assert_eq!(service.get("bare"), Some(&json!(true)));
        assert!(service.get("plugins").is_some());
        assert_eq!(preset.plugins.len(), 1);
    }

    #[test]
    fn test_preset_marker_and_version() {
        let opts = PluginOptions::new().with("_isPreset", true).with("version", "1.2.3");
        assert!(opts.is_preset_marker());
        assert_eq!(opts.version(), Some("1.2.3"));
        assert!(!PluginOptions::new().is_preset_marker());
    }

    #[test]
    fn test_format_features() {
        let preset = Preset {
            vue_version: Some("3".to_string()),
            css_preprocessor: Some("less".to_string()),
            plugins: IndexMap::from([
                ("@vue/cli-service".to_string(), PluginOptions::new()),
                ("@vue/cli-plugin-babel".to_string(), PluginOptions::new()),
                ("vue-cli-plugin-apollo".to_string(), PluginOptions::new()),
            ]),
            ..Preset::default()
        };
        assert_eq!(
            preset.format_features("@vue/cli-service"),
            "[Vue 3] less, babel, apollo"
        );
    }
}
