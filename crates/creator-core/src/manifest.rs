//! Package descriptor (package.json) of the created project

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// File name of the package descriptor
pub const MANIFEST_FILE: &str = "package.json";

/// The project's package descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub private: bool,

    #[serde(default)]
    pub dev_dependencies: IndexMap<String, String>,

    /// Every other field (scripts, dependencies, config sections), kept in order
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Seed a manifest for `name`, overlaid with the fields of an existing descriptor
    pub fn seed(name: &str, existing: Option<Map<String, Value>>) -> Result<Self> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::from(name));
        fields.insert("version".to_string(), Value::from("0.1.0"));
        fields.insert("private".to_string(), Value::Bool(true));
        fields.insert("devDependencies".to_string(), Value::Object(Map::new()));

        if let Some(existing) = existing {
            fields.extend(existing);
        }

        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Read `package.json` from `dir` if one exists
    pub async fn read_existing(dir: &Path) -> Result<Option<Map<String, Value>>> {
        let path = dir.join(MANIFEST_FILE);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path).await?;
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    /// Deep-merge `fields` into the manifest; objects merge key by key, everything else replaces
    pub fn extend(&mut self, fields: Map<String, Value>) -> Result<()> {
        let mut current = match serde_json::to_value(&*self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merge_into(&mut current, fields);
        *self = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }

    /// `scripts` entries in declaration order
    pub fn scripts(&self) -> Vec<(String, String)> {
        self.extra
            .get("scripts")
            .and_then(Value::as_object)
            .map(|scripts| {
                scripts
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sort dependency maps alphabetically
    pub fn sort_dependencies(&mut self) {
        self.dev_dependencies.sort_keys();
        for key in ["dependencies", "peerDependencies", "optionalDependencies"] {
            if let Some(Value::Object(deps)) = self.extra.get_mut(key) {
                deps.sort_keys();
            }
        }
    }

    /// Pretty JSON with a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }
}

fn merge_into(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_into(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_defaults() {
        let manifest = Manifest::seed("demo", None).unwrap();
        assert_eq!(manifest.name, "demo");
        assert_eq!(manifest.version, "0.1.0");
        assert!(manifest.private);
        assert!(manifest.dev_dependencies.is_empty());
    }

    #[test]
    fn test_seed_overlays_existing_fields() {
        let existing = json!({ "version": "2.0.0", "scripts": { "serve": "vite" } });
        let manifest = Manifest::seed("demo", existing.as_object().cloned()).unwrap();
        assert_eq!(manifest.version, "2.0.0");
        assert_eq!(manifest.scripts(), vec![("serve".to_string(), "vite".to_string())]);
    }

    #[test]
    fn test_serializes_required_keys_first() {
        let manifest = Manifest::seed("demo", None).unwrap();
        let json = manifest.to_json_pretty().unwrap();
        let name = json.find("\"name\"").unwrap();
        let dev = json.find("\"devDependencies\"").unwrap();
        assert!(name < dev);
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_extend_merges_objects() {
        let mut manifest = Manifest::seed("demo", None).unwrap();
        manifest.dev_dependencies.insert("b".to_string(), "1".to_string());
        manifest
            .extend(
                json!({
                    "devDependencies": { "a": "2" },
                    "scripts": { "lint": "eslint" }
                })
                .as_object()
                .cloned()
                .unwrap(),
            )
            .unwrap();
        assert_eq!(manifest.dev_dependencies.len(), 2);
        manifest.sort_dependencies();
        let keys: Vec<&String> = manifest.dev_dependencies.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(manifest.scripts().len(), 1);
    }
}
