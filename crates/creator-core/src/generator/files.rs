//! Writing a rendered file tree to disk

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use std::path::{Component, Path};
use tokio::fs;

/// Write `files` (relative path to contents) under `target_dir`, creating parent directories
pub async fn write_file_tree(target_dir: &Path, files: &IndexMap<String, String>) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut written = Vec::with_capacity(files.len());

    for (relative, content) in files {
        let target_path = target_dir.join(normalize_path(relative)?);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        written.push(relative.clone());
    }

    Ok(written)
}

/// Normalize a rendered path to forward slashes relative to the project root
///
/// Absolute paths and `..` segments are rejected.
pub fn normalize_path(path: &str) -> Result<String> {
    let unified = path.replace('\\', "/");
    let mut parts = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("File path must stay inside the project: {}", path)
            }
        }
    }
    if parts.is_empty() {
        bail!("Empty file path: {:?}", path);
    }
    Ok(parts.join("/"))
}
