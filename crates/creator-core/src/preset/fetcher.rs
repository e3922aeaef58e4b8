//! Preset loading from local files or remote repositories
//!
//! Remote references have the form `<owner>/<repo>[/<subpath>][#<ref>]` and resolve to
//! `<subpath>/preset.json` in that repository, fetched over HTTP from a raw-content base
//! or, when cloning is requested, read from a shallow `git clone`.

use crate::config::CreatorEnv;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;
use url::Url;

/// Timeout for fetching a remote preset over HTTP
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// File holding the preset inside a directory or repository
pub const PRESET_FILE: &str = "preset.json";

/// Whether a preset name refers to a local file
pub fn looks_like_path(name: &str) -> bool {
    name.ends_with(".json") || name.starts_with('.') || Path::new(name).is_absolute()
}

/// Whether a preset name refers to a remote repository
pub fn looks_like_remote(name: &str) -> bool {
    name.contains('/')
}

/// Load a preset from a JSON file, or from `preset.json` inside a directory
pub async fn load_local_preset(path: &Path) -> Result<Value> {
    let file = if fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
        path.join(PRESET_FILE)
    } else {
        path.to_path_buf()
    };

    let content = fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", file.display()))
}

/// Parsed `<owner>/<repo>[/<subpath>][#<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePresetRef {
    pub owner: String,
    pub repo: String,
    pub subpath: Vec<String>,
    pub reference: Option<String>,
}

impl RemotePresetRef {
    pub fn parse(input: &str) -> Result<Self> {
        let (path, reference) = match input.split_once('#') {
            Some((path, reference)) if !reference.is_empty() => (path, Some(reference.to_string())),
            Some((path, _)) => (path, None),
            None => (input, None),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next();
        let repo = segments.next();
        match (owner, repo) {
            (Some(owner), Some(repo)) => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
                subpath: segments.map(str::to_string).collect(),
                reference,
            }),
            _ => anyhow::bail!(
                "Invalid remote preset '{}'. Expected <owner>/<repo>[/<subpath>]",
                input
            ),
        }
    }
}

/// Fetches presets from a remote repository
pub struct RemotePresetFetcher {
    raw_base: Url,
    clone_base: Url,
    client: reqwest::Client,
}

impl RemotePresetFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(raw_base: Url, clone_base: Url, user_agent: &str) -> Self {
        Self {
            raw_base,
            clone_base,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher from a product config, honouring the env override
    pub fn from_config<C: ProductConfig>(config: &C, env: &CreatorEnv) -> Result<Self> {
        let raw = env
            .remote_preset_url
            .clone()
            .unwrap_or_else(|| config.remote_preset_base_url().to_string());
        let raw_base =
            Url::parse(&raw).with_context(|| format!("Invalid remote preset URL: {}", raw))?;
        let clone_base = Url::parse(config.remote_clone_base_url()).with_context(|| {
            format!("Invalid clone URL: {}", config.remote_clone_base_url())
        })?;
        Ok(Self::new(raw_base, clone_base, config.user_agent()))
    }

    /// Build a URL by appending path segments, preserving query parameters
    fn build_url(base: &Url, segments: &[&str]) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Raw-content URL of the preset file for a reference
    pub fn preset_url(&self, preset: &RemotePresetRef) -> Result<Url> {
        let mut segments: Vec<&str> = vec![
            preset.owner.as_str(),
            preset.repo.as_str(),
            preset.reference.as_deref().unwrap_or("HEAD"),
        ];
        segments.extend(preset.subpath.iter().map(String::as_str));
        segments.push(PRESET_FILE);
        Self::build_url(&self.raw_base, &segments)
    }

    /// Fetch and parse a remote preset
    pub async fn fetch(&self, reference: &str, clone: bool) -> Result<Value> {
        let preset = RemotePresetRef::parse(reference)?;
        if clone {
            self.fetch_by_clone(&preset).await
        } else {
            self.fetch_over_http(&preset).await
        }
    }

    async fn fetch_over_http(&self, preset: &RemotePresetRef) -> Result<Value> {
        let url = self.preset_url(preset)?;
        debug!("Fetching remote preset from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch remote preset from {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch remote preset from {}: HTTP {}",
                url,
                response.status()
            );
        }

        let content = response.text().await?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse preset from {}", url))
    }

    async fn fetch_by_clone(&self, preset: &RemotePresetRef) -> Result<Value> {
        let repo_file = format!("{}.git", preset.repo);
        let repo_url = Self::build_url(&self.clone_base, &[preset.owner.as_str(), repo_file.as_str()])?;
        let tmp = tempfile::tempdir().context("Failed to create temporary directory")?;
        let checkout: PathBuf = tmp.path().join(&preset.repo);

        let mut cmd = Command::new("git");
        cmd.arg("clone").arg("--depth").arg("1");
        if let Some(reference) = &preset.reference {
            cmd.arg("--branch").arg(reference);
        }
        cmd.arg(repo_url.as_str()).arg(&checkout);

        debug!("Cloning remote preset from {}", repo_url);
        let output = cmd
            .output()
            .await
            .with_context(|| format!("Failed to run git clone {}", repo_url))?;
        if !output.status.success() {
            anyhow::bail!(
                "git clone {} failed: {}",
                repo_url,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let dir = preset
            .subpath
            .iter()
            .fold(checkout, |dir, segment| dir.join(segment));
        load_local_preset(&dir).await
    }
}
