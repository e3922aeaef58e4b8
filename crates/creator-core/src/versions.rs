//! Latest published CLI version, used for first-party pinning and update notices

use crate::config::CreatorEnv;
use crate::product::ProductConfig;
use anyhow::{Context, Result};
use semver::Version;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Timeout for the version marker request
const MARKER_TIMEOUT: Duration = Duration::from_secs(5);

/// Running version, latest published version, and the minor line derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versions {
    pub current: String,
    pub latest: String,
    pub latest_minor: String,
}

impl Versions {
    /// Every field set to the running version
    pub fn local(current: &str) -> Self {
        Self {
            current: current.to_string(),
            latest: current.to_string(),
            latest_minor: current.to_string(),
        }
    }

    /// Build from the running and latest published versions
    pub fn from_latest(current: &str, latest: &str) -> Self {
        let latest = match (parse_version(current), parse_version(latest)) {
            (Ok(local), Ok(remote)) if local > remote && local.pre.is_empty() => current,
            _ => latest,
        };
        Self {
            current: current.to_string(),
            latest: latest.to_string(),
            latest_minor: latest_minor(latest),
        }
    }

    /// Upgrade notice when a newer CLI is published
    pub fn update_notice(&self, upgrade_command: &str) -> Option<String> {
        check_update(&self.current, &self.latest, upgrade_command)
    }
}

#[derive(Deserialize)]
struct VersionMarker {
    version: String,
}

/// Discover versions; test/debug runs and lookup failures fall back to the running version
pub async fn discover_versions<C: ProductConfig>(config: &C, env: &CreatorEnv) -> Versions {
    let current = config.cli_version();
    if env.is_test_or_debug() {
        return Versions::local(current);
    }

    versions_from_lookup(current, fetch_latest(config).await)
}

/// Versions from the outcome of a latest-version lookup
fn versions_from_lookup(current: &str, lookup: Result<String>) -> Versions {
    match lookup {
        Ok(latest) => Versions::from_latest(current, &latest),
        Err(e) => {
            debug!("Version lookup failed, using {}: {:#}", current, e);
            Versions::local(current)
        }
    }
}

async fn fetch_latest<C: ProductConfig>(config: &C) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent())
        .timeout(MARKER_TIMEOUT)
        .build()?;
    let marker: VersionMarker = client
        .get(config.version_marker_url())
        .send()
        .await
        .context("Failed to reach version marker")?
        .error_for_status()?
        .json()
        .await
        .context("Invalid version marker")?;
    Ok(marker.version)
}

/// `5.0.8` -> `5.0.0`; prereleases are kept as they are; unparsable input is returned as is
pub fn latest_minor(latest: &str) -> String {
    match parse_version(latest) {
        Ok(v) if v.pre.is_empty() => format!("{}.{}.0", v.major, v.minor),
        _ => latest.to_string(),
    }
}

/// Notice when `latest` is newer than `current`
pub fn check_update(current: &str, latest: &str, upgrade_command: &str) -> Option<String> {
    let current_ver = parse_version(current).ok()?;
    let latest_ver = parse_version(latest).ok()?;

    if current_ver < latest_ver {
        Some(format!(
            "New version available {} -> {}\n\
             Run {} to upgrade.",
            current, latest, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse a version string, tolerating a leading `v`
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::testing::TestProduct;

    #[test]
    fn test_latest_minor() {
        assert_eq!(latest_minor("5.0.8"), "5.0.0");
        assert_eq!(latest_minor("v4.5.19"), "4.5.0");
        assert_eq!(latest_minor("5.1.0-beta.2"), "5.1.0-beta.2");
        assert_eq!(latest_minor("next"), "next");
    }

    #[test]
    fn test_local_version_newer_than_published() {
        let versions = Versions::from_latest("5.1.0", "5.0.8");
        assert_eq!(versions.latest, "5.1.0");
        assert_eq!(versions.latest_minor, "5.1.0");
        assert!(versions.update_notice("npm i -g @vue/cli").is_none());
    }

    #[test]
    fn test_update_notice() {
        let notice = check_update("5.0.1", "5.0.8", "npm i -g @vue/cli").unwrap();
        assert!(notice.contains("5.0.1 -> 5.0.8"));
        assert!(notice.contains("npm i -g @vue/cli"));
        assert!(check_update("5.0.8", "5.0.8", "x").is_none());
        assert!(check_update("invalid", "5.0.8", "x").is_none());
    }

    #[tokio::test]
    async fn test_test_mode_uses_local_version() {
        let versions = discover_versions(&TestProduct, &CreatorEnv::for_tests()).await;
        assert_eq!(versions, Versions::local("5.0.8"));
    }

    #[test]
    fn test_failed_lookup_falls_back() {
        let versions = versions_from_lookup("5.0.8", Err(anyhow::anyhow!("connection refused")));
        assert_eq!(versions, Versions::local("5.0.8"));
    }

    #[test]
    fn test_successful_lookup_pins_minor_line() {
        let versions = versions_from_lookup("5.0.1", Ok("5.2.4".to_string()));
        assert_eq!(versions.latest, "5.2.4");
        assert_eq!(versions.latest_minor, "5.2.0");
        assert!(versions.update_notice("npm i -g @vue/cli").is_some());
    }
}
