//! Toolchain detection for git, Yarn, and pnpm

use semver::Version;
use std::process::Command;

/// Tool detection result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

impl ToolInfo {
    fn missing(name: &'static str) -> Self {
        Self {
            name,
            version: None,
            available: false,
        }
    }

    /// Parsed semantic version, tolerating a leading `v` and trailing text
    pub fn semver(&self) -> Option<Version> {
        let raw = self.version.as_deref()?;
        let cleaned = raw.trim().trim_start_matches('v');
        let token = cleaned.split_whitespace().next()?;
        Version::parse(token).ok()
    }
}

/// Run `<binary> --version` and capture its output
fn probe(name: &'static str, binary: &str) -> ToolInfo {
    let output = Command::new(binary).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            ToolInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => ToolInfo::missing(name),
    }
}

/// Check if git is available
pub fn check_git() -> ToolInfo {
    probe("git", "git")
}

/// Check if Yarn is available
pub fn check_yarn() -> ToolInfo {
    probe("Yarn", "yarn")
}

/// Check if pnpm is available
pub fn check_pnpm() -> ToolInfo {
    probe("pnpm", "pnpm")
}

/// Tools available on this machine, detected once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub git: ToolInfo,
    pub yarn: ToolInfo,
    pub pnpm: ToolInfo,
}

impl Toolchain {
    /// Detect every tool by spawning `--version`
    pub fn detect() -> Self {
        Self {
            git: check_git(),
            yarn: check_yarn(),
            pnpm: check_pnpm(),
        }
    }

    /// A toolchain with only the universal package manager and, optionally, git
    pub fn npm_only(git: bool) -> Self {
        Self {
            git: if git {
                ToolInfo {
                    name: "git",
                    version: None,
                    available: true,
                }
            } else {
                ToolInfo::missing("git")
            },
            yarn: ToolInfo::missing("Yarn"),
            pnpm: ToolInfo::missing("pnpm"),
        }
    }

    pub fn has_git(&self) -> bool {
        self.git.available
    }

    pub fn has_yarn(&self) -> bool {
        self.yarn.available
    }

    pub fn has_pnpm3_or_later(&self) -> bool {
        self.has_pnpm_version_or_later(&Version::new(3, 0, 0))
    }

    pub fn has_pnpm_version_or_later(&self, min: &Version) -> bool {
        self.pnpm.available && self.pnpm.semver().is_some_and(|v| &v >= min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pnpm(version: &str) -> Toolchain {
        let mut toolchain = Toolchain::npm_only(false);
        toolchain.pnpm = ToolInfo {
            name: "pnpm",
            version: Some(version.to_string()),
            available: true,
        };
        toolchain
    }

    #[test]
    fn test_pnpm_version_gates() {
        assert!(pnpm("8.15.1").has_pnpm3_or_later());
        assert!(pnpm("v4.0.0").has_pnpm_version_or_later(&Version::new(4, 0, 0)));
        assert!(!pnpm("2.25.7").has_pnpm3_or_later());
        assert!(!pnpm("garbage").has_pnpm3_or_later());
    }

    #[test]
    fn test_npm_only() {
        let toolchain = Toolchain::npm_only(true);
        assert!(toolchain.has_git());
        assert!(!toolchain.has_yarn());
        assert!(!toolchain.has_pnpm3_or_later());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let info = probe("nope", "definitely-not-a-real-binary-4f1c");
        assert!(!info.available);
        assert!(info.version.is_none());
    }
}
