//! Package manager selection and dependency installation
//!
//! Installation shells out to the chosen package manager in the project directory and
//! streams its output. The `Installer` trait is the seam the pipeline consumes, so callers
//! can substitute a recording installer in tests.

use super::check::Toolchain;
use crate::error::{Error, Result};
use async_trait::async_trait;
use colored::Colorize;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::info;

/// Timeout for a single install run (10 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Binary name
    pub fn bin(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "NPM",
            PackageManager::Yarn => "Yarn",
            PackageManager::Pnpm => "PNPM",
        }
    }

    /// Resolve the manager for a run: explicit choice, saved preference, detected
    /// alternative, then npm
    pub fn select(
        explicit: Option<PackageManager>,
        saved: Option<PackageManager>,
        toolchain: &Toolchain,
    ) -> PackageManager {
        explicit.or(saved).unwrap_or_else(|| {
            if toolchain.has_yarn() {
                PackageManager::Yarn
            } else if toolchain.has_pnpm3_or_later() {
                PackageManager::Pnpm
            } else {
                PackageManager::Npm
            }
        })
    }

    /// Flag file this manager needs persisted in the project, as `(file name, contents)`
    pub fn config_file(&self, toolchain: &Toolchain) -> Option<(&'static str, &'static str)> {
        match self {
            PackageManager::Pnpm => {
                let contents = if toolchain.has_pnpm_version_or_later(&Version::new(4, 0, 0)) {
                    "shamefully-hoist=true\n"
                } else {
                    "shamefully-flatten=true\n"
                };
                Some((".npmrc", contents))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bin())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            other => Err(format!(
                "Unknown package manager '{}'. Expected one of: npm, yarn, pnpm",
                other
            )),
        }
    }
}

/// Dependency installation seam
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install the dependencies declared in `context/package.json`
    async fn install(&self, context: &Path, pm: PackageManager) -> Result<()>;
}

/// Installs by spawning `<manager> install` and streaming its output
#[derive(Debug, Clone, Default)]
pub struct CommandInstaller;

#[async_trait]
impl Installer for CommandInstaller {
    async fn install(&self, context: &Path, pm: PackageManager) -> Result<()> {
        let install_error = |message: String| Error::Install {
            manager: pm.to_string(),
            message,
        };

        info!("Running {} install in {}", pm, context.display());
        println!("{} {}", "Running:".dimmed(), format!("{} install", pm).yellow());
        println!();

        let mut child = TokioCommand::new(pm.bin())
            .arg("install")
            .current_dir(context)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| install_error(format!("could not start {}: {}", pm.bin(), e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| install_error("failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| install_error("failed to capture stderr".to_string()))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let run = async {
            let mut stdout_done = false;
            let mut stderr_done = false;
            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_reader.next_line(), if !stdout_done => match line {
                        Ok(Some(line)) => println!("  {}", line),
                        _ => stdout_done = true,
                    },
                    line = stderr_reader.next_line(), if !stderr_done => match line {
                        Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                        _ => stderr_done = true,
                    },
                }
            }
            child.wait().await
        };

        match timeout(INSTALL_TIMEOUT, run).await {
            Ok(Ok(status)) if status.success() => {
                println!();
                Ok(())
            }
            Ok(Ok(status)) => Err(install_error(format!(
                "exited with code {}",
                status.code().unwrap_or(-1)
            ))),
            Ok(Err(e)) => Err(install_error(format!("failed to wait for installer: {}", e))),
            Err(_) => Err(install_error(format!(
                "timed out after {} seconds",
                INSTALL_TIMEOUT.as_secs()
            ))),
        }
    }
}
