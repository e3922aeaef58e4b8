//! Repository operations run inside the project directory

use crate::error::{Error, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Whether `dir` is already inside a git work tree
pub async fn has_project_git(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    Command::new("git")
        .arg("status")
        .current_dir(dir)
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run `git <args>` in `dir`, failing with git's stderr
pub async fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    debug!("Running: git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| Error::git(format!("could not run git {}: {}", args.join(" "), e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::git(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }
    Ok(())
}

pub async fn init(dir: &Path) -> Result<()> {
    run_git(dir, &["init"]).await
}

pub async fn add_all(dir: &Path) -> Result<()> {
    run_git(dir, &["add", "-A"]).await
}

/// Local identity so commits succeed on machines without a global git config
pub async fn configure_test_identity(dir: &Path) -> Result<()> {
    run_git(dir, &["config", "user.name", "test"]).await?;
    run_git(dir, &["config", "user.email", "test@test.com"]).await?;
    run_git(dir, &["config", "commit.gpgSign", "false"]).await
}

pub async fn commit(dir: &Path, message: &str) -> Result<()> {
    run_git(dir, &["commit", "-m", message, "--no-verify"]).await
}
