//! Project name validation and handling of an existing target directory

use crate::creator::CreateOptions;
use crate::error::{Error, Result};
use crate::prompt::{Choice, PromptEngine, Question};
use colored::Colorize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

const MAX_NAME_LENGTH: usize = 214;

const BLACKLISTED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
    "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants",
    "crypto", "dgram", "dns", "domain", "events", "fs", "http", "http2", "https", "inspector",
    "module", "net", "os", "path", "perf_hooks", "process", "punycode", "querystring",
    "readline", "repl", "stream", "string_decoder", "sys", "timers", "tls", "trace_events",
    "tty", "url", "util", "v8", "vm", "worker_threads", "zlib",
];

/// Outcome of package-name validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameValidation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl NameValidation {
    pub fn valid_for_new_packages(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Turn a failed validation into an error carrying every message
    pub fn into_result(self, name: &str) -> Result<()> {
        if self.valid_for_new_packages() {
            return Ok(());
        }
        Err(Error::InvalidProjectName {
            name: name.to_string(),
            errors: self.errors,
            warnings: self.warnings,
        })
    }
}

/// Characters `encodeURIComponent` leaves untouched
fn is_url_friendly(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
    })
}

/// Validate `name` against npm package-name rules
pub fn validate_project_name(name: &str) -> NameValidation {
    let mut result = NameValidation::default();

    if name.is_empty() {
        result.errors.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        result.errors.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        result.errors.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        result
            .errors
            .push("name cannot contain leading or trailing spaces".to_string());
    }
    let lower = name.to_lowercase();
    if BLACKLISTED_NAMES.contains(&lower.as_str()) {
        result.errors.push(format!("{} is a blacklisted name", name));
    }

    if CORE_MODULES.contains(&lower.as_str()) {
        result.warnings.push(format!("{} is a core module name", name));
    }
    if name.len() > MAX_NAME_LENGTH {
        result.warnings.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if lower != name {
        result
            .warnings
            .push("name can no longer contain capital letters".to_string());
    }
    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.contains(|c: char| matches!(c, '~' | '\'' | '!' | '(' | ')' | '*')) {
        result
            .warnings
            .push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }

    if !is_url_friendly(name) {
        let scoped_ok = name
            .strip_prefix('@')
            .and_then(|rest| rest.split_once('/'))
            .is_some_and(|(scope, pkg)| {
                !scope.is_empty()
                    && !pkg.is_empty()
                    && !pkg.contains('/')
                    && is_url_friendly(scope)
                    && is_url_friendly(pkg)
            });
        if !scoped_ok {
            result
                .errors
                .push("name can only contain URL-friendly characters".to_string());
        }
    }

    result
}

/// Where a project named `project_name` is created, relative to `cwd`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    /// Package name: the argument, or the directory's own name for in-place creation
    pub name: String,
    pub dir: PathBuf,
    pub in_current: bool,
}

impl ProjectTarget {
    pub fn resolve(cwd: &Path, project_name: &str) -> Self {
        let in_current = project_name == ".";
        let name = if in_current {
            cwd.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            project_name.to_string()
        };
        let dir = if in_current {
            cwd.to_path_buf()
        } else {
            cwd.join(project_name)
        };
        Self {
            name,
            dir,
            in_current,
        }
    }
}

/// What to do with the target directory before creation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryAction {
    /// The directory was removed or never existed
    ProceedClean,
    /// Keep existing files and create on top of them
    ProceedMerge,
    /// Stop without touching anything
    Abort,
}

/// Decide how to handle an existing target, removing it when asked to
pub async fn resolve_directory(
    target: &ProjectTarget,
    options: &CreateOptions,
    prompter: &mut dyn PromptEngine,
    quiet: bool,
) -> Result<DirectoryAction> {
    let exists = tokio::fs::try_exists(&target.dir).await?;
    if !exists || options.merge {
        return Ok(DirectoryAction::ProceedMerge);
    }

    if options.force {
        remove_dir(&target.dir, quiet).await?;
        return Ok(DirectoryAction::ProceedClean);
    }

    if target.in_current {
        let question = Question::confirm("ok", "Generate project in current directory?");
        let answers = prompter.prompt(&[question])?;
        return Ok(if answers.is_truthy("ok") {
            DirectoryAction::ProceedMerge
        } else {
            DirectoryAction::Abort
        });
    }

    let question = Question::list(
        "action",
        format!(
            "Target directory {} already exists. Pick an action:",
            target.dir.display()
        ),
    )
    .choice(Choice::new("Overwrite", "overwrite"))
    .choice(Choice::new("Merge", "merge"))
    .choice(Choice::new("Cancel", "cancel"));

    let answers = prompter.prompt(&[question])?;
    match answers.get("action").and_then(Value::as_str) {
        Some("overwrite") => {
            remove_dir(&target.dir, quiet).await?;
            Ok(DirectoryAction::ProceedClean)
        }
        Some("merge") => Ok(DirectoryAction::ProceedMerge),
        _ => Ok(DirectoryAction::Abort),
    }
}

async fn remove_dir(dir: &Path, quiet: bool) -> Result<()> {
    info!("Removing {}", dir.display());
    if !quiet {
        println!("\nRemoving {}...", dir.display().to_string().cyan());
    }
    tokio::fs::remove_dir_all(dir).await?;
    Ok(())
}
