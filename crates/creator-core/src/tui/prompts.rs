//! Charm-style session around a creation run

use super::prompter::CliclackPrompter;
use crate::creator::{CreateOptions, CreationReport, Creator};
use crate::directory::{DirectoryAction, ProjectTarget};
use crate::error::Result;
use crate::plugin::PluginResolver;
use crate::product::ProductConfig;
use crate::prompt::PromptModule;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name, or `.` to create in the current directory
    pub project_name: String,

    pub options: CreateOptions,

    /// Directory the project name is resolved against (defaults to the current directory)
    pub cwd: Option<PathBuf>,
}

/// Run the CLI with interactive prompts
///
/// Errors are returned unprinted; reporting them is left to the caller.
pub async fn run<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    modules: &[PromptModule],
    registry: impl PluginResolver + 'static,
) -> Result<CreationReport> {
    let cwd = match args.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };
    let target = ProjectTarget::resolve(&cwd, &args.project_name);
    let creator = Creator::new(config.clone(), target, modules).with_registry(registry);

    if !creator.env().is_test_or_debug() {
        let _ = console::Term::stdout().clear_screen();
    }
    cliclack::intro(format!("{} v{}", config.display_name(), config.cli_version()))?;

    let mut prompter = CliclackPrompter::new();
    match creator.create(&args.options, None, &mut prompter).await {
        Ok(report) if report.action == DirectoryAction::Abort => {
            cliclack::outro_cancel("Creation cancelled")?;
            Ok(report)
        }
        Ok(report) => {
            cliclack::outro(format!("{} is ready", creator.target().name))?;
            Ok(report)
        }
        Err(e) => {
            let _ = cliclack::outro_cancel("Creation failed");
            Err(e)
        }
    }
}
