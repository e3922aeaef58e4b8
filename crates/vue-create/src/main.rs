//! vue-create - Create Vue projects from presets and plugins

mod features;
mod generators;

use clap::Parser;
use colored::Colorize;
use creator_core::tui::CreateArgs;
use creator_core::{
    CreateOptions, CreatorEnv, Error, GitOption, PackageManager, PluginOptions, Preset,
    ProductConfig,
};
use indexmap::IndexMap;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vue product configuration
#[derive(Clone)]
pub struct VueConfig;

fn default_preset(vue_version: &str) -> Preset {
    let mut plugins = IndexMap::new();
    plugins.insert("@vue/cli-plugin-babel".to_string(), PluginOptions::new());
    plugins.insert(
        "@vue/cli-plugin-eslint".to_string(),
        PluginOptions::new()
            .with("config", "base")
            .with("lintOn", vec!["save"]),
    );
    Preset {
        vue_version: Some(vue_version.to_string()),
        use_config_files: false,
        plugins,
        ..Preset::default()
    }
}

impl ProductConfig for VueConfig {
    fn name(&self) -> &'static str {
        "vue-create"
    }

    fn display_name(&self) -> &'static str {
        "Vue CLI"
    }

    fn cli_version(&self) -> &'static str {
        CLI_VERSION
    }

    fn env_prefix(&self) -> &'static str {
        "VUE_CLI"
    }

    fn core_service_id(&self) -> &'static str {
        generators::SERVICE_ID
    }

    fn is_first_party(&self, id: &str) -> bool {
        id.starts_with("@vue/cli-plugin-")
            || id == generators::SERVICE_ID
            || id == "@vue/babel-preset-env"
    }

    fn legacy_router_id(&self) -> &'static str {
        "@vue/cli-plugin-router"
    }

    fn legacy_vuex_id(&self) -> &'static str {
        "@vue/cli-plugin-vuex"
    }

    fn default_presets(&self) -> IndexMap<String, Preset> {
        let mut presets = IndexMap::new();
        presets.insert("Default (Vue 3)".to_string(), default_preset("3"));
        presets.insert("Default (Vue 2)".to_string(), default_preset("2"));
        presets
    }

    fn default_preset_name(&self) -> &'static str {
        "Default (Vue 3)"
    }

    fn rc_file_name(&self) -> &'static str {
        ".vuerc"
    }

    fn remote_preset_base_url(&self) -> &'static str {
        "https://raw.githubusercontent.com"
    }

    fn version_marker_url(&self) -> &'static str {
        "https://registry.npmjs.org/@vue%2Fcli/latest"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install vue-create --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "vue-create")]
#[command(about = "Create a new project powered by vue-cli-service")]
#[command(version)]
pub struct Args {
    /// Project name, or `.` to create in the current directory
    pub app_name: String,

    /// Skip prompts and use saved or remote preset
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Skip prompts and use default preset
    #[arg(short, long = "default")]
    pub default: bool,

    /// Skip prompts and use inline JSON string as preset
    #[arg(short, long = "inlinePreset")]
    pub inline_preset: Option<String>,

    /// Use specified npm client when installing dependencies
    #[arg(short = 'm', long = "packageManager")]
    pub package_manager: Option<PackageManager>,

    /// Force git initialization with initial commit message
    #[arg(short, long, num_args = 0..=1, default_missing_value = "true")]
    pub git: Option<String>,

    /// Skip git initialization
    #[arg(short, long = "no-git")]
    pub no_git: bool,

    /// Overwrite target directory if it exists
    #[arg(short, long)]
    pub force: bool,

    /// Merge target directory if it exists
    #[arg(long)]
    pub merge: bool,

    /// Use git clone when fetching remote preset
    #[arg(short, long)]
    pub clone: bool,

    /// Scaffold project without beginner instructions
    #[arg(short, long)]
    pub bare: bool,

    /// Skip displaying "Get started" instructions
    #[arg(long = "skipGetStarted")]
    pub skip_get_started: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        let git = if args.no_git {
            GitOption::Disabled
        } else {
            GitOption::from_arg(args.git.as_deref())
        };
        let force_git = args.git.is_some() && git != GitOption::Disabled;
        CreateArgs {
            project_name: args.app_name,
            options: CreateOptions {
                preset_name: args.preset,
                use_default: args.default,
                inline_preset: args.inline_preset,
                package_manager: args.package_manager,
                force_git,
                git,
                merge: args.merge,
                force: args.force,
                bare: args.bare,
                skip_get_started: args.skip_get_started,
                clone: args.clone,
            },
            cwd: None,
        }
    }
}

fn init_tracing(env: &CreatorEnv) {
    let default_level = if env.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = VueConfig;
    let env = CreatorEnv::from_env(&config);
    init_tracing(&env);

    let result = creator_core::run(
        &config,
        args.into(),
        features::PROMPT_MODULES,
        generators::registry(),
    )
    .await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        for line in error_report(&e) {
            eprintln!("{}", line);
        }
        if !env.test {
            std::process::exit(e.exit_code());
        }
    }
}

/// Lines printed for a failed run: the error, then its details
fn error_report(e: &Error) -> Vec<String> {
    std::iter::once(format!("{} {}", "ERROR".red().bold(), e))
        .chain(e.details().into_iter().map(|line| format!("  {}", line.dimmed())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CreateArgs {
        Args::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn test_default_flags() {
        let args = parse(&["vue-create", "demo", "--default"]);
        assert_eq!(args.project_name, "demo");
        assert!(args.options.use_default);
        assert_eq!(args.options.git, GitOption::Default);
        assert!(!args.options.force_git);
    }

    #[test]
    fn test_git_message_forces_git() {
        let args = parse(&["vue-create", "demo", "--git", "first commit"]);
        assert_eq!(args.options.git, GitOption::Message("first commit".to_string()));
        assert!(args.options.force_git);

        let args = parse(&["vue-create", "demo", "--git"]);
        assert_eq!(args.options.git, GitOption::Default);
        assert!(args.options.force_git);
    }

    #[test]
    fn test_git_false_disables() {
        let args = parse(&["vue-create", "demo", "--git", "false"]);
        assert_eq!(args.options.git, GitOption::Disabled);
        assert!(!args.options.force_git);
    }

    #[test]
    fn test_no_git_wins() {
        let args = parse(&["vue-create", "demo", "--no-git", "--git", "msg"]);
        assert_eq!(args.options.git, GitOption::Disabled);
        assert!(!args.options.force_git);
    }

    #[test]
    fn test_package_manager_and_inline_preset() {
        let args = parse(&[
            "vue-create",
            "demo",
            "--packageManager",
            "pnpm",
            "--inlinePreset",
            r#"{"plugins":{}}"#,
        ]);
        assert_eq!(args.options.package_manager, Some(PackageManager::Pnpm));
        assert_eq!(args.options.inline_preset.as_deref(), Some(r#"{"plugins":{}}"#));
    }

    #[test]
    fn test_default_presets_are_valid() {
        for (name, preset) in VueConfig.default_presets() {
            assert!(preset.validate().is_ok(), "{} should be valid", name);
        }
        assert!(VueConfig.is_first_party("@vue/babel-preset-env"));
        assert!(!VueConfig.is_first_party("vue-cli-plugin-apollo"));
    }

    #[test]
    fn test_error_report_states_error_once() {
        let err = Error::PresetNotFound {
            name: "missing".to_string(),
            available: vec!["Default (Vue 3)".to_string()],
        };
        let report = error_report(&err);

        let mentions = report
            .iter()
            .filter(|line| line.contains("preset \"missing\" not found"))
            .count();
        assert_eq!(mentions, 1);
        assert!(report[0].contains("ERROR"));
        assert!(report.iter().any(|line| line.contains("Default (Vue 3)")));
    }
}
